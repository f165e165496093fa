use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use log::{LevelFilter, info};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use pel::{ByteCursor, PrivateHeader, Section, UserHeader};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::exit;

struct PelDump {
    input: PathBuf,
    output_target: Option<PathBuf>,
    indent: bool,
    verbosity_level: Option<LevelFilter>,
}

impl PelDump {
    pub fn from_cli_matches(matches: &ArgMatches) -> Result<Self> {
        let input = matches
            .get_one::<PathBuf>("INPUT")
            .cloned()
            .context("an input file is required")?;

        let verbosity_level = match matches.get_count("verbose") {
            0 => None,
            1 => Some(LevelFilter::Info),
            2 => Some(LevelFilter::Debug),
            3 => Some(LevelFilter::Trace),
            _ => {
                eprintln!("using more than  -vvv does not affect verbosity level");
                Some(LevelFilter::Trace)
            }
        };

        Ok(PelDump {
            input,
            output_target: matches.get_one::<PathBuf>("output-target").cloned(),
            indent: !matches.get_flag("no-indent"),
            verbosity_level,
        })
    }

    /// Returns whether both sections were valid.
    pub fn run(&self) -> Result<bool> {
        self.try_to_initialize_logging();

        let data = fs::read(&self.input)
            .with_context(|| format!("Failed to open file {}", self.input.display()))?;
        info!("Read {} bytes from {}", data.len(), self.input.display());

        let mut cursor = ByteCursor::new(&data);
        let private_header = PrivateHeader::from_stream(&mut cursor);
        info!(
            "Decoded `{}` section, valid: {}",
            private_header.header().id_str(),
            private_header.is_valid()
        );

        // The user header always follows a full-size private header, even if it was cut short.
        let user_header_offset = PrivateHeader::FLATTENED_SIZE.min(data.len());
        let mut cursor = ByteCursor::with_pos(&data, user_header_offset)?;
        let user_header = UserHeader::from_stream(&mut cursor);
        info!(
            "Decoded `{}` section, valid: {}",
            user_header.header().id_str(),
            user_header.is_valid()
        );

        let document = serde_json::json!({
            "private_header": private_header,
            "user_header": user_header,
        });

        let mut output: Box<dyn Write> = match &self.output_target {
            Some(path) => Box::new(
                File::create(path)
                    .with_context(|| format!("Failed to create output file {}", path.display()))?,
            ),
            None => Box::new(io::stdout()),
        };

        if self.indent {
            serde_json::to_writer_pretty(&mut output, &document)?;
        } else {
            serde_json::to_writer(&mut output, &document)?;
        }
        writeln!(output)?;

        Ok(private_header.is_valid() && user_header.is_valid())
    }

    fn try_to_initialize_logging(&self) {
        if let Some(level) = self.verbosity_level {
            if let Err(e) = TermLogger::init(
                level,
                Config::default(),
                TerminalMode::Stderr,
                ColorChoice::Auto,
            ) {
                eprintln!("Failed to initialize logging: {}", e);
            }
        }
    }
}

fn cli() -> Command {
    Command::new("PEL Dump")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Utility to decode the leading sections of PEL files")
        .arg(
            Arg::new("INPUT")
                .required(true)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("output-target")
                .short('f')
                .long("output")
                .value_parser(value_parser!(PathBuf))
                .help(
                    "Writes output to the file specified instead of stdout, \
                     errors will still be printed to stderr.",
                ),
        )
        .arg(
            Arg::new("no-indent")
                .long("no-indent")
                .action(ArgAction::SetTrue)
                .help("When set, output will not be indented."),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .action(ArgAction::Count)
                .help("-v - info, -vv - debug, -vvv - trace."),
        )
}

fn main() {
    let matches = cli().get_matches();

    let outcome = PelDump::from_cli_matches(&matches).and_then(|dump| dump.run());

    match outcome {
        Ok(true) => {}
        Ok(false) => exit(2),
        Err(e) => {
            eprintln!("{:?}", e);
            exit(1)
        }
    }
}

mod fixtures;

use fixtures::*;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs::{self, File};
use std::io::Write;
use std::process::Command;
use tempfile::tempdir;

fn write_sample(bytes: &[u8]) -> (tempfile::TempDir, std::path::PathBuf) {
    let d = tempdir().unwrap();
    let path = d.as_ref().join("sample.pel");
    File::create(&path).unwrap().write_all(bytes).unwrap();
    (d, path)
}

#[test]
fn test_it_dumps_valid_sections_as_json() {
    let (_d, sample) = write_sample(&sample_pel_prefix());

    let mut cmd = Command::new(assert_cmd::cargo_bin!("pel_dump"));
    cmd.args(["--no-indent", sample.to_str().unwrap()]);

    let output = cmd.output().unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["private_header"]["valid"], serde_json::json!(true));
    assert_eq!(value["user_header"]["valid"], serde_json::json!(true));
    assert_eq!(value["user_header"]["event_severity"], serde_json::json!(0x40));
}

#[test]
fn test_it_exits_with_2_on_invalid_section() {
    let mut data = sample_pel_prefix();
    data.truncate(data.len() - 3);
    let (_d, sample) = write_sample(&data);

    let mut cmd = Command::new(assert_cmd::cargo_bin!("pel_dump"));
    cmd.arg(sample.to_str().unwrap());

    cmd.assert()
        .code(2)
        .stdout(predicate::str::contains("\"valid\": false"));
}

#[test]
fn test_it_logs_decoded_section_ids_when_verbose() {
    let (_d, sample) = write_sample(&sample_pel_prefix());

    let mut cmd = Command::new(assert_cmd::cargo_bin!("pel_dump"));
    cmd.args(["-v", sample.to_str().unwrap()]);

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Decoded `PH` section, valid: true"))
        .stderr(predicate::str::contains("Decoded `UH` section, valid: true"));
}

#[test]
fn test_it_respects_output_file() {
    let (d, sample) = write_sample(&sample_pel_prefix());
    let f = d.as_ref().join("test.out");

    let mut cmd = Command::new(assert_cmd::cargo_bin!("pel_dump"));
    cmd.args(["-f", &f.to_string_lossy(), sample.to_str().unwrap()]);

    assert!(
        cmd.output().unwrap().stdout.is_empty(),
        "Expected output to be printed to file, but was printed to stdout"
    );

    let written = fs::read_to_string(&f).unwrap();
    assert!(written.contains("private_header"));
}

#[test]
fn test_it_fails_on_missing_input() {
    let d = tempdir().unwrap();
    let missing = d.as_ref().join("does-not-exist.pel");

    let mut cmd = Command::new(assert_cmd::cargo_bin!("pel_dump"));
    cmd.arg(missing.to_str().unwrap());

    cmd.assert().failure().code(1);
}

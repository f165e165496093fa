#![allow(dead_code)]
use std::sync::Once;

use pel::{ActionFlags, BcdTime, CreatorVersion, PrivateHeader, Section, UserHeader};

static LOGGER_INIT: Once = Once::new();

// Rust runs the tests concurrently, so unless we synchronize logging access
// it will crash when attempting to run `cargo test` with some logging facilities.
pub fn ensure_env_logger_initialized() {
    use std::io::Write;

    LOGGER_INIT.call_once(|| {
        let mut builder = env_logger::Builder::from_default_env();
        builder
            .format(|buf, record| writeln!(buf, "[{}] - {}", record.level(), record.args()))
            .is_test(true)
            .init();
    });
}

pub fn sample_private_header() -> PrivateHeader {
    PrivateHeader::builder()
        .create_time(BcdTime {
            year_msb: 0x20,
            year_lsb: 0x20,
            month: 0x05,
            day: 0x17,
            hour: 0x08,
            minutes: 0x30,
            seconds: 0x00,
            hundredths: 0x42,
        })
        .commit_time(BcdTime {
            year_msb: 0x20,
            year_lsb: 0x20,
            month: 0x05,
            day: 0x17,
            hour: 0x08,
            minutes: 0x30,
            seconds: 0x01,
            hundredths: 0x00,
        })
        .creator_id(b'O')
        .log_type(0x01)
        .reserved_byte(0xA5)
        .section_count(4)
        .obmc_log_id(0x0000_0123)
        .creator_version(CreatorVersion([0x00, 0x00, 0x00, 0x09]))
        .plid(0x5000_0001)
        .id(0x5000_0001)
        .build()
}

pub fn sample_user_header() -> UserHeader {
    UserHeader::builder()
        .subsystem(0x62)
        .scope(0x04)
        .severity(0x40)
        .event_type(0x00)
        .problem_domain(0x01)
        .problem_vector(0x02)
        .action_flags(ActionFlags::SERVICE_ACTION | ActionFlags::REPORT)
        .reserved_words(0x1122_3344, 0x5566_7788)
        .build()
}

/// A private header immediately followed by a user header.
pub fn sample_pel_prefix() -> Vec<u8> {
    let mut data = sample_private_header().to_bytes();
    data.extend(sample_user_header().to_bytes());
    data
}

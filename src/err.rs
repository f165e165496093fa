use thiserror::Error;

pub type DeserializationResult<T> = std::result::Result<T, DeserializationError>;

/// Errors raised while pulling a section out of a byte stream.
///
/// These never escape a section constructor: `from_stream` folds them into the section's
/// validity flag. `try_from_stream` surfaces them as-is.
#[derive(Debug, Error)]
pub enum DeserializationError {
    #[error("Offset {offset}: truncated {what} (need {need} bytes, have {have})")]
    Truncated {
        what: &'static str,
        offset: u64,
        need: usize,
        have: usize,
    },

    #[error("byte `0x{value:02x}` of {what} is not packed BCD")]
    InvalidBcd { what: &'static str, value: u8 },

    #[error("BCD timestamp does not describe a valid date")]
    InvalidDateTimeError,
}

/// A single violated section invariant.
///
/// Validation evaluates every check, so a section may report several of these at once.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid {section} section ID, expected `0x{expected:04X}`, found `0x{found:04X}`")]
    InvalidSectionId {
        section: &'static str,
        expected: u16,
        found: u16,
    },

    #[error("Invalid {section} version, expected `0x{expected:02X}`, found `0x{found:02X}`")]
    InvalidVersion {
        section: &'static str,
        expected: u8,
        found: u8,
    },

    #[error("Invalid section count in private header, expected at least {minimum}, found {found}")]
    SectionCountTooLow { minimum: u8, found: u8 },
}

use crate::err::ValidationError;
use crate::section_header::SectionHeader;

use log::error;
use std::io::{self, Write};

/// Behavior shared by every PEL section.
///
/// Validation never short-circuits: [`Section::violations`] reports every broken invariant, and
/// [`Section::validate`] logs each of them before folding them into the validity flag.
pub trait Section {
    /// Size of the section once flattened, section header included.
    const FLATTENED_SIZE: usize;

    fn header(&self) -> &SectionHeader;

    /// Every invariant this section currently breaks.
    fn violations(&self) -> Vec<ValidationError>;

    /// Re-runs validation and stores the outcome.
    fn validate(&mut self) -> bool;

    fn is_valid(&self) -> bool;

    /// Writes the section in its binary layout. Does not validate.
    fn flatten<W: Write>(&self, w: &mut W) -> io::Result<()>;

    fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::FLATTENED_SIZE);
        // Writing into a `Vec<u8>` cannot fail.
        let written = self.flatten(&mut out);
        debug_assert!(written.is_ok());
        out
    }
}

/// The id and version checks common to all sections.
pub(crate) fn check_header(
    header: &SectionHeader,
    section: &'static str,
    expected_id: u16,
    expected_version: u8,
) -> Vec<ValidationError> {
    let mut violations = Vec::new();

    if header.id != expected_id {
        violations.push(ValidationError::InvalidSectionId {
            section,
            expected: expected_id,
            found: header.id,
        });
    }

    if header.version != expected_version {
        violations.push(ValidationError::InvalidVersion {
            section,
            expected: expected_version,
            found: header.version,
        });
    }

    violations
}

/// Logs every violation, returns whether there were none.
pub(crate) fn report(violations: &[ValidationError]) -> bool {
    for violation in violations {
        error!("{}", violation);
    }
    violations.is_empty()
}

use crate::err::DeserializationResult;
use crate::stream::ByteCursor;

use serde::Serialize;
use std::fmt;
use std::io::{self, Write};

/// The version of the code that created the PEL.
///
/// Opaque bytes of a fixed width: any byte pattern is structurally valid, and the value must
/// round-trip byte for byte regardless of how it is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct CreatorVersion(pub [u8; 4]);

impl CreatorVersion {
    pub const SIZE: usize = 4;

    pub fn unflatten(stream: &mut ByteCursor<'_>) -> DeserializationResult<CreatorVersion> {
        let mut version = [0_u8; Self::SIZE];
        for byte in version.iter_mut() {
            *byte = stream.u8_named("creator_version")?;
        }
        Ok(CreatorVersion(version))
    }

    pub fn flatten<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.0)
    }

    pub fn as_bytes(&self) -> &[u8; Self::SIZE] {
        &self.0
    }
}

impl From<[u8; 4]> for CreatorVersion {
    fn from(bytes: [u8; 4]) -> Self {
        CreatorVersion(bytes)
    }
}

impl From<CreatorVersion> for [u8; 4] {
    fn from(version: CreatorVersion) -> Self {
        version.0
    }
}

/// Renders the printable ASCII prefix, up to the first NUL.
impl fmt::Display for CreatorVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in self.0.iter().take_while(|&&b| b != 0) {
            if b.is_ascii_graphic() || b == b' ' {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{:02x}", b)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_leading_zeros_survive() {
        let data = [0x00, 0x00, 0x00, 0x07];
        let version = CreatorVersion::unflatten(&mut ByteCursor::new(&data)).unwrap();
        assert_eq!(version.as_bytes(), &data);

        let mut out = vec![];
        version.flatten(&mut out).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn test_short_input_is_an_error() {
        let data = [0x41, 0x42, 0x43];
        assert!(CreatorVersion::unflatten(&mut ByteCursor::new(&data)).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(CreatorVersion(*b"v1.0").to_string(), "v1.0");
        assert_eq!(CreatorVersion([b'o', b'k', 0, 0x7F]).to_string(), "ok");
        assert_eq!(CreatorVersion([0x01, b'a', b'b', b'c']).to_string(), "\\x01abc");
    }
}

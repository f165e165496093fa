use crate::err::DeserializationResult;
use crate::stream::ByteCursor;

use byteorder::{BigEndian, WriteBytesExt};
use serde::Serialize;
use std::io::{self, Write};

/// The common prefix every PEL section starts with.
///
/// Carries no validation of its own: the expected `id` and `version` differ per section type,
/// so the owning section checks them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct SectionHeader {
    pub id: u16,
    pub version: u8,
    pub subtype: u8,
    /// Total flattened size of the section, this header included.
    pub length: u16,
}

impl SectionHeader {
    pub const FLATTENED_SIZE: usize = 2 + 1 + 1 + 2;

    pub fn new(id: u16, version: u8, subtype: u8, length: u16) -> Self {
        SectionHeader {
            id,
            version,
            subtype,
            length,
        }
    }

    pub fn unflatten(stream: &mut ByteCursor<'_>) -> DeserializationResult<SectionHeader> {
        let id = stream.u16_named("section_header.id")?;
        let version = stream.u8_named("section_header.version")?;
        let subtype = stream.u8_named("section_header.subtype")?;
        let length = stream.u16_named("section_header.length")?;

        Ok(SectionHeader {
            id,
            version,
            subtype,
            length,
        })
    }

    pub fn flatten<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_u16::<BigEndian>(self.id)?;
        w.write_u8(self.version)?;
        w.write_u8(self.subtype)?;
        w.write_u16::<BigEndian>(self.length)?;
        Ok(())
    }

    /// The id rendered as its two ASCII characters, e.g. `"PH"`.
    pub fn id_str(&self) -> String {
        self.id
            .to_be_bytes()
            .iter()
            .map(|&b| if b.is_ascii_graphic() { b as char } else { '.' })
            .collect()
    }
}

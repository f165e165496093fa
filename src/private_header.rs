use crate::bcd_time::BcdTime;
use crate::err::{DeserializationResult, ValidationError};
use crate::fields::CreatorVersion;
use crate::section::{self, Section};
use crate::section_header::SectionHeader;
use crate::stream::ByteCursor;

use byteorder::{BigEndian, WriteBytesExt};
use log::{error, trace, warn};
use serde::Serialize;
use std::io::{self, Write};

/// `'PH'`
pub const PRIVATE_HEADER_SECTION_ID: u16 = 0x5048;
pub const PRIVATE_HEADER_VERSION: u8 = 0x01;
/// A PEL holds at least a private header and a user header.
pub const MIN_SECTION_COUNT: u8 = 2;

/// The Private Header section. Required, and always the first section of a PEL.
///
/// Fields are kept in the order and widths of the binary layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrivateHeader {
    header: SectionHeader,
    create_time: BcdTime,
    commit_time: BcdTime,
    /// Subsystem that created the PEL, e.g. `b'O'` for the BMC.
    creator_id: u8,
    log_type: u8,
    reserved_byte: u8,
    /// Number of sections in the whole PEL, this one included.
    section_count: u8,
    /// Id of the BMC event log entry this PEL is associated with.
    obmc_log_id: u32,
    creator_version: CreatorVersion,
    /// Platform log id: the id of the PEL that first reported the problem.
    plid: u32,
    id: u32,
    valid: bool,
}

impl PrivateHeader {
    fn zeroed() -> Self {
        PrivateHeader {
            header: SectionHeader::default(),
            create_time: BcdTime::default(),
            commit_time: BcdTime::default(),
            creator_id: 0,
            log_type: 0,
            reserved_byte: 0,
            section_count: 0,
            obmc_log_id: 0,
            creator_version: CreatorVersion::default(),
            plid: 0,
            id: 0,
            valid: false,
        }
    }

    /// Decodes and validates a private header.
    ///
    /// Never fails. If the stream runs out, the fields read so far are kept and the section is
    /// marked invalid.
    pub fn from_stream(stream: &mut ByteCursor<'_>) -> PrivateHeader {
        let mut ph = PrivateHeader::zeroed();

        match ph.unflatten_fields(stream) {
            Ok(()) => {
                ph.validate();
            }
            Err(e) => {
                error!("Cannot unflatten private header: {}", e);
                ph.valid = false;
            }
        }

        ph
    }

    /// Like [`PrivateHeader::from_stream`], but returns the decode error instead of
    /// absorbing it. Validation still only sets the validity flag.
    pub fn try_from_stream(stream: &mut ByteCursor<'_>) -> DeserializationResult<PrivateHeader> {
        let mut ph = PrivateHeader::zeroed();
        ph.unflatten_fields(stream)?;
        ph.validate();
        Ok(ph)
    }

    fn unflatten_fields(&mut self, stream: &mut ByteCursor<'_>) -> DeserializationResult<()> {
        trace!(
            "Offset `0x{offset:08x} ({offset})` reading private header",
            offset = stream.position()
        );

        self.header = SectionHeader::unflatten(stream)?;
        self.create_time = BcdTime::unflatten(stream)?;
        self.commit_time = BcdTime::unflatten(stream)?;
        self.creator_id = stream.u8_named("private_header.creator_id")?;
        self.log_type = stream.u8_named("private_header.log_type")?;
        self.reserved_byte = stream.u8_named("private_header.reserved_byte")?;
        self.section_count = stream.u8_named("private_header.section_count")?;
        self.obmc_log_id = stream.u32_named("private_header.obmc_log_id")?;
        self.creator_version = CreatorVersion::unflatten(stream)?;
        self.plid = stream.u32_named("private_header.plid")?;
        self.id = stream.u32_named("private_header.id")?;

        Ok(())
    }

    pub fn builder() -> PrivateHeaderBuilder {
        PrivateHeaderBuilder::new()
    }

    pub fn create_time(&self) -> &BcdTime {
        &self.create_time
    }

    pub fn commit_time(&self) -> &BcdTime {
        &self.commit_time
    }

    pub fn creator_id(&self) -> u8 {
        self.creator_id
    }

    pub fn log_type(&self) -> u8 {
        self.log_type
    }

    pub fn reserved_byte(&self) -> u8 {
        self.reserved_byte
    }

    pub fn section_count(&self) -> u8 {
        self.section_count
    }

    pub fn obmc_log_id(&self) -> u32 {
        self.obmc_log_id
    }

    pub fn creator_version(&self) -> &CreatorVersion {
        &self.creator_version
    }

    pub fn plid(&self) -> u32 {
        self.plid
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// Stamps in the BMC event log id once the owning record has been assigned one.
    ///
    /// Must be called at most once, before the record is flattened for the last time.
    pub fn set_obmc_log_id(&mut self, obmc_log_id: u32) {
        if self.obmc_log_id != 0 && self.obmc_log_id != obmc_log_id {
            warn!(
                "Overwriting private header OpenBMC log id {} with {}",
                self.obmc_log_id, obmc_log_id
            );
        }
        self.obmc_log_id = obmc_log_id;
    }
}

impl Section for PrivateHeader {
    const FLATTENED_SIZE: usize = SectionHeader::FLATTENED_SIZE
        + BcdTime::SIZE
        + BcdTime::SIZE
        + 1 // creator_id
        + 1 // log_type
        + 1 // reserved_byte
        + 1 // section_count
        + 4 // obmc_log_id
        + CreatorVersion::SIZE
        + 4 // plid
        + 4; // id

    fn header(&self) -> &SectionHeader {
        &self.header
    }

    fn violations(&self) -> Vec<ValidationError> {
        let mut violations = section::check_header(
            &self.header,
            "private header",
            PRIVATE_HEADER_SECTION_ID,
            PRIVATE_HEADER_VERSION,
        );

        if self.section_count < MIN_SECTION_COUNT {
            violations.push(ValidationError::SectionCountTooLow {
                minimum: MIN_SECTION_COUNT,
                found: self.section_count,
            });
        }

        violations
    }

    fn validate(&mut self) -> bool {
        self.valid = section::report(&self.violations());
        self.valid
    }

    fn is_valid(&self) -> bool {
        self.valid
    }

    fn flatten<W: Write>(&self, w: &mut W) -> io::Result<()> {
        self.header.flatten(w)?;
        self.create_time.flatten(w)?;
        self.commit_time.flatten(w)?;
        w.write_u8(self.creator_id)?;
        w.write_u8(self.log_type)?;
        w.write_u8(self.reserved_byte)?;
        w.write_u8(self.section_count)?;
        w.write_u32::<BigEndian>(self.obmc_log_id)?;
        self.creator_version.flatten(w)?;
        w.write_u32::<BigEndian>(self.plid)?;
        w.write_u32::<BigEndian>(self.id)?;
        Ok(())
    }
}

/// Populates a [`PrivateHeader`] field by field for the encode path.
///
/// The section header id, version and length start out correct, and the section count starts
/// at [`MIN_SECTION_COUNT`].
#[derive(Debug, Clone)]
pub struct PrivateHeaderBuilder {
    inner: PrivateHeader,
}

impl PrivateHeaderBuilder {
    pub fn new() -> Self {
        let mut inner = PrivateHeader::zeroed();
        inner.header = SectionHeader::new(
            PRIVATE_HEADER_SECTION_ID,
            PRIVATE_HEADER_VERSION,
            0,
            PrivateHeader::FLATTENED_SIZE as u16,
        );
        inner.section_count = MIN_SECTION_COUNT;
        PrivateHeaderBuilder { inner }
    }

    pub fn subtype(mut self, subtype: u8) -> Self {
        self.inner.header.subtype = subtype;
        self
    }

    pub fn create_time(mut self, time: BcdTime) -> Self {
        self.inner.create_time = time;
        self
    }

    pub fn commit_time(mut self, time: BcdTime) -> Self {
        self.inner.commit_time = time;
        self
    }

    pub fn creator_id(mut self, creator_id: u8) -> Self {
        self.inner.creator_id = creator_id;
        self
    }

    pub fn log_type(mut self, log_type: u8) -> Self {
        self.inner.log_type = log_type;
        self
    }

    pub fn reserved_byte(mut self, reserved_byte: u8) -> Self {
        self.inner.reserved_byte = reserved_byte;
        self
    }

    pub fn section_count(mut self, section_count: u8) -> Self {
        self.inner.section_count = section_count;
        self
    }

    pub fn obmc_log_id(mut self, obmc_log_id: u32) -> Self {
        self.inner.obmc_log_id = obmc_log_id;
        self
    }

    pub fn creator_version(mut self, version: impl Into<CreatorVersion>) -> Self {
        self.inner.creator_version = version.into();
        self
    }

    pub fn plid(mut self, plid: u32) -> Self {
        self.inner.plid = plid;
        self
    }

    pub fn id(mut self, id: u32) -> Self {
        self.inner.id = id;
        self
    }

    /// Validates and returns the section. An invalid section is still returned.
    pub fn build(mut self) -> PrivateHeader {
        self.inner.validate();
        self.inner
    }
}

impl Default for PrivateHeaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

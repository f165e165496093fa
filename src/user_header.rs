use crate::err::{DeserializationResult, ValidationError};
use crate::section::{self, Section};
use crate::section_header::SectionHeader;
use crate::stream::ByteCursor;

use bitflags::bitflags;
use byteorder::{BigEndian, WriteBytesExt};
use log::{error, trace};
use serde::Serialize;
use std::io::{self, Write};

/// `'UH'`
pub const USER_HEADER_SECTION_ID: u16 = 0x5548;
pub const USER_HEADER_VERSION: u8 = 0x01;

bitflags! {
    /// Typed view of the user header action flags.
    ///
    /// Bits without a name here are retained as-is.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ActionFlags: u16 {
        const SERVICE_ACTION = 0x8000;
        const HIDDEN = 0x4000;
        const REPORT = 0x2000;
        const DONT_REPORT = 0x1000;
        const CALL_HOME = 0x0800;
        const ISOLATION_INCOMPLETE = 0x0400;
        const TERMINATION = 0x0010;
    }
}

/// The User Header section. Required, and always the second section of a PEL.
///
/// Carries the classification of the event. Both reserved words are kept so the section
/// re-encodes byte for byte.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserHeader {
    header: SectionHeader,
    event_subsystem: u8,
    event_scope: u8,
    event_severity: u8,
    event_type: u8,
    reserved4_byte1: u32,
    problem_domain: u8,
    problem_vector: u8,
    action_flags: u16,
    reserved4_byte2: u32,
    valid: bool,
}

impl UserHeader {
    fn zeroed() -> Self {
        UserHeader {
            header: SectionHeader::default(),
            event_subsystem: 0,
            event_scope: 0,
            event_severity: 0,
            event_type: 0,
            reserved4_byte1: 0,
            problem_domain: 0,
            problem_vector: 0,
            action_flags: 0,
            reserved4_byte2: 0,
            valid: false,
        }
    }

    /// Decodes and validates a user header. A short stream yields an invalid section.
    pub fn from_stream(stream: &mut ByteCursor<'_>) -> UserHeader {
        let mut uh = UserHeader::zeroed();

        match uh.unflatten_fields(stream) {
            Ok(()) => {
                uh.validate();
            }
            Err(e) => {
                error!("Cannot unflatten user header: {}", e);
                uh.valid = false;
            }
        }

        uh
    }

    pub fn try_from_stream(stream: &mut ByteCursor<'_>) -> DeserializationResult<UserHeader> {
        let mut uh = UserHeader::zeroed();
        uh.unflatten_fields(stream)?;
        uh.validate();
        Ok(uh)
    }

    fn unflatten_fields(&mut self, stream: &mut ByteCursor<'_>) -> DeserializationResult<()> {
        trace!(
            "Offset `0x{offset:08x} ({offset})` reading user header",
            offset = stream.position()
        );

        self.header = SectionHeader::unflatten(stream)?;
        self.event_subsystem = stream.u8_named("user_header.event_subsystem")?;
        self.event_scope = stream.u8_named("user_header.event_scope")?;
        self.event_severity = stream.u8_named("user_header.event_severity")?;
        self.event_type = stream.u8_named("user_header.event_type")?;
        self.reserved4_byte1 = stream.u32_named("user_header.reserved4_byte1")?;
        self.problem_domain = stream.u8_named("user_header.problem_domain")?;
        self.problem_vector = stream.u8_named("user_header.problem_vector")?;
        self.action_flags = stream.u16_named("user_header.action_flags")?;
        self.reserved4_byte2 = stream.u32_named("user_header.reserved4_byte2")?;

        Ok(())
    }

    pub fn builder() -> UserHeaderBuilder {
        UserHeaderBuilder::new()
    }

    pub fn subsystem(&self) -> u8 {
        self.event_subsystem
    }

    pub fn scope(&self) -> u8 {
        self.event_scope
    }

    pub fn severity(&self) -> u8 {
        self.event_severity
    }

    pub fn event_type(&self) -> u8 {
        self.event_type
    }

    pub fn problem_domain(&self) -> u8 {
        self.problem_domain
    }

    pub fn problem_vector(&self) -> u8 {
        self.problem_vector
    }

    /// The raw action flags word.
    pub fn action_flags_raw(&self) -> u16 {
        self.action_flags
    }

    pub fn action_flags(&self) -> ActionFlags {
        ActionFlags::from_bits_retain(self.action_flags)
    }

    pub fn reserved_words(&self) -> (u32, u32) {
        (self.reserved4_byte1, self.reserved4_byte2)
    }
}

impl Section for UserHeader {
    const FLATTENED_SIZE: usize = SectionHeader::FLATTENED_SIZE
        + 1 // event_subsystem
        + 1 // event_scope
        + 1 // event_severity
        + 1 // event_type
        + 4 // reserved4_byte1
        + 1 // problem_domain
        + 1 // problem_vector
        + 2 // action_flags
        + 4; // reserved4_byte2

    fn header(&self) -> &SectionHeader {
        &self.header
    }

    fn violations(&self) -> Vec<ValidationError> {
        section::check_header(
            &self.header,
            "user header",
            USER_HEADER_SECTION_ID,
            USER_HEADER_VERSION,
        )
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
        w.write_u8(self.event_subsystem)?;
        w.write_u8(self.event_scope)?;
        w.write_u8(self.event_severity)?;
        w.write_u8(self.event_type)?;
        w.write_u32::<BigEndian>(self.reserved4_byte1)?;
        w.write_u8(self.problem_domain)?;
        w.write_u8(self.problem_vector)?;
        w.write_u16::<BigEndian>(self.action_flags)?;
        w.write_u32::<BigEndian>(self.reserved4_byte2)?;
        Ok(())
    }
}

/// Populates a [`UserHeader`] for the encode path, starting from a correct section header.
#[derive(Debug, Clone)]
pub struct UserHeaderBuilder {
    inner: UserHeader,
}

impl UserHeaderBuilder {
    pub fn new() -> Self {
        let mut inner = UserHeader::zeroed();
        inner.header = SectionHeader::new(
            USER_HEADER_SECTION_ID,
            USER_HEADER_VERSION,
            0,
            UserHeader::FLATTENED_SIZE as u16,
        );
        UserHeaderBuilder { inner }
    }

    pub fn subtype(mut self, subtype: u8) -> Self {
        self.inner.header.subtype = subtype;
        self
    }

    pub fn subsystem(mut self, subsystem: u8) -> Self {
        self.inner.event_subsystem = subsystem;
        self
    }

    pub fn scope(mut self, scope: u8) -> Self {
        self.inner.event_scope = scope;
        self
    }

    pub fn severity(mut self, severity: u8) -> Self {
        self.inner.event_severity = severity;
        self
    }

    pub fn event_type(mut self, event_type: u8) -> Self {
        self.inner.event_type = event_type;
        self
    }

    pub fn problem_domain(mut self, problem_domain: u8) -> Self {
        self.inner.problem_domain = problem_domain;
        self
    }

    pub fn problem_vector(mut self, problem_vector: u8) -> Self {
        self.inner.problem_vector = problem_vector;
        self
    }

    pub fn action_flags(mut self, flags: ActionFlags) -> Self {
        self.inner.action_flags = flags.bits();
        self
    }

    pub fn reserved_words(mut self, first: u32, second: u32) -> Self {
        self.inner.reserved4_byte1 = first;
        self.inner.reserved4_byte2 = second;
        self
    }

    pub fn build(mut self) -> UserHeader {
        self.inner.validate();
        self.inner
    }
}

impl Default for UserHeaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

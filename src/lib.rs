#![deny(unused_must_use)]
#![forbid(unsafe_code)]
//! Decoding and validation of the two mandatory leading sections of a
//! Platform Event Log (PEL) record: the Private Header and the User Header.
//!
//! ```
//! use pel::{ByteCursor, PrivateHeader, Section, UserHeader};
//!
//! let ph = PrivateHeader::builder().creator_id(b'O').id(0x5000_0001).build();
//! let uh = UserHeader::builder().severity(0x40).build();
//!
//! let mut data = ph.to_bytes();
//! data.extend(uh.to_bytes());
//!
//! let mut cursor = ByteCursor::new(&data);
//! assert_eq!(PrivateHeader::from_stream(&mut cursor), ph);
//! assert_eq!(UserHeader::from_stream(&mut cursor), uh);
//! ```
//!
//! Malformed input never surfaces as an error from `from_stream`: the returned section
//! reports `is_valid() == false` instead.

pub use bcd_time::BcdTime;
pub use err::{DeserializationError, DeserializationResult, ValidationError};
pub use fields::CreatorVersion;
pub use private_header::{
    MIN_SECTION_COUNT, PRIVATE_HEADER_SECTION_ID, PRIVATE_HEADER_VERSION, PrivateHeader,
    PrivateHeaderBuilder,
};
pub use section::Section;
pub use section_header::SectionHeader;
pub use stream::ByteCursor;
pub use user_header::{
    ActionFlags, USER_HEADER_SECTION_ID, USER_HEADER_VERSION, UserHeader, UserHeaderBuilder,
};

pub mod bcd_time;
pub mod err;
pub mod fields;
pub mod private_header;
pub mod section;
pub mod section_header;
pub mod stream;
pub mod user_header;

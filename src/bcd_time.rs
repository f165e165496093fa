use crate::err::{DeserializationError, DeserializationResult};
use crate::stream::ByteCursor;

use jiff::civil::DateTime;
use serde::Serialize;
use std::fmt;
use std::io::{self, Write};

/// A timestamp stored as eight packed binary-coded-decimal bytes.
///
/// The raw bytes are kept as-is, so a malformed value still round-trips unchanged.
/// Interpretation only happens in [`BcdTime::to_datetime`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct BcdTime {
    pub year_msb: u8,
    pub year_lsb: u8,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minutes: u8,
    pub seconds: u8,
    pub hundredths: u8,
}

fn to_bcd(value: u8) -> u8 {
    ((value / 10) << 4) | (value % 10)
}

fn from_bcd(value: u8, what: &'static str) -> DeserializationResult<u8> {
    let (hi, lo) = (value >> 4, value & 0x0F);
    if hi > 9 || lo > 9 {
        return Err(DeserializationError::InvalidBcd { what, value });
    }
    Ok(hi * 10 + lo)
}

impl BcdTime {
    pub const SIZE: usize = 8;

    pub fn unflatten(stream: &mut ByteCursor<'_>) -> DeserializationResult<BcdTime> {
        let [
            year_msb,
            year_lsb,
            month,
            day,
            hour,
            minutes,
            seconds,
            hundredths,
        ] = stream.array::<{ BcdTime::SIZE }>("bcd_time")?;

        Ok(BcdTime {
            year_msb,
            year_lsb,
            month,
            day,
            hour,
            minutes,
            seconds,
            hundredths,
        })
    }

    pub fn flatten<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&[
            self.year_msb,
            self.year_lsb,
            self.month,
            self.day,
            self.hour,
            self.minutes,
            self.seconds,
            self.hundredths,
        ])
    }

    /// Encodes `dt` with hundredth-of-a-second precision.
    ///
    /// Only years `0..=9999` fit in four BCD digits.
    pub fn from_datetime(dt: DateTime) -> DeserializationResult<BcdTime> {
        let year =
            u16::try_from(dt.year()).map_err(|_| DeserializationError::InvalidDateTimeError)?;
        let hundredths = (dt.subsec_nanosecond() / 10_000_000) as u8;

        // Every civil field other than the year is non-negative and below 100.
        Ok(BcdTime {
            year_msb: to_bcd((year / 100) as u8),
            year_lsb: to_bcd((year % 100) as u8),
            month: to_bcd(dt.month() as u8),
            day: to_bcd(dt.day() as u8),
            hour: to_bcd(dt.hour() as u8),
            minutes: to_bcd(dt.minute() as u8),
            seconds: to_bcd(dt.second() as u8),
            hundredths: to_bcd(hundredths),
        })
    }

    pub fn to_datetime(&self) -> DeserializationResult<DateTime> {
        let century = i16::from(from_bcd(self.year_msb, "bcd_time.year_msb")?);
        let year = century * 100 + i16::from(from_bcd(self.year_lsb, "bcd_time.year_lsb")?);
        let month = from_bcd(self.month, "bcd_time.month")? as i8;
        let day = from_bcd(self.day, "bcd_time.day")? as i8;
        let hour = from_bcd(self.hour, "bcd_time.hour")? as i8;
        let minute = from_bcd(self.minutes, "bcd_time.minutes")? as i8;
        let second = from_bcd(self.seconds, "bcd_time.seconds")? as i8;
        let nanos = i32::from(from_bcd(self.hundredths, "bcd_time.hundredths")?) * 10_000_000;

        DateTime::new(year, month, day, hour, minute, second, nanos)
            .map_err(|_| DeserializationError::InvalidDateTimeError)
    }

    /// The current local wall clock time.
    pub fn now() -> DeserializationResult<BcdTime> {
        BcdTime::from_datetime(jiff::Zoned::now().datetime())
    }
}

impl TryFrom<DateTime> for BcdTime {
    type Error = DeserializationError;

    fn try_from(dt: DateTime) -> Result<Self, Self::Error> {
        BcdTime::from_datetime(dt)
    }
}

impl fmt::Display for BcdTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02x}{:02x}-{:02x}-{:02x} {:02x}:{:02x}:{:02x}.{:02x}",
            self.year_msb,
            self.year_lsb,
            self.month,
            self.day,
            self.hour,
            self.minutes,
            self.seconds,
            self.hundredths
        )
    }
}

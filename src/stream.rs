//! Sequential big-endian reads over an in-memory PEL.
//!
//! All PEL integers are stored in network byte order. Every read names the field it is
//! pulling so a short buffer reports exactly which field ran out of bytes.
//!
//! Encoding does not need a dedicated type: sections write into any [`std::io::Write`]
//! through `byteorder::WriteBytesExt`.

use byteorder::{BigEndian, ByteOrder};

use crate::err::{DeserializationError, DeserializationResult};

#[inline]
fn truncated(what: &'static str, offset: usize, need: usize, len: usize) -> DeserializationError {
    DeserializationError::Truncated {
        what,
        offset: offset as u64,
        need,
        have: len.saturating_sub(offset),
    }
}

/// Borrow `len` bytes of `buf` starting at `offset`, or fail with `Truncated`.
pub(crate) fn slice_r<'a>(
    buf: &'a [u8],
    offset: usize,
    len: usize,
    what: &'static str,
) -> DeserializationResult<&'a [u8]> {
    let end = offset
        .checked_add(len)
        .ok_or_else(|| truncated(what, offset, len, buf.len()))?;
    buf.get(offset..end)
        .ok_or_else(|| truncated(what, offset, len, buf.len()))
}

/// A lightweight cursor over an immutable byte slice.
///
/// All reads are big-endian and advance the cursor only on success, so a failed read leaves
/// the position at the start of the field that did not fit.
#[derive(Clone, Copy, Debug)]
pub struct ByteCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        ByteCursor { buf, pos: 0 }
    }

    pub fn with_pos(buf: &'a [u8], pos: usize) -> DeserializationResult<Self> {
        // Allow pos == len (EOF), reject pos > len.
        let _ = slice_r(buf, pos, 0, "cursor.position")?;
        Ok(ByteCursor { buf, pos })
    }

    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn position(&self) -> u64 {
        self.pos as u64
    }

    /// Number of unread bytes.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    pub fn take_bytes(
        &mut self,
        len: usize,
        what: &'static str,
    ) -> DeserializationResult<&'a [u8]> {
        let out = slice_r(self.buf, self.pos, len, what)?;
        self.pos += len;
        Ok(out)
    }

    pub fn array<const N: usize>(
        &mut self,
        what: &'static str,
    ) -> DeserializationResult<[u8; N]> {
        let mut out = [0_u8; N];
        out.copy_from_slice(self.take_bytes(N, what)?);
        Ok(out)
    }

    #[inline]
    pub fn u8_named(&mut self, what: &'static str) -> DeserializationResult<u8> {
        let b = self
            .buf
            .get(self.pos)
            .copied()
            .ok_or_else(|| truncated(what, self.pos, 1, self.buf.len()))?;
        self.pos += 1;
        Ok(b)
    }

    #[inline]
    pub fn u16_named(&mut self, what: &'static str) -> DeserializationResult<u16> {
        Ok(BigEndian::read_u16(self.take_bytes(2, what)?))
    }

    #[inline]
    pub fn u32_named(&mut self, what: &'static str) -> DeserializationResult<u32> {
        Ok(BigEndian::read_u32(self.take_bytes(4, what)?))
    }
}

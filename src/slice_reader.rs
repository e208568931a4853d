//! A no_std compatible slice reader for reading bytes with position tracking.
//!
//! This module provides [`SliceReader`] which wraps a byte slice and provides
//! methods for reading primitive types, similar to `std::io::Cursor` but without
//! requiring the standard library. Every read is bounds checked; running off
//! the end of the slice yields [`DecodeError::Truncated`].

use byteorder_lite::{ByteOrder, LittleEndian};
use core::fmt;

use crate::decoder::DecodeError;

/// A reader that wraps a byte slice and tracks the current position.
#[derive(Clone)]
pub(crate) struct SliceReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceReader<'a> {
    /// Create a new SliceReader wrapping the given byte slice.
    #[inline]
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the current position in the slice.
    #[inline]
    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    /// Returns the number of bytes remaining from the current position.
    #[inline]
    pub(crate) fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Seek to a position from the start.
    #[inline]
    pub(crate) fn seek_from_start(&mut self, pos: usize) -> Result<(), DecodeError> {
        if pos > self.data.len() {
            return Err(DecodeError::Truncated);
        }
        self.pos = pos;
        Ok(())
    }

    /// Read exactly `n` bytes into the buffer.
    #[inline]
    pub(crate) fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), DecodeError> {
        let src = self.take_slice(buf.len())?;
        buf.copy_from_slice(src);
        Ok(())
    }

    /// Read a single byte.
    #[inline]
    pub(crate) fn read_u8(&mut self) -> Result<u8, DecodeError> {
        let byte = *self.data.get(self.pos).ok_or(DecodeError::Truncated)?;
        self.pos += 1;
        Ok(byte)
    }

    /// Read a u16 in little-endian byte order.
    #[inline]
    pub(crate) fn read_u16_le(&mut self) -> Result<u16, DecodeError> {
        Ok(LittleEndian::read_u16(self.take_slice(2)?))
    }

    /// Read a u24 in little-endian byte order (as u32).
    #[inline]
    pub(crate) fn read_u24_le(&mut self) -> Result<u32, DecodeError> {
        Ok(LittleEndian::read_u24(self.take_slice(3)?))
    }

    /// Read a u32 in little-endian byte order.
    #[inline]
    pub(crate) fn read_u32_le(&mut self) -> Result<u32, DecodeError> {
        Ok(LittleEndian::read_u32(self.take_slice(4)?))
    }

    /// Take a slice of n bytes from the current position and advance position.
    /// Returns a slice reference without copying data.
    #[inline]
    pub(crate) fn take_slice(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        if n > self.remaining() {
            return Err(DecodeError::Truncated);
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }
}

impl fmt::Debug for SliceReader<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SliceReader")
            .field("len", &self.data.len())
            .field("pos", &self.pos)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_little_endian_fields() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a];
        let mut r = SliceReader::new(&data);
        assert_eq!(r.read_u8().unwrap(), 0x01);
        assert_eq!(r.read_u16_le().unwrap(), 0x0302);
        assert_eq!(r.read_u24_le().unwrap(), 0x060504);
        assert_eq!(r.read_u32_le().unwrap(), 0x0a090807);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn reading_past_end_is_truncation() {
        let data = [0u8; 3];
        let mut r = SliceReader::new(&data);
        r.seek_from_start(2).unwrap();
        assert!(matches!(r.read_u16_le(), Err(DecodeError::Truncated)));
        // A failed read leaves the cursor untouched
        assert_eq!(r.position(), 2);
        assert!(matches!(r.take_slice(2), Err(DecodeError::Truncated)));
        assert!(matches!(r.seek_from_start(4), Err(DecodeError::Truncated)));
        r.seek_from_start(3).unwrap();
        assert!(matches!(r.read_u8(), Err(DecodeError::Truncated)));
    }

    #[test]
    fn take_slice_does_not_copy() {
        let data = [9u8, 8, 7, 6];
        let mut r = SliceReader::new(&data);
        let s = r.take_slice(3).unwrap();
        assert_eq!(s, &[9, 8, 7]);
        assert_eq!(r.position(), 3);
        assert_eq!(r.remaining(), 1);
    }
}

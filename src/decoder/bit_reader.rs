//! LSB-first bit reader for VP8L bitstreams.
//!
//! VP8L packs fields starting at the least significant bit of each byte.
//! The reader keeps up to 64 bits buffered and refills a byte at a time.

use super::DecodeError;

/// Bit reader over the payload of a single `VP8L` chunk.
///
/// The header parser reads the first 40 bits; the reader is then handed to
/// the lossless pixel decoder, which continues from the same cursor.
#[derive(Clone)]
pub struct LosslessBitReader<'a> {
    data: &'a [u8],
    /// Next byte of `data` to load into `buffer`.
    byte_pos: usize,
    buffer: u64,
    /// Number of valid bits in `buffer`.
    nbits: u8,
}

impl<'a> LosslessBitReader<'a> {
    /// Create a reader over a chunk payload.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            byte_pos: 0,
            buffer: 0,
            nbits: 0,
        }
    }

    fn fill(&mut self) {
        while self.nbits <= 56 {
            let Some(&byte) = self.data.get(self.byte_pos) else {
                break;
            };
            self.buffer |= u64::from(byte) << self.nbits;
            self.nbits += 8;
            self.byte_pos += 1;
        }
    }

    /// Reads `num` bits (at most 32) as an unsigned integer, least
    /// significant bit first.
    pub fn read_bits(&mut self, num: u8) -> Result<u32, DecodeError> {
        debug_assert!(num <= 32);
        if num == 0 {
            return Ok(0);
        }
        if self.nbits < num {
            self.fill();
            if self.nbits < num {
                return Err(DecodeError::Truncated);
            }
        }
        let value = self.buffer & ((1u64 << num) - 1);
        self.buffer >>= num;
        self.nbits -= num;
        Ok(value as u32)
    }

    /// Reads one bit as a boolean.
    pub fn read_bit(&mut self) -> Result<bool, DecodeError> {
        Ok(self.read_bits(1)? == 1)
    }

    /// Number of bits consumed so far.
    pub fn bit_position(&self) -> usize {
        self.byte_pos * 8 - usize::from(self.nbits)
    }
}

impl core::fmt::Debug for LosslessBitReader<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LosslessBitReader")
            .field("len", &self.data.len())
            .field("bit_position", &self.bit_position())
            .finish()
    }
}

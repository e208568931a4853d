//! The seam between container parsing and pixel reconstruction.
//!
//! The decoder never reconstructs pixels itself. For each frame it hands the
//! framed bitstream to a [`PixelDecoder`] together with the frame's alpha
//! side channel and animation record, and a canvas-sized RGBA8 buffer to
//! write into.

use super::bit_reader::LosslessBitReader;
use super::frame::{AlphaChunk, AnimationFrameInfo};
use super::header::{Dimensions, Vp8FrameHeader, Vp8lFrameHeader};
use super::DecodeError;

/// A lossy frame ready for macroblock decoding.
#[derive(Debug, Clone, Copy)]
pub struct LossyFrame<'a> {
    /// The parsed frame header.
    pub header: &'a Vp8FrameHeader,
    /// The `header.data_size` bytes following the frame header: the first
    /// partition (`header.partition_length` bytes) and the DCT partitions.
    pub data: &'a [u8],
    /// The frame's `ALPH` chunk, if any.
    pub alpha: Option<&'a AlphaChunk>,
    /// Placement and timing for animation frames.
    pub animation: Option<&'a AnimationFrameInfo>,
    /// Size of the output buffer's canvas.
    pub canvas: Dimensions,
}

/// A lossless frame whose header has been consumed from the bit reader.
#[derive(Debug, Clone, Copy)]
pub struct LosslessFrame<'a> {
    /// The parsed frame header.
    pub header: &'a Vp8lFrameHeader,
    /// Placement and timing for animation frames.
    pub animation: Option<&'a AnimationFrameInfo>,
    /// Size of the output buffer's canvas.
    pub canvas: Dimensions,
}

impl LosslessFrame<'_> {
    /// Dimensions the bitstream decodes to.
    pub fn dimensions(&self) -> Dimensions {
        self.header.dimensions()
    }
}

/// Entropy decoding and reconstruction for the two WebP bitstreams.
///
/// `out` is an RGBA8 buffer of `canvas.width * canvas.height * 4` bytes owned
/// by the frame being decoded. For animation frames, implementations place
/// the decoded rectangle at the frame offset and apply blending against the
/// frame referenced by [`AnimationFrameInfo::previous_frame`].
pub trait PixelDecoder {
    /// Decodes a `VP8 ` frame.
    fn decode_lossy(&mut self, frame: LossyFrame<'_>, out: &mut [u8]) -> Result<(), DecodeError>;

    /// Decodes a `VP8L` frame, continuing from the reader's position right
    /// after the 5-byte header.
    fn decode_lossless(
        &mut self,
        reader: &mut LosslessBitReader<'_>,
        frame: LosslessFrame<'_>,
        out: &mut [u8],
    ) -> Result<(), DecodeError>;
}

impl<T: PixelDecoder + ?Sized> PixelDecoder for &mut T {
    fn decode_lossy(&mut self, frame: LossyFrame<'_>, out: &mut [u8]) -> Result<(), DecodeError> {
        (**self).decode_lossy(frame, out)
    }

    fn decode_lossless(
        &mut self,
        reader: &mut LosslessBitReader<'_>,
        frame: LosslessFrame<'_>,
        out: &mut [u8],
    ) -> Result<(), DecodeError> {
        (**self).decode_lossless(reader, frame, out)
    }
}

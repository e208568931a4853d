//! Per-frame side chunks: `ALPH` and `ANMF`.

use alloc::vec::Vec;

use super::{DecodeError, Dimensions};
use crate::slice_reader::SliceReader;

/// Fixed part of an `ANMF` payload before the nested frame chunks.
pub(crate) const ANMF_HEADER_SIZE: u32 = 16;

/// How the frame area is disposed after rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisposeMethod {
    /// Do not dispose. The frame remains on the canvas.
    None,
    /// Fill the frame rectangle with the background color.
    Background,
}

/// How the frame is blended with the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMethod {
    /// Use alpha blending with the existing canvas content.
    AlphaBlend,
    /// Overwrite the canvas region with the frame data.
    Overwrite,
}

/// Contents of an `ALPH` chunk: the header byte and the compressed alpha plane.
///
/// Owned by a single frame iteration of the decoder and dropped once that
/// frame has been handed to the pixel decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlphaChunk {
    /// Raw header byte (preprocessing, filtering and compression fields).
    pub header: u8,
    /// The alpha bitstream following the header byte.
    pub data: Vec<u8>,
}

impl AlphaChunk {
    /// Reads an `ALPH` payload of `chunk_size` bytes.
    pub(crate) fn read(r: &mut SliceReader, chunk_size: u32) -> Result<Self, DecodeError> {
        let data_size = chunk_size
            .checked_sub(1)
            .ok_or(DecodeError::InvalidChunkSize {
                chunk: *b"ALPH",
                size: chunk_size,
            })?;
        let header = r.read_u8()?;
        let data = r.take_slice(data_size as usize)?.to_vec();
        Ok(Self { header, data })
    }

    /// Compression method: 0 raw, 1 lossless-compressed.
    pub fn compression_method(&self) -> u8 {
        self.header & 0x03
    }

    /// Prediction filter applied before compression (0 to 3).
    pub fn filtering_method(&self) -> u8 {
        (self.header >> 2) & 0x03
    }

    /// Preprocessing hint (0 none, 1 level reduction).
    pub fn preprocessing(&self) -> u8 {
        (self.header >> 4) & 0x03
    }
}

/// Frame record of an `ANMF` chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationFrameInfo {
    /// Horizontal offset on the canvas in pixels (always even).
    pub x_offset: u32,
    /// Vertical offset on the canvas in pixels (always even).
    pub y_offset: u32,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Display duration in milliseconds.
    pub duration_ms: u32,
    /// How the frame is blended onto the canvas.
    pub blend: BlendMethod,
    /// How the frame area is disposed afterwards.
    pub dispose: DisposeMethod,
    /// Index of the frame this one is composed over, `None` for the first.
    pub previous_frame: Option<usize>,
}

impl AnimationFrameInfo {
    /// Reads the 16-byte `ANMF` header:
    ///
    /// ```text
    /// 3 bytes: Frame X / 2
    /// 3 bytes: Frame Y / 2
    /// 3 bytes: Frame Width Minus One
    /// 3 bytes: Frame Height Minus One
    /// 3 bytes: Frame Duration
    /// 1 byte:  reserved (6) | blending (1) | disposal (1)
    /// ```
    pub(crate) fn read(
        r: &mut SliceReader,
        chunk_size: u32,
        previous_frame: Option<usize>,
    ) -> Result<Self, DecodeError> {
        if chunk_size < ANMF_HEADER_SIZE {
            return Err(DecodeError::InvalidChunkSize {
                chunk: *b"ANMF",
                size: chunk_size,
            });
        }

        let x_offset = r.read_u24_le()? * 2;
        let y_offset = r.read_u24_le()? * 2;
        let width = r.read_u24_le()? + 1;
        let height = r.read_u24_le()? + 1;
        let duration_ms = r.read_u24_le()?;
        let bits = r.read_u8()?;

        let blend = if bits & 0b10 == 0 {
            BlendMethod::AlphaBlend
        } else {
            BlendMethod::Overwrite
        };
        let dispose = if bits & 0b01 != 0 {
            DisposeMethod::Background
        } else {
            DisposeMethod::None
        };

        Ok(Self {
            x_offset,
            y_offset,
            width,
            height,
            duration_ms,
            blend,
            dispose,
            previous_frame,
        })
    }

    /// Frame dimensions.
    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.width,
            height: self.height,
        }
    }

    /// Returns true if the frame rectangle lies inside the canvas.
    pub fn fits_canvas(&self, canvas: Dimensions) -> bool {
        let right = u64::from(self.x_offset) + u64::from(self.width);
        let bottom = u64::from(self.y_offset) + u64::from(self.height);
        right <= u64::from(canvas.width) && bottom <= u64::from(canvas.height)
    }
}

//! WebP container and frame header parsing.
//!
//! This crate is the structural half of a WebP decoder. It walks the RIFF
//! chunk stream, interprets the `VP8X` feature flags, parses the lossy
//! (`VP8 `) and lossless (`VP8L`) frame headers, extracts `ALPH` side
//! channels and `ANMF` frame records, and sequences animation frames. Pixel
//! reconstruction is delegated to a [`PixelDecoder`] supplied by the caller.
//!
//! # no_std Support
//!
//! Parsing works in `no_std` environments (requires `alloc`):
//! ```toml
//! [dependencies]
//! zenwebp-headers = { version = "...", default-features = false }
//! ```
//!
//! All functions take `&[u8]` slices directly - no Read/Seek traits required.
//!
//! # Identifying an image
//!
//! ```rust,no_run
//! let webp_data: &[u8] = &[]; // your WebP data
//! let info = zenwebp_headers::identify(webp_data)?;
//! println!("{}x{} alpha={}", info.width, info.height, info.has_alpha);
//! # Ok::<(), zenwebp_headers::DecodeError>(())
//! ```
//!
//! # Decoding frames
//!
//! ```rust,no_run
//! use zenwebp_headers::{LosslessBitReader, LosslessFrame, LossyFrame, PixelDecoder, WebPDecoder};
//!
//! struct Blank;
//!
//! impl PixelDecoder for Blank {
//!     fn decode_lossy(
//!         &mut self,
//!         _frame: LossyFrame<'_>,
//!         _out: &mut [u8],
//!     ) -> Result<(), zenwebp_headers::DecodeError> {
//!         Ok(())
//!     }
//!
//!     fn decode_lossless(
//!         &mut self,
//!         _reader: &mut LosslessBitReader<'_>,
//!         _frame: LosslessFrame<'_>,
//!         _out: &mut [u8],
//!     ) -> Result<(), zenwebp_headers::DecodeError> {
//!         Ok(())
//!     }
//! }
//!
//! let webp_data: &[u8] = &[]; // your WebP data
//! let image = WebPDecoder::new(webp_data).decode(&mut Blank)?;
//! for frame in image.frames() {
//!     println!("{}x{} previous={:?}", frame.width, frame.height, frame.previous);
//! }
//! # Ok::<(), zenwebp_headers::DecodeError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

extern crate alloc;

pub mod decoder;

// Slice reader utility (used by the chunk walker and header parsers)
mod slice_reader;

pub use decoder::{
    decode, identify, AlphaChunk, AnimationFrameInfo, BitstreamFormat, BlendMethod,
    DecodeConfig, DecodeError, DecodeRequest, DecodedImage, DimensionSource, Dimensions,
    DisposeMethod, ErrorKind, Frame, FrameMetadata, ImageInfo, ImageMetadata, Limits,
    LoopCount, LosslessBitReader, LosslessFrame, LossyFrame, PixelDecoder, Vp8FrameHeader,
    Vp8lFrameHeader, WebPDecoder, WebPFeatures,
};

// Re-export cooperative cancellation types
pub use enough::{Stop, StopReason, Unstoppable};

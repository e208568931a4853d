//! WebP container decoder

mod api;
mod bit_reader;
mod chunk;
mod config;
mod error;
mod frame;
mod header;
mod limits;
mod pixels;

// Re-export public API
pub use api::{
    decode, identify, BitstreamFormat, DecodeRequest, DecodedImage, Frame, FrameMetadata,
    ImageInfo, ImageMetadata, LoopCount, WebPDecoder,
};
pub use bit_reader::LosslessBitReader;
pub use config::DecodeConfig;
pub use error::{DecodeError, ErrorKind};
pub use frame::{AlphaChunk, AnimationFrameInfo, BlendMethod, DisposeMethod};
pub use header::{DimensionSource, Dimensions, Vp8FrameHeader, Vp8lFrameHeader, WebPFeatures};
pub use limits::Limits;
pub use pixels::{LosslessFrame, LossyFrame, PixelDecoder};

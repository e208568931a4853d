//! Image-level and frame-level headers: `VP8X`, `VP8 ` and `VP8L`.

use log::debug;

use super::bit_reader::LosslessBitReader;
use super::DecodeError;
use crate::slice_reader::SliceReader;

/// VP8 key frame start code.
pub(crate) const VP8_MAGIC: [u8; 3] = [0x9d, 0x01, 0x2a];
/// First byte of every VP8L bitstream.
pub(crate) const VP8L_SIGNATURE: u8 = 0x2f;
/// Width and height fields of VP8L are 14 bits wide.
const VP8L_IMAGE_SIZE_BITS: u8 = 14;
const VP8L_VERSION_BITS: u8 = 3;
/// Size of the fixed `VP8X` payload.
const VP8X_SIZE: u32 = 10;
/// Frame tag, magic and dimensions of a VP8 key frame.
const VP8_HEADER_SIZE: u32 = 10;

/// Image or frame dimensions in pixels. Both are always nonzero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Creates dimensions, rejecting a zero width or height.
    pub fn new(width: u32, height: u32) -> Result<Self, DecodeError> {
        if width == 0 || height == 0 {
            return Err(DecodeError::ZeroDimensions);
        }
        Ok(Self { width, height })
    }

    /// Bytes needed for an RGBA8 buffer of this size, or `None` on overflow.
    pub fn rgba_buffer_size(self) -> Option<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)?
            .checked_mul(4)
    }
}

/// Where the canvas dimensions of an image came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimensionSource {
    /// The `VP8X` extended header.
    FromContainer(Dimensions),
    /// The first `VP8 ` frame header of a simple file.
    FromLossyHeader(Dimensions),
    /// The first `VP8L` frame header of a simple file.
    FromLosslessHeader(Dimensions),
}

impl DimensionSource {
    /// The canonical dimensions, whatever their source.
    pub fn dimensions(self) -> Dimensions {
        match self {
            Self::FromContainer(d) | Self::FromLossyHeader(d) | Self::FromLosslessHeader(d) => d,
        }
    }
}

/// Feature flags of the `VP8X` extended header, plus the canvas size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WebPFeatures {
    /// An `ICCP` chunk follows the header.
    pub icc_profile: bool,
    /// Some frame carries transparency.
    pub alpha: bool,
    /// An `EXIF` chunk trails the image data.
    pub exif_metadata: bool,
    /// An `XMP ` chunk trails the image data.
    pub xmp_metadata: bool,
    /// The image is an animation of `ANMF` frames.
    pub animation: bool,
    /// Canvas size.
    pub dimensions: Dimensions,
}

impl WebPFeatures {
    /// Features of a simple (non-extended) file: every flag cleared.
    pub fn simple(dimensions: Dimensions) -> Self {
        Self {
            icc_profile: false,
            alpha: false,
            exif_metadata: false,
            xmp_metadata: false,
            animation: false,
            dimensions,
        }
    }
}

/// Reads the `VP8X` payload:
///
/// ```text
/// | reserved (2) | ICC (1) | alpha (1) | EXIF (1) | XMP (1) | anim (1) | reserved (1) |
/// | reserved (24 bits)                                                              |
/// | canvas width - 1 (24 bits, LE) | canvas height - 1 (24 bits, LE)                 |
/// ```
pub(crate) fn read_extended_header(
    r: &mut SliceReader,
    chunk_size: u32,
) -> Result<WebPFeatures, DecodeError> {
    if chunk_size < VP8X_SIZE {
        return Err(DecodeError::InvalidChunkSize {
            chunk: *b"VP8X",
            size: chunk_size,
        });
    }

    let flags = r.read_u8()?;
    if flags >> 6 != 0 {
        return Err(DecodeError::MalformedExtendedHeader);
    }

    let mut reserved = [0u8; 3];
    r.read_exact(&mut reserved)?;
    if reserved != [0, 0, 0] {
        return Err(DecodeError::MalformedExtendedHeader);
    }

    // Both are stored as value-minus-one.
    let width = r.read_u24_le()? + 1;
    let height = r.read_u24_le()? + 1;

    let features = WebPFeatures {
        icc_profile: flags & (1 << 5) != 0,
        alpha: flags & (1 << 4) != 0,
        exif_metadata: flags & (1 << 3) != 0,
        xmp_metadata: flags & (1 << 2) != 0,
        animation: flags & (1 << 1) != 0,
        dimensions: Dimensions { width, height },
    };
    debug!("VP8X features: {:?}", features);
    Ok(features)
}

/// Frame header of a lossy (`VP8 `) key frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vp8FrameHeader {
    /// Always true; interframes are rejected while parsing.
    pub key_frame: bool,
    /// Bitstream version (profile), 0 to 3.
    pub version: u8,
    /// Length of the first partition in bytes.
    pub partition_length: u32,
    /// Horizontal upscaling code (2 bits).
    pub x_scale: u8,
    /// Vertical upscaling code (2 bits).
    pub y_scale: u8,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Bytes of the chunk that follow the 10-byte header.
    pub data_size: u32,
}

impl Vp8FrameHeader {
    /// Frame dimensions.
    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.width,
            height: self.height,
        }
    }
}

/// Parses the VP8 frame header at the start of a `VP8 ` chunk of
/// `chunk_size` bytes.
///
/// Paragraph 9.1 of RFC 6386: a 3-byte frame tag (key frame flag, version,
/// show_frame flag, first partition size), the start code, then width and
/// height with their scaling codes.
pub(crate) fn read_vp8_header(
    r: &mut SliceReader,
    chunk_size: u32,
) -> Result<Vp8FrameHeader, DecodeError> {
    let tag = r.read_u24_le()?;

    if tag & 1 != 0 {
        return Err(DecodeError::NotKeyFrame);
    }

    let version = ((tag >> 1) & 0x7) as u8;
    if version > 3 {
        return Err(DecodeError::Vp8VersionInvalid(version));
    }

    if (tag >> 4) & 1 == 0 {
        return Err(DecodeError::InvisibleFrame);
    }

    let partition_length = tag >> 5;

    let mut magic = [0u8; 3];
    r.read_exact(&mut magic)?;
    if magic != VP8_MAGIC {
        return Err(DecodeError::Vp8MagicInvalid(magic));
    }

    let w = r.read_u16_le()?;
    let h = r.read_u16_le()?;

    let remaining = chunk_size
        .checked_sub(VP8_HEADER_SIZE)
        .ok_or(DecodeError::InvalidChunkSize {
            chunk: *b"VP8 ",
            size: chunk_size,
        })?;

    let width = u32::from(w & 0x3fff);
    let height = u32::from(h & 0x3fff);
    if width == 0 || height == 0 {
        return Err(DecodeError::ZeroDimensions);
    }

    if partition_length > remaining {
        return Err(DecodeError::PartitionTooLarge {
            partition_length,
            available: remaining,
        });
    }

    let header = Vp8FrameHeader {
        key_frame: true,
        version,
        partition_length,
        x_scale: (w >> 14) as u8,
        y_scale: (h >> 14) as u8,
        width,
        height,
        data_size: remaining,
    };
    debug!("VP8 frame header: {:?}", header);
    Ok(header)
}

/// Frame header of a lossless (`VP8L`) bitstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vp8lFrameHeader {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Hint that some pixel has alpha below 255. Not acted on here.
    pub alpha_is_used: bool,
}

impl Vp8lFrameHeader {
    /// Frame dimensions.
    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.width,
            height: self.height,
        }
    }
}

/// Parses the 5-byte VP8L header, leaving the reader positioned at the
/// start of the transform/entropy-coded data.
pub(crate) fn read_vp8l_header(
    br: &mut LosslessBitReader,
) -> Result<Vp8lFrameHeader, DecodeError> {
    let signature = br.read_bits(8)? as u8;
    if signature != VP8L_SIGNATURE {
        return Err(DecodeError::LosslessSignatureInvalid(signature));
    }

    let width = br.read_bits(VP8L_IMAGE_SIZE_BITS)? + 1;
    let height = br.read_bits(VP8L_IMAGE_SIZE_BITS)? + 1;
    if width == 0 || height == 0 {
        return Err(DecodeError::ZeroDimensions);
    }

    let alpha_is_used = br.read_bit()?;

    // A nonzero version is a newer bitstream, not a corrupt one.
    let version = br.read_bits(VP8L_VERSION_BITS)? as u8;
    if version != 0 {
        return Err(DecodeError::VersionNumberInvalid(version));
    }

    let header = Vp8lFrameHeader {
        width,
        height,
        alpha_is_used,
    };
    debug!("VP8L frame header: {:?}", header);
    Ok(header)
}

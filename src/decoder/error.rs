use alloc::string::String;
use thiserror::Error;

/// Broad classification of a [`DecodeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The bitstream violates the WebP, VP8 or VP8L format.
    Format,
    /// The bitstream is well formed but uses a feature this crate does not handle.
    Unsupported,
    /// A configured [`Limits`](super::Limits) bound was exceeded.
    Limits,
    /// Decoding was stopped through a cancellation token.
    Cancelled,
}

/// Errors that can occur when attempting to decode a WebP image
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DecodeError {
    /// RIFF's "RIFF" signature not found or invalid
    #[error("Invalid RIFF signature: {0:x?}")]
    RiffSignatureInvalid([u8; 4]),

    /// WebP's "WEBP" signature not found or invalid
    #[error("Invalid WebP signature: {0:x?}")]
    WebpSignatureInvalid([u8; 4]),

    /// The data ended in the middle of a chunk header or payload
    #[error("Unexpected end of data")]
    Truncated,

    /// A chunk required at this point of the container was missing
    #[error("Expected {0} chunk")]
    ChunkMissing(&'static str),

    /// A chunk appeared where the container grammar does not allow it
    #[error("Unexpected chunk: {0:x?}")]
    UnexpectedChunk([u8; 4]),

    /// The chunk where a frame bitstream must start is neither `VP8 ` nor `VP8L`
    #[error("Unrecognized VP8 header: {0:x?}")]
    UnrecognizedFrameChunk([u8; 4]),

    /// A chunk's declared size is too small for its fixed fields
    #[error("Invalid {chunk:x?} chunk size: {size}")]
    InvalidChunkSize {
        /// The FourCC of the offending chunk.
        chunk: [u8; 4],
        /// The declared payload size.
        size: u32,
    },

    /// Reserved bits or bytes of the VP8X header are not zero
    #[error("malformed VP8X header")]
    MalformedExtendedHeader,

    /// The VP8 frame tag marks an interframe
    #[error("VP8 header indicates the image is not a key frame")]
    NotKeyFrame,

    /// The VP8 frame tag carries a version above 3
    #[error("VP8 header indicates unknown profile {0}")]
    Vp8VersionInvalid(u8),

    /// The VP8 frame tag marks the first frame as not shown
    #[error("VP8 header indicates that the first frame is invisible")]
    InvisibleFrame,

    /// The declared first partition does not fit the chunk
    #[error("VP8 partition length {partition_length} exceeds the {available} bytes available")]
    PartitionTooLarge {
        /// Declared first partition length.
        partition_length: u32,
        /// Bytes remaining in the chunk after the frame header.
        available: u32,
    },

    /// VP8's `[0x9D, 0x01, 0x2A]` magic not found or invalid
    #[error("Invalid VP8 magic: {0:x?}")]
    Vp8MagicInvalid([u8; 3]),

    /// Signature of 0x2f not found
    #[error("Invalid lossless signature: {0:x?}")]
    LosslessSignatureInvalid(u8),

    /// Version Number was not zero
    #[error("Unexpected version number {0} found in VP8L header")]
    VersionNumberInvalid(u8),

    /// A width or height of zero was decoded
    #[error("Width or height can not be zero")]
    ZeroDimensions,

    /// Inconsistent image sizes
    #[error("Inconsistent image sizes")]
    InconsistentImageSizes,

    /// Frame would go out of the canvas
    #[error("Frame outside image")]
    FrameOutsideImage,

    /// Image is too large, either for the platform's pointer size or generally
    #[error("Image too large")]
    ImageTooLarge,

    /// A configured limit was exceeded
    #[error("Limit exceeded: {0}")]
    LimitExceeded(String),

    /// Decoding was cancelled via a [`enough::Stop`] token.
    #[error("Decoding cancelled: {0}")]
    Cancelled(enough::StopReason),
}

impl DecodeError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::VersionNumberInvalid(_) => ErrorKind::Unsupported,
            Self::LimitExceeded(_) | Self::ImageTooLarge => ErrorKind::Limits,
            Self::Cancelled(_) => ErrorKind::Cancelled,
            _ => ErrorKind::Format,
        }
    }

    /// Returns true if the bitstream violates the format.
    pub fn is_format_error(&self) -> bool {
        self.kind() == ErrorKind::Format
    }

    /// Returns true if the bitstream uses a feature this crate does not handle.
    pub fn is_unsupported(&self) -> bool {
        self.kind() == ErrorKind::Unsupported
    }
}

impl From<enough::StopReason> for DecodeError {
    fn from(reason: enough::StopReason) -> Self {
        Self::Cancelled(reason)
    }
}

//! Resource limits applied while walking a container.
//!
//! Every check compares a quantity read from (or implied by) the input
//! against an optional ceiling and fails with [`DecodeError::LimitExceeded`].

use alloc::format;

use super::DecodeError;

/// Ceilings on what a single decode may read or allocate.
///
/// `None` disables a limit.
///
/// # Example
///
/// ```rust
/// use zenwebp_headers::Limits;
///
/// let limits = Limits::default()
///     .max_dimensions(4096, 4096)
///     .max_memory(256 * 1024 * 1024);
///
/// // Trusted inputs only.
/// let unlimited = Limits::none();
/// assert_eq!(unlimited.max_memory, None);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct Limits {
    /// Canvas width in pixels.
    pub max_width: Option<u32>,
    /// Canvas height in pixels.
    pub max_height: Option<u32>,
    /// Canvas area in pixels.
    pub max_total_pixels: Option<u64>,
    /// Frames in one image.
    pub max_frame_count: Option<u64>,
    /// Input length in bytes.
    pub max_file_size: Option<u64>,
    /// Size of one copied `ICCP` or `EXIF` payload in bytes.
    pub max_metadata_size: Option<u64>,
    /// Bytes held at once by frame buffers and the current `ALPH` payload.
    pub max_memory: Option<u64>,
}

impl Default for Limits {
    /// 16384 x 16384 canvas, 100 megapixels, 10,000 frames, 100 MB input,
    /// 64 MB per metadata chunk, 1 GB of buffers.
    fn default() -> Self {
        Self {
            max_width: Some(16384),
            max_height: Some(16384),
            max_total_pixels: Some(100_000_000),
            max_frame_count: Some(10_000),
            max_file_size: Some(100 * 1024 * 1024),
            max_metadata_size: Some(64 * 1024 * 1024),
            max_memory: Some(1024 * 1024 * 1024),
        }
    }
}

/// Fails when `value` is above `limit`.
fn within(limit: Option<u64>, value: u64, what: &str) -> Result<(), DecodeError> {
    match limit {
        Some(max) if value > max => Err(DecodeError::LimitExceeded(format!(
            "{what} {value} exceeds limit {max}"
        ))),
        _ => Ok(()),
    }
}

impl Limits {
    /// No limits at all. Only for trusted inputs.
    #[must_use]
    pub fn none() -> Self {
        Self {
            max_width: None,
            max_height: None,
            max_total_pixels: None,
            max_frame_count: None,
            max_file_size: None,
            max_metadata_size: None,
            max_memory: None,
        }
    }

    /// Set maximum canvas width and height.
    #[must_use]
    pub fn max_dimensions(mut self, width: u32, height: u32) -> Self {
        self.max_width = Some(width);
        self.max_height = Some(height);
        self
    }

    /// Set maximum canvas area.
    #[must_use]
    pub fn max_total_pixels(mut self, pixels: u64) -> Self {
        self.max_total_pixels = Some(pixels);
        self
    }

    /// Set maximum frame count.
    #[must_use]
    pub fn max_frame_count(mut self, count: u64) -> Self {
        self.max_frame_count = Some(count);
        self
    }

    /// Set maximum input length.
    #[must_use]
    pub fn max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = Some(bytes);
        self
    }

    /// Set maximum size of one copied metadata payload.
    #[must_use]
    pub fn max_metadata_size(mut self, bytes: u64) -> Self {
        self.max_metadata_size = Some(bytes);
        self
    }

    /// Set maximum bytes of buffers held at once.
    #[must_use]
    pub fn max_memory(mut self, bytes: u64) -> Self {
        self.max_memory = Some(bytes);
        self
    }

    /// Checks a canvas size against the width, height and area limits.
    pub fn check_dimensions(&self, width: u32, height: u32) -> Result<(), DecodeError> {
        within(self.max_width.map(u64::from), u64::from(width), "width")?;
        within(self.max_height.map(u64::from), u64::from(height), "height")?;
        within(
            self.max_total_pixels,
            u64::from(width) * u64::from(height),
            "total pixels",
        )
    }

    /// Checks that a sequence of `count` frames is allowed.
    pub fn check_frame_count(&self, count: usize) -> Result<(), DecodeError> {
        within(self.max_frame_count, count as u64, "frame count")
    }

    /// Checks the input length.
    pub fn check_file_size(&self, bytes: u64) -> Result<(), DecodeError> {
        within(self.max_file_size, bytes, "file size")
    }

    /// Checks one `ICCP` or `EXIF` payload before it is copied.
    pub fn check_metadata_size(&self, bytes: u32) -> Result<(), DecodeError> {
        within(self.max_metadata_size, u64::from(bytes), "metadata chunk size")
    }

    /// Checks the bytes that would be held after an allocation.
    pub fn check_memory(&self, bytes: u64) -> Result<(), DecodeError> {
        within(self.max_memory, bytes, "buffer memory")
    }
}

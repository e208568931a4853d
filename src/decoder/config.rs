use super::limits::Limits;

/// WebP decoder configuration. Reusable across requests.
///
/// # Example
///
/// ```rust
/// use zenwebp_headers::{DecodeConfig, Limits};
///
/// let config = DecodeConfig::default()
///     .ignore_metadata(true)
///     .limits(Limits::default().max_frame_count(500));
/// assert!(config.ignore_metadata);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DecodeConfig {
    /// Skip ICCP and EXIF chunks instead of copying them out. Default: `false`.
    pub ignore_metadata: bool,
    /// Resource limits. Default: [`Limits::default`].
    pub limits: Limits,
}

impl DecodeConfig {
    /// Skip ICC and EXIF metadata.
    #[must_use]
    pub fn ignore_metadata(mut self, ignore: bool) -> Self {
        self.ignore_metadata = ignore;
        self
    }

    /// Set resource limits.
    #[must_use]
    pub fn limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }
}

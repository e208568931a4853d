//! Decode orchestration over the chunk walker.

use alloc::vec;
use alloc::vec::Vec;
use core::num::NonZeroU16;

use log::{debug, warn};

use super::bit_reader::LosslessBitReader;
use super::chunk::{ChunkHeader, ChunkWalker, WebPRiffChunk};
use super::config::DecodeConfig;
use super::frame::{AlphaChunk, AnimationFrameInfo, BlendMethod, DisposeMethod};
use super::header::{
    read_extended_header, read_vp8_header, read_vp8l_header, DimensionSource, Dimensions,
    WebPFeatures,
};
use super::pixels::{LosslessFrame, LossyFrame, PixelDecoder};
use super::DecodeError;

/// Number of times that an animation loops.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LoopCount {
    /// The animation loops forever.
    Forever,
    /// Each frame of the animation is displayed the specified number of times.
    Times(NonZeroU16),
}

impl Default for LoopCount {
    fn default() -> Self {
        LoopCount::Times(NonZeroU16::MIN)
    }
}

impl core::fmt::Display for LoopCount {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LoopCount::Forever => f.write_str("infinite"),
            LoopCount::Times(n) => write!(f, "{} time{}", n, if n.get() == 1 { "" } else { "s" }),
        }
    }
}

impl From<u16> for LoopCount {
    fn from(n: u16) -> Self {
        match NonZeroU16::new(n) {
            None => LoopCount::Forever,
            Some(n) => LoopCount::Times(n),
        }
    }
}

/// Bitstream compression format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum BitstreamFormat {
    /// Lossy compression (VP8).
    Lossy,
    /// Lossless compression (VP8L).
    Lossless,
}

impl core::fmt::Display for BitstreamFormat {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BitstreamFormat::Lossy => f.write_str("lossy"),
            BitstreamFormat::Lossless => f.write_str("lossless"),
        }
    }
}

/// Image-level metadata collected while decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageMetadata {
    /// Raw ICC profile bytes from the `ICCP` chunk.
    pub icc_profile: Option<Vec<u8>>,
    /// Raw EXIF bytes from the first `EXIF` chunk.
    pub exif: Option<Vec<u8>>,
    /// Loop count from the `ANIM` chunk.
    pub loop_count: LoopCount,
    /// Background color hint from the `ANIM` chunk (BGRA byte order).
    pub background_color: Option<[u8; 4]>,
    /// Lossy if any frame is lossy, lossless if every frame is lossless.
    pub format: Option<BitstreamFormat>,
}

/// Animation metadata attached to a decoded frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameMetadata {
    /// Display duration in milliseconds.
    pub duration_ms: u32,
    /// Horizontal offset of the frame rectangle on the canvas.
    pub x_offset: u32,
    /// Vertical offset of the frame rectangle on the canvas.
    pub y_offset: u32,
    /// Width of the frame rectangle.
    pub width: u32,
    /// Height of the frame rectangle.
    pub height: u32,
    /// How the frame was blended onto the canvas.
    pub blend: BlendMethod,
    /// How the frame area is disposed afterwards.
    pub dispose: DisposeMethod,
}

impl From<&AnimationFrameInfo> for FrameMetadata {
    fn from(info: &AnimationFrameInfo) -> Self {
        Self {
            duration_ms: info.duration_ms,
            x_offset: info.x_offset,
            y_offset: info.y_offset,
            width: info.width,
            height: info.height,
            blend: info.blend,
            dispose: info.dispose,
        }
    }
}

/// A decoded frame with owned, canvas-sized RGBA pixel data.
#[derive(Debug, Clone)]
pub struct Frame {
    /// RGBA pixel data (width * height * 4 bytes).
    pub data: Vec<u8>,
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Animation metadata, `None` for still images.
    pub metadata: Option<FrameMetadata>,
    /// Index of the preceding frame in the sequence, `None` for the first.
    pub previous: Option<usize>,
}

impl Frame {
    /// Display duration in milliseconds (zero for still images).
    pub fn duration_ms(&self) -> u32 {
        self.metadata.map_or(0, |m| m.duration_ms)
    }
}

/// Result of a successful decode: the frame sequence and image metadata.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    source: DimensionSource,
    features: WebPFeatures,
    frames: Vec<Frame>,
    metadata: ImageMetadata,
}

impl DecodedImage {
    /// Canvas width in pixels.
    pub fn width(&self) -> u32 {
        self.source.dimensions().width
    }

    /// Canvas height in pixels.
    pub fn height(&self) -> u32 {
        self.source.dimensions().height
    }

    /// Which header established the canvas size.
    pub fn dimension_source(&self) -> DimensionSource {
        self.source
    }

    /// Container feature flags (all cleared for simple files).
    pub fn features(&self) -> &WebPFeatures {
        &self.features
    }

    /// The decoded frames in stream order. Never empty.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Image-level metadata.
    pub fn metadata(&self) -> &ImageMetadata {
        &self.metadata
    }

    /// Consumes the image, returning its frames.
    pub fn into_frames(self) -> Vec<Frame> {
        self.frames
    }
}

/// Basic image information, read without decoding any frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct ImageInfo {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Whether the image has an alpha channel.
    pub has_alpha: bool,
    /// Whether the image is animated.
    pub is_animated: bool,
    /// Bitstream format, when known from a simple file's frame header.
    pub format: Option<BitstreamFormat>,
}

impl ImageInfo {
    /// Parse image information from WebP data.
    ///
    /// Extended files answer from the `VP8X` header alone. Simple files skip
    /// to the first `VP8 ` or `VP8L` chunk and read its frame header. Only the
    /// `VP8X` alpha flag declares alpha, so simple files never report it; the
    /// VP8L `alpha_is_used` hint is left to the pixel decoder.
    pub fn from_webp(data: &[u8]) -> Result<Self, DecodeError> {
        let mut walker = ChunkWalker::new(data)?;
        walker.next_chunk()?;

        if let Some(header) = walker.current().filter(|h| h.chunk == WebPRiffChunk::VP8X) {
            let features = read_extended_header(walker.reader(), header.size)?;
            return Ok(Self {
                width: features.dimensions.width,
                height: features.dimensions.height,
                has_alpha: features.alpha,
                is_animated: features.animation,
                format: None,
            });
        }

        loop {
            let header = walker
                .current()
                .ok_or(DecodeError::ChunkMissing("VP8 or VP8L"))?;
            match header.chunk {
                WebPRiffChunk::VP8 => {
                    let vp8 = read_vp8_header(walker.reader(), header.size)?;
                    return Ok(Self {
                        width: vp8.width,
                        height: vp8.height,
                        has_alpha: false,
                        is_animated: false,
                        format: Some(BitstreamFormat::Lossy),
                    });
                }
                WebPRiffChunk::VP8L => {
                    let payload = walker.reader().take_slice(header.size as usize)?;
                    let vp8l = read_vp8l_header(&mut LosslessBitReader::new(payload))?;
                    return Ok(Self {
                        width: vp8l.width,
                        height: vp8l.height,
                        has_alpha: false,
                        is_animated: false,
                        format: Some(BitstreamFormat::Lossless),
                    });
                }
                _ => {
                    walker.next_chunk()?;
                }
            }
        }
    }

    /// Bits per pixel of the decoded image: 32 with alpha, 24 without.
    pub fn bits_per_pixel(&self) -> u8 {
        if self.has_alpha {
            32
        } else {
            24
        }
    }
}

/// Read image information without decoding.
pub fn identify(data: &[u8]) -> Result<ImageInfo, DecodeError> {
    ImageInfo::from_webp(data)
}

/// Decode every frame of `data` with default configuration.
pub fn decode<P: PixelDecoder>(data: &[u8], pixels: P) -> Result<DecodedImage, DecodeError> {
    WebPDecoder::new(data).decode(pixels)
}

/// Decoding request that borrows configuration and input data.
///
/// # Example
///
/// ```rust,no_run
/// use zenwebp_headers::{DecodeConfig, DecodeRequest};
///
/// let config = DecodeConfig::default();
/// let webp_data: &[u8] = &[]; // your WebP data
/// let info = DecodeRequest::new(&config, webp_data).info()?;
/// # Ok::<(), zenwebp_headers::DecodeError>(())
/// ```
pub struct DecodeRequest<'a> {
    config: &'a DecodeConfig,
    data: &'a [u8],
    stop: Option<&'a dyn enough::Stop>,
}

impl<'a> DecodeRequest<'a> {
    /// Create a new decoding request.
    #[must_use]
    pub fn new(config: &'a DecodeConfig, data: &'a [u8]) -> Self {
        Self {
            config,
            data,
            stop: None,
        }
    }

    /// Set a cooperative cancellation token.
    #[must_use]
    pub fn stop(mut self, stop: &'a dyn enough::Stop) -> Self {
        self.stop = Some(stop);
        self
    }

    /// Decode every frame.
    pub fn decode<P: PixelDecoder>(self, pixels: P) -> Result<DecodedImage, DecodeError> {
        let mut decoder = WebPDecoder::new_with_config(self.data, self.config.clone());
        decoder.set_stop(self.stop);
        decoder.decode(pixels)
    }

    /// Read image info without decoding.
    pub fn info(self) -> Result<ImageInfo, DecodeError> {
        self.config.limits.check_file_size(self.data.len() as u64)?;
        ImageInfo::from_webp(self.data)
    }
}

/// WebP image format decoder.
///
/// Drives the container grammar
///
/// ```text
/// RIFF WEBP [VP8X [ICCP] [ANIM]] { [ANMF] [ALPH] (VP8 | VP8L) } [EXIF] [XMP]
/// ```
///
/// and hands each frame to a [`PixelDecoder`].
pub struct WebPDecoder<'a> {
    data: &'a [u8],
    config: DecodeConfig,
    stop: Option<&'a dyn enough::Stop>,
}

impl<'a> WebPDecoder<'a> {
    /// Create a new `WebPDecoder` from the data slice.
    pub fn new(data: &'a [u8]) -> Self {
        Self::new_with_config(data, DecodeConfig::default())
    }

    /// Create a new `WebPDecoder` with the given configuration.
    pub fn new_with_config(data: &'a [u8], config: DecodeConfig) -> Self {
        Self {
            data,
            config,
            stop: None,
        }
    }

    /// Set a cooperative cancellation token, checked before every frame.
    pub fn set_stop(&mut self, stop: Option<&'a dyn enough::Stop>) {
        self.stop = stop;
    }

    /// Read image info without decoding.
    pub fn info(&self) -> Result<ImageInfo, DecodeError> {
        ImageInfo::from_webp(self.data)
    }

    /// Decode every frame, in stream order.
    ///
    /// Fails on the first violation encountered; no partial image is returned.
    pub fn decode<P: PixelDecoder>(&self, mut pixels: P) -> Result<DecodedImage, DecodeError> {
        self.config
            .limits
            .check_file_size(self.data.len() as u64)?;

        let mut state = DecodeState {
            walker: ChunkWalker::new(self.data)?,
            config: &self.config,
            metadata: ImageMetadata::default(),
            source: None,
            frames: Vec::new(),
            frame_bytes: 0,
        };
        state.walker.next_chunk()?;

        let features = state.read_container_header()?;
        let animated = features.is_some_and(|f| f.animation);
        let alpha_allowed = features.is_some_and(|f| f.alpha);

        loop {
            if let Some(stop) = self.stop {
                stop.check()?;
            }

            state.read_frame(animated, alpha_allowed, &mut pixels)?;
            state.walker.next_chunk()?;

            let more_frames = animated
                && !matches!(
                    state.walker.current_chunk(),
                    None | Some(WebPRiffChunk::EXIF | WebPRiffChunk::XMP)
                );
            if !more_frames {
                break;
            }
        }

        if features.is_some_and(|f| f.exif_metadata) {
            state.read_trailing_metadata()?;
        }

        let source = state
            .source
            .ok_or(DecodeError::ChunkMissing("VP8 or VP8L"))?;
        let features = features.unwrap_or_else(|| WebPFeatures::simple(source.dimensions()));

        debug!(
            "decoded {}x{} image with {} frame(s)",
            source.dimensions().width,
            source.dimensions().height,
            state.frames.len()
        );

        Ok(DecodedImage {
            source,
            features,
            frames: state.frames,
            metadata: state.metadata,
        })
    }
}

/// Mutable state of one decode call.
struct DecodeState<'a, 'c> {
    walker: ChunkWalker<'a>,
    config: &'c DecodeConfig,
    metadata: ImageMetadata,
    source: Option<DimensionSource>,
    frames: Vec<Frame>,
    /// Bytes held by the pixel buffers in `frames`.
    frame_bytes: u64,
}

impl DecodeState<'_, '_> {
    fn expect_chunk(
        &self,
        chunk: WebPRiffChunk,
        name: &'static str,
    ) -> Result<ChunkHeader, DecodeError> {
        match self.walker.current() {
            Some(header) if header.chunk == chunk => Ok(header),
            _ => Err(DecodeError::ChunkMissing(name)),
        }
    }

    /// Reads `VP8X` and, as its flags require, `ICCP` and `ANIM`.
    /// Returns `None` for simple files.
    fn read_container_header(&mut self) -> Result<Option<WebPFeatures>, DecodeError> {
        let Some(header) = self
            .walker
            .current()
            .filter(|h| h.chunk == WebPRiffChunk::VP8X)
        else {
            return Ok(None);
        };

        let features = read_extended_header(self.walker.reader(), header.size)?;
        let canvas = features.dimensions;
        self.config
            .limits
            .check_dimensions(canvas.width, canvas.height)?;
        self.source = Some(DimensionSource::FromContainer(canvas));
        self.walker.next_chunk()?;

        if features.icc_profile {
            self.read_icc_profile()?;
            self.walker.next_chunk()?;
        }

        if features.animation {
            self.read_animation_parameters()?;
            self.walker.next_chunk()?;
        }

        Ok(Some(features))
    }

    fn read_icc_profile(&mut self) -> Result<(), DecodeError> {
        let header = self.expect_chunk(WebPRiffChunk::ICCP, "ICCP")?;
        if self.config.ignore_metadata {
            debug!("ignoring ICC profile ({} bytes)", header.size);
            return Ok(());
        }
        self.config.limits.check_metadata_size(header.size)?;
        let icc = self.walker.reader().take_slice(header.size as usize)?;
        self.metadata.icc_profile = Some(icc.to_vec());
        Ok(())
    }

    fn read_animation_parameters(&mut self) -> Result<(), DecodeError> {
        let header = self.expect_chunk(WebPRiffChunk::ANIM, "ANIM")?;
        if header.size < 6 {
            return Err(DecodeError::InvalidChunkSize {
                chunk: *b"ANIM",
                size: header.size,
            });
        }
        let r = self.walker.reader();
        let mut background_color = [0u8; 4];
        r.read_exact(&mut background_color)?;
        let loop_count = LoopCount::from(r.read_u16_le()?);
        debug!("animation loops {}", loop_count);
        self.metadata.background_color = Some(background_color);
        self.metadata.loop_count = loop_count;
        Ok(())
    }

    /// One pass of the frame loop: `[ANMF] [ALPH] (VP8 | VP8L)`.
    fn read_frame<P: PixelDecoder>(
        &mut self,
        animated: bool,
        alpha_allowed: bool,
        pixels: &mut P,
    ) -> Result<(), DecodeError> {
        let animation = if animated {
            let header = self.expect_chunk(WebPRiffChunk::ANMF, "ANMF")?;
            let previous = self.frames.len().checked_sub(1);
            let info = AnimationFrameInfo::read(self.walker.reader(), header.size, previous)?;
            self.walker.enter_payload();
            self.walker.next_chunk()?;
            Some(info)
        } else {
            None
        };

        // Dropped at the end of this pass, whichever way it ends.
        let alpha = match self.walker.current() {
            Some(header) if header.chunk == WebPRiffChunk::ALPH => {
                if !alpha_allowed {
                    return Err(DecodeError::UnexpectedChunk(*b"ALPH"));
                }
                // Lives next to the frame buffers until the frame is decoded.
                self.config
                    .limits
                    .check_memory(self.frame_bytes.saturating_add(u64::from(header.size)))?;
                let alpha = AlphaChunk::read(self.walker.reader(), header.size)?;
                self.walker.next_chunk()?;
                Some(alpha)
            }
            _ => None,
        };

        let header = self
            .walker
            .current()
            .ok_or(DecodeError::ChunkMissing("VP8 or VP8L"))?;
        let index = match header.chunk {
            WebPRiffChunk::VP8 => {
                self.read_lossy_frame(header, alpha.as_ref(), animation.as_ref(), pixels)?
            }
            WebPRiffChunk::VP8L => {
                if alpha.is_some() {
                    warn!("ignoring ALPH chunk ahead of a lossless frame");
                }
                self.read_lossless_frame(header, animation.as_ref(), pixels)?
            }
            other => return Err(DecodeError::UnrecognizedFrameChunk(other.to_fourcc())),
        };

        if let Some(info) = &animation {
            self.frames[index].metadata = Some(FrameMetadata::from(info));
            self.walker.leave_payload();
        }
        Ok(())
    }

    fn read_lossy_frame<P: PixelDecoder>(
        &mut self,
        header: ChunkHeader,
        alpha: Option<&AlphaChunk>,
        animation: Option<&AnimationFrameInfo>,
        pixels: &mut P,
    ) -> Result<usize, DecodeError> {
        let r = self.walker.reader();
        let vp8 = read_vp8_header(r, header.size)?;
        let data = r.take_slice(vp8.data_size as usize)?;

        self.note_format(BitstreamFormat::Lossy);
        let canvas = self.resolve_dimensions(DimensionSource::FromLossyHeader(vp8.dimensions()))?;
        check_frame_placement(vp8.dimensions(), animation, canvas)?;

        let index = self.push_frame(canvas)?;
        let frame = LossyFrame {
            header: &vp8,
            data,
            alpha,
            animation,
            canvas,
        };
        pixels.decode_lossy(frame, &mut self.frames[index].data)?;
        Ok(index)
    }

    fn read_lossless_frame<P: PixelDecoder>(
        &mut self,
        header: ChunkHeader,
        animation: Option<&AnimationFrameInfo>,
        pixels: &mut P,
    ) -> Result<usize, DecodeError> {
        let payload = self.walker.reader().take_slice(header.size as usize)?;
        let mut reader = LosslessBitReader::new(payload);
        let vp8l = read_vp8l_header(&mut reader)?;

        self.note_format(BitstreamFormat::Lossless);
        let canvas =
            self.resolve_dimensions(DimensionSource::FromLosslessHeader(vp8l.dimensions()))?;
        check_frame_placement(vp8l.dimensions(), animation, canvas)?;

        let index = self.push_frame(canvas)?;
        let frame = LosslessFrame {
            header: &vp8l,
            animation,
            canvas,
        };
        pixels.decode_lossless(&mut reader, frame, &mut self.frames[index].data)?;
        Ok(index)
    }

    fn note_format(&mut self, format: BitstreamFormat) {
        if self.metadata.format != Some(BitstreamFormat::Lossy) {
            self.metadata.format = Some(format);
        }
    }

    /// Canvas dimensions, taken from the first frame header when no `VP8X`
    /// chunk supplied them.
    fn resolve_dimensions(&mut self, candidate: DimensionSource) -> Result<Dimensions, DecodeError> {
        if let Some(source) = self.source {
            return Ok(source.dimensions());
        }
        let dimensions = candidate.dimensions();
        self.config
            .limits
            .check_dimensions(dimensions.width, dimensions.height)?;
        self.source = Some(candidate);
        Ok(dimensions)
    }

    /// Appends a blank canvas-sized frame and returns its index.
    fn push_frame(&mut self, canvas: Dimensions) -> Result<usize, DecodeError> {
        let index = self.frames.len();
        self.config.limits.check_frame_count(index + 1)?;
        let size = canvas
            .rgba_buffer_size()
            .ok_or(DecodeError::ImageTooLarge)?;
        let frame_bytes = self.frame_bytes.saturating_add(size as u64);
        self.config.limits.check_memory(frame_bytes)?;
        self.frame_bytes = frame_bytes;
        self.frames.push(Frame {
            data: vec![0u8; size],
            width: canvas.width,
            height: canvas.height,
            metadata: None,
            previous: index.checked_sub(1),
        });
        Ok(index)
    }

    /// Trailing `EXIF`/`XMP` chunks. The first EXIF chunk is kept; XMP and
    /// duplicate EXIF chunks are skipped.
    fn read_trailing_metadata(&mut self) -> Result<(), DecodeError> {
        if self.config.ignore_metadata {
            return Ok(());
        }
        while let Some(header) = self.walker.current() {
            if header.chunk == WebPRiffChunk::EXIF && self.metadata.exif.is_none() {
                self.config.limits.check_metadata_size(header.size)?;
                let exif = self.walker.reader().take_slice(header.size as usize)?;
                self.metadata.exif = Some(exif.to_vec());
            } else {
                debug!("skipping trailing {:?} chunk", header.chunk);
            }
            self.walker.next_chunk()?;
        }
        Ok(())
    }
}

/// Frame headers must agree with the canvas: exactly for still images, and
/// with the `ANMF` rectangle (which must lie inside the canvas) for
/// animation frames.
fn check_frame_placement(
    frame: Dimensions,
    animation: Option<&AnimationFrameInfo>,
    canvas: Dimensions,
) -> Result<(), DecodeError> {
    match animation {
        Some(info) => {
            if info.dimensions() != frame {
                return Err(DecodeError::InconsistentImageSizes);
            }
            if !info.fits_canvas(canvas) {
                return Err(DecodeError::FrameOutsideImage);
            }
        }
        None => {
            if frame != canvas {
                return Err(DecodeError::InconsistentImageSizes);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loop_count_from_u16() {
        assert_eq!(LoopCount::from(0), LoopCount::Forever);
        assert_eq!(
            LoopCount::from(3),
            LoopCount::Times(NonZeroU16::new(3).unwrap())
        );
        assert_eq!(alloc::format!("{}", LoopCount::from(1)), "1 time");
        assert_eq!(alloc::format!("{}", LoopCount::from(2)), "2 times");
        assert_eq!(alloc::format!("{}", LoopCount::Forever), "infinite");
        assert_eq!(LoopCount::default(), LoopCount::from(1));
    }

    #[test]
    fn frame_placement_rules() {
        let canvas = Dimensions { width: 10, height: 10 };
        let frame = Dimensions { width: 4, height: 4 };
        assert!(matches!(
            check_frame_placement(frame, None, canvas),
            Err(DecodeError::InconsistentImageSizes)
        ));
        assert!(check_frame_placement(canvas, None, canvas).is_ok());

        let mut info = AnimationFrameInfo {
            x_offset: 6,
            y_offset: 6,
            width: 4,
            height: 4,
            duration_ms: 0,
            blend: BlendMethod::AlphaBlend,
            dispose: DisposeMethod::None,
            previous_frame: None,
        };
        assert!(check_frame_placement(frame, Some(&info), canvas).is_ok());

        info.x_offset = 8;
        assert!(matches!(
            check_frame_placement(frame, Some(&info), canvas),
            Err(DecodeError::FrameOutsideImage)
        ));

        info.x_offset = 0;
        info.width = 5;
        assert!(matches!(
            check_frame_placement(frame, Some(&info), canvas),
            Err(DecodeError::InconsistentImageSizes)
        ));
    }

    #[test]
    fn format_prefers_lossy() {
        let config = DecodeConfig::default();
        let data = b"RIFF\x04\x00\x00\x00WEBP";
        let mut state = DecodeState {
            walker: ChunkWalker::new(data).unwrap(),
            config: &config,
            metadata: ImageMetadata::default(),
            source: None,
            frames: Vec::new(),
            frame_bytes: 0,
        };
        state.note_format(BitstreamFormat::Lossless);
        assert_eq!(state.metadata.format, Some(BitstreamFormat::Lossless));
        state.note_format(BitstreamFormat::Lossy);
        state.note_format(BitstreamFormat::Lossless);
        assert_eq!(state.metadata.format, Some(BitstreamFormat::Lossy));
    }
}

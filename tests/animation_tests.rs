//! Animated containers: frame sequencing, placement, limits and cancellation.

mod common;

use std::num::NonZeroU16;
use std::sync::atomic::{AtomicUsize, Ordering};

use common::*;
use zenwebp_headers::{
    BitstreamFormat, BlendMethod, DecodeConfig, DecodeError, DecodeRequest, DisposeMethod,
    ErrorKind, Limits, LoopCount, Stop, StopReason, WebPDecoder,
};

/// 32x32 canvas with three frames: lossy full canvas, lossless 8x8 at
/// (2, 4), lossy 16x16 at the origin.
fn three_frames(flags: u8, loops: u16) -> Vec<Vec<u8>> {
    vec![
        vp8x(ANIMATION | flags, 32, 32),
        anim([1, 2, 3, 4], loops),
        anmf(0, 0, 32, 32, 100, 0, &[vp8(32, 32, 20)]),
        anmf(2, 4, 8, 8, 50, 0b01, &[vp8l(8, 8, false, 0)]),
        anmf(0, 0, 16, 16, 70, 0b10, &[vp8(16, 16, 12)]),
    ]
}

/// Cancels once `remaining` checks have passed.
struct CancelAfter {
    remaining: AtomicUsize,
}

impl CancelAfter {
    fn new(checks: usize) -> Self {
        Self {
            remaining: AtomicUsize::new(checks),
        }
    }
}

impl Stop for CancelAfter {
    fn check(&self) -> Result<(), StopReason> {
        let left = self.remaining.load(Ordering::SeqCst);
        if left == 0 {
            return Err(StopReason::Cancelled);
        }
        self.remaining.store(left - 1, Ordering::SeqCst);
        Ok(())
    }
}

#[test]
fn three_frame_animation() {
    let data = riff(&three_frames(0, 0));
    let mut recorder = Recorder::default();
    let image = WebPDecoder::new(&data).decode(&mut recorder).unwrap();

    assert!(image.features().animation);
    assert_eq!((image.width(), image.height()), (32, 32));
    assert_eq!(image.metadata().loop_count, LoopCount::Forever);
    assert_eq!(image.metadata().background_color, Some([1, 2, 3, 4]));
    assert_eq!(image.metadata().format, Some(BitstreamFormat::Lossy));

    let frames = image.frames();
    assert_eq!(frames.len(), 3);
    let previous: Vec<_> = frames.iter().map(|f| f.previous).collect();
    assert_eq!(previous, vec![None, Some(0), Some(1)]);

    // Every frame owns a canvas-sized buffer.
    for frame in frames {
        assert_eq!((frame.width, frame.height), (32, 32));
        assert_eq!(frame.data.len(), 32 * 32 * 4);
    }
    assert!(frames[1].data.iter().all(|&b| b == 0x22));

    let durations: Vec<_> = frames.iter().map(|f| f.duration_ms()).collect();
    assert_eq!(durations, vec![100, 50, 70]);

    let second = frames[1].metadata.unwrap();
    assert_eq!((second.x_offset, second.y_offset), (2, 4));
    assert_eq!((second.width, second.height), (8, 8));
    assert_eq!(second.dispose, DisposeMethod::Background);
    assert_eq!(second.blend, BlendMethod::AlphaBlend);

    let third = frames[2].metadata.unwrap();
    assert_eq!(third.dispose, DisposeMethod::None);
    assert_eq!(third.blend, BlendMethod::Overwrite);

    assert_eq!(
        recorder.calls,
        vec![
            Call::Lossy {
                width: 32,
                height: 32,
                data_len: 20,
                alpha_len: None,
                offset: Some((0, 0)),
                out_len: 4096,
            },
            Call::Lossless {
                width: 8,
                height: 8,
                alpha_is_used: false,
                offset: Some((2, 4)),
                out_len: 4096,
            },
            Call::Lossy {
                width: 16,
                height: 16,
                data_len: 12,
                alpha_len: None,
                offset: Some((0, 0)),
                out_len: 4096,
            },
        ]
    );
}

#[test]
fn loop_count_from_anim_chunk() {
    let data = riff(&three_frames(0, 3));
    let image = WebPDecoder::new(&data).decode(Recorder::default()).unwrap();
    assert_eq!(
        image.metadata().loop_count,
        LoopCount::Times(NonZeroU16::new(3).unwrap())
    );
}

#[test]
fn all_lossless_frames_report_lossless() {
    let data = riff(&[
        vp8x(ANIMATION, 8, 8),
        anim([0; 4], 0),
        anmf(0, 0, 8, 8, 10, 0, &[vp8l(8, 8, false, 0)]),
        anmf(0, 0, 4, 4, 10, 0, &[vp8l(4, 4, true, 0)]),
    ]);
    let image = WebPDecoder::new(&data).decode(Recorder::default()).unwrap();
    assert_eq!(image.frames().len(), 2);
    assert_eq!(image.metadata().format, Some(BitstreamFormat::Lossless));
}

#[test]
fn animation_frame_with_alpha() {
    let data = riff(&[
        vp8x(ANIMATION | ALPHA, 16, 16),
        anim([0; 4], 0),
        anmf(0, 0, 16, 16, 40, 0, &[alph(0, 8), vp8(16, 16, 30)]),
        anmf(0, 0, 16, 16, 40, 0, &[vp8(16, 16, 30)]),
    ]);
    let mut recorder = Recorder::default();
    WebPDecoder::new(&data).decode(&mut recorder).unwrap();

    let alpha: Vec<_> = recorder
        .calls
        .iter()
        .map(|c| match c {
            Call::Lossy { alpha_len, .. } => *alpha_len,
            Call::Lossless { .. } => None,
        })
        .collect();
    // Odd-sized ALPH is padded inside ANMF; the side channel belongs to one frame only.
    assert_eq!(alpha, vec![Some(8), None]);
}

#[test]
fn trailing_exif_after_frames() {
    let mut chunks = three_frames(EXIF | XMP, 0);
    chunks.push(chunk(b"XMP ", b"<x/>"));
    chunks.push(chunk(b"EXIF", b"exif-data"));
    let image = WebPDecoder::new(&riff(&chunks))
        .decode(Recorder::default())
        .unwrap();
    assert_eq!(image.frames().len(), 3);
    assert_eq!(image.metadata().exif.as_deref(), Some(&b"exif-data"[..]));
}

#[test]
fn frame_outside_canvas() {
    let data = riff(&[
        vp8x(ANIMATION, 32, 32),
        anim([0; 4], 0),
        anmf(20, 20, 16, 16, 10, 0, &[vp8(16, 16, 30)]),
    ]);
    let err = WebPDecoder::new(&data).decode(Recorder::default()).unwrap_err();
    assert!(matches!(err, DecodeError::FrameOutsideImage));
}

#[test]
fn frame_header_must_match_anmf_size() {
    let data = riff(&[
        vp8x(ANIMATION, 32, 32),
        anim([0; 4], 0),
        anmf(0, 0, 16, 16, 10, 0, &[vp8(8, 8, 30)]),
    ]);
    let err = WebPDecoder::new(&data).decode(Recorder::default()).unwrap_err();
    assert!(matches!(err, DecodeError::InconsistentImageSizes));
}

#[test]
fn missing_animation_chunks() {
    let data = riff(&[
        vp8x(ANIMATION, 16, 16),
        anmf(0, 0, 16, 16, 10, 0, &[vp8(16, 16, 30)]),
    ]);
    let err = WebPDecoder::new(&data).decode(Recorder::default()).unwrap_err();
    assert!(matches!(err, DecodeError::ChunkMissing("ANIM")));

    let data = riff(&[vp8x(ANIMATION, 16, 16), anim([0; 4], 0), vp8(16, 16, 30)]);
    let err = WebPDecoder::new(&data).decode(Recorder::default()).unwrap_err();
    assert!(matches!(err, DecodeError::ChunkMissing("ANMF")));
}

#[test]
fn short_anim_chunk() {
    let data = riff(&[
        vp8x(ANIMATION, 16, 16),
        chunk(b"ANIM", &[0; 4]),
        anmf(0, 0, 16, 16, 10, 0, &[vp8(16, 16, 30)]),
    ]);
    let err = WebPDecoder::new(&data).decode(Recorder::default()).unwrap_err();
    assert!(matches!(err, DecodeError::InvalidChunkSize { size: 4, .. }));
}

#[test]
fn nested_frame_must_fit_inside_anmf() {
    // Declared ANMF size covers the frame record and the VP8 chunk header;
    // the VP8 payload sits after the ANMF.
    let mut frame = anmf(0, 0, 16, 16, 10, 0, &[vp8(16, 16, 30)]);
    frame[4..8].copy_from_slice(&24u32.to_le_bytes());
    let data = riff(&[vp8x(ANIMATION, 16, 16), anim([0; 4], 0), frame]);

    let mut recorder = Recorder::default();
    let err = WebPDecoder::new(&data).decode(&mut recorder).unwrap_err();
    assert!(matches!(
        err,
        DecodeError::InvalidChunkSize { chunk, size: 24 } if &chunk == b"ANMF"
    ));
    assert!(recorder.calls.is_empty());
}

#[test]
fn walk_resumes_after_anmf_padding_and_junk() {
    let mut frame = anmf(0, 0, 4, 4, 10, 0, &[vp8l(4, 4, false, 0)]);
    // Bytes inside the ANMF after its frame chunk are not chunks.
    let junk = b"JUNKJUNK";
    frame.extend_from_slice(junk);
    let size = u32::from_le_bytes(frame[4..8].try_into().unwrap()) + junk.len() as u32;
    frame[4..8].copy_from_slice(&size.to_le_bytes());
    let data = riff(&[
        vp8x(ANIMATION, 4, 4),
        anim([0; 4], 0),
        frame,
        anmf(0, 0, 4, 4, 20, 0, &[vp8l(4, 4, false, 0)]),
    ]);

    let image = WebPDecoder::new(&data).decode(Recorder::default()).unwrap();
    let durations: Vec<_> = image.frames().iter().map(|f| f.duration_ms()).collect();
    assert_eq!(durations, vec![10, 20]);
}

#[test]
fn frame_buffers_count_against_memory_limit() {
    // Tiny frames on a large canvas; each frame owns a canvas-sized buffer.
    let canvas_bytes = 64 * 64 * 4;
    let data = riff(&[
        vp8x(ANIMATION, 64, 64),
        anim([0; 4], 0),
        anmf(0, 0, 2, 2, 10, 0, &[vp8(2, 2, 4)]),
        anmf(0, 0, 2, 2, 10, 0, &[vp8(2, 2, 4)]),
        anmf(0, 0, 2, 2, 10, 0, &[vp8(2, 2, 4)]),
    ]);

    let config =
        DecodeConfig::default().limits(Limits::default().max_memory(2 * canvas_bytes + 1));
    let mut recorder = Recorder::default();
    let err = WebPDecoder::new_with_config(&data, config)
        .decode(&mut recorder)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Limits);
    // Refused before the third buffer was allocated.
    assert_eq!(recorder.calls.len(), 2);

    let config = DecodeConfig::default().limits(Limits::default().max_memory(3 * canvas_bytes));
    let image = WebPDecoder::new_with_config(&data, config)
        .decode(Recorder::default())
        .unwrap();
    assert_eq!(image.frames().len(), 3);
}

#[test]
fn default_memory_limit_stops_large_canvas_animations() {
    // 10000 x 10000 RGBA is 400 MB per frame; the third frame crosses 1 GB.
    let mut chunks = vec![vp8x(ANIMATION, 10000, 10000), anim([0; 4], 0)];
    for _ in 0..3 {
        chunks.push(anmf(0, 0, 2, 2, 10, 0, &[vp8(2, 2, 4)]));
    }
    let data = riff(&chunks);

    // Shrink the budget instead of allocating the first 800 MB for real.
    let config = DecodeConfig::default().limits(Limits::default().max_memory(1));
    let err = WebPDecoder::new_with_config(&data, config)
        .decode(Recorder::default())
        .unwrap_err();
    assert!(matches!(err, DecodeError::LimitExceeded(_)));

    let limits = Limits::default();
    let frame = 10000u64 * 10000 * 4;
    assert!(limits.check_memory(2 * frame).is_ok());
    assert!(limits.check_memory(3 * frame).is_err());
}

#[test]
fn frame_count_limit() {
    let data = riff(&three_frames(0, 0));
    let config = DecodeConfig::default().limits(Limits::default().max_frame_count(2));
    let err = WebPDecoder::new_with_config(&data, config)
        .decode(Recorder::default())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Limits);

    let config = DecodeConfig::default().limits(Limits::default().max_frame_count(3));
    assert!(WebPDecoder::new_with_config(&data, config)
        .decode(Recorder::default())
        .is_ok());
}

#[test]
fn cancellation_between_frames() {
    let data = riff(&three_frames(0, 0));
    let config = DecodeConfig::default();

    let stop = CancelAfter::new(1);
    let mut recorder = Recorder::default();
    let err = DecodeRequest::new(&config, &data)
        .stop(&stop)
        .decode(&mut recorder)
        .unwrap_err();
    assert!(matches!(err, DecodeError::Cancelled(StopReason::Cancelled)));
    assert_eq!(err.kind(), ErrorKind::Cancelled);
    // The first frame went through before the token fired.
    assert_eq!(recorder.calls.len(), 1);

    let stop = CancelAfter::new(3);
    let mut decoder = WebPDecoder::new(&data);
    decoder.set_stop(Some(&stop));
    assert_eq!(decoder.decode(Recorder::default()).unwrap().frames().len(), 3);
}

#[test]
fn identify_animation() {
    let info = zenwebp_headers::identify(&riff(&three_frames(ALPHA, 0))).unwrap();
    assert!(info.is_animated);
    assert!(info.has_alpha);
    assert_eq!((info.width, info.height), (32, 32));
}

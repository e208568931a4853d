//! Byte builders for synthetic WebP files and a recording pixel decoder.
#![allow(dead_code)]

use zenwebp_headers::{DecodeError, LosslessBitReader, LosslessFrame, LossyFrame, PixelDecoder};

/// VP8X flag bits.
pub const ICC: u8 = 0x20;
pub const ALPHA: u8 = 0x10;
pub const EXIF: u8 = 0x08;
pub const XMP: u8 = 0x04;
pub const ANIMATION: u8 = 0x02;

fn u24(v: u32) -> [u8; 3] {
    let b = v.to_le_bytes();
    [b[0], b[1], b[2]]
}

/// A chunk with its header and pad byte.
pub fn chunk(fourcc: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload.len() + 9);
    out.extend_from_slice(fourcc);
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    out.extend_from_slice(payload);
    if payload.len() % 2 == 1 {
        out.push(0);
    }
    out
}

/// A complete file around the given chunks.
pub fn riff(chunks: &[Vec<u8>]) -> Vec<u8> {
    let body: Vec<u8> = chunks.concat();
    let mut out = Vec::with_capacity(body.len() + 12);
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(body.len() as u32 + 4).to_le_bytes());
    out.extend_from_slice(b"WEBP");
    out.extend_from_slice(&body);
    out
}

/// `VP8 ` key frame with `data_len` bytes after the 10-byte header.
pub fn vp8(width: u16, height: u16, data_len: usize) -> Vec<u8> {
    let partition_length = data_len as u32 / 2;
    let tag = (1 << 4) | (partition_length << 5);
    let mut p = Vec::new();
    p.extend_from_slice(&u24(tag));
    p.extend_from_slice(&[0x9d, 0x01, 0x2a]);
    p.extend_from_slice(&width.to_le_bytes());
    p.extend_from_slice(&height.to_le_bytes());
    p.extend((0..data_len).map(|i| i as u8));
    chunk(b"VP8 ", &p)
}

/// `VP8 ` chunk with a raw 3-byte frame tag.
pub fn vp8_with_tag(tag: u32, width: u16, height: u16) -> Vec<u8> {
    let mut p = Vec::new();
    p.extend_from_slice(&u24(tag));
    p.extend_from_slice(&[0x9d, 0x01, 0x2a]);
    p.extend_from_slice(&width.to_le_bytes());
    p.extend_from_slice(&height.to_le_bytes());
    p.extend_from_slice(&[0; 8]);
    chunk(b"VP8 ", &p)
}

/// `VP8L` chunk: 5-byte header plus a few bytes of bitstream.
pub fn vp8l(width: u32, height: u32, alpha: bool, version: u32) -> Vec<u8> {
    let bits = (width - 1) | ((height - 1) << 14) | (u32::from(alpha) << 28) | (version << 29);
    let mut p = vec![0x2f];
    p.extend_from_slice(&bits.to_le_bytes());
    p.extend_from_slice(&[0xAA, 0x55, 0x01]);
    chunk(b"VP8L", &p)
}

pub fn vp8x(flags: u8, width: u32, height: u32) -> Vec<u8> {
    let mut p = vec![flags, 0, 0, 0];
    p.extend_from_slice(&u24(width - 1));
    p.extend_from_slice(&u24(height - 1));
    chunk(b"VP8X", &p)
}

pub fn anim(background: [u8; 4], loops: u16) -> Vec<u8> {
    let mut p = background.to_vec();
    p.extend_from_slice(&loops.to_le_bytes());
    chunk(b"ANIM", &p)
}

/// `ANMF` chunk wrapping the given frame chunks.
pub fn anmf(
    x: u32,
    y: u32,
    w: u32,
    h: u32,
    duration: u32,
    flags: u8,
    inner: &[Vec<u8>],
) -> Vec<u8> {
    let mut p = Vec::new();
    for v in [x / 2, y / 2, w - 1, h - 1, duration] {
        p.extend_from_slice(&u24(v));
    }
    p.push(flags);
    p.extend_from_slice(&inner.concat());
    chunk(b"ANMF", &p)
}

/// `ALPH` chunk with `data_len` bytes after the header byte.
pub fn alph(header: u8, data_len: usize) -> Vec<u8> {
    let mut p = vec![header];
    p.extend((0..data_len).map(|i| (i * 3) as u8));
    chunk(b"ALPH", &p)
}

/// What the decoder handed to the pixel stage for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Lossy {
        width: u32,
        height: u32,
        data_len: usize,
        alpha_len: Option<usize>,
        offset: Option<(u32, u32)>,
        out_len: usize,
    },
    Lossless {
        width: u32,
        height: u32,
        alpha_is_used: bool,
        offset: Option<(u32, u32)>,
        out_len: usize,
    },
}

/// Records every call and paints the output buffer with a marker byte.
#[derive(Debug, Default)]
pub struct Recorder {
    pub calls: Vec<Call>,
}

impl PixelDecoder for Recorder {
    fn decode_lossy(&mut self, frame: LossyFrame<'_>, out: &mut [u8]) -> Result<(), DecodeError> {
        self.calls.push(Call::Lossy {
            width: frame.header.width,
            height: frame.header.height,
            data_len: frame.data.len(),
            alpha_len: frame.alpha.map(|a| a.data.len()),
            offset: frame.animation.map(|a| (a.x_offset, a.y_offset)),
            out_len: out.len(),
        });
        out.fill(0x11);
        Ok(())
    }

    fn decode_lossless(
        &mut self,
        reader: &mut LosslessBitReader<'_>,
        frame: LosslessFrame<'_>,
        out: &mut [u8],
    ) -> Result<(), DecodeError> {
        assert_eq!(reader.bit_position(), 40);
        self.calls.push(Call::Lossless {
            width: frame.header.width,
            height: frame.header.height,
            alpha_is_used: frame.header.alpha_is_used,
            offset: frame.animation.map(|a| (a.x_offset, a.y_offset)),
            out_len: out.len(),
        });
        out.fill(0x22);
        Ok(())
    }
}

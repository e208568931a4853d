//! RIFF chunk walking.
//!
//! A WebP file is a `RIFF` container whose payload starts with the `WEBP`
//! FourCC and is followed by a sequence of chunks. Each chunk is a 4-byte
//! FourCC, a little-endian u32 payload size, and the payload itself padded
//! to an even length.

use log::{debug, trace, warn};

use super::DecodeError;
use crate::slice_reader::SliceReader;

/// All possible RIFF chunks in a WebP image file
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Hash, Eq)]
pub(crate) enum WebPRiffChunk {
    RIFF,
    WEBP,
    VP8,
    VP8L,
    VP8X,
    ANIM,
    ANMF,
    ALPH,
    ICCP,
    EXIF,
    XMP,
    Unknown([u8; 4]),
}

impl WebPRiffChunk {
    pub(crate) const fn from_fourcc(chunk_fourcc: [u8; 4]) -> Self {
        match &chunk_fourcc {
            b"RIFF" => Self::RIFF,
            b"WEBP" => Self::WEBP,
            b"VP8 " => Self::VP8,
            b"VP8L" => Self::VP8L,
            b"VP8X" => Self::VP8X,
            b"ANIM" => Self::ANIM,
            b"ANMF" => Self::ANMF,
            b"ALPH" => Self::ALPH,
            b"ICCP" => Self::ICCP,
            b"EXIF" => Self::EXIF,
            b"XMP " => Self::XMP,
            _ => Self::Unknown(chunk_fourcc),
        }
    }

    pub(crate) const fn to_fourcc(self) -> [u8; 4] {
        match self {
            Self::RIFF => *b"RIFF",
            Self::WEBP => *b"WEBP",
            Self::VP8 => *b"VP8 ",
            Self::VP8L => *b"VP8L",
            Self::VP8X => *b"VP8X",
            Self::ANIM => *b"ANIM",
            Self::ANMF => *b"ANMF",
            Self::ALPH => *b"ALPH",
            Self::ICCP => *b"ICCP",
            Self::EXIF => *b"EXIF",
            Self::XMP => *b"XMP ",
            Self::Unknown(fourcc) => fourcc,
        }
    }

    /// Chunks the walker stops at. `RIFF` and `WEBP` only appear in the file
    /// header, so inside the chunk stream they are skipped like any other
    /// unknown FourCC.
    pub(crate) const fn is_recognized(self) -> bool {
        !matches!(self, Self::Unknown(_) | Self::RIFF | Self::WEBP)
    }
}

/// Header of a chunk: its type and unpadded payload size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ChunkHeader {
    pub(crate) chunk: WebPRiffChunk,
    pub(crate) size: u32,
}

impl ChunkHeader {
    /// On-stream footprint of the payload, including the RIFF pad byte.
    pub(crate) fn padded_size(self) -> u64 {
        u64::from(self.size) + u64::from(self.size & 1)
    }
}

/// Reads the chunk FourCC at the cursor.
pub(crate) fn read_fourcc(r: &mut SliceReader) -> Result<WebPRiffChunk, DecodeError> {
    let mut chunk_fourcc = [0; 4];
    r.read_exact(&mut chunk_fourcc)?;
    Ok(WebPRiffChunk::from_fourcc(chunk_fourcc))
}

/// Reads a chunk FourCC followed by its little-endian payload size.
pub(crate) fn read_chunk_header(r: &mut SliceReader) -> Result<ChunkHeader, DecodeError> {
    let chunk = read_fourcc(r)?;
    let size = r.read_u32_le()?;
    Ok(ChunkHeader { chunk, size })
}

/// Walks the chunk stream of a WebP file one recognized chunk at a time.
///
/// The walker owns the stream cursor. After [`next_chunk`](Self::next_chunk)
/// returns a header the cursor sits at the start of that chunk's payload;
/// callers read as much of it as they need and the next call resumes after
/// the padded payload no matter how much was consumed.
pub(crate) struct ChunkWalker<'a> {
    r: SliceReader<'a>,
    /// End of the chunk stream, bounded by the RIFF size when it is sane.
    /// Inside an `ANMF` payload this is the end of that payload.
    end: usize,
    /// Where the next chunk header starts.
    resume_at: usize,
    /// Payload offset of the current chunk.
    payload_start: usize,
    current: Option<ChunkHeader>,
    nested: Option<NestedPayload>,
}

/// Walker state saved on entering a chunk's payload.
#[derive(Debug, Clone, Copy)]
struct NestedPayload {
    parent: ChunkHeader,
    outer_end: usize,
    resume_at: usize,
}

impl<'a> ChunkWalker<'a> {
    /// Reads the `RIFF <size> WEBP` file header and positions the walker at
    /// the first chunk.
    pub(crate) fn new(data: &'a [u8]) -> Result<Self, DecodeError> {
        let mut r = SliceReader::new(data);

        let mut signature = [0u8; 4];
        r.read_exact(&mut signature)?;
        if WebPRiffChunk::from_fourcc(signature) != WebPRiffChunk::RIFF {
            return Err(DecodeError::RiffSignatureInvalid(signature));
        }

        // The RIFF size counts everything after the size field itself,
        // starting with the 'WEBP' FourCC.
        let riff_size = r.read_u32_le()? as usize;

        match read_fourcc(&mut r)? {
            WebPRiffChunk::WEBP => {}
            fourcc => return Err(DecodeError::WebpSignatureInvalid(fourcc.to_fourcc())),
        }

        let declared_end = riff_size.saturating_add(8);
        let end = if declared_end >= 12 && declared_end <= data.len() {
            declared_end
        } else {
            if declared_end != data.len() {
                debug!(
                    "RIFF size {} disagrees with data length {}; walking to end of data",
                    riff_size,
                    data.len()
                );
            }
            data.len()
        };

        let resume_at = r.position();
        Ok(Self {
            r,
            end,
            resume_at,
            payload_start: resume_at,
            current: None,
            nested: None,
        })
    }

    /// Returns true while unread chunk bytes remain.
    pub(crate) fn has_remaining(&self) -> bool {
        self.resume_at < self.end
    }

    /// The chunk most recently returned by [`next_chunk`](Self::next_chunk).
    pub(crate) fn current(&self) -> Option<ChunkHeader> {
        self.current
    }

    /// The type of the current chunk, if any.
    pub(crate) fn current_chunk(&self) -> Option<WebPRiffChunk> {
        self.current.map(|header| header.chunk)
    }

    /// Advances to the next recognized chunk, skipping unknown ones.
    ///
    /// Returns `None` once the stream is exhausted. The cursor is left at the
    /// start of the returned chunk's payload.
    pub(crate) fn next_chunk(&mut self) -> Result<Option<ChunkHeader>, DecodeError> {
        self.current = None;
        while self.has_remaining() {
            self.r.seek_from_start(self.resume_at)?;
            if self.end - self.resume_at < 8 {
                return Err(self.overrun());
            }

            let header = read_chunk_header(&mut self.r)?;
            let payload_start = self.r.position();
            let next = (payload_start as u64).saturating_add(header.padded_size());
            trace!(
                "chunk {:?} size {} at offset {}",
                header.chunk,
                header.size,
                payload_start - 8
            );

            if !header.chunk.is_recognized() {
                debug!(
                    "skipping unknown chunk {:?} ({} bytes)",
                    header.chunk.to_fourcc(),
                    header.padded_size()
                );
                // An unknown chunk overrunning the stream simply ends the walk.
                self.resume_at = next.min(self.end as u64) as usize;
                continue;
            }

            if next > self.end as u64 {
                if u64::from(header.size) + payload_start as u64 > self.end as u64 {
                    return Err(self.overrun());
                }
                // Only the trailing pad byte is missing.
                warn!("chunk {:?} is missing its pad byte", header.chunk);
            }
            self.resume_at = next.min(self.end as u64) as usize;
            self.payload_start = payload_start;
            self.current = Some(header);
            return Ok(Some(header));
        }
        Ok(None)
    }

    /// Error for a chunk running past the current bound.
    fn overrun(&self) -> DecodeError {
        match self.nested {
            Some(nested) => DecodeError::InvalidChunkSize {
                chunk: nested.parent.chunk.to_fourcc(),
                size: nested.parent.size,
            },
            None => DecodeError::Truncated,
        }
    }

    /// Treats the bytes after the cursor as further chunks, bounded by the
    /// current chunk's payload. Used for `ANMF`, whose payload nests the
    /// frame's `ALPH`/`VP8 `/`VP8L` chunks after a fixed 16-byte header.
    ///
    /// A nested chunk that crosses the end of the payload is an
    /// `InvalidChunkSize` error for the enclosing chunk.
    pub(crate) fn enter_payload(&mut self) {
        let Some(parent) = self.current else {
            return;
        };
        let payload_end = (self.payload_start as u64 + u64::from(parent.size))
            .min(self.end as u64) as usize;
        self.nested = Some(NestedPayload {
            parent,
            outer_end: self.end,
            resume_at: self.resume_at,
        });
        self.end = payload_end;
        self.resume_at = self.r.position().min(payload_end);
    }

    /// Returns to the enclosing chunk stream after [`enter_payload`], resuming
    /// after the parent chunk's padded payload. Bytes left unread inside the
    /// payload are skipped.
    ///
    /// [`enter_payload`]: Self::enter_payload
    pub(crate) fn leave_payload(&mut self) {
        if let Some(nested) = self.nested.take() {
            self.end = nested.outer_end;
            self.resume_at = nested.resume_at;
            self.current = None;
        }
    }

    /// Cursor over the current chunk's remaining payload.
    pub(crate) fn reader(&mut self) -> &mut SliceReader<'a> {
        &mut self.r
    }
}

//! The GT1 program file format and its GT1z compressed form.
//!
//! GT1 is a list of segments followed by an entry point:
//!
//!   [ <addrH> <addrL> <n> n x <byte> ]*   zero or more segments
//!     0                                   end-of-segments marker
//!     <execH> <execL>                     entry point
//!
//! `n` = 0 means 256 bytes; a segment never crosses its 256-byte page.
//!
//! GT1z opens with the 0x00 0x7a prefix, then carries segments of
//! (addrH, addrL) followed by tokens until a zero token, and ends with
//! the same 0 / entry-point trailer. Each token byte packs
//! (nLit:3, mCnt:4, longOffset:1); field values 7 / 15 escape to a
//! following full count byte. Matches copy from RAM already written:
//! short offsets are relative to the current segment base, long
//! offsets are absolute little-endian addresses.

use std::fmt;

/// One contiguous run of bytes at a fixed load address.
#[derive(Debug, PartialEq)]
pub struct Gt1Segment {
    pub addr: u16,
    pub data: Vec<u8>,
}

/// A parsed program image.
#[derive(Debug, PartialEq)]
pub struct Gt1File {
    pub segments: Vec<Gt1Segment>,
    pub entry: u16,
}

#[derive(Debug, PartialEq)]
pub enum Gt1Error {
    /// The stream ended inside a header or segment.
    Truncated,
    /// A segment would run past its page.
    SegmentCrossesPage { addr: u16, len: usize },
    /// Bytes after the entry point.
    TrailingBytes,
}

impl fmt::Display for Gt1Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated => write!(f, "truncated GT1 stream"),
            Self::SegmentCrossesPage { addr, len } => {
                write!(f, "segment at 0x{addr:04X} ({len} bytes) crosses its page")
            }
            Self::TrailingBytes => write!(f, "bytes after GT1 entry point"),
        }
    }
}

impl std::error::Error for Gt1Error {}

impl Gt1File {
    pub fn new(entry: u16) -> Self {
        Self { segments: Vec::new(), entry }
    }

    /// Add a segment; panics on page crossing, which is a bug in the
    /// caller, not input data.
    pub fn push(&mut self, addr: u16, data: &[u8]) -> &mut Self {
        assert!(!data.is_empty() && data.len() <= 256);
        assert!(
            (addr & 0xff) as usize + data.len() <= 256,
            "segment at 0x{addr:04X} crosses its page"
        );
        self.segments.push(Gt1Segment { addr, data: data.to_vec() });
        self
    }

    /// Serialize to the plain GT1 stream.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for seg in &self.segments {
            out.push((seg.addr >> 8) as u8);
            out.push(seg.addr as u8);
            out.push(seg.data.len() as u8); // 256 wraps to 0
            out.extend_from_slice(&seg.data);
        }
        out.push(0);
        out.push((self.entry >> 8) as u8);
        out.push(self.entry as u8);
        out
    }

    /// Parse and validate a plain GT1 stream.
    pub fn parse(bytes: &[u8]) -> Result<Self, Gt1Error> {
        let mut it = bytes.iter().copied();
        let mut next = || it.next().ok_or(Gt1Error::Truncated);

        let mut file = Gt1File::new(0);
        loop {
            let hi = next()?;
            if hi == 0 {
                let eh = next()?;
                let el = next()?;
                file.entry = (eh as u16) << 8 | el as u16;
                break;
            }
            let lo = next()?;
            let n = next()?;
            let len = if n == 0 { 256 } else { n as usize };
            let addr = (hi as u16) << 8 | lo as u16;
            if (addr & 0xff) as usize + len > 256 {
                return Err(Gt1Error::SegmentCrossesPage { addr, len });
            }
            let mut data = Vec::with_capacity(len);
            for _ in 0..len {
                data.push(next()?);
            }
            file.segments.push(Gt1Segment { addr, data });
        }
        drop(next);
        if it.next().is_some() {
            return Err(Gt1Error::TrailingBytes);
        }
        Ok(file)
    }

    /// Compress to the GT1z form. Greedy matcher: longest match of at
    /// least four bytes against the segment emitted so far, encoded
    /// with a short segment-relative offset.
    pub fn to_gt1z(&self) -> Vec<u8> {
        const MIN_MATCH: usize = 4;
        let mut out = vec![0x00, 0x7a];
        for seg in &self.segments {
            out.push((seg.addr >> 8) as u8);
            out.push(seg.addr as u8);

            let data = &seg.data;
            let mut pos = 0;
            let mut lit_start = 0;
            while pos < data.len() {
                let (mut best_len, mut best_at) = (0usize, 0usize);
                // Candidate sources start anywhere already written.
                for at in 0..pos {
                    let mut l = 0;
                    // Overlapping runs replicate forward, so the match
                    // may extend past `pos`.
                    while pos + l < data.len()
                        && data[at + (l % (pos - at))] == data[pos + l]
                        && l < 255
                    {
                        l += 1;
                    }
                    if l > best_len {
                        best_len = l;
                        best_at = at;
                    }
                }
                if best_len >= MIN_MATCH {
                    emit_token(&mut out, &data[lit_start..pos], best_len, best_at as u8);
                    pos += best_len;
                    lit_start = pos;
                } else {
                    pos += 1;
                }
            }
            if lit_start < data.len() {
                emit_token(&mut out, &data[lit_start..], 0, 0);
            }
            out.push(0); // end of segment
        }
        out.push(0);
        out.push((self.entry >> 8) as u8);
        out.push(self.entry as u8);
        out
    }
}

/// Emit one token: literals (possibly in 255-byte slices) and an
/// optional short-offset match.
fn emit_token(out: &mut Vec<u8>, mut literals: &[u8], mcnt: usize, offset: u8) {
    // Oversized literal runs split into full tokens of their own.
    while literals.len() > 255 {
        emit_token(out, &literals[..255], 0, 0);
        literals = &literals[255..];
    }
    let nlit = literals.len();
    let nlit_field = if nlit >= 7 { 7 } else { nlit as u8 };
    let mcnt_field = if mcnt >= 15 { 15 } else { mcnt as u8 };
    out.push(nlit_field << 5 | mcnt_field << 1);
    if nlit_field == 7 {
        out.push(nlit as u8);
    }
    if mcnt_field == 15 {
        out.push(mcnt as u8);
    }
    if mcnt > 0 {
        out.push(offset);
    }
    out.extend_from_slice(literals);
}

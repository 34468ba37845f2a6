//! Loading GT1 program files from disk.
//!
//! GT1 is the native program format (see `gigatron_core::gt1` for the
//! byte-level codec); this module owns the filesystem side: reading a
//! file, validating it, and reporting what went wrong in terms a CLI
//! user can act on.

use std::fmt;
use std::path::Path;

use gigatron_core::gt1::{Gt1Error, Gt1File};

/// Errors that can occur when loading a GT1 file.
#[derive(Debug)]
pub enum Gt1LoadError {
    /// Underlying I/O error (file not found, permission denied, etc.)
    Io(std::io::Error),

    /// The file is not a well-formed GT1 stream.
    Format(Gt1Error),

    /// The file is empty.
    Empty,

    /// A segment would load over the zero page or the video table,
    /// which only ends one way.
    ReservedRange { addr: u16 },
}

impl fmt::Display for Gt1LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Format(e) => write!(f, "bad GT1 stream: {e}"),
            Self::Empty => write!(f, "empty GT1 file"),
            Self::ReservedRange { addr } => {
                write!(f, "segment at 0x{addr:04X} overlaps a system page")
            }
        }
    }
}

impl std::error::Error for Gt1LoadError {}

impl From<std::io::Error> for Gt1LoadError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<Gt1Error> for Gt1LoadError {
    fn from(e: Gt1Error) -> Self {
        Self::Format(e)
    }
}

/// Read and validate a GT1 file.
pub fn load_gt1_file(path: &Path) -> Result<Gt1File, Gt1LoadError> {
    let bytes = std::fs::read(path)?;
    load_gt1_bytes(&bytes)
}

/// Validate an in-memory GT1 stream (shared with tests).
pub fn load_gt1_bytes(bytes: &[u8]) -> Result<Gt1File, Gt1LoadError> {
    if bytes.is_empty() {
        return Err(Gt1LoadError::Empty);
    }
    let file = Gt1File::parse(bytes)?;
    for seg in &file.segments {
        // Zero page writes would trample the live register file, page
        // 1 the video table's system region.
        if seg.addr < 0x0200 {
            return Err(Gt1LoadError::ReservedRange { addr: seg.addr });
        }
    }
    Ok(file)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

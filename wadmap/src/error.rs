use std::io;

use thiserror::Error;

/// Failure modes for archive loading and lump decoding.
///
/// Magic-tag mismatches in GL lumps are deliberately absent: real-world
/// archives drift across format versions, so those are logged as warnings
/// and decoding continues.
#[derive(Debug, Error)]
pub enum WadError {
    /// The archive file, or a named lump within it, does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// The file is smaller than the fixed 12 byte header
    #[error("truncated archive: {0} bytes, header needs 12")]
    Truncated(usize),

    /// A computed byte offset or decoded index escaped its owning buffer
    /// or table
    #[error("out of bounds: {what} at {at}, limit {limit}")]
    OutOfBounds {
        what: &'static str,
        at: usize,
        limit: usize,
    },

    /// Filesystem failure other than a missing file
    #[error(transparent)]
    Io(#[from] io::Error),
}

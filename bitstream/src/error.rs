//! Error types for byte-level reads.

use std::fmt;

/// Result type for bitstream operations.
pub type BitResult<T> = Result<T, BitError>;

/// Errors that can occur while reading packed binary data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BitError {
    /// Attempted to read past the end of the buffer.
    UnexpectedEof {
        /// Byte offset the read started at.
        offset: usize,
        /// Number of bytes requested.
        requested: usize,
        /// Number of bytes available from `offset`.
        available: usize,
    },
}

impl fmt::Display for BitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEof {
                offset,
                requested,
                available,
            } => {
                write!(
                    f,
                    "attempted to read {requested} bytes at offset {offset} but only {available} bytes available"
                )
            }
        }
    }
}

impl std::error::Error for BitError {}

//! Error types for container decoding.

use std::fmt;

/// Result type for container operations.
pub type ContainerResult<T> = Result<T, DecodeError>;

/// The block directory is inconsistent with the buffer it describes.
///
/// Every variant is fatal for the whole archive: no block of a malformed
/// container is handed to higher layers.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeError {
    /// Buffer is too small to contain the block count.
    HeaderTooSmall { actual: usize, required: usize },

    /// The declared block count would read past the end of the buffer.
    OffsetTableTruncated {
        declared: u16,
        required: usize,
        actual: usize,
    },

    /// A block starts beyond the end of the buffer.
    OffsetOutOfBounds { index: u16, offset: u32, len: usize },

    /// A block starts inside the directory itself.
    OffsetInsideDirectory {
        index: u16,
        offset: u32,
        directory_len: usize,
    },

    /// Two blocks share a start offset, so no size can be derived.
    DuplicateOffset { index: u16, other: u16, offset: u32 },

    /// Limits exceeded.
    LimitsExceeded {
        kind: LimitKind,
        limit: usize,
        actual: usize,
    },

    /// Low-level read error.
    Bitstream(bitstream::BitError),
}

/// Specific container limits that can be exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    BlockCount,
    ContainerBytes,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HeaderTooSmall { actual, required } => {
                write!(
                    f,
                    "container too small: {actual} bytes, need at least {required}"
                )
            }
            Self::OffsetTableTruncated {
                declared,
                required,
                actual,
            } => {
                write!(
                    f,
                    "offset table for {declared} blocks needs {required} bytes but container has {actual}"
                )
            }
            Self::OffsetOutOfBounds { index, offset, len } => {
                write!(
                    f,
                    "block {index} offset 0x{offset:X} is outside the {len}-byte container"
                )
            }
            Self::OffsetInsideDirectory {
                index,
                offset,
                directory_len,
            } => {
                write!(
                    f,
                    "block {index} offset 0x{offset:X} overlaps the {directory_len}-byte directory"
                )
            }
            Self::DuplicateOffset {
                index,
                other,
                offset,
            } => {
                write!(
                    f,
                    "blocks {other} and {index} share offset 0x{offset:X}"
                )
            }
            Self::LimitsExceeded {
                kind,
                limit,
                actual,
            } => {
                write!(f, "{kind} limit exceeded: {actual} > {limit}")
            }
            Self::Bitstream(err) => write!(f, "read error: {err}"),
        }
    }
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::BlockCount => "block count",
            Self::ContainerBytes => "container bytes",
        };
        write!(f, "{name}")
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Bitstream(e) => Some(e),
            _ => None,
        }
    }
}

impl From<bitstream::BitError> for DecodeError {
    fn from(err: bitstream::BitError) -> Self {
        Self::Bitstream(err)
    }
}

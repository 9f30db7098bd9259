//! Error types for archive loading.

use std::fmt;
use std::path::PathBuf;

/// Result type for archive loading.
pub type LoadResult<T> = Result<T, LoadError>;

/// Errors that stop an archive from loading at all.
///
/// Per-level problems are not errors: a missing level block is reported as a
/// [`crate::MissingLevelBlock`] and the level loads empty.
#[derive(Debug)]
pub enum LoadError {
    /// The archive file could not be read.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The archive's block directory is malformed.
    MalformedContainer(container::DecodeError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "load failed: cannot read {}: {source}", path.display())
            }
            Self::MalformedContainer(e) => write!(f, "load failed: malformed container: {e}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::MalformedContainer(e) => Some(e),
        }
    }
}

impl From<container::DecodeError> for LoadError {
    fn from(err: container::DecodeError) -> Self {
        Self::MalformedContainer(err)
    }
}

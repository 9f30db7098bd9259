//! Configurable limits for bounded decoding.

/// Limits enforced while reading the block directory.
///
/// These keep a hostile or corrupt header from driving unbounded iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum number of directory entries.
    pub max_blocks: usize,

    /// Maximum container size in bytes.
    pub max_container_bytes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            // Real archives carry a few hundred entries
            max_blocks: 4096,
            max_container_bytes: 64 * 1024 * 1024,
        }
    }
}

impl Limits {
    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_blocks: 64,
            max_container_bytes: 1024 * 1024,
        }
    }

    /// Creates limits with no restrictions (use with caution).
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_blocks: usize::MAX,
            max_container_bytes: usize::MAX,
        }
    }
}

//! Block directory parsing for ark game-state containers.
//!
//! An ark container is a single buffer that starts with a block directory: a
//! little-endian `u16` block count followed by one `u32` offset per block. An
//! offset of zero marks an absent block. This crate turns that directory into
//! borrowed, bounds-checked [`Block`] slices. It does not know what a block
//! contains.
//!
//! # Design Principles
//!
//! - **Borrow, don't copy** - Blocks are slices of the caller's buffer.
//! - **Bounded decoding** - Counts and sizes are validated against [`Limits`] before iteration.
//! - **No domain knowledge** - Levels, tiles and objects live in higher layers.

mod directory;
mod error;
mod limits;

pub use directory::{decode_container, Block, Container, DIRECTORY_COUNT_SIZE, DIRECTORY_ENTRY_SIZE};
pub use error::{ContainerResult, DecodeError, LimitKind};
pub use limits::Limits;

//! Level block decoding for arkdiff.
//!
//! Turns the raw bytes of one level into a [`LevelState`] in three passes:
//!
//! 1. [`decode_level`] slices the tile map and the 1024-slot object table
//!    out of the block with fixed bit field masks
//! 2. [`resolve_positions`] walks each tile's object chain to learn where
//!    every reachable slot stands
//! 3. enrichment attaches catalog names, quantities, door and stairs details
//!
//! [`load_archive`] drives all three for every level of an archive container.
//!
//! # Design Principles
//!
//! - **Total decoding** - Any byte string decodes; short blocks read as zeros.
//! - **Bounded walks** - Chain walks visit each slot at most once per walk.
//! - **No globals** - Rules, catalog and layout travel in a [`DecodeContext`].
//! - **Deterministic** - Same bytes and context produce the same state.

mod decode;
mod enrich;
mod error;
#[cfg(any(test, feature = "fixture"))]
pub mod fixture;
pub mod layout;
mod load;
mod owner;
mod record;
mod resolve;
mod state;
mod tile;
mod types;

pub use decode::{decode_level, DecodedLevel};
pub use enrich::{DoorCondition, DoorInfo, DoorKind, DoorState, LevelObject, StairsInfo};
pub use error::{LoadError, LoadResult};
pub use layout::ArchiveLayout;
pub use load::{
    decode_level_state, load_archive, load_archive_file, load_level, load_levels,
    load_levels_parallel, DecodeContext, LoadedArchive, MissingLevelBlock,
};
pub use owner::OwnerField;
pub use record::{Attitude, MobileExtension, ObjectRecord};
pub use resolve::{chain_slots, resolve_positions, ResolvedPositions};
pub use state::{LevelSource, LevelState, Placement};
pub use tile::{Tile, TileGrid, TileKind};
pub use types::{Position, SlotIndex, TilePos};

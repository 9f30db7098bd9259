//! Byte offsets and bit fields of a level block.
//!
//! A level block is a fixed-layout image:
//!
//! ```text
//! 0x0000  tile map       64 x 64 x 4 bytes
//! 0x4000  mobile slots   256 x 27 bytes (8-byte base + 19-byte extension)
//! 0x5B00  static slots   768 x 8 bytes
//! 0x7300  end of the object area
//! ```
//!
//! All fields are little-endian 16-bit words (or single bytes) sliced with
//! [`BitField`] masks.

use bitstream::BitField;

/// Tiles per grid edge.
pub const GRID_SIZE: usize = 64;
/// Tiles in a level.
pub const TILE_COUNT: usize = GRID_SIZE * GRID_SIZE;
/// Bytes per tile entry.
pub const TILE_ENTRY_SIZE: usize = 4;
/// Start of the tile map.
pub const TILE_REGION_OFFSET: usize = 0x0000;

/// Slots in the object table.
pub const SLOT_COUNT: usize = 1024;
/// Slots 0..256 carry a mobile extension.
pub const MOBILE_SLOT_COUNT: usize = 256;
/// Start of the mobile slot region.
pub const MOBILE_REGION_OFFSET: usize = 0x4000;
/// Bytes per mobile slot.
pub const MOBILE_RECORD_SIZE: usize = 27;
/// Start of the static slot region.
pub const STATIC_REGION_OFFSET: usize = 0x5B00;
/// Bytes per static slot.
pub const STATIC_RECORD_SIZE: usize = 8;
/// Shared base record size.
pub const BASE_RECORD_SIZE: usize = 8;
/// Length of the decoded part of a level block.
pub const LEVEL_OBJECT_AREA_LEN: usize = 0x7300;

const _: () = assert!(TILE_REGION_OFFSET + TILE_COUNT * TILE_ENTRY_SIZE == MOBILE_REGION_OFFSET);
const _: () = assert!(
    MOBILE_REGION_OFFSET + MOBILE_SLOT_COUNT * MOBILE_RECORD_SIZE == STATIC_REGION_OFFSET
);
const _: () = assert!(
    STATIC_REGION_OFFSET + (SLOT_COUNT - MOBILE_SLOT_COUNT) * STATIC_RECORD_SIZE
        == LEVEL_OBJECT_AREA_LEN
);

/// Byte offset of the tile entry at grid index `index`.
#[must_use]
pub const fn tile_offset(index: usize) -> usize {
    TILE_REGION_OFFSET + index * TILE_ENTRY_SIZE
}

/// Byte offset of slot `slot`'s base record.
#[must_use]
pub const fn record_offset(slot: usize) -> usize {
    if slot < MOBILE_SLOT_COUNT {
        MOBILE_REGION_OFFSET + slot * MOBILE_RECORD_SIZE
    } else {
        STATIC_REGION_OFFSET + (slot - MOBILE_SLOT_COUNT) * STATIC_RECORD_SIZE
    }
}

/// Tile word fields.
pub mod tile {
    use super::BitField;

    pub const KIND: BitField = BitField::new(0, 4);
    pub const FLOOR_HEIGHT: BitField = BitField::new(4, 4);
    pub const FLOOR_TEXTURE: BitField = BitField::new(10, 4);
    pub const NO_MAGIC: BitField = BitField::flag(14);
    pub const DOOR: BitField = BitField::flag(15);

    pub const WALL_TEXTURE: BitField = BitField::new(0, 6);
    pub const FIRST_OBJECT: BitField = BitField::new(6, 10);
}

/// Base object record fields, one group per word.
pub mod object {
    use super::BitField;

    // word 0
    pub const TYPE_ID: BitField = BitField::new(0, 9);
    pub const ENCHANTED: BitField = BitField::flag(12);
    pub const INVISIBLE: BitField = BitField::flag(14);
    pub const QUANTITY_PRESENT: BitField = BitField::flag(15);

    // word 1
    pub const Z: BitField = BitField::new(0, 7);
    pub const HEADING: BitField = BitField::new(7, 3);
    pub const SUB_Y: BitField = BitField::new(10, 3);
    pub const SUB_X: BitField = BitField::new(13, 3);

    // word 2
    pub const QUALITY: BitField = BitField::new(0, 6);
    pub const NEXT: BitField = BitField::new(6, 10);

    // word 3
    pub const OWNER: BitField = BitField::new(0, 6);
    pub const QUANTITY_OR_LINK: BitField = BitField::new(6, 10);
}

/// Mobile extension fields, offsets relative to the end of the base record.
pub mod mobile {
    use super::BitField;

    pub const HP_OFFSET: usize = 0;

    pub const GOAL_WORD_OFFSET: usize = 3;
    pub const GOAL: BitField = BitField::new(0, 4);
    pub const GOAL_TARGET: BitField = BitField::new(4, 8);

    pub const LEVEL_WORD_OFFSET: usize = 5;
    pub const NPC_LEVEL: BitField = BitField::new(0, 4);
    pub const TALKED_TO: BitField = BitField::flag(13);
    pub const ATTITUDE: BitField = BitField::new(14, 2);

    pub const HOME_WORD_OFFSET: usize = 14;
    pub const HOME_Y: BitField = BitField::new(4, 6);
    pub const HOME_X: BitField = BitField::new(10, 6);

    pub const HUNGER_OFFSET: usize = 17;
    pub const HUNGER: BitField = BitField::new(0, 7);

    pub const DIALOGUE_OFFSET: usize = 18;
}

/// Where each level lives inside an archive container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveLayout {
    /// Number of levels stored in the archive.
    pub level_count: u8,
    /// Block index holding level 1; level `n` lives in `first_level_block + n - 1`.
    pub first_level_block: u16,
}

impl Default for ArchiveLayout {
    fn default() -> Self {
        Self {
            level_count: 9,
            first_level_block: 0,
        }
    }
}

impl ArchiveLayout {
    /// Returns the one-indexed level numbers in this archive.
    #[must_use]
    pub fn levels(&self) -> impl Iterator<Item = u8> {
        1..=self.level_count
    }

    /// Returns the block index of `level`, or `None` if the archive does not
    /// have that level.
    #[must_use]
    pub fn block_index(&self, level: u8) -> Option<u16> {
        if level == 0 || level > self.level_count {
            return None;
        }
        self.first_level_block.checked_add(u16::from(level) - 1)
    }
}

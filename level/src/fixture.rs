//! Builders for synthetic level blocks and archives.
//!
//! Only built for tests and behind the `fixture` feature. Writes go through
//! the same [`crate::layout`] field masks the decoder reads with, and panic on
//! slots or coordinates outside the layout.

use bitstream::BitField;

use crate::layout::{
    mobile, object, record_offset, tile, tile_offset, BASE_RECORD_SIZE, GRID_SIZE,
    LEVEL_OBJECT_AREA_LEN, MOBILE_SLOT_COUNT, SLOT_COUNT,
};

fn insert(word: u16, field: BitField, value: u16) -> u16 {
    (word & !field.mask()) | ((value << field.shift()) & field.mask())
}

/// Base record fields in their on-disk widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawObject {
    pub type_id: u16,
    pub enchanted: bool,
    pub invisible: bool,
    pub quantity_present: bool,
    pub z: u8,
    pub heading: u8,
    pub sub_x: u8,
    pub sub_y: u8,
    pub quality: u8,
    pub next: u16,
    pub owner: u8,
    pub quantity_or_link: u16,
}

impl RawObject {
    #[must_use]
    pub fn new(type_id: u16) -> Self {
        Self {
            type_id,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }

    #[must_use]
    pub const fn owner(mut self, owner: u8) -> Self {
        self.owner = owner;
        self
    }

    #[must_use]
    pub const fn z(mut self, z: u8) -> Self {
        self.z = z;
        self
    }

    #[must_use]
    pub const fn next(mut self, next: u16) -> Self {
        self.next = next;
        self
    }

    /// Sets the quantity flag and value.
    #[must_use]
    pub const fn quantity(mut self, value: u16) -> Self {
        self.quantity_present = true;
        self.quantity_or_link = value;
        self
    }

    /// Clears the quantity flag and stores a link.
    #[must_use]
    pub const fn link(mut self, slot: u16) -> Self {
        self.quantity_present = false;
        self.quantity_or_link = slot;
        self
    }

    #[must_use]
    pub const fn enchanted(mut self) -> Self {
        self.enchanted = true;
        self
    }

    #[must_use]
    pub const fn invisible(mut self) -> Self {
        self.invisible = true;
        self
    }

    /// Encodes the four base words.
    #[must_use]
    pub fn words(&self) -> [u16; 4] {
        let mut word0 = insert(0, object::TYPE_ID, self.type_id);
        word0 = insert(word0, object::ENCHANTED, u16::from(self.enchanted));
        word0 = insert(word0, object::INVISIBLE, u16::from(self.invisible));
        word0 = insert(word0, object::QUANTITY_PRESENT, u16::from(self.quantity_present));

        let mut word1 = insert(0, object::Z, u16::from(self.z));
        word1 = insert(word1, object::HEADING, u16::from(self.heading));
        word1 = insert(word1, object::SUB_Y, u16::from(self.sub_y));
        word1 = insert(word1, object::SUB_X, u16::from(self.sub_x));

        let word2 = insert(
            insert(0, object::QUALITY, u16::from(self.quality)),
            object::NEXT,
            self.next,
        );
        let word3 = insert(
            insert(0, object::OWNER, u16::from(self.owner)),
            object::QUANTITY_OR_LINK,
            self.quantity_or_link,
        );
        [word0, word1, word2, word3]
    }
}

/// Mobile extension fields in their on-disk widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawMobile {
    pub hp: u8,
    pub goal: u8,
    pub goal_target: u8,
    pub npc_level: u8,
    pub talked_to: bool,
    pub attitude: u8,
    pub home_x: u8,
    pub home_y: u8,
    pub hunger: u8,
    pub dialogue_slot: u8,
}

impl RawMobile {
    fn write(&self, ext: &mut [u8]) {
        let goal = insert(
            insert(0, mobile::GOAL, u16::from(self.goal)),
            mobile::GOAL_TARGET,
            u16::from(self.goal_target),
        );
        let mut level = insert(0, mobile::NPC_LEVEL, u16::from(self.npc_level));
        level = insert(level, mobile::TALKED_TO, u16::from(self.talked_to));
        level = insert(level, mobile::ATTITUDE, u16::from(self.attitude));
        let home = insert(
            insert(0, mobile::HOME_Y, u16::from(self.home_y)),
            mobile::HOME_X,
            u16::from(self.home_x),
        );

        ext[mobile::HP_OFFSET] = self.hp;
        ext[mobile::GOAL_WORD_OFFSET..][..2].copy_from_slice(&goal.to_le_bytes());
        ext[mobile::LEVEL_WORD_OFFSET..][..2].copy_from_slice(&level.to_le_bytes());
        ext[mobile::HOME_WORD_OFFSET..][..2].copy_from_slice(&home.to_le_bytes());
        ext[mobile::HUNGER_OFFSET] = self.hunger & mobile::HUNGER.mask() as u8;
        ext[mobile::DIALOGUE_OFFSET] = self.dialogue_slot;
    }
}

/// A mutable level block image. Panics on out-of-range slots or tiles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelImage {
    bytes: Vec<u8>,
}

impl Default for LevelImage {
    fn default() -> Self {
        Self::new()
    }
}

impl LevelImage {
    /// An all-zero block: solid tiles, empty slots.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bytes: vec![0; LEVEL_OBJECT_AREA_LEN],
        }
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    fn word(&self, offset: usize) -> u16 {
        u16::from_le_bytes([self.bytes[offset], self.bytes[offset + 1]])
    }

    fn set_word(&mut self, offset: usize, value: u16) {
        self.bytes[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
    }

    fn tile_offset(x: u8, y: u8) -> usize {
        assert!((x as usize) < GRID_SIZE && (y as usize) < GRID_SIZE, "tile out of grid");
        tile_offset(y as usize * GRID_SIZE + x as usize)
    }

    fn slot_offset(slot: u16) -> usize {
        assert!((slot as usize) < SLOT_COUNT, "slot out of table");
        record_offset(slot as usize)
    }

    /// Writes a tile's shape, keeping its chain head.
    pub fn set_tile_kind(&mut self, x: u8, y: u8, kind: u8, floor_height: u8) {
        let offset = Self::tile_offset(x, y);
        let mut word0 = self.word(offset);
        word0 = insert(word0, tile::KIND, u16::from(kind));
        word0 = insert(word0, tile::FLOOR_HEIGHT, u16::from(floor_height));
        self.set_word(offset, word0);
    }

    /// Points a tile's chain head at `slot`.
    pub fn set_tile_head(&mut self, x: u8, y: u8, slot: u16) {
        let offset = Self::tile_offset(x, y) + 2;
        let word1 = insert(self.word(offset), tile::FIRST_OBJECT, slot);
        self.set_word(offset, word1);
    }

    /// Writes a base record.
    pub fn set_object(&mut self, slot: u16, raw: RawObject) {
        let offset = Self::slot_offset(slot);
        for (index, word) in raw.words().into_iter().enumerate() {
            self.set_word(offset + index * 2, word);
        }
    }

    /// Writes a mobile base record and its extension.
    pub fn set_mobile(&mut self, slot: u16, raw: RawObject, extension: RawMobile) {
        assert!((slot as usize) < MOBILE_SLOT_COUNT, "not a mobile slot");
        self.set_object(slot, raw);
        let start = Self::slot_offset(slot) + BASE_RECORD_SIZE;
        extension.write(&mut self.bytes[start..]);
    }

    /// Rewrites a record's `next` pointer, keeping its other fields.
    pub fn set_next(&mut self, slot: u16, next: u16) {
        let offset = Self::slot_offset(slot) + 4;
        let word2 = insert(self.word(offset), object::NEXT, next);
        self.set_word(offset, word2);
    }

    /// Clears a slot, as the game does when an object is destroyed.
    pub fn clear_object(&mut self, slot: u16) {
        let offset = Self::slot_offset(slot);
        self.bytes[offset..offset + BASE_RECORD_SIZE].fill(0);
    }

    /// Threads `slots` into the chain of tile (x, y), in order.
    pub fn place(&mut self, x: u8, y: u8, slots: &[u16]) {
        let Some((&head, rest)) = slots.split_first() else {
            self.set_tile_head(x, y, 0);
            return;
        };
        self.set_tile_head(x, y, head);
        let mut previous = head;
        for &slot in rest {
            self.set_next(previous, slot);
            previous = slot;
        }
        self.set_next(previous, 0);
    }
}

/// Builds a container: a block directory followed by block bodies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveImage {
    blocks: Vec<Option<Vec<u8>>>,
}

impl ArchiveImage {
    /// An archive declaring `block_count` blocks, all absent.
    #[must_use]
    pub fn new(block_count: u16) -> Self {
        Self {
            blocks: vec![None; usize::from(block_count)],
        }
    }

    /// Fills block `index`. Panics if the index is not declared.
    #[must_use]
    pub fn with_block(mut self, index: u16, bytes: Vec<u8>) -> Self {
        self.blocks[usize::from(index)] = Some(bytes);
        self
    }

    /// Serializes the archive. Absent blocks get offset 0; present blocks are
    /// laid out in index order right after the directory.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        let directory_len = container::DIRECTORY_COUNT_SIZE
            + self.blocks.len() * container::DIRECTORY_ENTRY_SIZE;
        let mut out = Vec::with_capacity(directory_len);
        out.extend_from_slice(&(self.blocks.len() as u16).to_le_bytes());

        let mut next_offset = directory_len;
        let mut bodies = Vec::new();
        for block in &self.blocks {
            match block {
                Some(bytes) => {
                    out.extend_from_slice(&(next_offset as u32).to_le_bytes());
                    next_offset += bytes.len();
                    bodies.extend_from_slice(bytes);
                }
                None => out.extend_from_slice(&0u32.to_le_bytes()),
            }
        }
        out.extend_from_slice(&bodies);
        out
    }
}

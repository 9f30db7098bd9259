//! Raw object records as stored in the slot table.

use crate::layout::{mobile, object};
use crate::types::TilePos;

/// Disposition of a mobile toward the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(rename_all = "snake_case"))]
pub enum Attitude {
    #[default]
    Hostile,
    Upset,
    Mellow,
    Friendly,
}

impl Attitude {
    /// Maps the 2-bit attitude field.
    #[must_use]
    pub const fn from_raw(raw: u8) -> Self {
        match raw & 0b11 {
            0 => Self::Hostile,
            1 => Self::Upset,
            2 => Self::Mellow,
            _ => Self::Friendly,
        }
    }

    #[must_use]
    pub const fn raw(self) -> u8 {
        match self {
            Self::Hostile => 0,
            Self::Upset => 1,
            Self::Mellow => 2,
            Self::Friendly => 3,
        }
    }
}

/// Extra state carried by slots 0-255.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MobileExtension {
    pub hp: u8,
    pub goal: u8,
    pub goal_target: u8,
    pub npc_level: u8,
    pub talked_to: bool,
    pub attitude: Attitude,
    /// Tile the mobile returns to when idle.
    pub home: TilePos,
    pub hunger: u8,
    pub dialogue_slot: u8,
}

impl MobileExtension {
    /// Decodes the 19-byte extension that follows a mobile's base record.
    ///
    /// Bytes past the end of `bytes` read as zero.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let byte = |offset: usize| bytes.get(offset).copied().unwrap_or(0);
        let word = |offset: usize| u16::from_le_bytes([byte(offset), byte(offset + 1)]);

        let goal_word = word(mobile::GOAL_WORD_OFFSET);
        let level_word = word(mobile::LEVEL_WORD_OFFSET);
        let home_word = word(mobile::HOME_WORD_OFFSET);

        Self {
            hp: byte(mobile::HP_OFFSET),
            goal: mobile::GOAL.extract(goal_word) as u8,
            goal_target: mobile::GOAL_TARGET.extract(goal_word) as u8,
            npc_level: mobile::NPC_LEVEL.extract(level_word) as u8,
            talked_to: mobile::TALKED_TO.is_set(level_word),
            attitude: Attitude::from_raw(mobile::ATTITUDE.extract(level_word) as u8),
            home: TilePos::new(
                mobile::HOME_X.extract(home_word) as u8,
                mobile::HOME_Y.extract(home_word) as u8,
            ),
            hunger: mobile::HUNGER.extract_u8(byte(mobile::HUNGER_OFFSET)),
            dialogue_slot: byte(mobile::DIALOGUE_OFFSET),
        }
    }
}

/// One occupied slot of the object table, decoded field by field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ObjectRecord {
    pub type_id: u16,
    pub enchanted_flag: bool,
    pub invisible: bool,
    pub quantity_present: bool,
    pub z: u8,
    pub heading: u8,
    pub sub_x: u8,
    pub sub_y: u8,
    pub quality: u8,
    /// Next slot in the same tile chain.
    pub next: u16,
    /// Overloaded 6-bit field; read it through [`crate::OwnerField`].
    #[cfg_attr(feature = "serde", serde(skip))]
    pub(crate) owner: u8,
    pub quantity_or_link: u16,
    pub mobile: Option<MobileExtension>,
}

impl ObjectRecord {
    /// Decodes the four base words. Returns `None` for an empty slot.
    #[must_use]
    pub fn from_words(words: [u16; 4]) -> Option<Self> {
        if words == [0; 4] {
            return None;
        }
        let [word0, word1, word2, word3] = words;
        Some(Self {
            type_id: object::TYPE_ID.extract(word0),
            enchanted_flag: object::ENCHANTED.is_set(word0),
            invisible: object::INVISIBLE.is_set(word0),
            quantity_present: object::QUANTITY_PRESENT.is_set(word0),
            z: object::Z.extract(word1) as u8,
            heading: object::HEADING.extract(word1) as u8,
            sub_y: object::SUB_Y.extract(word1) as u8,
            sub_x: object::SUB_X.extract(word1) as u8,
            quality: object::QUALITY.extract(word2) as u8,
            next: object::NEXT.extract(word2),
            owner: object::OWNER.extract(word3) as u8,
            quantity_or_link: object::QUANTITY_OR_LINK.extract(word3),
            mobile: None,
        })
    }

    #[must_use]
    pub const fn is_mobile(&self) -> bool {
        self.mobile.is_some()
    }
}

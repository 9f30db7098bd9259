//! Level block decoding.

use bitstream::ByteReader;
use tracing::warn;

use crate::layout::{
    record_offset, tile_offset, BASE_RECORD_SIZE, LEVEL_OBJECT_AREA_LEN, MOBILE_RECORD_SIZE,
    SLOT_COUNT, TILE_COUNT,
};
use crate::record::{MobileExtension, ObjectRecord};
use crate::tile::{Tile, TileGrid};
use crate::types::SlotIndex;

/// A level block decoded into its tile map and slot table.
///
/// Nothing is resolved yet: slots keep their raw `next` pointers and no
/// slot knows which tile it stands on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedLevel {
    tiles: TileGrid,
    slots: Vec<Option<ObjectRecord>>,
}

impl DecodedLevel {
    #[must_use]
    pub const fn tiles(&self) -> &TileGrid {
        &self.tiles
    }

    /// Returns the record in `slot`, or `None` for empty or out-of-table slots.
    #[must_use]
    pub fn slot(&self, slot: SlotIndex) -> Option<&ObjectRecord> {
        self.slots.get(slot.as_usize()).and_then(Option::as_ref)
    }

    /// Iterates occupied slots in index order.
    pub fn occupied(&self) -> impl Iterator<Item = (SlotIndex, &ObjectRecord)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.as_ref()
                .map(|record| (SlotIndex::new(index as u16), record))
        })
    }

    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }
}

/// Decodes a level block.
///
/// Decoding is total: bytes beyond the end of a short block read as zero, so
/// the missing tail decodes as solid tiles and empty slots. Extra bytes after
/// the object area are ignored.
#[must_use]
pub fn decode_level(bytes: &[u8]) -> DecodedLevel {
    if bytes.len() < LEVEL_OBJECT_AREA_LEN {
        warn!(
            len = bytes.len(),
            expected = LEVEL_OBJECT_AREA_LEN,
            "short level block, missing bytes read as zero"
        );
    }
    let reader = ByteReader::new(bytes);
    let word = |offset: usize| reader.u16_at(offset).unwrap_or(0);

    let tiles = (0..TILE_COUNT)
        .map(|index| {
            let offset = tile_offset(index);
            Tile::from_words(word(offset), word(offset + 2))
        })
        .collect();

    let slots = (0..SLOT_COUNT)
        .map(|slot| {
            let offset = record_offset(slot);
            let words = [
                word(offset),
                word(offset + 2),
                word(offset + 4),
                word(offset + 6),
            ];
            let mut record = ObjectRecord::from_words(words)?;
            if SlotIndex::new(slot as u16).is_mobile() {
                let start = offset + BASE_RECORD_SIZE;
                let len = MOBILE_RECORD_SIZE - BASE_RECORD_SIZE;
                let extension = bytes.get(start..).map_or(&[][..], |tail| {
                    &tail[..len.min(tail.len())]
                });
                record.mobile = Some(MobileExtension::from_bytes(extension));
            }
            Some(record)
        })
        .collect();

    DecodedLevel {
        tiles: TileGrid::from_tiles(tiles),
        slots,
    }
}

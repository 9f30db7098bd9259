//! Tile chain resolution.
//!
//! Objects do not store their tile. Each tile holds the head of a singly
//! linked chain threaded through the slot table's `next` pointers; walking
//! every chain recovers which tile each reachable slot stands on.

use tracing::debug;

use crate::decode::DecodedLevel;
use crate::layout::SLOT_COUNT;
use crate::types::{SlotIndex, TilePos};

/// Tile assignment for every slot reached by a chain walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPositions {
    tiles: Vec<Option<TilePos>>,
    cycles: usize,
}

impl ResolvedPositions {
    /// Returns the tile whose chain first reached `slot`.
    #[must_use]
    pub fn tile_of(&self, slot: SlotIndex) -> Option<TilePos> {
        self.tiles.get(slot.as_usize()).copied().flatten()
    }

    /// Number of slots reached by any chain.
    #[must_use]
    pub fn reached_count(&self) -> usize {
        self.tiles.iter().filter(|tile| tile.is_some()).count()
    }

    /// Number of chains that ended by revisiting a slot.
    #[must_use]
    pub const fn cycles_detected(&self) -> usize {
        self.cycles
    }
}

/// Reusable visited set; a slot is visited in the current walk when its stamp
/// equals the walk's generation.
struct Walker<'a> {
    level: &'a DecodedLevel,
    stamps: Vec<u32>,
    generation: u32,
}

/// How a single chain walk ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WalkEnd {
    Terminated,
    Cycle(SlotIndex),
}

impl<'a> Walker<'a> {
    fn new(level: &'a DecodedLevel) -> Self {
        Self {
            level,
            stamps: vec![0; SLOT_COUNT],
            generation: 0,
        }
    }

    /// Visits every occupied slot in the chain starting at `head`.
    ///
    /// Stops at the sentinel, an empty or out-of-table slot, or the first slot
    /// already seen in this walk. At most [`SLOT_COUNT`] slots are visited.
    fn walk(&mut self, head: SlotIndex, mut visit: impl FnMut(SlotIndex)) -> WalkEnd {
        self.generation += 1;
        let mut current = head;
        while !current.is_none() {
            let Some(stamp) = self.stamps.get_mut(current.as_usize()) else {
                return WalkEnd::Terminated;
            };
            if *stamp == self.generation {
                return WalkEnd::Cycle(current);
            }
            *stamp = self.generation;
            let Some(record) = self.level.slot(current) else {
                return WalkEnd::Terminated;
            };
            visit(current);
            current = SlotIndex::new(record.next);
        }
        WalkEnd::Terminated
    }
}

/// Assigns a tile to every slot reachable from a tile chain.
///
/// Tile (0, 0) is skipped. When two chains reach the same slot the first walk
/// in row-major tile order wins.
#[must_use]
pub fn resolve_positions(level: &DecodedLevel) -> ResolvedPositions {
    let mut tiles = vec![None; SLOT_COUNT];
    let mut cycles = 0;
    let mut walker = Walker::new(level);

    for (pos, tile) in level.tiles().iter() {
        if pos.is_origin() || tile.first_object.is_none() {
            continue;
        }
        let end = walker.walk(tile.first_object, |slot| {
            if let Some(entry) = tiles.get_mut(slot.as_usize()) {
                entry.get_or_insert(pos);
            }
        });
        if let WalkEnd::Cycle(slot) = end {
            cycles += 1;
            debug!(x = pos.x, y = pos.y, slot = slot.raw(), "object chain cycle");
        }
    }

    ResolvedPositions { tiles, cycles }
}

/// Returns the slots of the chain starting at `head`, in chain order.
#[must_use]
pub fn chain_slots(level: &DecodedLevel, head: SlotIndex) -> Vec<SlotIndex> {
    let mut slots = Vec::new();
    Walker::new(level).walk(head, |slot| slots.push(slot));
    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode_level;
    use crate::fixture::{LevelImage, RawObject};

    #[test]
    fn chain_members_share_tile() {
        let mut image = LevelImage::new();
        for slot in [300, 301, 302] {
            image.set_object(slot, RawObject::new(0x0A0));
        }
        image.place(5, 6, &[300, 301, 302]);
        let level = decode_level(image.bytes());
        let resolved = resolve_positions(&level);
        for slot in [300, 301, 302] {
            assert_eq!(resolved.tile_of(SlotIndex::new(slot)), Some(TilePos::new(5, 6)));
        }
        assert_eq!(resolved.reached_count(), 3);
        assert_eq!(resolved.cycles_detected(), 0);
    }

    #[test]
    fn cycle_terminates_with_partial_assignment() {
        let mut image = LevelImage::new();
        image.set_object(400, RawObject::new(0x0A0).next(401));
        image.set_object(401, RawObject::new(0x0A0).next(400));
        image.set_tile_head(2, 2, 400);
        let level = decode_level(image.bytes());
        let resolved = resolve_positions(&level);
        assert_eq!(resolved.tile_of(SlotIndex::new(400)), Some(TilePos::new(2, 2)));
        assert_eq!(resolved.tile_of(SlotIndex::new(401)), Some(TilePos::new(2, 2)));
        assert_eq!(resolved.cycles_detected(), 1);
    }

    #[test]
    fn self_loop_terminates() {
        let mut image = LevelImage::new();
        image.set_object(500, RawObject::new(0x0A0).next(500));
        image.set_tile_head(1, 1, 500);
        let level = decode_level(image.bytes());
        assert_eq!(chain_slots(&level, SlotIndex::new(500)), vec![SlotIndex::new(500)]);
        assert_eq!(resolve_positions(&level).cycles_detected(), 1);
    }

    #[test]
    fn origin_tile_is_skipped() {
        let mut image = LevelImage::new();
        image.set_object(300, RawObject::new(0x0A0));
        image.place(0, 0, &[300]);
        let level = decode_level(image.bytes());
        assert_eq!(resolve_positions(&level).tile_of(SlotIndex::new(300)), None);
    }

    #[test]
    fn first_walk_wins() {
        let mut image = LevelImage::new();
        image.set_object(300, RawObject::new(0x0A0).next(302));
        image.set_object(301, RawObject::new(0x0A0).next(302));
        image.set_object(302, RawObject::new(0x0A0));
        image.set_tile_head(10, 1, 300);
        image.set_tile_head(3, 2, 301);
        let level = decode_level(image.bytes());
        let resolved = resolve_positions(&level);
        assert_eq!(resolved.tile_of(SlotIndex::new(302)), Some(TilePos::new(10, 1)));
        assert_eq!(resolved.tile_of(SlotIndex::new(301)), Some(TilePos::new(3, 2)));
    }

    #[test]
    fn chain_stops_at_empty_slot() {
        let mut image = LevelImage::new();
        image.set_object(300, RawObject::new(0x0A0).next(700));
        let level = decode_level(image.bytes());
        assert_eq!(chain_slots(&level, SlotIndex::new(300)), vec![SlotIndex::new(300)]);
    }

    #[test]
    fn unreached_slot_has_no_tile() {
        let mut image = LevelImage::new();
        image.set_object(600, RawObject::new(0x0A0));
        let level = decode_level(image.bytes());
        assert_eq!(resolve_positions(&level).tile_of(SlotIndex::new(600)), None);
    }
}

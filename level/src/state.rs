//! The resolved, enriched state of one level.

use std::collections::BTreeMap;

use tracing::debug;

use crate::decode::DecodedLevel;
use crate::enrich::{Enricher, LevelObject};
use crate::load::DecodeContext;
use crate::resolve::resolve_positions;
use crate::tile::TileGrid;
use crate::types::{SlotIndex, TilePos};

/// How an object's tile was determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(rename_all = "snake_case"))]
pub enum Placement {
    /// Reached by a tile chain.
    Chain,
    /// A mobile on no chain, placed at its home tile.
    Home,
}

/// Where a [`LevelState`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(rename_all = "snake_case"))]
pub enum LevelSource {
    Decoded,
    /// The archive had no block for this level; the state is empty.
    MissingBlock,
}

/// Tile map plus every live object of one level, keyed by slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelState {
    level: u8,
    source: LevelSource,
    tiles: TileGrid,
    objects: BTreeMap<SlotIndex, LevelObject>,
}

impl LevelState {
    /// An empty level standing in for a missing block.
    #[must_use]
    pub fn empty(level: u8) -> Self {
        Self {
            level,
            source: LevelSource::MissingBlock,
            tiles: TileGrid::empty(),
            objects: BTreeMap::new(),
        }
    }

    /// Resolves and enriches a decoded level.
    ///
    /// Static slots no chain reaches are freed slots and are dropped. Mobiles
    /// are always kept; when no chain reaches them they stand on their home
    /// tile.
    #[must_use]
    pub fn build(decoded: &DecodedLevel, level: u8, ctx: &DecodeContext<'_>) -> Self {
        let resolved = resolve_positions(decoded);
        let enricher = Enricher {
            rules: ctx.rules,
            catalog: ctx.catalog,
            decoded,
            level,
        };

        let objects: BTreeMap<_, _> = decoded
            .occupied()
            .filter_map(|(slot, record)| {
                let (tile, placement) = match (resolved.tile_of(slot), record.mobile) {
                    (Some(tile), _) => (tile, Placement::Chain),
                    (None, Some(mobile)) => (mobile.home, Placement::Home),
                    (None, None) => return None,
                };
                Some((slot, enricher.enrich(slot, record, tile, placement)))
            })
            .collect();

        debug!(
            level,
            occupied = decoded.occupied_count(),
            live = objects.len(),
            cycles = resolved.cycles_detected(),
            "level decoded"
        );

        Self {
            level,
            source: LevelSource::Decoded,
            tiles: decoded.tiles().clone(),
            objects,
        }
    }

    /// One-indexed level number.
    #[must_use]
    pub const fn level(&self) -> u8 {
        self.level
    }

    #[must_use]
    pub const fn source(&self) -> LevelSource {
        self.source
    }

    #[must_use]
    pub const fn tiles(&self) -> &TileGrid {
        &self.tiles
    }

    #[must_use]
    pub fn object(&self, slot: SlotIndex) -> Option<&LevelObject> {
        self.objects.get(&slot)
    }

    /// Iterates live objects in slot order.
    pub fn objects(&self) -> impl Iterator<Item = &LevelObject> {
        self.objects.values()
    }

    /// Objects standing on `tile`, in slot order.
    pub fn objects_at(&self, tile: TilePos) -> impl Iterator<Item = &LevelObject> {
        self.objects.values().filter(move |object| object.tile() == tile)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode_level;
    use crate::fixture::{LevelImage, RawMobile, RawObject};
    use catalog::{ObjectCatalog, TypeRules};

    fn build(image: &LevelImage) -> LevelState {
        let catalog = ObjectCatalog::new();
        let rules = TypeRules::default();
        let ctx = DecodeContext::new(&catalog, &rules);
        LevelState::build(&decode_level(image.bytes()), 1, &ctx)
    }

    #[test]
    fn unreached_static_is_dropped() {
        let mut image = LevelImage::new();
        image.set_object(300, RawObject::new(0x0A0));
        image.set_object(301, RawObject::new(0x0A1));
        image.place(4, 4, &[300]);
        let state = build(&image);
        assert!(state.object(SlotIndex::new(300)).is_some());
        assert!(state.object(SlotIndex::new(301)).is_none());
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn unreached_mobile_stands_at_home() {
        let mut image = LevelImage::new();
        image.set_mobile(
            7,
            RawObject::new(0x044),
            RawMobile {
                home_x: 12,
                home_y: 30,
                ..RawMobile::default()
            },
        );
        let state = build(&image);
        let npc = state.object(SlotIndex::new(7)).unwrap();
        assert_eq!(npc.placement, Placement::Home);
        assert_eq!(npc.tile(), TilePos::new(12, 30));
    }

    #[test]
    fn reached_mobile_uses_chain_tile() {
        let mut image = LevelImage::new();
        image.set_mobile(
            7,
            RawObject::new(0x044),
            RawMobile {
                home_x: 12,
                home_y: 30,
                ..RawMobile::default()
            },
        );
        image.place(20, 21, &[7]);
        let state = build(&image);
        let npc = state.object(SlotIndex::new(7)).unwrap();
        assert_eq!(npc.placement, Placement::Chain);
        assert_eq!(npc.tile(), TilePos::new(20, 21));
    }

    #[test]
    fn objects_at_tile() {
        let mut image = LevelImage::new();
        image.set_object(300, RawObject::new(0x0A0));
        image.set_object(301, RawObject::new(0x0A1));
        image.set_object(302, RawObject::new(0x0A2));
        image.place(4, 4, &[301, 300]);
        image.place(5, 4, &[302]);
        let state = build(&image);
        let slots: Vec<_> = state
            .objects_at(TilePos::new(4, 4))
            .map(|object| object.slot.raw())
            .collect();
        assert_eq!(slots, vec![300, 301]);
    }

    #[test]
    fn empty_state() {
        let state = LevelState::empty(4);
        assert_eq!(state.level(), 4);
        assert_eq!(state.source(), LevelSource::MissingBlock);
        assert!(state.is_empty());
    }
}

//! The 64x64 tile map.

use crate::layout::{tile as field, GRID_SIZE, TILE_COUNT};
use crate::types::{SlotIndex, TilePos};

/// Shape of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(rename_all = "snake_case"))]
pub enum TileKind {
    Solid,
    Open,
    DiagonalSe,
    DiagonalSw,
    DiagonalNe,
    DiagonalNw,
    SlopeNorth,
    SlopeSouth,
    SlopeEast,
    SlopeWest,
    Unknown(u8),
}

impl TileKind {
    /// Maps the 4-bit tile type.
    #[must_use]
    pub const fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Self::Solid,
            1 => Self::Open,
            2 => Self::DiagonalSe,
            3 => Self::DiagonalSw,
            4 => Self::DiagonalNe,
            5 => Self::DiagonalNw,
            6 => Self::SlopeNorth,
            7 => Self::SlopeSouth,
            8 => Self::SlopeEast,
            9 => Self::SlopeWest,
            other => Self::Unknown(other),
        }
    }
}

/// One decoded tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Tile {
    pub tile_type: u8,
    pub floor_height: u8,
    pub floor_texture: u8,
    pub wall_texture: u8,
    pub no_magic: bool,
    pub door: bool,
    /// Head of the object chain standing on this tile.
    pub first_object: SlotIndex,
}

impl Tile {
    /// Decodes a tile from its two words.
    #[must_use]
    pub const fn from_words(word0: u16, word1: u16) -> Self {
        Self {
            tile_type: field::KIND.extract(word0) as u8,
            floor_height: field::FLOOR_HEIGHT.extract(word0) as u8,
            floor_texture: field::FLOOR_TEXTURE.extract(word0) as u8,
            no_magic: field::NO_MAGIC.is_set(word0),
            door: field::DOOR.is_set(word0),
            wall_texture: field::WALL_TEXTURE.extract(word1) as u8,
            first_object: SlotIndex::new(field::FIRST_OBJECT.extract(word1)),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> TileKind {
        TileKind::from_raw(self.tile_type)
    }
}

/// The full tile map, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGrid {
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// A grid of solid tiles with no objects.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            tiles: vec![Tile::default(); TILE_COUNT],
        }
    }

    pub(crate) fn from_tiles(tiles: Vec<Tile>) -> Self {
        debug_assert_eq!(tiles.len(), TILE_COUNT);
        Self { tiles }
    }

    /// Returns the tile at `pos`, or `None` outside the grid.
    #[must_use]
    pub fn get(&self, pos: TilePos) -> Option<&Tile> {
        pos.grid_index().and_then(|index| self.tiles.get(index))
    }

    /// Iterates every tile with its position, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (TilePos, &Tile)> {
        self.tiles.iter().enumerate().map(|(index, tile)| {
            let pos = TilePos::new((index % GRID_SIZE) as u8, (index / GRID_SIZE) as u8);
            (pos, tile)
        })
    }

    /// Number of tiles whose chain head is set.
    #[must_use]
    pub fn occupied_tile_count(&self) -> usize {
        self.tiles
            .iter()
            .filter(|tile| !tile.first_object.is_none())
            .count()
    }
}

//! Core types for level decoding.

use std::fmt;

use crate::layout::{GRID_SIZE, MOBILE_SLOT_COUNT, SLOT_COUNT};

/// Index into the 1024-slot object table.
///
/// The slot index is the identity of an object within a level. Index 0 doubles
/// as the end-of-chain sentinel and never holds a reachable object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
pub struct SlotIndex(u16);

impl SlotIndex {
    /// The chain terminator.
    pub const NONE: Self = Self(0);

    /// Creates a slot index.
    #[must_use]
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    /// Returns the raw slot number.
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Returns the slot number as a table index.
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// Returns `true` for the end-of-chain sentinel.
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` for slots 0-255, which carry a mobile extension.
    #[must_use]
    pub const fn is_mobile(self) -> bool {
        (self.0 as usize) < MOBILE_SLOT_COUNT
    }

    /// Returns `true` if the index addresses the table at all.
    #[must_use]
    pub const fn is_in_table(self) -> bool {
        (self.0 as usize) < SLOT_COUNT
    }
}

impl From<u16> for SlotIndex {
    fn from(raw: u16) -> Self {
        Self(raw)
    }
}

impl From<SlotIndex> for u16 {
    fn from(slot: SlotIndex) -> Self {
        slot.0
    }
}

impl fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Coordinates of one tile in the 64x64 grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TilePos {
    pub x: u8,
    pub y: u8,
}

impl TilePos {
    /// Creates a tile position.
    #[must_use]
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Row-major index into the tile grid, or `None` outside the grid.
    #[must_use]
    pub const fn grid_index(self) -> Option<usize> {
        if (self.x as usize) < GRID_SIZE && (self.y as usize) < GRID_SIZE {
            Some(self.y as usize * GRID_SIZE + self.x as usize)
        } else {
            None
        }
    }

    /// Chebyshev (king-move) distance to `other`.
    #[must_use]
    pub const fn chebyshev(self, other: Self) -> u8 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        if dx > dy {
            dx
        } else {
            dy
        }
    }

    /// The origin tile is a placeholder whose chain is never walked.
    #[must_use]
    pub const fn is_origin(self) -> bool {
        self.x == 0 && self.y == 0
    }
}

impl fmt::Display for TilePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Where an object sits: its tile plus the in-record fine placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Position {
    pub tile: TilePos,
    pub z: u8,
    pub sub_x: u8,
    pub sub_y: u8,
    pub heading: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_classification() {
        assert!(SlotIndex::NONE.is_none());
        assert!(SlotIndex::new(1).is_mobile());
        assert!(SlotIndex::new(255).is_mobile());
        assert!(!SlotIndex::new(256).is_mobile());
        assert!(SlotIndex::new(1023).is_in_table());
        assert!(!SlotIndex::new(1024).is_in_table());
    }

    #[test]
    fn slot_conversions() {
        let slot = SlotIndex::from(300u16);
        assert_eq!(u16::from(slot), 300);
        assert_eq!(slot.as_usize(), 300);
        assert_eq!(slot.to_string(), "#300");
    }

    #[test]
    fn chebyshev_distance() {
        let a = TilePos::new(10, 10);
        assert_eq!(a.chebyshev(a), 0);
        assert_eq!(a.chebyshev(TilePos::new(13, 15)), 5);
        assert_eq!(TilePos::new(15, 9).chebyshev(a), 5);
    }

    #[test]
    fn grid_index_bounds() {
        assert_eq!(TilePos::new(0, 0).grid_index(), Some(0));
        assert_eq!(TilePos::new(1, 2).grid_index(), Some(129));
        assert_eq!(TilePos::new(63, 63).grid_index(), Some(4095));
        assert_eq!(TilePos::new(64, 0).grid_index(), None);
    }
}

//! Change records produced by the comparator.

use std::fmt;

use catalog::TrackedProperty;
use level::{LevelObject, SlotIndex, TilePos};

/// Classification of one slot's change between two states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(rename_all = "snake_case"))]
pub enum ChangeKind {
    Unchanged,
    Moved,
    Modified,
    Added,
    Removed,
    /// The slot holds a different kind of object.
    Replaced,
}

impl ChangeKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unchanged => "unchanged",
            Self::Moved => "moved",
            Self::Modified => "modified",
            Self::Added => "added",
            Self::Removed => "removed",
            Self::Replaced => "replaced",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A compared property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PropertyName {
    Tracked(TrackedProperty),
    /// Two-state objects: door open/closed, switch on/off.
    State,
    /// Normalized type id; only reported for replaced slots.
    Type,
}

impl PropertyName {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Tracked(property) => property.name(),
            Self::State => "state",
            Self::Type => "type",
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for PropertyName {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl From<TrackedProperty> for PropertyName {
    fn from(property: TrackedProperty) -> Self {
        Self::Tracked(property)
    }
}

impl fmt::Display for PropertyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A normalized property value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(untagged))]
pub enum PropertyValue {
    Number(i64),
    Label(&'static str),
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Label(label) => f.write_str(label),
        }
    }
}

/// One property that differs between base and save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PropertyChange {
    pub property: PropertyName,
    pub before: PropertyValue,
    pub after: PropertyValue,
}

impl fmt::Display for PropertyChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} -> {}", self.property, self.before, self.after)
    }
}

/// Tile and height movement of an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PositionDelta {
    pub from: TilePos,
    pub to: TilePos,
    pub from_z: u8,
    pub to_z: u8,
}

impl PositionDelta {
    /// Returns the delta between two objects, or `None` if tile and z match.
    #[must_use]
    pub fn between(base: &LevelObject, save: &LevelObject) -> Option<Self> {
        let delta = Self {
            from: base.tile(),
            to: save.tile(),
            from_z: base.position.z,
            to_z: save.position.z,
        };
        (delta.from != delta.to || delta.from_z != delta.to_z).then_some(delta)
    }

    #[must_use]
    pub fn dx(&self) -> i16 {
        i16::from(self.to.x) - i16::from(self.from.x)
    }

    #[must_use]
    pub fn dy(&self) -> i16 {
        i16::from(self.to.y) - i16::from(self.from.y)
    }

    #[must_use]
    pub fn dz(&self) -> i16 {
        i16::from(self.to_z) - i16::from(self.from_z)
    }
}

impl fmt::Display for PositionDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} z{} -> {} z{}",
            self.from, self.from_z, self.to, self.to_z
        )
    }
}

/// The comparator's verdict for one slot.
///
/// `synthetic` records accompany a [`ChangeKind::Replaced`] record: the old
/// object as removed and the new one as added, for consumers that only
/// understand additions and removals.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ChangeRecord {
    kind: ChangeKind,
    slot: SlotIndex,
    base: Option<LevelObject>,
    save: Option<LevelObject>,
    changed_properties: Vec<PropertyChange>,
    position_delta: Option<PositionDelta>,
    synthetic: bool,
}

impl ChangeRecord {
    pub(crate) fn paired(
        kind: ChangeKind,
        base: &LevelObject,
        save: &LevelObject,
        changed_properties: Vec<PropertyChange>,
        position_delta: Option<PositionDelta>,
    ) -> Self {
        Self {
            kind,
            slot: save.slot,
            base: Some(base.clone()),
            save: Some(save.clone()),
            changed_properties,
            position_delta,
            synthetic: false,
        }
    }

    pub(crate) fn added(save: &LevelObject) -> Self {
        Self {
            kind: ChangeKind::Added,
            slot: save.slot,
            base: None,
            save: Some(save.clone()),
            changed_properties: Vec::new(),
            position_delta: None,
            synthetic: false,
        }
    }

    pub(crate) fn removed(base: &LevelObject) -> Self {
        Self {
            kind: ChangeKind::Removed,
            slot: base.slot,
            base: Some(base.clone()),
            save: None,
            changed_properties: Vec::new(),
            position_delta: None,
            synthetic: false,
        }
    }

    pub(crate) fn into_synthetic(mut self, type_change: PropertyChange) -> Self {
        self.synthetic = true;
        self.changed_properties = vec![type_change];
        self
    }

    #[must_use]
    pub const fn kind(&self) -> ChangeKind {
        self.kind
    }

    #[must_use]
    pub const fn slot(&self) -> SlotIndex {
        self.slot
    }

    #[must_use]
    pub const fn base(&self) -> Option<&LevelObject> {
        self.base.as_ref()
    }

    #[must_use]
    pub const fn save(&self) -> Option<&LevelObject> {
        self.save.as_ref()
    }

    #[must_use]
    pub fn changed_properties(&self) -> &[PropertyChange] {
        &self.changed_properties
    }

    /// Returns the change of `property`, if it changed.
    #[must_use]
    pub fn property(&self, property: PropertyName) -> Option<&PropertyChange> {
        self.changed_properties
            .iter()
            .find(|change| change.property == property)
    }

    #[must_use]
    pub const fn position_delta(&self) -> Option<&PositionDelta> {
        self.position_delta.as_ref()
    }

    #[must_use]
    pub const fn is_synthetic(&self) -> bool {
        self.synthetic
    }

    /// The object the record is about: the save side when present.
    #[must_use]
    pub fn object(&self) -> Option<&LevelObject> {
        self.save.as_ref().or(self.base.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_change_display() {
        let change = PropertyChange {
            property: PropertyName::State,
            before: PropertyValue::Label("Closed"),
            after: PropertyValue::Label("Open"),
        };
        assert_eq!(change.to_string(), "state: Closed -> Open");

        let change = PropertyChange {
            property: TrackedProperty::Quality.into(),
            before: PropertyValue::Number(40),
            after: PropertyValue::Number(12),
        };
        assert_eq!(change.to_string(), "quality: 40 -> 12");
    }

    #[test]
    fn kind_names() {
        assert_eq!(ChangeKind::Replaced.to_string(), "replaced");
        assert_eq!(ChangeKind::Unchanged.as_str(), "unchanged");
    }

    #[test]
    fn position_delta_components() {
        let delta = PositionDelta {
            from: TilePos::new(10, 4),
            to: TilePos::new(8, 9),
            from_z: 16,
            to_z: 0,
        };
        assert_eq!(delta.dx(), -2);
        assert_eq!(delta.dy(), 5);
        assert_eq!(delta.dz(), -16);
        assert_eq!(delta.to_string(), "(10, 4) z16 -> (8, 9) z0");
    }
}

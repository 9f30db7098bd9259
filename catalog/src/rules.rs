//! Type-id range tables.
//!
//! Every per-type special case used by the enricher and the comparator lives
//! here as data. The `Default` tables describe the stock object set; callers
//! may adjust a copy and pass it explicitly.

use std::ops::RangeInclusive;

use crate::TypeId;

/// An inclusive range of type ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeRange {
    pub first: TypeId,
    pub last: TypeId,
}

impl TypeRange {
    /// Creates a range covering `first..=last`.
    #[must_use]
    pub const fn new(first: TypeId, last: TypeId) -> Self {
        assert!(first <= last, "type range must not be reversed");
        Self { first, last }
    }

    /// Creates a range covering exactly one id.
    #[must_use]
    pub const fn single(id: TypeId) -> Self {
        Self::new(id, id)
    }

    /// Returns `true` if the id falls in the range.
    #[must_use]
    pub const fn contains(self, id: TypeId) -> bool {
        id >= self.first && id <= self.last
    }

    /// Iterates the ids in the range.
    #[must_use]
    pub const fn ids(self) -> RangeInclusive<TypeId> {
        self.first..=self.last
    }

    /// Returns the range shifted up by `offset`.
    #[must_use]
    pub const fn shifted(self, offset: u16) -> Self {
        Self::new(self.first + offset, self.last + offset)
    }
}

/// A record property tracked by the comparator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(rename_all = "snake_case"))]
pub enum TrackedProperty {
    Quality,
    Owner,
    Enchanted,
    Quantity,
    Hp,
    Level,
    Attitude,
}

impl TrackedProperty {
    /// Properties compared for every record.
    pub const SHARED: [Self; 4] = [Self::Quality, Self::Owner, Self::Enchanted, Self::Quantity];

    /// Properties compared only when a mobile record is involved.
    pub const MOBILE: [Self; 3] = [Self::Hp, Self::Level, Self::Attitude];

    /// Returns the lowercase property name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Quality => "quality",
            Self::Owner => "owner",
            Self::Enchanted => "enchanted",
            Self::Quantity => "quantity",
            Self::Hp => "hp",
            Self::Level => "level",
            Self::Attitude => "attitude",
        }
    }
}

/// Type ranges whose listed properties carry linkage or parameters rather
/// than object state, and are never compared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoreRule {
    pub range: TypeRange,
    pub properties: Vec<TrackedProperty>,
}

impl IgnoreRule {
    #[must_use]
    pub fn new(range: TypeRange, properties: &[TrackedProperty]) -> Self {
        Self {
            range,
            properties: properties.to_vec(),
        }
    }
}

/// A two-state object family: each id in `base` has a partner at `id + offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatePair {
    pub base: TypeRange,
    pub offset: u16,
    pub base_label: &'static str,
    pub paired_label: &'static str,
}

impl StatePair {
    /// Returns the range of partner ids.
    #[must_use]
    pub const fn paired(self) -> TypeRange {
        self.base.shifted(self.offset)
    }

    /// Maps either member of a pair to the base id.
    #[must_use]
    pub const fn canonical(self, id: TypeId) -> Option<TypeId> {
        if self.base.contains(id) {
            Some(id)
        } else if self.paired().contains(id) {
            Some(id - self.offset)
        } else {
            None
        }
    }

    /// Returns `true` if the id is the partner (offset) member.
    #[must_use]
    pub const fn is_paired(self, id: TypeId) -> bool {
        self.paired().contains(id)
    }

    /// Returns the human-readable state for a member id.
    #[must_use]
    pub const fn label(self, id: TypeId) -> Option<&'static str> {
        if self.base.contains(id) {
            Some(self.base_label)
        } else if self.paired().contains(id) {
            Some(self.paired_label)
        } else {
            None
        }
    }
}

/// Type-id tables for enrichment and comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRules {
    /// All door-like objects: doors, portcullis, secret door, open and closed.
    pub doors: TypeRange,
    pub portcullis: TypeId,
    pub secret_door: TypeId,
    /// Closed/open door pairs.
    pub door_states: StatePair,
    /// Door ids that can never be broken.
    pub massive_doors: Vec<TypeId>,
    /// Door quality that marks an unbreakable door regardless of type.
    pub indestructible_quality: u8,
    pub door_max_health: u8,
    pub lock: TypeId,
    /// Link values at or above this carry a lock id or enchantment, not a slot or count.
    pub link_threshold: u16,
    pub default_quality: u8,
    pub switches: TypeRange,
    /// Inactive/active switch pairs.
    pub switch_states: StatePair,
    pub texture_maps: TypeRange,
    pub traps: TypeRange,
    pub triggers: TypeRange,
    pub animations: TypeRange,
    pub quest_items: TypeRange,
    pub npcs: TypeRange,
    pub move_trigger: TypeId,
    pub teleport_trap: TypeId,
    /// Tiles (per axis) within which a teleport destination counts as stairs.
    pub stairs_proximity: u8,
    pub max_level: u8,
    pub gems: Vec<TypeId>,
    pub coins: Vec<TypeId>,
    /// Ranges where the enchanted flag means enchanted.
    pub enchantable: Vec<TypeRange>,
    pub ignored: Vec<IgnoreRule>,
}

impl Default for TypeRules {
    fn default() -> Self {
        use TrackedProperty::{Owner, Quality};

        let doors = TypeRange::new(0x140, 0x14F);
        let switches = TypeRange::new(0x170, 0x17F);
        let texture_maps = TypeRange::new(0x16E, 0x16F);
        let traps = TypeRange::new(0x180, 0x19F);
        let triggers = TypeRange::new(0x1A0, 0x1BF);
        let animations = TypeRange::new(0x1C0, 0x1CF);

        Self {
            doors,
            portcullis: 0x146,
            secret_door: 0x147,
            door_states: StatePair {
                base: TypeRange::new(0x140, 0x147),
                offset: 8,
                base_label: "Closed",
                paired_label: "Open",
            },
            massive_doors: vec![0x145, 0x14D],
            indestructible_quality: 63,
            door_max_health: 40,
            lock: 0x10F,
            link_threshold: 512,
            default_quality: 40,
            switches,
            switch_states: StatePair {
                base: TypeRange::new(0x170, 0x177),
                offset: 8,
                base_label: "Off",
                paired_label: "On",
            },
            texture_maps,
            traps,
            triggers,
            animations,
            quest_items: TypeRange::new(0x110, 0x11F),
            npcs: TypeRange::new(0x040, 0x07F),
            move_trigger: 0x1A0,
            teleport_trap: 0x181,
            stairs_proximity: 5,
            max_level: 9,
            gems: TypeRange::new(0x0A2, 0x0A7).ids().collect(),
            coins: vec![0x0A0, 0x0A1],
            enchantable: vec![
                // weapons
                TypeRange::new(0x000, 0x01F),
                // armour, rings
                TypeRange::new(0x020, 0x03F),
                // wands
                TypeRange::new(0x098, 0x09B),
                // treasure
                TypeRange::new(0x0A0, 0x0AF),
                // books and scrolls
                TypeRange::new(0x130, 0x13F),
            ],
            ignored: vec![
                IgnoreRule::new(doors, &[Quality]),
                IgnoreRule::new(traps, &[Owner, Quality]),
                IgnoreRule::new(triggers, &[Owner, Quality]),
                IgnoreRule::new(animations, &[Owner]),
                IgnoreRule::new(switches, &[Owner]),
                IgnoreRule::new(texture_maps, &[Owner, Quality]),
            ],
        }
    }
}

impl TypeRules {
    /// Returns the two-state families in lookup order.
    #[must_use]
    pub fn state_pairs(&self) -> [StatePair; 2] {
        [self.door_states, self.switch_states]
    }

    /// Maps a stateful id (open door, active switch) to its canonical id.
    #[must_use]
    pub fn canonical_type(&self, id: TypeId) -> TypeId {
        self.state_pairs()
            .iter()
            .find_map(|pair| pair.canonical(id))
            .unwrap_or(id)
    }

    /// Returns the state label of a stateful id.
    #[must_use]
    pub fn state_label(&self, id: TypeId) -> Option<&'static str> {
        self.state_pairs().iter().find_map(|pair| pair.label(id))
    }

    /// Returns `true` if comparing `property` is meaningless for this type.
    #[must_use]
    pub fn is_ignored(&self, id: TypeId, property: TrackedProperty) -> bool {
        self.ignored
            .iter()
            .any(|rule| rule.range.contains(id) && rule.properties.contains(&property))
    }

    /// Returns the value an absent property is assumed to have.
    #[must_use]
    pub fn property_default(&self, property: TrackedProperty) -> i64 {
        match property {
            TrackedProperty::Quality => i64::from(self.default_quality),
            TrackedProperty::Quantity => 1,
            TrackedProperty::Owner
            | TrackedProperty::Enchanted
            | TrackedProperty::Hp
            | TrackedProperty::Level
            | TrackedProperty::Attitude => 0,
        }
    }

    #[must_use]
    pub fn is_door(&self, id: TypeId) -> bool {
        self.doors.contains(id)
    }

    #[must_use]
    pub fn is_massive_door(&self, id: TypeId) -> bool {
        self.massive_doors.contains(&id)
    }

    #[must_use]
    pub fn is_switch(&self, id: TypeId) -> bool {
        self.switches.contains(id)
    }

    /// Traps and triggers share the parameter-style owner field.
    #[must_use]
    pub fn is_trap_or_trigger(&self, id: TypeId) -> bool {
        self.traps.contains(id) || self.triggers.contains(id)
    }

    #[must_use]
    pub fn is_animation(&self, id: TypeId) -> bool {
        self.animations.contains(id)
    }

    #[must_use]
    pub fn is_texture_map(&self, id: TypeId) -> bool {
        self.texture_maps.contains(id)
    }

    #[must_use]
    pub fn is_quest_item(&self, id: TypeId) -> bool {
        self.quest_items.contains(id)
    }

    #[must_use]
    pub fn is_npc(&self, id: TypeId) -> bool {
        self.npcs.contains(id)
    }

    #[must_use]
    pub fn is_gem(&self, id: TypeId) -> bool {
        self.gems.contains(&id)
    }

    #[must_use]
    pub fn is_coin(&self, id: TypeId) -> bool {
        self.coins.contains(&id)
    }

    #[must_use]
    pub fn is_enchantable(&self, id: TypeId) -> bool {
        self.enchantable.iter().any(|range| range.contains(id))
    }

    /// Returns `true` if `level` is a valid one-indexed level number.
    #[must_use]
    pub fn is_valid_level(&self, level: u16) -> bool {
        (1..=u16::from(self.max_level)).contains(&level)
    }
}

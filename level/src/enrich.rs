//! Semantic enrichment of resolved objects.
//!
//! Turns raw records into [`LevelObject`]s: catalog names, quantity versus
//! enchantment, door locks and condition, stairs destinations. Link targets
//! are looked up in the decoded slot table, since lock and trap records hang
//! off links rather than tile chains.

use catalog::{ObjectCatalog, ObjectInfo, TypeRules};

use crate::decode::DecodedLevel;
use crate::owner::OwnerField;
use crate::record::{Attitude, ObjectRecord};
use crate::state::Placement;
use crate::types::{Position, SlotIndex, TilePos};

/// Which family a door belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(rename_all = "snake_case"))]
pub enum DoorKind {
    Door,
    Portcullis,
    SecretDoor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(rename_all = "snake_case"))]
pub enum DoorState {
    Closed,
    Open,
}

/// How much punishment a door takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(rename_all = "snake_case"))]
pub enum DoorCondition {
    /// Remaining health, capped at the door maximum.
    Health(u8),
    /// Cannot be broken.
    Massive,
}

/// Derived door state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DoorInfo {
    pub kind: DoorKind,
    pub state: DoorState,
    pub locked: bool,
    pub lock_id: Option<u16>,
    /// `None` when no lock record could be found.
    pub pickable: Option<bool>,
    pub condition: DoorCondition,
}

/// A move trigger that takes the player to another level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StairsInfo {
    pub destination_level: u8,
    pub destination: TilePos,
    /// The teleport trap the trigger links to.
    pub trap: SlotIndex,
}

/// A resolved, enriched object of one level.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LevelObject {
    pub slot: SlotIndex,
    pub info: ObjectInfo,
    pub record: ObjectRecord,
    pub position: Position,
    pub placement: Placement,
    pub owner: OwnerField,
    pub quantity: Option<u16>,
    pub enchanted: bool,
    pub enchantment: Option<u16>,
    pub link: Option<SlotIndex>,
    pub door: Option<DoorInfo>,
    pub stairs: Option<StairsInfo>,
}

impl LevelObject {
    #[must_use]
    pub const fn type_id(&self) -> u16 {
        self.record.type_id
    }

    #[must_use]
    pub const fn tile(&self) -> TilePos {
        self.position.tile
    }

    #[must_use]
    pub const fn is_mobile(&self) -> bool {
        self.record.is_mobile()
    }

    /// Mobile hit points, `None` for static objects.
    #[must_use]
    pub fn hp(&self) -> Option<u8> {
        self.record.mobile.map(|mobile| mobile.hp)
    }

    /// Mobile level, `None` for static objects.
    #[must_use]
    pub fn npc_level(&self) -> Option<u8> {
        self.record.mobile.map(|mobile| mobile.npc_level)
    }

    #[must_use]
    pub fn attitude(&self) -> Option<Attitude> {
        self.record.mobile.map(|mobile| mobile.attitude)
    }
}

/// Enrichment inputs shared by every object of one level.
pub(crate) struct Enricher<'a> {
    pub(crate) rules: &'a TypeRules,
    pub(crate) catalog: &'a ObjectCatalog,
    pub(crate) decoded: &'a DecodedLevel,
    pub(crate) level: u8,
}

impl Enricher<'_> {
    pub(crate) fn enrich(
        &self,
        slot: SlotIndex,
        record: &ObjectRecord,
        tile: TilePos,
        placement: Placement,
    ) -> LevelObject {
        let position = Position {
            tile,
            z: record.z,
            sub_x: record.sub_x,
            sub_y: record.sub_y,
            heading: record.heading,
        };
        let (quantity, enchanted, enchantment) = self.quantity(record);
        let link = (!record.quantity_present && record.quantity_or_link != 0)
            .then(|| SlotIndex::new(record.quantity_or_link));

        LevelObject {
            slot,
            info: self.catalog.resolve(record.type_id),
            record: record.clone(),
            position,
            placement,
            owner: OwnerField::classify(self.rules, record.type_id, record.owner),
            quantity,
            enchanted,
            enchantment,
            link,
            door: self.door(record),
            stairs: self.stairs(record, tile),
        }
    }

    /// Splits the quantity-or-link field into (quantity, enchanted, enchantment).
    fn quantity(&self, record: &ObjectRecord) -> (Option<u16>, bool, Option<u16>) {
        let rules = self.rules;
        let value = record.quantity_or_link;
        let below_threshold = value < rules.link_threshold;

        let flagged = (record.quantity_present && value > 0 && below_threshold).then_some(value);
        let quantity = if rules.is_gem(record.type_id) || rules.is_coin(record.type_id) {
            Some(flagged.unwrap_or(1))
        } else {
            flagged
        };

        let enchanted = record.enchanted_flag && rules.is_enchantable(record.type_id);
        let enchantment = (record.quantity_present && !below_threshold)
            .then(|| value - rules.link_threshold);

        (quantity, enchanted, enchantment)
    }

    fn door(&self, record: &ObjectRecord) -> Option<DoorInfo> {
        let rules = self.rules;
        if !rules.is_door(record.type_id) {
            return None;
        }
        let canonical = rules.canonical_type(record.type_id);
        let kind = if canonical == rules.portcullis {
            DoorKind::Portcullis
        } else if canonical == rules.secret_door {
            DoorKind::SecretDoor
        } else {
            DoorKind::Door
        };
        let state = if rules.door_states.is_paired(record.type_id) {
            DoorState::Open
        } else {
            DoorState::Closed
        };

        let link = record.quantity_or_link;
        let locked = link != 0 || record.owner != 0;
        let lock = (link != 0)
            .then(|| self.decoded.slot(SlotIndex::new(link)))
            .flatten()
            .filter(|target| target.type_id == rules.lock);

        let lock_id = lock
            .filter(|lock| lock.quantity_or_link >= rules.link_threshold)
            .map(|lock| lock.quantity_or_link - rules.link_threshold)
            .or_else(|| (record.owner != 0).then_some(u16::from(record.owner)));
        let pickable = lock.map(|lock| lock.quality == rules.default_quality);

        let condition = if rules.is_massive_door(record.type_id)
            || record.quality == rules.indestructible_quality
        {
            DoorCondition::Massive
        } else {
            DoorCondition::Health(record.quality.min(rules.door_max_health))
        };

        Some(DoorInfo {
            kind,
            state,
            locked,
            lock_id,
            pickable,
            condition,
        })
    }

    fn stairs(&self, record: &ObjectRecord, tile: TilePos) -> Option<StairsInfo> {
        let rules = self.rules;
        if record.type_id != rules.move_trigger || record.quantity_or_link == 0 {
            return None;
        }
        let trap_slot = SlotIndex::new(record.quantity_or_link);
        let trap = self.decoded.slot(trap_slot)?;
        if trap.type_id != rules.teleport_trap {
            return None;
        }

        let level_field = u16::from(trap.z);
        let valid_level = rules.is_valid_level(level_field);
        let destination = TilePos::new(trap.quality, trap.owner);
        let distance = tile.chebyshev(destination);

        let changes_level = valid_level && level_field != u16::from(self.level);
        let nearby = distance <= rules.stairs_proximity;
        if !(changes_level || nearby || destination == tile) {
            return None;
        }

        let destination_level = if valid_level {
            trap.z
        } else {
            self.level.saturating_add(1)
        };
        Some(StairsInfo {
            destination_level,
            destination,
            trap: trap_slot,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode_level;
    use crate::fixture::{LevelImage, RawObject};

    fn enrich_slot(image: &LevelImage, slot: u16, level: u8) -> LevelObject {
        let rules = TypeRules::default();
        let catalog = ObjectCatalog::new();
        let decoded = decode_level(image.bytes());
        let enricher = Enricher {
            rules: &rules,
            catalog: &catalog,
            decoded: &decoded,
            level,
        };
        let slot = SlotIndex::new(slot);
        let record = decoded.slot(slot).unwrap();
        enricher.enrich(slot, record, TilePos::new(10, 10), Placement::Chain)
    }

    #[test]
    fn gem_without_quantity_flag_defaults_to_one() {
        let mut image = LevelImage::new();
        image.set_object(300, RawObject::new(0x0A2));
        let gem = enrich_slot(&image, 300, 1);
        assert_eq!(gem.quantity, Some(1));
        assert_eq!(gem.link, None);
    }

    #[test]
    fn coin_without_flag_defaults_to_one() {
        let mut image = LevelImage::new();
        image.set_object(300, RawObject::new(0x0A0));
        image.set_object(301, RawObject::new(0x0A1));
        for slot in [300, 301] {
            let coins = enrich_slot(&image, slot, 1);
            assert_eq!(coins.quantity, Some(1), "slot {slot}");
            assert_eq!(coins.link, None, "slot {slot}");
        }
    }

    #[test]
    fn gem_with_value_above_threshold_never_surfaces_it() {
        let mut image = LevelImage::new();
        image.set_object(300, RawObject::new(0x0A4).quantity(700));
        let gem = enrich_slot(&image, 300, 1);
        assert_eq!(gem.quantity, Some(1));
        assert_eq!(gem.enchantment, Some(188));
    }

    #[test]
    fn flagged_quantity() {
        let mut image = LevelImage::new();
        image.set_object(300, RawObject::new(0x0A0).quantity(25));
        let coins = enrich_slot(&image, 300, 1);
        assert_eq!(coins.quantity, Some(25));
        assert_eq!(coins.enchantment, None);
    }

    #[test]
    fn value_above_threshold_is_enchantment() {
        let mut image = LevelImage::new();
        image.set_object(300, RawObject::new(0x004).quantity(512 + 17).enchanted());
        let sword = enrich_slot(&image, 300, 1);
        assert_eq!(sword.quantity, None);
        assert!(sword.enchanted);
        assert_eq!(sword.enchantment, Some(17));
    }

    #[test]
    fn enchanted_flag_outside_enchantable_ranges_is_ignored() {
        let mut image = LevelImage::new();
        image.set_object(300, RawObject::new(0x140).enchanted());
        assert!(!enrich_slot(&image, 300, 1).enchanted);
    }

    #[test]
    fn unflagged_value_is_link() {
        let mut image = LevelImage::new();
        image.set_object(300, RawObject::new(0x080).link(301));
        let bag = enrich_slot(&image, 300, 1);
        assert_eq!(bag.link, Some(SlotIndex::new(301)));
        assert_eq!(bag.quantity, None);
    }

    #[test]
    fn unknown_type_gets_placeholder_info() {
        let mut image = LevelImage::new();
        image.set_object(300, RawObject::new(0x1FE));
        let object = enrich_slot(&image, 300, 1);
        assert_eq!(object.info, ObjectInfo::placeholder(0x1FE));
    }

    #[test]
    fn locked_door_with_lock_record() {
        let mut image = LevelImage::new();
        image.set_object(300, RawObject::new(0x140).quality(30).link(301));
        image.set_object(301, RawObject::new(0x10F).quality(40).link(512 + 7));
        let door = enrich_slot(&image, 300, 1).door.unwrap();
        assert_eq!(door.kind, DoorKind::Door);
        assert_eq!(door.state, DoorState::Closed);
        assert!(door.locked);
        assert_eq!(door.lock_id, Some(7));
        assert_eq!(door.pickable, Some(true));
        assert_eq!(door.condition, DoorCondition::Health(30));
    }

    #[test]
    fn unpickable_lock() {
        let mut image = LevelImage::new();
        image.set_object(300, RawObject::new(0x140).link(301));
        image.set_object(301, RawObject::new(0x10F).quality(50).link(512 + 2));
        let door = enrich_slot(&image, 300, 1).door.unwrap();
        assert_eq!(door.pickable, Some(false));
    }

    #[test]
    fn lock_id_falls_back_to_owner() {
        let mut image = LevelImage::new();
        image.set_object(300, RawObject::new(0x148).owner(5).quality(40));
        let door = enrich_slot(&image, 300, 1).door.unwrap();
        assert_eq!(door.state, DoorState::Open);
        assert!(door.locked);
        assert_eq!(door.lock_id, Some(5));
        assert_eq!(door.pickable, None);
    }

    #[test]
    fn unlocked_door() {
        let mut image = LevelImage::new();
        image.set_object(300, RawObject::new(0x141).quality(55));
        let door = enrich_slot(&image, 300, 1).door.unwrap();
        assert!(!door.locked);
        assert_eq!(door.lock_id, None);
        assert_eq!(door.condition, DoorCondition::Health(40));
    }

    #[test]
    fn massive_doors() {
        let mut image = LevelImage::new();
        image.set_object(300, RawObject::new(0x145).quality(10));
        image.set_object(301, RawObject::new(0x141).quality(63));
        image.set_object(302, RawObject::new(0x14D).quality(10));
        for slot in [300, 301, 302] {
            let door = enrich_slot(&image, slot, 1).door.unwrap();
            assert_eq!(door.condition, DoorCondition::Massive, "slot {slot}");
        }
    }

    #[test]
    fn door_kinds() {
        let mut image = LevelImage::new();
        image.set_object(300, RawObject::new(0x146).quality(40));
        image.set_object(301, RawObject::new(0x14F).quality(40));
        assert_eq!(enrich_slot(&image, 300, 1).door.unwrap().kind, DoorKind::Portcullis);
        let secret = enrich_slot(&image, 301, 1).door.unwrap();
        assert_eq!(secret.kind, DoorKind::SecretDoor);
        assert_eq!(secret.state, DoorState::Open);
    }

    #[test]
    fn non_door_has_no_door_info() {
        let mut image = LevelImage::new();
        image.set_object(300, RawObject::new(0x0A0));
        assert!(enrich_slot(&image, 300, 1).door.is_none());
    }

    #[test]
    fn stairs_to_other_level() {
        let mut image = LevelImage::new();
        image.set_object(300, RawObject::new(0x1A0).link(301));
        image.set_object(301, RawObject::new(0x181).z(3).quality(40).owner(50));
        let stairs = enrich_slot(&image, 300, 1).stairs.unwrap();
        assert_eq!(stairs.destination_level, 3);
        assert_eq!(stairs.destination, TilePos::new(40, 50));
        assert_eq!(stairs.trap, SlotIndex::new(301));
    }

    #[test]
    fn distant_same_level_teleport_is_not_stairs() {
        let mut image = LevelImage::new();
        image.set_object(300, RawObject::new(0x1A0).link(301));
        image.set_object(301, RawObject::new(0x181).z(1).quality(40).owner(50));
        assert!(enrich_slot(&image, 300, 1).stairs.is_none());
    }

    #[test]
    fn nearby_destination_is_stairs() {
        let mut image = LevelImage::new();
        image.set_object(300, RawObject::new(0x1A0).link(301));
        image.set_object(301, RawObject::new(0x181).z(0).quality(13).owner(15));
        let stairs = enrich_slot(&image, 300, 4).stairs.unwrap();
        assert_eq!(stairs.destination_level, 5);
    }

    #[test]
    fn trigger_linked_to_other_trap_is_not_stairs() {
        let mut image = LevelImage::new();
        image.set_object(300, RawObject::new(0x1A0).link(301));
        image.set_object(301, RawObject::new(0x182).z(3));
        assert!(enrich_slot(&image, 300, 1).stairs.is_none());
    }
}

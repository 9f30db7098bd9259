//! Slot-by-slot comparison of two level states.

use std::collections::BTreeSet;
use std::fmt;

use catalog::{TrackedProperty, TypeId, TypeRules};
use level::{LevelObject, LevelState, SlotIndex};
use tracing::{debug, warn};

use crate::change::{
    ChangeKind, ChangeRecord, PositionDelta, PropertyChange, PropertyName, PropertyValue,
};
use crate::normalize::property_value;

/// Per-kind record counts of a [`LevelDiff`], synthetic records excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DiffSummary {
    pub unchanged: usize,
    pub moved: usize,
    pub modified: usize,
    pub added: usize,
    pub removed: usize,
    pub replaced: usize,
}

impl DiffSummary {
    /// Number of slots that changed in any way.
    #[must_use]
    pub const fn changed(&self) -> usize {
        self.moved + self.modified + self.added + self.removed + self.replaced
    }
}

impl fmt::Display for DiffSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} moved, {} modified, {} added, {} removed, {} replaced, {} unchanged",
            self.moved, self.modified, self.added, self.removed, self.replaced, self.unchanged
        )
    }
}

/// Every slot's change between a base and a save state, in slot order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LevelDiff {
    level: u8,
    records: Vec<ChangeRecord>,
}

impl LevelDiff {
    /// Level number of the save side.
    #[must_use]
    pub const fn level(&self) -> u8 {
        self.level
    }

    /// All records, including unchanged and synthetic ones.
    #[must_use]
    pub fn records(&self) -> &[ChangeRecord] {
        &self.records
    }

    /// Records that describe an actual change, without synthetic companions.
    pub fn changed(&self) -> impl Iterator<Item = &ChangeRecord> {
        self.records
            .iter()
            .filter(|record| !record.is_synthetic() && record.kind() != ChangeKind::Unchanged)
    }

    /// The primary (non-synthetic) record for `slot`.
    #[must_use]
    pub fn record(&self, slot: SlotIndex) -> Option<&ChangeRecord> {
        self.records
            .iter()
            .find(|record| record.slot() == slot && !record.is_synthetic())
    }

    #[must_use]
    pub fn summary(&self) -> DiffSummary {
        let mut summary = DiffSummary::default();
        for record in self.records.iter().filter(|record| !record.is_synthetic()) {
            let counter = match record.kind() {
                ChangeKind::Unchanged => &mut summary.unchanged,
                ChangeKind::Moved => &mut summary.moved,
                ChangeKind::Modified => &mut summary.modified,
                ChangeKind::Added => &mut summary.added,
                ChangeKind::Removed => &mut summary.removed,
                ChangeKind::Replaced => &mut summary.replaced,
            };
            *counter += 1;
        }
        summary
    }
}

/// Compares two states of the same level, matching objects by slot index.
///
/// Never fails. Comparing states of different levels is allowed but logged.
#[must_use]
pub fn compare_levels(base: &LevelState, save: &LevelState, rules: &TypeRules) -> LevelDiff {
    if base.level() != save.level() {
        warn!(
            base = base.level(),
            save = save.level(),
            "comparing states of different levels"
        );
    }

    let slots: BTreeSet<SlotIndex> = base
        .objects()
        .chain(save.objects())
        .map(|object| object.slot)
        .collect();

    let mut records = Vec::with_capacity(slots.len());
    for slot in slots {
        match (base.object(slot), save.object(slot)) {
            (Some(before), Some(after)) => compare_pair(before, after, rules, &mut records),
            (Some(before), None) => records.push(ChangeRecord::removed(before)),
            (None, Some(after)) => records.push(ChangeRecord::added(after)),
            (None, None) => {}
        }
    }

    let diff = LevelDiff {
        level: save.level(),
        records,
    };
    debug!(level = diff.level, summary = %diff.summary(), "levels compared");
    diff
}

fn compare_pair(
    base: &LevelObject,
    save: &LevelObject,
    rules: &TypeRules,
    records: &mut Vec<ChangeRecord>,
) {
    let base_type = rules.canonical_type(base.type_id());
    let save_type = rules.canonical_type(save.type_id());

    if base_type != save_type {
        let type_change = PropertyChange {
            property: PropertyName::Type,
            before: PropertyValue::Number(i64::from(base_type)),
            after: PropertyValue::Number(i64::from(save_type)),
        };
        records.push(ChangeRecord::paired(
            ChangeKind::Replaced,
            base,
            save,
            vec![type_change],
            None,
        ));
        records.push(ChangeRecord::removed(base).into_synthetic(type_change));
        records.push(ChangeRecord::added(save).into_synthetic(type_change));
        return;
    }

    let mut changes = property_changes(base, save, base_type, rules);
    if base.type_id() != save.type_id() {
        changes.push(PropertyChange {
            property: PropertyName::State,
            before: state_value(rules, base.type_id()),
            after: state_value(rules, save.type_id()),
        });
    }

    let position_delta = PositionDelta::between(base, save);
    let kind = if position_delta.is_some() {
        ChangeKind::Moved
    } else if !changes.is_empty() {
        ChangeKind::Modified
    } else {
        ChangeKind::Unchanged
    };
    records.push(ChangeRecord::paired(kind, base, save, changes, position_delta));
}

fn property_changes(
    base: &LevelObject,
    save: &LevelObject,
    canonical_type: TypeId,
    rules: &TypeRules,
) -> Vec<PropertyChange> {
    let mobile = base.is_mobile() || save.is_mobile();
    let properties = TrackedProperty::SHARED
        .into_iter()
        .chain(TrackedProperty::MOBILE.into_iter().filter(move |_| mobile));

    properties
        .filter(|&property| !rules.is_ignored(canonical_type, property))
        .filter_map(|property| {
            let before = property_value(rules, base, property);
            let after = property_value(rules, save, property);
            (before != after).then_some(PropertyChange {
                property: property.into(),
                before: PropertyValue::Number(before),
                after: PropertyValue::Number(after),
            })
        })
        .collect()
}

fn state_value(rules: &TypeRules, id: TypeId) -> PropertyValue {
    rules
        .state_label(id)
        .map_or(PropertyValue::Number(i64::from(id)), PropertyValue::Label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::ObjectCatalog;
    use level::fixture::{LevelImage, RawMobile, RawObject};
    use level::{decode_level_state, DecodeContext};

    fn state(image: &LevelImage) -> LevelState {
        let catalog = ObjectCatalog::new();
        let rules = TypeRules::default();
        decode_level_state(image.bytes(), 1, &DecodeContext::new(&catalog, &rules))
    }

    fn single(slot: u16, raw: RawObject, x: u8) -> LevelState {
        let mut image = LevelImage::new();
        image.set_object(slot, raw);
        image.place(x, 5, &[slot]);
        state(&image)
    }

    #[test]
    fn identical_states_are_unchanged() {
        let level = single(300, RawObject::new(0x0A0).quantity(3), 5);
        let diff = compare_levels(&level, &level, &TypeRules::default());
        assert_eq!(diff.summary().changed(), 0);
        assert_eq!(diff.summary().unchanged, 1);
        assert_eq!(diff.changed().count(), 0);
    }

    #[test]
    fn moved_keeps_property_changes() {
        let base = single(300, RawObject::new(0x0A0).quantity(3), 5);
        let save = single(300, RawObject::new(0x0A0).quantity(4), 6);
        let diff = compare_levels(&base, &save, &TypeRules::default());
        let record = diff.record(SlotIndex::new(300)).unwrap();
        assert_eq!(record.kind(), ChangeKind::Moved);
        assert_eq!(record.position_delta().unwrap().dx(), 1);
        let quantity = record.property(TrackedProperty::Quantity.into()).unwrap();
        assert_eq!(quantity.before, PropertyValue::Number(3));
        assert_eq!(quantity.after, PropertyValue::Number(4));
    }

    #[test]
    fn z_change_is_a_move() {
        let base = single(300, RawObject::new(0x0A0), 5);
        let save = single(300, RawObject::new(0x0A0).z(8), 5);
        let diff = compare_levels(&base, &save, &TypeRules::default());
        assert_eq!(diff.record(SlotIndex::new(300)).unwrap().kind(), ChangeKind::Moved);
    }

    #[test]
    fn added_and_removed() {
        let base = single(300, RawObject::new(0x0A0), 5);
        let save = single(301, RawObject::new(0x0A0), 5);
        let diff = compare_levels(&base, &save, &TypeRules::default());
        let kinds: Vec<_> = diff.records().iter().map(ChangeRecord::kind).collect();
        assert_eq!(kinds, vec![ChangeKind::Removed, ChangeKind::Added]);
    }

    #[test]
    fn replaced_emits_synthetic_pair() {
        let base = single(300, RawObject::new(0x0A0), 5);
        let save = single(300, RawObject::new(0x0B0), 5);
        let diff = compare_levels(&base, &save, &TypeRules::default());
        let records = diff.records();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].kind(), ChangeKind::Replaced);
        assert!(!records[0].is_synthetic());
        assert_eq!(records[1].kind(), ChangeKind::Removed);
        assert!(records[1].is_synthetic());
        assert_eq!(records[2].kind(), ChangeKind::Added);
        assert!(records[2].is_synthetic());
        for record in records {
            let change = record.property(PropertyName::Type).unwrap();
            assert_eq!(change.before, PropertyValue::Number(0x0A0));
            assert_eq!(change.after, PropertyValue::Number(0x0B0));
        }
        assert_eq!(diff.summary().replaced, 1);
        assert_eq!(diff.summary().removed, 0);
        assert_eq!(diff.changed().count(), 1);
    }

    #[test]
    fn replaced_takes_priority_over_moved() {
        let base = single(300, RawObject::new(0x0A0), 5);
        let save = single(300, RawObject::new(0x0B0).z(4), 9);
        let diff = compare_levels(&base, &save, &TypeRules::default());
        let kinds: Vec<_> = diff
            .records()
            .iter()
            .map(|record| (record.kind(), record.is_synthetic()))
            .collect();
        assert_eq!(
            kinds,
            vec![
                (ChangeKind::Replaced, false),
                (ChangeKind::Removed, true),
                (ChangeKind::Added, true),
            ]
        );
        assert_eq!(diff.summary().moved, 0);
    }

    #[test]
    fn switch_toggle_is_state_change() {
        let base = single(300, RawObject::new(0x171).owner(2), 5);
        let save = single(300, RawObject::new(0x179).owner(9), 5);
        let diff = compare_levels(&base, &save, &TypeRules::default());
        let record = diff.record(SlotIndex::new(300)).unwrap();
        assert_eq!(record.kind(), ChangeKind::Modified);
        // switch owner is ignored, only the state differs
        assert_eq!(record.changed_properties().len(), 1);
        let state = record.property(PropertyName::State).unwrap();
        assert_eq!(state.before, PropertyValue::Label("Off"));
        assert_eq!(state.after, PropertyValue::Label("On"));
    }

    #[test]
    fn mobile_properties_compared_for_mobiles() {
        let mobile = |hp| {
            let mut image = LevelImage::new();
            image.set_mobile(
                4,
                RawObject::new(0x044),
                RawMobile {
                    hp,
                    ..RawMobile::default()
                },
            );
            image.place(9, 9, &[4]);
            state(&image)
        };
        let diff = compare_levels(&mobile(30), &mobile(12), &TypeRules::default());
        let record = diff.record(SlotIndex::new(4)).unwrap();
        assert_eq!(record.kind(), ChangeKind::Modified);
        assert!(record.property(TrackedProperty::Hp.into()).is_some());
    }

    #[test]
    fn level_mismatch_still_compares() {
        let catalog = ObjectCatalog::new();
        let rules = TypeRules::default();
        let ctx = DecodeContext::new(&catalog, &rules);
        let base = decode_level_state(&[], 1, &ctx);
        let save = decode_level_state(&[], 2, &ctx);
        let diff = compare_levels(&base, &save, &rules);
        assert_eq!(diff.level(), 2);
        assert!(diff.records().is_empty());
    }
}

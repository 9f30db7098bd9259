//! Projection of a diff onto the save state, for display.

use std::collections::BTreeMap;

use level::{LevelObject, LevelState, SlotIndex};

use crate::change::{ChangeKind, ChangeRecord, PositionDelta, PropertyChange};
use crate::compare::LevelDiff;

/// One object annotated with what happened to it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ProjectedRecord {
    pub object: LevelObject,
    pub change_type: ChangeKind,
    pub changed_properties: Vec<PropertyChange>,
    pub position_delta: Option<PositionDelta>,
    /// The base object for moved and modified slots.
    pub base: Option<LevelObject>,
}

/// The save state with change metadata, plus ghosts of removed objects.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ProjectedLevel {
    pub level: u8,
    /// Every save object, in slot order.
    pub records: Vec<ProjectedRecord>,
    /// Base objects that no longer exist in the save, in slot order.
    pub removed: Vec<ProjectedRecord>,
}

impl ProjectedLevel {
    /// Records whose change type is not [`ChangeKind::Unchanged`].
    pub fn changed(&self) -> impl Iterator<Item = &ProjectedRecord> {
        self.records
            .iter()
            .filter(|record| record.change_type != ChangeKind::Unchanged)
    }
}

fn ghost(record: &ChangeRecord) -> Option<ProjectedRecord> {
    let base = record.base()?;
    Some(ProjectedRecord {
        object: base.clone(),
        change_type: ChangeKind::Removed,
        changed_properties: record.changed_properties().to_vec(),
        position_delta: None,
        base: None,
    })
}

/// Annotates every object of `save` with its change from `diff`.
///
/// Save objects the diff does not mention are reported unchanged.
#[must_use]
pub fn project_changes(save: &LevelState, diff: &LevelDiff) -> ProjectedLevel {
    let primary: BTreeMap<SlotIndex, &ChangeRecord> = diff
        .records()
        .iter()
        .filter(|record| !record.is_synthetic())
        .map(|record| (record.slot(), record))
        .collect();

    let records = save
        .objects()
        .map(|object| {
            let Some(record) = primary.get(&object.slot) else {
                return ProjectedRecord {
                    object: object.clone(),
                    change_type: ChangeKind::Unchanged,
                    changed_properties: Vec::new(),
                    position_delta: None,
                    base: None,
                };
            };
            let base = match record.kind() {
                ChangeKind::Moved | ChangeKind::Modified => record.base().cloned(),
                _ => None,
            };
            ProjectedRecord {
                object: object.clone(),
                change_type: record.kind(),
                changed_properties: record.changed_properties().to_vec(),
                position_delta: record.position_delta().copied(),
                base,
            }
        })
        .collect();

    let removed = diff
        .records()
        .iter()
        .filter(|record| record.kind() == ChangeKind::Removed)
        .filter_map(ghost)
        .collect();

    ProjectedLevel {
        level: save.level(),
        records,
        removed,
    }
}

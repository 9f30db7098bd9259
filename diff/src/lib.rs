//! Level state comparison for arkdiff.
//!
//! [`compare_levels`] matches two [`level::LevelState`]s slot by slot and
//! classifies each slot as unchanged, moved, modified, added, removed or
//! replaced. [`project_changes`] lays the result back over the save state so
//! a viewer can draw every object with its change.
//!
//! # Design Principles
//!
//! - **Slot identity** - Objects are matched by slot index, nothing fuzzier.
//! - **Normalized values** - Absent and default values compare equal.
//! - **Infallible** - Any two states compare; oddities are logged.
//! - **Deterministic** - Output is ordered by slot.

mod change;
mod compare;
mod normalize;
mod project;

pub use change::{
    ChangeKind, ChangeRecord, PositionDelta, PropertyChange, PropertyName, PropertyValue,
};
pub use compare::{compare_levels, DiffSummary, LevelDiff};
pub use normalize::{normalize_value, property_value, raw_property, RawValue};
pub use project::{project_changes, ProjectedLevel, ProjectedRecord};

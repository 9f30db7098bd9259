//! The overloaded owner field.
//!
//! The same six bits mean different things depending on the object's type
//! class. They are classified once here so nothing downstream reads the raw
//! integer.

use catalog::{TypeId, TypeRules};

/// The owner field, interpreted by type class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(tag = "kind", content = "value", rename_all = "snake_case")
)]
pub enum OwnerField {
    /// The field is zero.
    #[default]
    None,
    /// Owning NPC for items that belong to someone.
    Npc(u8),
    /// Lock id of a door.
    Lock(u8),
    /// Free parameter of a trap, trigger, switch or texture map.
    Parameter(u8),
    /// Animation frame or variant.
    Animation(u8),
    /// Quest progress marker.
    QuestMarker(u8),
}

impl OwnerField {
    pub(crate) fn classify(rules: &TypeRules, type_id: TypeId, raw: u8) -> Self {
        if raw == 0 {
            Self::None
        } else if rules.is_door(type_id) {
            Self::Lock(raw)
        } else if rules.is_trap_or_trigger(type_id)
            || rules.is_switch(type_id)
            || rules.is_texture_map(type_id)
        {
            Self::Parameter(raw)
        } else if rules.is_animation(type_id) {
            Self::Animation(raw)
        } else if rules.is_quest_item(type_id) {
            Self::QuestMarker(raw)
        } else {
            Self::Npc(raw)
        }
    }

    /// Numeric value regardless of interpretation; 0 for [`OwnerField::None`].
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Npc(v)
            | Self::Lock(v)
            | Self::Parameter(v)
            | Self::Animation(v)
            | Self::QuestMarker(v) => v,
        }
    }

    #[must_use]
    pub const fn kind_name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Npc(_) => "npc",
            Self::Lock(_) => "lock",
            Self::Parameter(_) => "parameter",
            Self::Animation(_) => "animation",
            Self::QuestMarker(_) => "quest_marker",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_by_type_class() {
        let rules = TypeRules::default();
        assert_eq!(OwnerField::classify(&rules, 0x140, 3), OwnerField::Lock(3));
        assert_eq!(OwnerField::classify(&rules, 0x181, 3), OwnerField::Parameter(3));
        assert_eq!(OwnerField::classify(&rules, 0x1A0, 3), OwnerField::Parameter(3));
        assert_eq!(OwnerField::classify(&rules, 0x170, 3), OwnerField::Parameter(3));
        assert_eq!(OwnerField::classify(&rules, 0x16E, 3), OwnerField::Parameter(3));
        assert_eq!(OwnerField::classify(&rules, 0x1C2, 3), OwnerField::Animation(3));
        assert_eq!(OwnerField::classify(&rules, 0x111, 3), OwnerField::QuestMarker(3));
        assert_eq!(OwnerField::classify(&rules, 0x0A0, 3), OwnerField::Npc(3));
    }

    #[test]
    fn zero_is_none() {
        let rules = TypeRules::default();
        let owner = OwnerField::classify(&rules, 0x140, 0);
        assert_eq!(owner, OwnerField::None);
        assert_eq!(owner.value(), 0);
        assert_eq!(owner.kind_name(), "none");
    }
}

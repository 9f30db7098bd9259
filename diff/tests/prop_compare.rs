use catalog::{ObjectCatalog, TypeRules};
use diff::{compare_levels, project_changes, ChangeKind};
use level::fixture::{LevelImage, RawObject};
use level::{decode_level_state, DecodeContext, LevelState};
use proptest::prelude::*;

fn arb_object() -> impl Strategy<Value = RawObject> {
    (0u16..0x200, 0u8..64, 0u8..64, 0u16..1024, any::<bool>(), 0u8..128).prop_map(
        |(type_id, quality, owner, value, flag, z)| {
            let raw = RawObject::new(type_id).quality(quality).owner(owner).z(z);
            if flag {
                raw.quantity(value)
            } else {
                raw.link(value)
            }
        },
    )
}

fn build(objects: &[(u16, RawObject, u8, u8)]) -> LevelState {
    let mut image = LevelImage::new();
    let mut seen = Vec::new();
    for &(slot, raw, x, y) in objects {
        if seen.contains(&slot) {
            continue;
        }
        seen.push(slot);
        image.set_object(slot, raw);
        image.place(x, y, &[slot]);
    }
    let catalog = ObjectCatalog::new();
    let rules = TypeRules::default();
    decode_level_state(image.bytes(), 1, &DecodeContext::new(&catalog, &rules))
}

fn arb_level() -> impl Strategy<Value = Vec<(u16, RawObject, u8, u8)>> {
    prop::collection::vec((256u16..1024, arb_object(), 1u8..64, 1u8..64), 0..24)
}

proptest! {
    #[test]
    fn prop_comparison_is_reflexive(objects in arb_level()) {
        let state = build(&objects);
        let diff = compare_levels(&state, &state, &TypeRules::default());
        prop_assert_eq!(diff.summary().changed(), 0);
        prop_assert!(diff.records().iter().all(|r| r.kind() == ChangeKind::Unchanged));
    }

    #[test]
    fn prop_output_is_ordered_by_slot(base in arb_level(), save in arb_level()) {
        let base = build(&base);
        let save = build(&save);
        let diff = compare_levels(&base, &save, &TypeRules::default());
        let slots: Vec<_> = diff.records().iter().map(|r| r.slot()).collect();
        prop_assert!(slots.windows(2).all(|pair| pair[0] <= pair[1]));

        let projected = project_changes(&save, &diff);
        prop_assert_eq!(projected.records.len(), save.len());
    }

    #[test]
    fn prop_every_slot_gets_one_primary_record(base in arb_level(), save in arb_level()) {
        let base = build(&base);
        let save = build(&save);
        let diff = compare_levels(&base, &save, &TypeRules::default());
        let primary = diff.records().iter().filter(|r| !r.is_synthetic()).count();
        let mut slots: Vec<_> = base.objects().chain(save.objects()).map(|o| o.slot).collect();
        slots.sort();
        slots.dedup();
        prop_assert_eq!(primary, slots.len());
    }
}

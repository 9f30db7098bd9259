#![no_main]

use catalog::{ObjectCatalog, TypeRules};
use container::{decode_container, Limits};
use level::{load_levels, DecodeContext};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(container) = decode_container(data, &Limits::for_testing()) else {
        return;
    };

    // Present blocks must be disjoint and ordered by offset.
    let mut end = 0usize;
    for block in container.iter() {
        let start = block.offset as usize;
        assert!(start >= end);
        end = start + block.size();
        assert!(end <= data.len());
    }

    let catalog = ObjectCatalog::new();
    let rules = TypeRules::default();
    let loaded = load_levels(&container, &DecodeContext::new(&catalog, &rules));
    assert_eq!(loaded.levels.len(), 9);
});

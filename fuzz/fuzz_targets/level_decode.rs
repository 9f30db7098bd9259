#![no_main]

use catalog::{ObjectCatalog, TypeRules};
use diff::compare_levels;
use level::{decode_level, decode_level_state, DecodeContext};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let decoded = decode_level(data);
    assert_eq!(decoded, decode_level(data));

    let catalog = ObjectCatalog::new();
    let rules = TypeRules::default();
    let ctx = DecodeContext::new(&catalog, &rules);
    let state = decode_level_state(data, 1, &ctx);

    let diff = compare_levels(&state, &state, &rules);
    assert_eq!(diff.summary().changed(), 0);
});

//! Fuzz target for area specifier resolution.
//!
//! This fuzzer tests that area resolution:
//! 1. Never panics on any input
//! 2. Resolves only direct codes against empty name tables
//! 3. Parses comma-separated batches the same way as single specifiers

#![no_main]

use libfuzzer_sys::fuzz_target;
use censustab::resolve::AreaSpecifier;
use censustab::{resolve_areas, NameTables};

fuzz_target!(|data: &[u8]| {
    let names = NameTables::new();

    if let Ok(input) = std::str::from_utf8(data) {
        let parsed = input.parse::<AreaSpecifier>();

        let areas = resolve_areas(&names, &[input]);
        if !matches!(parsed, Ok(AreaSpecifier::Code { .. })) {
            assert!(areas.is_empty());
        }
        assert!(areas.len() <= 1);

        let batch: Vec<&str> = input.split(';').collect();
        let _ = resolve_areas(&names, &batch);
    }

    let lossy = String::from_utf8_lossy(data);
    let _ = lossy.parse::<AreaSpecifier>();
});

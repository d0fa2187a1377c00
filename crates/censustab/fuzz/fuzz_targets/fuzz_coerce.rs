//! Fuzz target for content cell coercion and code resolution.
//!
//! This fuzzer tests that:
//! 1. Cell coercion never panics and never yields a non-finite number
//! 2. Summary-level and component resolution never panic
//! 3. A resolved summary level resolves to itself

#![no_main]

use libfuzzer_sys::fuzz_target;
use censustab::read::coerce_numeric;
use censustab::{resolve_geo_component, resolve_summary_level};

fuzz_target!(|data: &[u8]| {
    let input = String::from_utf8_lossy(data);

    if let Some(v) = coerce_numeric(&input) {
        assert!(v.is_finite());
    }

    if let Ok(code) = resolve_summary_level(&input) {
        assert_eq!(resolve_summary_level(&code).ok(), Some(code));
    }
    let _ = resolve_geo_component(&input);
});

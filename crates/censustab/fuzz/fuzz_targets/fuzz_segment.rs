//! Fuzz target for the file segment reader.
//!
//! This fuzzer tests that reading a segment file:
//! 1. Never panics on arbitrary file contents
//! 2. Either fails with an error or yields one column per reference

#![no_main]

use std::fs;

use libfuzzer_sys::fuzz_target;
use censustab::catalog::ContentEntry;
use censustab::read::SegmentReader;
use censustab::{ContentCatalog, DataLayout, DatasetKind, ValueKind};

fuzz_target!(|data: &[u8]| {
    let Ok(dir) = tempfile::tempdir() else {
        return;
    };
    let layout = DataLayout::new(dir.path(), DatasetKind::Acs1Year, 2017);
    let path = &layout.content_files("RI", 1, ValueKind::Estimate)[0].path;
    if fs::create_dir_all(path.parent().unwrap()).is_err() || fs::write(path, data).is_err() {
        return;
    }

    let entry = |reference: &str, position| ContentEntry {
        reference: reference.to_string(),
        file_segment: 1,
        position,
        table_name: String::new(),
        universe: String::new(),
    };
    let catalog = ContentCatalog::from_entries(
        DatasetKind::Acs1Year,
        2017,
        vec![entry("B01003_001", 0), entry("B01003_002", 3)],
    );
    let reader = SegmentReader::new(&layout, &catalog, b',');
    let references = vec!["B01003_001".to_string(), "B01003_002".to_string()];

    if let Ok(table) = reader.read_segment("RI", 1, &references, ValueKind::Estimate) {
        assert_eq!(table.columns().len(), references.len());
    }
});

//! Flat-file reading: content segments, geography and enrichment.

mod coerce;
mod enrich;
mod geography;
mod merge;
mod segment;
mod table;

pub use coerce::{coerce_cell, coerce_numeric, is_missing_sentinel, Coerced, CoercionStats, MISSING_SENTINELS};
pub use enrich::{enrich, EnrichStats, ReferenceDataset, ReferencePoint};
pub use geography::read_geography;
pub use merge::read_contents;
pub use segment::SegmentReader;
pub use table::{ContentTable, GeographyRow, RecordKey};

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::{CensusError, Result};

/// Open a headerless delimited survey file.
fn open_reader(path: &Path, delimiter: u8) -> Result<csv::Reader<BufReader<File>>> {
    let file = File::open(path).map_err(|e| CensusError::io(path, e))?;
    Ok(csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(BufReader::new(file)))
}

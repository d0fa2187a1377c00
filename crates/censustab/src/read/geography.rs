//! Geography file reader.

use indexmap::IndexMap;

use super::open_reader;
use super::table::{GeographyRow, RecordKey};
use crate::catalog::GeoHeaderLayout;
use crate::dataset::DataLayout;
use crate::error::{CensusError, Result};

/// Read every row of a state's geography file, keeping the requested
/// geo-headers. Fields are decoded lossily since names in the published
/// files are not always valid UTF-8.
pub fn read_geography(
    layout: &DataLayout,
    geo: &GeoHeaderLayout,
    state: &str,
    headers: &[String],
    delimiter: u8,
) -> Result<Vec<GeographyRow>> {
    let path = layout.geography_file(state);
    let positions: Vec<(String, usize)> = headers
        .iter()
        .map(|h| {
            geo.get(h)
                .map(|c| (c.reference.to_string(), c.position))
                .ok_or_else(|| CensusError::UnknownReference {
                    context: format!("{} {} geography", layout.kind(), layout.year()),
                    references: vec![h.clone()],
                })
        })
        .collect::<Result<_>>()?;

    let mut reader = open_reader(&path, delimiter)?;
    let keys = geo.keys;
    let mut rows = Vec::new();

    for (row_idx, result) in reader.byte_records().enumerate() {
        let record = result?;
        let field = |pos: usize| -> String {
            record
                .get(pos)
                .map(|b| String::from_utf8_lossy(b).trim().to_string())
                .unwrap_or_default()
        };

        let record_key = RecordKey::parse(&field(keys.record_key)).ok_or_else(|| {
            CensusError::Parse {
                path: path.clone(),
                row: row_idx + 1,
                message: "missing or non-numeric LOGRECNO".to_string(),
            }
        })?;

        let geo_headers: IndexMap<String, Option<String>> = positions
            .iter()
            .map(|(name, pos)| {
                let value = field(*pos);
                (name.clone(), (!value.is_empty()).then_some(value))
            })
            .collect();

        let row_state = field(keys.state).to_uppercase();
        rows.push(GeographyRow {
            geoid: field(keys.geoid),
            name: field(keys.name),
            summary_level: field(keys.summary_level),
            geo_component: field(keys.geo_component),
            state: if row_state.is_empty() {
                state.to_uppercase()
            } else {
                row_state
            },
            record_key,
            raw_geo_headers: geo_headers.clone(),
            geo_headers,
            lon: None,
            lat: None,
        });
    }

    tracing::debug!(path = %path.display(), rows = rows.len(), "read geography file");
    Ok(rows)
}

//! Geography enrichment from the precomputed reference dataset.
//!
//! The reference dataset carries, per GEOID, the coordinates of the entity's
//! representative point and the county subdivision / place that contain it.
//! The survey geography files only fill those containment codes at their own
//! summary levels, so tracts, block groups and blocks inherit them from here.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use indexmap::IndexMap;

use super::coerce::coerce_numeric;
use super::table::GeographyRow;
use crate::catalog::CONTAINMENT_HEADERS;
use crate::error::{CensusError, Result};

/// Coordinates and containment codes for one GEOID.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferencePoint {
    pub lon: Option<f64>,
    pub lat: Option<f64>,
    pub headers: IndexMap<String, Option<String>>,
}

/// A state's reference dataset, keyed by GEOID.
#[derive(Debug, Clone, Default)]
pub struct ReferenceDataset {
    headers: Vec<String>,
    points: HashMap<String, ReferencePoint>,
}

/// Outcome of enriching a state's geography rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichStats {
    pub matched: usize,
    pub unmatched: usize,
}

impl ReferenceDataset {
    /// An empty dataset: every row stays unmatched.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load `geoid_coord_<st>.csv`. A missing file yields an empty dataset.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::warn!(path = %path.display(), "reference dataset not found; coordinates will be null");
            return Ok(Self::empty());
        }

        let mut file = File::open(path).map_err(|e| CensusError::io(path, e))?;
        let mut contents = Vec::new();
        file.read_to_end(&mut contents)
            .map_err(|e| CensusError::io(path, e))?;
        Self::from_csv_bytes(&contents).map_err(|e| match e {
            CensusError::Parse { row, message, .. } => CensusError::Parse {
                path: path.to_path_buf(),
                row,
                message,
            },
            other => other,
        })
    }

    /// Parse reference CSV with a `GEOID,lon,lat,...` header row. Columns
    /// after the coordinates are containment geo-headers.
    pub fn from_csv_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(bytes);

        let names: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        let find = |wanted: &str| names.iter().position(|n| n.eq_ignore_ascii_case(wanted));
        let (Some(geoid_idx), Some(lon_idx), Some(lat_idx)) = (find("GEOID"), find("lon"), find("lat"))
        else {
            return Err(CensusError::Parse {
                path: Default::default(),
                row: 0,
                message: "reference header must contain GEOID, lon and lat".to_string(),
            });
        };

        let header_cols: Vec<(usize, String)> = names
            .iter()
            .enumerate()
            .filter(|(i, _)| ![geoid_idx, lon_idx, lat_idx].contains(i))
            .map(|(i, n)| (i, n.to_uppercase()))
            .collect();

        let mut points = HashMap::new();
        for result in reader.records() {
            let record = result?;
            let get = |i: usize| record.get(i).map(str::trim).unwrap_or("");
            let geoid = get(geoid_idx);
            if geoid.is_empty() {
                continue;
            }
            let headers = header_cols
                .iter()
                .map(|(i, name)| {
                    let value = get(*i);
                    (name.clone(), (!value.is_empty()).then(|| value.to_string()))
                })
                .collect();
            points.insert(
                geoid.to_string(),
                ReferencePoint {
                    lon: coerce_numeric(get(lon_idx)),
                    lat: coerce_numeric(get(lat_idx)),
                    headers,
                },
            );
        }

        Ok(Self {
            headers: header_cols.into_iter().map(|(_, n)| n).collect(),
            points,
        })
    }

    pub fn get(&self, geoid: &str) -> Option<&ReferencePoint> {
        self.points.get(geoid)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Containment geo-headers this dataset provides.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    fn provides(&self, header: &str) -> bool {
        self.headers.iter().any(|h| h == header)
    }
}

/// Join coordinates and corrected containment codes into rows by GEOID.
///
/// Containment headers the dataset provides are taken from it for every
/// row, so an unmatched row ends up with null coordinates and null
/// containment codes. Rows are never dropped.
pub fn enrich(rows: &mut [GeographyRow], reference: &ReferenceDataset) -> EnrichStats {
    let overridden: Vec<&str> = CONTAINMENT_HEADERS
        .iter()
        .copied()
        .filter(|h| reference.provides(h))
        .collect();

    let mut stats = EnrichStats::default();
    for row in rows.iter_mut() {
        let point = reference.get(&row.geoid);
        match point {
            Some(p) => {
                row.lon = p.lon;
                row.lat = p.lat;
                stats.matched += 1;
            }
            None => stats.unmatched += 1,
        }

        for header in &overridden {
            if let Some(slot) = row.geo_headers.get_mut(*header) {
                *slot = point.and_then(|p| p.headers.get(*header).cloned().flatten());
            }
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::read::RecordKey;

    const REFERENCE: &str = "GEOID,lon,lat,COUSUB,PLACE\n\
        16000US4459000,-71.4128,41.8240,59000,59000\n\
        14000US44007000100,-71.4051,41.8299,59000,59000\n\
        14000US44007012000,-71.4470,41.9203,41500,\n";

    fn row(geoid: &str, place: Option<&str>, county: Option<&str>) -> GeographyRow {
        let mut headers = IndexMap::new();
        headers.insert("PLACE".to_string(), place.map(String::from));
        headers.insert("COUNTY".to_string(), county.map(String::from));
        GeographyRow {
            geoid: geoid.to_string(),
            name: String::new(),
            summary_level: "140".to_string(),
            geo_component: "00".to_string(),
            state: "RI".to_string(),
            record_key: RecordKey(1),
            raw_geo_headers: headers.clone(),
            geo_headers: headers,
            lon: None,
            lat: None,
        }
    }

    #[test]
    fn test_parse_reference() {
        let reference = ReferenceDataset::from_csv_bytes(REFERENCE.as_bytes()).unwrap();
        assert_eq!(reference.len(), 3);
        assert_eq!(reference.headers(), &["COUSUB".to_string(), "PLACE".to_string()]);
        let point = reference.get("14000US44007012000").unwrap();
        assert_eq!(point.headers["COUSUB"].as_deref(), Some("41500"));
        assert_eq!(point.headers["PLACE"], None);
    }

    #[test]
    fn test_reference_requires_coordinates() {
        let err = ReferenceDataset::from_csv_bytes(b"GEOID,PLACE\nx,1\n").unwrap_err();
        assert!(matches!(err, CensusError::Parse { .. }));
    }

    #[test]
    fn test_enrich_overrides_containment_only() {
        let reference = ReferenceDataset::from_csv_bytes(REFERENCE.as_bytes()).unwrap();
        let mut rows = vec![
            row("14000US44007000100", None, Some("007")),
            row("14000US44007012000", Some("99999"), Some("007")),
            row("14000US44009999999", Some("12345"), Some("009")),
        ];

        let stats = enrich(&mut rows, &reference);
        assert_eq!(stats, EnrichStats { matched: 2, unmatched: 1 });

        assert_eq!(rows[0].geo_header("PLACE"), Some("59000"));
        assert_eq!(rows[0].geo_header("COUNTY"), Some("007"));
        assert_eq!(rows[0].lat, Some(41.8299));

        assert_eq!(rows[1].geo_header("PLACE"), None);
        assert_eq!(rows[1].raw_geo_headers["PLACE"].as_deref(), Some("99999"));

        assert_eq!(rows[2].lon, None);
        assert_eq!(rows[2].geo_header("PLACE"), None);
        assert_eq!(rows[2].geo_header("COUNTY"), Some("009"));
    }

    #[test]
    fn test_empty_reference_keeps_raw_headers() {
        let mut rows = vec![row("16000US4459000", Some("59000"), None)];
        let stats = enrich(&mut rows, &ReferenceDataset::empty());
        assert_eq!(stats.unmatched, 1);
        assert_eq!(rows[0].geo_header("PLACE"), Some("59000"));
        assert_eq!(rows[0].lon, None);
    }
}

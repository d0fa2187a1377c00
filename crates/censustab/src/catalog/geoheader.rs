//! Column layout of the geography files.

use serde::Serialize;

use crate::dataset::DatasetKind;

/// Geo-headers whose raw values are incomplete below their own summary
/// level and are replaced from the reference dataset.
pub static CONTAINMENT_HEADERS: &[&str] = &["COUSUB", "PLACE"];

/// Geo-headers naming exactly one entity, so a code maps to one display name.
pub static SINGLE_ENTITY_HEADERS: &[&str] = &["STATE", "COUNTY", "COUSUB", "PLACE", "CBSA"];

/// Placeholder name of unused columns in a layout.
const BLANK: &str = "BLANK";

/// One geographic classification column in the geography file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeoHeaderColumn {
    pub reference: &'static str,
    /// Zero-based column position in the geography file.
    pub position: usize,
    /// Summary levels at which the raw file fills this column (empty = all).
    pub populated_at: &'static [&'static str],
}

impl GeoHeaderColumn {
    /// Whether the raw file fills this column at `summary_level`.
    pub fn is_populated_at(&self, summary_level: &str) -> bool {
        self.populated_at.is_empty() || self.populated_at.contains(&summary_level)
    }

    pub fn is_containment(&self) -> bool {
        CONTAINMENT_HEADERS.contains(&self.reference)
    }

    pub fn is_single_entity(&self) -> bool {
        SINGLE_ENTITY_HEADERS.contains(&self.reference)
    }
}

/// Positions of the key columns every geography row carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyColumns {
    pub state: usize,
    pub summary_level: usize,
    pub geo_component: usize,
    pub record_key: usize,
    pub geoid: usize,
    pub name: usize,
}

/// Layout of one dataset's geography file.
#[derive(Debug, Clone)]
pub struct GeoHeaderLayout {
    pub keys: KeyColumns,
    columns: Vec<GeoHeaderColumn>,
    width: usize,
}

const COUNTY_LEVELS: &[&str] = &["050", "060", "067", "101", "140", "150", "155", "160"];
const COUSUB_LEVELS: &[&str] = &["060", "067", "070"];
const PLACE_LEVELS: &[&str] = &["160", "070", "155"];
const TRACT_LEVELS: &[&str] = &["101", "140", "150"];
const BLKGRP_LEVELS: &[&str] = &["101", "150"];

/// ACS geography CSV columns, in file order.
const ACS_COLUMNS: &[&str] = &[
    "FILEID", "STUSAB", "SUMLEVEL", "COMPONENT", "LOGRECNO", "US", "REGION", "DIVISION",
    "STATECE", "STATE", "COUNTY", "COUSUB", "PLACE", "TRACT", "BLKGRP", "CONCIT", "AIANHH",
    "AIANHHFP", "AIHHTLI", "AITSCE", "AITS", "ANRC", "CBSA", "CSA", "METDIV", "MACC", "MEMI",
    "NECTA", "CNECTA", "NECTADIV", "UA", BLANK, "CDCURR", "SLDU", "SLDL", BLANK, BLANK, "ZCTA5",
    "SUBMCD", "SDELM", "SDSEC", "SDUNI", "UR", "PCI", BLANK, BLANK, "PUMA5", BLANK, "GEOID",
    "NAME", "BTTR", "BTBG", BLANK,
];

/// Decennial geography columns, in file order.
const DECENNIAL_COLUMNS: &[&str] = &[
    "FILEID", "STUSAB", "SUMLEV", "GEOCOMP", "CHARITER", "CIFSN", "LOGRECNO", "REGION",
    "DIVISION", "STATE", "COUNTY", "COUSUB", "PLACE", "TRACT", "BLKGRP", "BLOCK", "CONCIT",
    "AIANHH", "CBSA", "METDIV", "CSA", "NECTA", "UA", "UR", "CD", "SLDU", "SLDL", "ZCTA5",
    "SDELM", "SDSEC", "SDUNI", "PUMA", "GEOID", "NAME", "INTPTLAT", "INTPTLON",
];

/// Columns that are keys or file metadata rather than selectable geo-headers.
const NON_HEADER_COLUMNS: &[&str] = &[
    "FILEID", "STUSAB", "SUMLEVEL", "SUMLEV", "COMPONENT", "GEOCOMP", "CHARITER", "CIFSN",
    "LOGRECNO", "GEOID", "NAME", BLANK,
];

impl GeoHeaderLayout {
    /// Built-in layout for a dataset. Every supported year shares one layout
    /// per dataset kind.
    pub fn for_dataset(kind: DatasetKind, _year: u16) -> Self {
        match kind {
            DatasetKind::Acs5Year | DatasetKind::Acs1Year => Self::from_columns(
                ACS_COLUMNS,
                KeyColumns {
                    state: 1,
                    summary_level: 2,
                    geo_component: 3,
                    record_key: 4,
                    geoid: 48,
                    name: 49,
                },
            ),
            DatasetKind::Decennial => Self::from_columns(
                DECENNIAL_COLUMNS,
                KeyColumns {
                    state: 1,
                    summary_level: 2,
                    geo_component: 3,
                    record_key: 6,
                    geoid: 32,
                    name: 33,
                },
            ),
        }
    }

    fn from_columns(names: &[&'static str], keys: KeyColumns) -> Self {
        let columns = names
            .iter()
            .enumerate()
            .filter(|(_, name)| !NON_HEADER_COLUMNS.contains(name))
            .map(|(position, &reference)| GeoHeaderColumn {
                reference,
                position,
                populated_at: populated_levels(reference),
            })
            .collect();

        Self {
            keys,
            columns,
            width: names.len(),
        }
    }

    /// Number of columns in a geography row.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Look up a geo-header (case-insensitive).
    pub fn get(&self, reference: &str) -> Option<&GeoHeaderColumn> {
        let reference = reference.trim();
        self.columns
            .iter()
            .find(|c| c.reference.eq_ignore_ascii_case(reference))
    }

    /// All selectable geo-headers.
    pub fn columns(&self) -> &[GeoHeaderColumn] {
        &self.columns
    }
}

fn populated_levels(reference: &str) -> &'static [&'static str] {
    match reference {
        "COUNTY" => COUNTY_LEVELS,
        "COUSUB" => COUSUB_LEVELS,
        "PLACE" => PLACE_LEVELS,
        "TRACT" => TRACT_LEVELS,
        "BLKGRP" => BLKGRP_LEVELS,
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acs_layout_positions() {
        let layout = GeoHeaderLayout::for_dataset(DatasetKind::Acs5Year, 2016);
        assert_eq!(layout.width(), 53);
        assert_eq!(layout.get("place").unwrap().position, 12);
        assert_eq!(layout.get("CBSA").unwrap().position, 22);
        assert_eq!(ACS_COLUMNS[layout.keys.geoid], "GEOID");
        assert_eq!(ACS_COLUMNS[layout.keys.record_key], "LOGRECNO");
        assert!(layout.get("GEOID").is_none());
        assert!(layout.get("BLANK").is_none());
    }

    #[test]
    fn test_decennial_layout_positions() {
        let layout = GeoHeaderLayout::for_dataset(DatasetKind::Decennial, 2010);
        assert_eq!(DECENNIAL_COLUMNS[layout.keys.record_key], "LOGRECNO");
        assert_eq!(DECENNIAL_COLUMNS[layout.keys.name], "NAME");
        assert_eq!(layout.get("BLOCK").unwrap().position, 15);
    }

    #[test]
    fn test_populated_levels() {
        let layout = GeoHeaderLayout::for_dataset(DatasetKind::Acs5Year, 2016);
        let place = layout.get("PLACE").unwrap();
        assert!(place.is_populated_at("160"));
        assert!(!place.is_populated_at("140"));
        assert!(place.is_containment());
        assert!(layout.get("CBSA").unwrap().is_populated_at("140"));
        assert!(layout.get("COUNTY").unwrap().is_single_entity());
        assert!(!layout.get("TRACT").unwrap().is_single_entity());
    }
}

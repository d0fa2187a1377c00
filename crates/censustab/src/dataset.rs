//! Dataset kinds and the on-disk layout of their flat files.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CensusError;

/// State abbreviation of the nationwide aggregate pseudo-state.
pub const US_AGGREGATE: &str = "US";

/// A census survey product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    /// American Community Survey 5-year estimates.
    Acs5Year,
    /// American Community Survey 1-year estimates.
    Acs1Year,
    /// Decennial census summary files.
    Decennial,
}

impl DatasetKind {
    /// All supported dataset kinds.
    pub fn all() -> &'static [DatasetKind] {
        &[DatasetKind::Acs5Year, DatasetKind::Acs1Year, DatasetKind::Decennial]
    }

    /// Directory name under the data root.
    pub fn dir_name(&self) -> &'static str {
        match self {
            DatasetKind::Acs5Year => "acs5year",
            DatasetKind::Acs1Year => "acs1year",
            DatasetKind::Decennial => "decennial",
        }
    }

    /// Whether the product publishes margins of error.
    pub fn has_margin(&self) -> bool {
        !matches!(self, DatasetKind::Decennial)
    }

    /// Metadata columns that precede the content cells in every content file.
    pub fn leading_columns(&self) -> &'static [&'static str] {
        match self {
            DatasetKind::Acs5Year | DatasetKind::Acs1Year => {
                &["FILEID", "FILETYPE", "STUSAB", "CHARITER", "SEQUENCE", "LOGRECNO"]
            }
            DatasetKind::Decennial => &["FILEID", "STUSAB", "CHARITER", "CIFSN", "LOGRECNO"],
        }
    }

    /// Position of LOGRECNO in a content file row.
    pub fn record_key_position(&self) -> usize {
        self.leading_columns().len() - 1
    }

    /// Digit used in ACS file names ("5" or "1").
    fn acs_span(&self) -> &'static str {
        match self {
            DatasetKind::Acs1Year => "1",
            _ => "5",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

impl FromStr for DatasetKind {
    type Err = CensusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "acs5" | "acs5year" => Ok(DatasetKind::Acs5Year),
            "acs1" | "acs1year" => Ok(DatasetKind::Acs1Year),
            "decennial" | "census" | "dec" => Ok(DatasetKind::Decennial),
            _ => Err(CensusError::UnsupportedDataset(format!(
                "'{}' (expected acs5year, acs1year or decennial)",
                s
            ))),
        }
    }
}

/// Whether a content file holds estimates or margins of error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Estimate,
    Margin,
}

impl ValueKind {
    /// Suffix appended to content column names read from this kind of file.
    pub fn suffix(&self) -> &'static str {
        match self {
            ValueKind::Estimate => "_e",
            ValueKind::Margin => "_m",
        }
    }

    fn file_prefix(&self) -> char {
        match self {
            ValueKind::Estimate => 'e',
            ValueKind::Margin => 'm',
        }
    }
}

/// One physical content file backing a (state, segment) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentFile {
    pub path: PathBuf,
    /// Absent optional files contribute no rows instead of failing the read.
    pub optional: bool,
}

/// Resolves file locations for one dataset and year under a data root.
#[derive(Debug, Clone)]
pub struct DataLayout {
    root: PathBuf,
    kind: DatasetKind,
    year: u16,
}

impl DataLayout {
    pub fn new(root: impl Into<PathBuf>, kind: DatasetKind, year: u16) -> Self {
        Self {
            root: root.into(),
            kind,
            year,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn kind(&self) -> DatasetKind {
        self.kind
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    /// Directory holding this dataset's survey files.
    pub fn dataset_dir(&self) -> PathBuf {
        self.root
            .join(self.kind.dir_name())
            .join(self.year.to_string())
    }

    /// Geography file for a state.
    pub fn geography_file(&self, state: &str) -> PathBuf {
        let st = state.to_lowercase();
        let name = match self.kind {
            DatasetKind::Decennial => format!("{}geo{}.csv", st, self.year),
            _ => format!("g{}{}{}.csv", self.year, self.kind.acs_span(), st),
        };
        self.dataset_dir().join(name)
    }

    /// Content files backing one (state, segment, estimate/margin) triple.
    ///
    /// ACS 5-year splits every segment into `group1` (all geographies except
    /// tracts and block groups) and `group2` (tracts and block groups only).
    /// The nationwide aggregate has no `group2` files.
    pub fn content_files(&self, state: &str, segment: u32, value: ValueKind) -> Vec<SegmentFile> {
        let st = state.to_lowercase();
        match self.kind {
            DatasetKind::Acs5Year => {
                let name = format!(
                    "{}{}5{}{:04}000.txt",
                    value.file_prefix(),
                    self.year,
                    st,
                    segment
                );
                vec![
                    SegmentFile {
                        path: self.dataset_dir().join("group1").join(&name),
                        optional: false,
                    },
                    SegmentFile {
                        path: self.dataset_dir().join("group2").join(&name),
                        optional: state.eq_ignore_ascii_case(US_AGGREGATE),
                    },
                ]
            }
            DatasetKind::Acs1Year => vec![SegmentFile {
                path: self.dataset_dir().join(format!(
                    "{}{}1{}{:04}000.txt",
                    value.file_prefix(),
                    self.year,
                    st,
                    segment
                )),
                optional: false,
            }],
            DatasetKind::Decennial => vec![SegmentFile {
                path: self
                    .dataset_dir()
                    .join(format!("{}000{:02}{}.csv", st, segment, self.year)),
                optional: false,
            }],
        }
    }

    /// Directory of precomputed reference tables.
    pub fn generated_dir(&self) -> PathBuf {
        self.root.join("generated_data")
    }

    /// Content catalog for this dataset and year.
    pub fn catalog_file(&self) -> PathBuf {
        catalog_file(&self.root, self.kind, self.year)
    }

    /// Precomputed coordinate / containment reference for a state.
    pub fn reference_file(&self, state: &str) -> PathBuf {
        self.generated_dir()
            .join("geoid_coord")
            .join(format!("geoid_coord_{}.csv", state.to_lowercase()))
    }
}

/// Content catalog path for a dataset and year under a data root.
pub fn catalog_file(root: &Path, kind: DatasetKind, year: u16) -> PathBuf {
    root.join("generated_data")
        .join("lookup")
        .join(format!("{}_{}.csv", kind.dir_name(), year))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dataset_kind() {
        assert_eq!("acs5".parse::<DatasetKind>().unwrap(), DatasetKind::Acs5Year);
        assert_eq!("ACS-1year".parse::<DatasetKind>().unwrap(), DatasetKind::Acs1Year);
        assert_eq!("decennial".parse::<DatasetKind>().unwrap(), DatasetKind::Decennial);
        assert!("acs3".parse::<DatasetKind>().is_err());
    }

    #[test]
    fn test_acs5_file_names() {
        let layout = DataLayout::new("/data", DatasetKind::Acs5Year, 2016);
        assert_eq!(
            layout.geography_file("RI"),
            PathBuf::from("/data/acs5year/2016/g20165ri.csv")
        );

        let files = layout.content_files("RI", 3, ValueKind::Margin);
        assert_eq!(files.len(), 2);
        assert_eq!(
            files[0].path,
            PathBuf::from("/data/acs5year/2016/group1/m20165ri0003000.txt")
        );
        assert!(!files[1].optional);
    }

    #[test]
    fn test_us_group2_is_optional() {
        let layout = DataLayout::new("/data", DatasetKind::Acs5Year, 2016);
        let files = layout.content_files("US", 1, ValueKind::Estimate);
        assert!(files[1].optional);
        assert!(files[1].path.ends_with("group2/e20165us0001000.txt"));
    }

    #[test]
    fn test_decennial_file_names() {
        let layout = DataLayout::new("/data", DatasetKind::Decennial, 2010);
        assert_eq!(
            layout.geography_file("ri"),
            PathBuf::from("/data/decennial/2010/rigeo2010.csv")
        );
        let files = layout.content_files("RI", 5, ValueKind::Estimate);
        assert_eq!(files.len(), 1);
        assert!(files[0].path.ends_with("ri000052010.csv"));
        assert_eq!(DatasetKind::Decennial.record_key_position(), 4);
        assert_eq!(DatasetKind::Acs5Year.record_key_position(), 5);
    }
}

//! Table-content catalog: where each content reference lives on disk.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::dataset::DatasetKind;
use crate::error::{CensusError, Result};

/// One table-content reference in a year's catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentEntry {
    /// Canonical reference, upper-cased (e.g. `B01003_001`).
    pub reference: String,
    /// File segment (sequence number) holding this reference.
    pub file_segment: u32,
    /// Zero-based position among the segment's content columns.
    pub position: usize,
    /// Title of the published table.
    #[serde(default)]
    pub table_name: String,
    /// Universe the table describes.
    #[serde(default)]
    pub universe: String,
}

/// Catalog of every content reference for one dataset and year.
#[derive(Debug, Clone)]
pub struct ContentCatalog {
    kind: DatasetKind,
    year: u16,
    entries: IndexMap<String, ContentEntry>,
}

impl ContentCatalog {
    /// Create an empty catalog.
    pub fn new(kind: DatasetKind, year: u16) -> Self {
        Self {
            kind,
            year,
            entries: IndexMap::new(),
        }
    }

    /// Build a catalog from entries. References are normalized to upper case.
    pub fn from_entries(
        kind: DatasetKind,
        year: u16,
        entries: impl IntoIterator<Item = ContentEntry>,
    ) -> Self {
        let mut catalog = Self::new(kind, year);
        for entry in entries {
            catalog.insert(entry);
        }
        catalog
    }

    /// Load a catalog CSV (`reference,file_segment,position,table_name,universe`).
    pub fn load(kind: DatasetKind, year: u16, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut file = File::open(path).map_err(|e| CensusError::io(path, e))?;
        let mut contents = Vec::new();
        file.read_to_end(&mut contents)
            .map_err(|e| CensusError::io(path, e))?;
        Self::from_csv_bytes(kind, year, &contents)
    }

    /// Parse catalog CSV bytes.
    pub fn from_csv_bytes(kind: DatasetKind, year: u16, bytes: &[u8]) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(bytes);

        let mut catalog = Self::new(kind, year);
        for record in reader.deserialize::<ContentEntry>() {
            catalog.insert(record?);
        }
        Ok(catalog)
    }

    fn insert(&mut self, mut entry: ContentEntry) {
        entry.reference = entry.reference.trim().to_uppercase();
        self.entries.insert(entry.reference.clone(), entry);
    }

    pub fn kind(&self) -> DatasetKind {
        self.kind
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a reference (case-insensitive).
    pub fn get(&self, reference: &str) -> Option<&ContentEntry> {
        self.entries.get(&reference.trim().to_uppercase())
    }

    pub fn contains(&self, reference: &str) -> bool {
        self.get(reference).is_some()
    }

    /// Iterate entries in catalog order.
    pub fn entries(&self) -> impl Iterator<Item = &ContentEntry> {
        self.entries.values()
    }

    /// Entries whose reference or table name contains `keyword` (case-insensitive).
    pub fn search(&self, keyword: &str) -> Vec<&ContentEntry> {
        let keyword = keyword.to_lowercase();
        self.entries
            .values()
            .filter(|e| {
                e.reference.to_lowercase().contains(&keyword)
                    || e.table_name.to_lowercase().contains(&keyword)
            })
            .collect()
    }

    /// Describe this catalog in error messages.
    pub(crate) fn context(&self) -> String {
        format!("{} {}", self.kind, self.year)
    }
}

/// Group references by the file segment that holds them.
///
/// Segments appear in the order their first reference was requested, and
/// references keep their request order within a segment. Any reference not
/// in the catalog fails the whole lookup.
pub fn lookup_file_segments<S: AsRef<str>>(
    catalog: &ContentCatalog,
    references: &[S],
) -> Result<IndexMap<u32, Vec<String>>> {
    let mut segments: IndexMap<u32, Vec<String>> = IndexMap::new();
    let mut missing = Vec::new();

    for reference in references {
        let reference = reference.as_ref();
        match catalog.get(reference) {
            Some(entry) => {
                let refs = segments.entry(entry.file_segment).or_default();
                if !refs.contains(&entry.reference) {
                    refs.push(entry.reference.clone());
                }
            }
            None => missing.push(reference.trim().to_string()),
        }
    }

    if !missing.is_empty() {
        return Err(CensusError::UnknownReference {
            context: catalog.context(),
            references: missing,
        });
    }

    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = "reference,file_segment,position,table_name,universe\n\
        B01003_001,3,0,Total Population,Total population\n\
        B01001_001,2,0,Sex by Age,Total population\n\
        B01001_002,2,1,Sex by Age,Total population\n\
        b19013_001,59,12,Median Household Income,Households\n";

    fn catalog() -> ContentCatalog {
        ContentCatalog::from_csv_bytes(DatasetKind::Acs5Year, 2016, CATALOG.as_bytes()).unwrap()
    }

    #[test]
    fn test_load_and_lookup_case_insensitive() {
        let catalog = catalog();
        assert_eq!(catalog.len(), 4);
        let entry = catalog.get("b01003_001").unwrap();
        assert_eq!(entry.file_segment, 3);
        assert_eq!(entry.position, 0);
        assert!(catalog.contains("B19013_001"));
    }

    #[test]
    fn test_lookup_file_segments_groups_in_request_order() {
        let catalog = catalog();
        let segments =
            lookup_file_segments(&catalog, &["B01001_002", "B01003_001", "b01001_001"]).unwrap();

        let keys: Vec<u32> = segments.keys().copied().collect();
        assert_eq!(keys, vec![2, 3]);
        assert_eq!(segments[&2], vec!["B01001_002", "B01001_001"]);
        assert_eq!(segments[&3], vec!["B01003_001"]);
    }

    #[test]
    fn test_lookup_unknown_reference_fails() {
        let catalog = catalog();
        let err = lookup_file_segments(&catalog, &["B01003_001", "X99999_999"]).unwrap_err();
        match err {
            CensusError::UnknownReference { references, .. } => {
                assert_eq!(references, vec!["X99999_999"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_search() {
        let catalog = catalog();
        assert_eq!(catalog.search("sex by age").len(), 2);
        assert_eq!(catalog.search("B19013").len(), 1);
    }
}

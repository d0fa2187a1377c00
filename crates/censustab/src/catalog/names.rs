//! FIPS and CBSA name tables used to resolve user-typed area names.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::codes::state_by_abbr;
use crate::error::{CensusError, Result};

/// A named county, county subdivision or place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FipsName {
    /// State abbreviation.
    pub state: String,
    /// Geo-header the code belongs to (`COUNTY`, `COUSUB`, `PLACE`, ...).
    pub geoheader: String,
    pub code: String,
    /// Name including its type word, e.g. "Lincoln town".
    pub name: String,
}

/// A core-based statistical area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CbsaName {
    pub code: String,
    pub title: String,
    #[serde(default)]
    pub metro_micro: String,
}

/// Name tables for area resolution.
#[derive(Debug, Clone, Default)]
pub struct NameTables {
    fips: Vec<FipsName>,
    /// (STATE, lowercase name) -> indexes into `fips`.
    fips_by_name: HashMap<(String, String), Vec<usize>>,
    /// (STATE, GEOHEADER, code) -> index into `fips`.
    fips_by_code: HashMap<(String, String, String), usize>,
    cbsa: Vec<CbsaName>,
}

impl NameTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build tables from parsed entries.
    pub fn from_entries(
        fips: impl IntoIterator<Item = FipsName>,
        cbsa: impl IntoIterator<Item = CbsaName>,
    ) -> Self {
        let mut tables = Self::new();
        for entry in fips {
            tables.add_fips(entry);
        }
        tables.cbsa = cbsa.into_iter().collect();
        tables
    }

    /// Load `fips_names.csv` and `cbsa_names.csv`. A missing file yields an
    /// empty table; name-based area lookup then finds nothing.
    pub fn load(fips_path: impl AsRef<Path>, cbsa_path: impl AsRef<Path>) -> Result<Self> {
        let fips: Vec<FipsName> = read_optional_csv(fips_path.as_ref())?;
        let cbsa: Vec<CbsaName> = read_optional_csv(cbsa_path.as_ref())?;
        Ok(Self::from_entries(fips, cbsa))
    }

    fn add_fips(&mut self, mut entry: FipsName) {
        entry.state = entry.state.trim().to_uppercase();
        entry.geoheader = entry.geoheader.trim().to_uppercase();
        entry.code = entry.code.trim().to_string();
        entry.name = entry.name.trim().to_string();

        let idx = self.fips.len();
        self.fips_by_name
            .entry((entry.state.clone(), entry.name.to_lowercase()))
            .or_default()
            .push(idx);
        self.fips_by_code.insert(
            (entry.state.clone(), entry.geoheader.clone(), entry.code.clone()),
            idx,
        );
        self.fips.push(entry);
    }

    /// All entries named `name` in `state` (case-insensitive).
    pub fn find_by_name(&self, state: &str, name: &str) -> Vec<&FipsName> {
        let key = (state.trim().to_uppercase(), name.trim().to_lowercase());
        self.fips_by_name
            .get(&key)
            .map(|idxs| idxs.iter().map(|&i| &self.fips[i]).collect())
            .unwrap_or_default()
    }

    /// Display name for a code, e.g. ("RI", "PLACE", "59000") -> "Providence city, RI".
    pub fn name_for_code(&self, state: &str, geoheader: &str, code: &str) -> Option<String> {
        let geoheader = geoheader.trim().to_uppercase();
        match geoheader.as_str() {
            "STATE" => state_by_abbr(state).map(|s| s.name.to_string()),
            "CBSA" => self.cbsa_by_code(code).map(|c| c.title.clone()),
            _ => {
                let key = (state.trim().to_uppercase(), geoheader, code.trim().to_string());
                self.fips_by_code
                    .get(&key)
                    .map(|&i| format!("{}, {}", self.fips[i].name, self.fips[i].state))
            }
        }
    }

    pub fn cbsa_by_code(&self, code: &str) -> Option<&CbsaName> {
        let code = code.trim();
        self.cbsa.iter().find(|c| c.code == code)
    }

    /// CBSAs whose title matches `name`. An exact title wins; otherwise the
    /// first title segment (before the comma) is matched by prefix.
    pub fn find_cbsa(&self, name: &str) -> Vec<&CbsaName> {
        let needle = name.trim().to_lowercase();
        let exact: Vec<&CbsaName> = self
            .cbsa
            .iter()
            .filter(|c| c.title.to_lowercase() == needle)
            .collect();
        if !exact.is_empty() {
            return exact;
        }
        self.cbsa
            .iter()
            .filter(|c| {
                c.title
                    .split(',')
                    .next()
                    .map(|city| city.trim().to_lowercase().starts_with(&needle))
                    .unwrap_or(false)
            })
            .collect()
    }

    pub fn fips_len(&self) -> usize {
        self.fips.len()
    }

    pub fn cbsa_len(&self) -> usize {
        self.cbsa.len()
    }
}

fn read_optional_csv<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        tracing::warn!(path = %path.display(), "name table not found; area names will not resolve");
        return Ok(Vec::new());
    }

    let mut file = File::open(path).map_err(|e| CensusError::io(path, e))?;
    let mut contents = Vec::new();
    file.read_to_end(&mut contents)
        .map_err(|e| CensusError::io(path, e))?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(contents.as_slice());

    let mut rows = Vec::new();
    for record in reader.deserialize::<T>() {
        rows.push(record?);
    }
    Ok(rows)
}

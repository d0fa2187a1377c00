//! Per-state intermediate tables.

use std::collections::BTreeMap;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// LOGRECNO: joins a geography row to its content rows within one state's
/// file set. Keys from different states are unrelated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordKey(pub u32);

impl RecordKey {
    /// Parse a zero-padded LOGRECNO field.
    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim().parse().ok().map(RecordKey)
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:07}", self.0)
    }
}

/// Content values for one state, keyed by record key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentTable {
    columns: Vec<String>,
    rows: BTreeMap<RecordKey, Vec<Option<f64>>>,
}

impl ContentTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: BTreeMap::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Record keys in ascending order.
    pub fn record_keys(&self) -> impl Iterator<Item = RecordKey> + '_ {
        self.rows.keys().copied()
    }

    pub fn row(&self, key: RecordKey) -> Option<&[Option<f64>]> {
        self.rows.get(&key).map(|v| v.as_slice())
    }

    /// Value of one column for one record key.
    pub fn value(&self, key: RecordKey, column: &str) -> Option<f64> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.rows.get(&key).and_then(|row| row.get(idx).copied().flatten())
    }

    /// Insert a row; returns `true` when it replaced an existing key.
    pub fn insert(&mut self, key: RecordKey, values: Vec<Option<f64>>) -> bool {
        debug_assert_eq!(values.len(), self.columns.len());
        self.rows.insert(key, values).is_some()
    }

    /// Append rows of a table with the same columns (e.g. another file group).
    pub fn append(&mut self, other: ContentTable) -> usize {
        debug_assert_eq!(self.columns, other.columns);
        let mut replaced = 0;
        for (key, values) in other.rows {
            if self.insert(key, values) {
                replaced += 1;
            }
        }
        replaced
    }

    /// Outer join on record key: keys present in either side survive, and
    /// cells missing on one side are null.
    pub fn outer_join(mut self, other: ContentTable) -> ContentTable {
        let left_width = self.columns.len();
        let right_width = other.columns.len();
        self.columns.extend(other.columns);

        for row in self.rows.values_mut() {
            row.resize(left_width + right_width, None);
        }
        for (key, values) in other.rows {
            let row = self
                .rows
                .entry(key)
                .or_insert_with(|| vec![None; left_width + right_width]);
            row[left_width..].copy_from_slice(&values);
        }
        self
    }

    /// Keep and reorder columns by name. Unknown names are ignored.
    pub fn select(self, order: &[String]) -> ContentTable {
        let indexes: Vec<usize> = order
            .iter()
            .filter_map(|name| self.columns.iter().position(|c| c == name))
            .collect();
        let columns = indexes.iter().map(|&i| self.columns[i].clone()).collect();
        let rows = self
            .rows
            .into_iter()
            .map(|(key, row)| (key, indexes.iter().map(|&i| row[i]).collect()))
            .collect();
        ContentTable { columns, rows }
    }
}

/// One geographic entity instance from a state's geography file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeographyRow {
    pub geoid: String,
    pub name: String,
    pub summary_level: String,
    pub geo_component: String,
    /// State abbreviation.
    pub state: String,
    pub record_key: RecordKey,
    /// Requested geo-header codes; containment headers are replaced during
    /// enrichment.
    pub geo_headers: IndexMap<String, Option<String>>,
    /// Geo-header codes exactly as the survey file gives them.
    pub raw_geo_headers: IndexMap<String, Option<String>>,
    pub lon: Option<f64>,
    pub lat: Option<f64>,
}

impl GeographyRow {
    pub fn geo_header(&self, header: &str) -> Option<&str> {
        self.geo_headers.get(header).and_then(|v| v.as_deref())
    }
}

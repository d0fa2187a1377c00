//! File segment reader: one (state, segment, estimate/margin) file set.

use std::borrow::Cow;
use std::path::Path;

use super::coerce::CoercionStats;
use super::table::{ContentTable, RecordKey};
use super::open_reader;
use crate::catalog::ContentCatalog;
use crate::dataset::{DataLayout, SegmentFile, ValueKind};
use crate::error::{CensusError, Result};

/// Reads content segment files for one dataset-year.
#[derive(Debug, Clone, Copy)]
pub struct SegmentReader<'a> {
    layout: &'a DataLayout,
    catalog: &'a ContentCatalog,
    delimiter: u8,
}

impl<'a> SegmentReader<'a> {
    pub fn new(layout: &'a DataLayout, catalog: &'a ContentCatalog, delimiter: u8) -> Self {
        Self {
            layout,
            catalog,
            delimiter,
        }
    }

    pub fn layout(&self) -> &'a DataLayout {
        self.layout
    }

    pub fn catalog(&self) -> &'a ContentCatalog {
        self.catalog
    }

    /// Read the requested references from one segment of one state.
    ///
    /// Columns are named `<reference>_e` or `<reference>_m` in request order.
    /// Rows are keyed by record key; when a key repeats, the later row wins.
    pub fn read_segment(
        &self,
        state: &str,
        segment: u32,
        references: &[String],
        value: ValueKind,
    ) -> Result<ContentTable> {
        let leading = self.layout.kind().leading_columns().len();
        let mut positions = Vec::with_capacity(references.len());
        let mut missing = Vec::new();
        for reference in references {
            match self.catalog.get(reference) {
                Some(entry) if entry.file_segment == segment => {
                    positions.push(leading + entry.position)
                }
                _ => missing.push(reference.clone()),
            }
        }
        if !missing.is_empty() {
            return Err(CensusError::UnknownReference {
                context: format!("{} segment {}", self.catalog.context(), segment),
                references: missing,
            });
        }

        let columns = references
            .iter()
            .map(|r| format!("{}{}", r, value.suffix()))
            .collect();
        let mut table = ContentTable::new(columns);

        for file in self.layout.content_files(state, segment, value) {
            let Some(part) = self.read_file(&file, &positions, table.columns().to_vec())? else {
                continue;
            };
            let replaced = table.append(part);
            if replaced > 0 {
                tracing::warn!(
                    path = %file.path.display(),
                    replaced,
                    "duplicate record keys across file groups"
                );
            }
        }

        Ok(table)
    }

    /// Read one physical file. `None` when an optional file is absent.
    fn read_file(
        &self,
        file: &SegmentFile,
        positions: &[usize],
        columns: Vec<String>,
    ) -> Result<Option<ContentTable>> {
        if file.optional && !file.path.exists() {
            tracing::debug!(path = %file.path.display(), "optional segment file absent; no rows");
            return Ok(None);
        }

        let key_position = self.layout.kind().record_key_position();
        let mut reader = open_reader(&file.path, self.delimiter)?;
        let mut table = ContentTable::new(columns);
        let mut stats = CoercionStats::default();
        let mut duplicates = 0usize;

        for (row_idx, result) in reader.byte_records().enumerate() {
            let record = result?;
            let key = parse_key(&file.path, row_idx, record.get(key_position))?;

            let values = positions
                .iter()
                .map(|&pos| stats.coerce(&cell_text(record.get(pos))))
                .collect();

            if table.insert(key, values) {
                duplicates += 1;
            }
        }

        if duplicates > 0 {
            tracing::warn!(path = %file.path.display(), duplicates, "duplicate record keys in segment file");
        }
        if stats.invalid > 0 {
            tracing::debug!(
                path = %file.path.display(),
                invalid = stats.invalid,
                "non-numeric content cells read as null"
            );
        }
        tracing::debug!(
            path = %file.path.display(),
            rows = table.len(),
            missing = stats.missing,
            "read segment file"
        );

        Ok(Some(table))
    }
}

/// Cell text; bytes that are not UTF-8 are replaced, never dropped.
fn cell_text(field: Option<&[u8]>) -> Cow<'_, str> {
    field.map(String::from_utf8_lossy).unwrap_or_default()
}

fn parse_key(path: &Path, row_idx: usize, field: Option<&[u8]>) -> Result<RecordKey> {
    field
        .and_then(|b| std::str::from_utf8(b).ok())
        .and_then(RecordKey::parse)
        .ok_or_else(|| CensusError::Parse {
            path: path.to_path_buf(),
            row: row_idx + 1,
            message: "missing or non-numeric LOGRECNO".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ContentEntry;
    use crate::read::{coerce_cell, Coerced};
    use crate::dataset::DatasetKind;
    use std::fs;

    fn catalog() -> ContentCatalog {
        let entry = |reference: &str, position| ContentEntry {
            reference: reference.to_string(),
            file_segment: 3,
            position,
            table_name: String::new(),
            universe: String::new(),
        };
        ContentCatalog::from_entries(
            DatasetKind::Acs1Year,
            2017,
            vec![entry("B01003_001", 0), entry("B01003_002", 1)],
        )
    }

    #[test]
    fn test_read_segment_projects_and_coerces() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DataLayout::new(dir.path(), DatasetKind::Acs1Year, 2017);
        let path = &layout.content_files("RI", 3, ValueKind::Estimate)[0].path;
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(
            path,
            "ACSSF,2017e1,ri,000,0003,0000001,1056426,.\n\
             ACSSF,2017e1,ri,000,0003,0000002,.,12\n",
        )
        .unwrap();

        let catalog = catalog();
        let reader = SegmentReader::new(&layout, &catalog, b',');
        let table = reader
            .read_segment(
                "RI",
                3,
                &["B01003_002".to_string(), "B01003_001".to_string()],
                ValueKind::Estimate,
            )
            .unwrap();

        assert_eq!(table.columns(), &["B01003_002_e".to_string(), "B01003_001_e".to_string()]);
        assert_eq!(table.row(RecordKey(1)).unwrap(), &[None, Some(1056426.0)]);
        assert_eq!(table.row(RecordKey(2)).unwrap(), &[Some(12.0), None]);
    }

    #[test]
    fn test_non_utf8_cell_is_invalid_not_missing() {
        let raw = cell_text(Some(&b"12\xff4"[..]));
        assert_eq!(coerce_cell(&raw), Coerced::Invalid);
        assert_eq!(coerce_cell(&cell_text(None)), Coerced::Missing);

        let dir = tempfile::tempdir().unwrap();
        let layout = DataLayout::new(dir.path(), DatasetKind::Acs1Year, 2017);
        let path = &layout.content_files("RI", 3, ValueKind::Estimate)[0].path;
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"ACSSF,2017e1,ri,000,0003,0000001,\xff\xfe,7\n".as_slice()).unwrap();

        let catalog = catalog();
        let reader = SegmentReader::new(&layout, &catalog, b',');
        let table = reader
            .read_segment(
                "RI",
                3,
                &["B01003_001".to_string(), "B01003_002".to_string()],
                ValueKind::Estimate,
            )
            .unwrap();
        assert_eq!(table.row(RecordKey(1)).unwrap(), &[None, Some(7.0)]);
    }

    #[test]
    fn test_missing_required_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DataLayout::new(dir.path(), DatasetKind::Acs1Year, 2017);
        let catalog = catalog();
        let reader = SegmentReader::new(&layout, &catalog, b',');
        let err = reader
            .read_segment("RI", 3, &["B01003_001".to_string()], ValueKind::Margin)
            .unwrap_err();
        assert!(matches!(err, CensusError::Io { .. }));
    }

    #[test]
    fn test_bad_record_key_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DataLayout::new(dir.path(), DatasetKind::Acs1Year, 2017);
        let path = &layout.content_files("RI", 3, ValueKind::Estimate)[0].path;
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "ACSSF,2017e1,ri,000,0003,abc,1,2\n").unwrap();

        let catalog = catalog();
        let reader = SegmentReader::new(&layout, &catalog, b',');
        let err = reader
            .read_segment("RI", 3, &["B01003_001".to_string()], ValueKind::Estimate)
            .unwrap_err();
        assert!(matches!(err, CensusError::Parse { row: 1, .. }));
    }
}

//! Content merger: every segment a content set needs, joined on record key.

use super::segment::SegmentReader;
use super::table::ContentTable;
use crate::catalog::lookup_file_segments;
use crate::dataset::ValueKind;
use crate::error::Result;
use crate::resolve::ContentRequest;

/// Read and merge all content for one state.
///
/// Segments are read in the order their first reference was requested and
/// outer-joined on record key, so a key present in any segment survives.
/// Columns follow segment order; with margins, each estimate column is
/// directly followed by its margin column. With no requests the table is
/// empty.
pub fn read_contents(
    reader: &SegmentReader<'_>,
    state: &str,
    requests: &[ContentRequest],
    with_margin: bool,
) -> Result<ContentTable> {
    let references: Vec<&str> = requests.iter().map(|r| r.reference.as_str()).collect();
    let segments = lookup_file_segments(reader.catalog(), &references)?;

    let mut merged: Option<ContentTable> = None;
    let mut order = Vec::new();

    for (segment, refs) in &segments {
        let mut table = reader.read_segment(state, *segment, refs, ValueKind::Estimate)?;
        if with_margin {
            let margins = reader.read_segment(state, *segment, refs, ValueKind::Margin)?;
            table = table.outer_join(margins);
        }

        for reference in refs {
            order.push(format!("{}{}", reference, ValueKind::Estimate.suffix()));
            if with_margin {
                order.push(format!("{}{}", reference, ValueKind::Margin.suffix()));
            }
        }

        merged = Some(match merged {
            Some(acc) => acc.outer_join(table),
            None => table,
        });
    }

    let merged = merged.unwrap_or_default();
    tracing::debug!(
        state,
        segments = segments.len(),
        rows = merged.len(),
        "merged content segments"
    );
    Ok(merged.select(&order))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ContentCatalog, ContentEntry};
    use crate::dataset::{DataLayout, DatasetKind};
    use crate::read::RecordKey;
    use std::fs;

    fn entry(reference: &str, segment: u32, position: usize) -> ContentEntry {
        ContentEntry {
            reference: reference.to_string(),
            file_segment: segment,
            position,
            table_name: String::new(),
            universe: String::new(),
        }
    }

    fn write(layout: &DataLayout, segment: u32, value: ValueKind, body: &str) {
        let path = &layout.content_files("RI", segment, value)[0].path;
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, body).unwrap();
    }

    fn request(reference: &str) -> ContentRequest {
        ContentRequest {
            name: reference.to_string(),
            reference: reference.to_string(),
        }
    }

    #[test]
    fn test_merge_across_segments_is_outer_join() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DataLayout::new(dir.path(), DatasetKind::Acs1Year, 2017);
        let catalog = ContentCatalog::from_entries(
            DatasetKind::Acs1Year,
            2017,
            vec![entry("A_001", 1, 0), entry("B_001", 2, 0)],
        );
        write(&layout, 1, ValueKind::Estimate, "f,t,ri,000,0001,1,10\nf,t,ri,000,0001,2,20\n");
        write(&layout, 1, ValueKind::Margin, "f,t,ri,000,0001,1,1\nf,t,ri,000,0001,2,2\n");
        write(&layout, 2, ValueKind::Estimate, "f,t,ri,000,0002,2,200\nf,t,ri,000,0002,3,300\n");
        write(&layout, 2, ValueKind::Margin, "f,t,ri,000,0002,2,.\nf,t,ri,000,0002,3,30\n");

        let reader = SegmentReader::new(&layout, &catalog, b',');
        let table = read_contents(&reader, "RI", &[request("B_001"), request("A_001")], true).unwrap();

        assert_eq!(table.columns(), &["B_001_e", "B_001_m", "A_001_e", "A_001_m"]);
        let keys: Vec<u32> = table.record_keys().map(|k| k.0).collect();
        assert_eq!(keys, vec![1, 2, 3]);
        assert_eq!(table.row(RecordKey(1)).unwrap(), &[None, None, Some(10.0), Some(1.0)]);
        assert_eq!(table.row(RecordKey(2)).unwrap(), &[Some(200.0), None, Some(20.0), Some(2.0)]);
        assert_eq!(table.row(RecordKey(3)).unwrap(), &[Some(300.0), Some(30.0), None, None]);
    }

    #[test]
    fn test_no_requests_reads_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DataLayout::new(dir.path(), DatasetKind::Acs1Year, 2017);
        let catalog = ContentCatalog::new(DatasetKind::Acs1Year, 2017);
        let reader = SegmentReader::new(&layout, &catalog, b',');
        let table = read_contents(&reader, "RI", &[], false).unwrap();
        assert!(table.is_empty());
        assert!(table.columns().is_empty());
    }
}

//! Segment reader performance benchmarks.
//!
//! Measures segment reading, multi-segment merging and cell coercion on
//! synthetic ACS 1-year files.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use censustab::catalog::ContentEntry;
use censustab::read::{coerce_numeric, read_contents, SegmentReader};
use censustab::resolve::ContentRequest;
use censustab::{ContentCatalog, DataLayout, DatasetKind, ValueKind};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const YEAR: u16 = 2017;

/// Generate one synthetic content file with the given rows and cells per row.
fn generate_segment(segment: u32, rows: usize, cells: usize) -> String {
    let mut data = String::new();
    for row in 0..rows {
        data.push_str(&format!("ACSSF,{}e1,ri,000,{:04},{:07}", YEAR, segment, row + 1));
        for col in 0..cells {
            data.push(',');
            // Every seventh cell is a placeholder
            match (row + col) % 7 {
                0 => data.push('.'),
                _ => data.push_str(&format!("{}", row * 31 + col)),
            }
        }
        data.push('\n');
    }
    data
}

/// Catalog with `cells` references in each of `segments` segments.
fn generate_catalog(segments: u32, cells: usize) -> ContentCatalog {
    let entries = (1..=segments).flat_map(|segment| {
        (0..cells).map(move |position| ContentEntry {
            reference: reference(segment, position),
            file_segment: segment,
            position,
            table_name: format!("Table {}", segment),
            universe: String::new(),
        })
    });
    ContentCatalog::from_entries(DatasetKind::Acs1Year, YEAR, entries)
}

fn reference(segment: u32, position: usize) -> String {
    format!("B{:05}_{:03}", segment, position + 1)
}

/// Write estimate and margin files for every segment.
fn write_dataset(root: &Path, segments: u32, rows: usize, cells: usize) -> DataLayout {
    let layout = DataLayout::new(root, DatasetKind::Acs1Year, YEAR);
    for segment in 1..=segments {
        let data = generate_segment(segment, rows, cells);
        for value in [ValueKind::Estimate, ValueKind::Margin] {
            let path = &layout.content_files("RI", segment, value)[0].path;
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, &data).unwrap();
        }
    }
    layout
}

/// Benchmark reading one segment of various sizes.
fn bench_read_segment(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_segment");
    let cells = 50;
    let catalog = generate_catalog(1, cells);
    let references: Vec<String> = (0..10).map(|p| reference(1, p * 5)).collect();

    for rows in [100, 1_000, 10_000].iter() {
        let dir = TempDir::new().unwrap();
        let layout = write_dataset(dir.path(), 1, *rows, cells);
        let bytes = fs::metadata(&layout.content_files("RI", 1, ValueKind::Estimate)[0].path)
            .unwrap()
            .len();
        let reader = SegmentReader::new(&layout, &catalog, b',');

        group.throughput(Throughput::Bytes(bytes));
        group.bench_with_input(BenchmarkId::new("rows", rows), &references, |b, refs| {
            b.iter(|| {
                black_box(
                    reader
                        .read_segment("RI", 1, refs, ValueKind::Estimate)
                        .unwrap(),
                )
            })
        });
    }

    group.finish();
}

/// Benchmark merging contents spread over several segments.
fn bench_read_contents(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_contents");
    let rows = 2_000;
    let cells = 20;

    for segments in [1u32, 4, 8].iter() {
        let dir = TempDir::new().unwrap();
        let layout = write_dataset(dir.path(), *segments, rows, cells);
        let catalog = generate_catalog(*segments, cells);
        let reader = SegmentReader::new(&layout, &catalog, b',');
        let requests: Vec<ContentRequest> = (1..=*segments)
            .flat_map(|s| (0..3).map(move |p| reference(s, p)))
            .map(|r| ContentRequest {
                name: r.clone(),
                reference: r,
            })
            .collect();

        group.bench_with_input(BenchmarkId::new("segments", segments), &requests, |b, reqs| {
            b.iter(|| black_box(read_contents(&reader, "RI", reqs, false).unwrap()))
        });
        group.bench_with_input(
            BenchmarkId::new("segments_with_margin", segments),
            &requests,
            |b, reqs| b.iter(|| black_box(read_contents(&reader, "RI", reqs, true).unwrap())),
        );
    }

    group.finish();
}

/// Benchmark coercing raw cells.
fn bench_coerce(c: &mut Criterion) {
    let mut group = c.benchmark_group("coerce");
    let cells: Vec<String> = (0..10_000)
        .map(|i| match i % 5 {
            0 => ".".to_string(),
            1 => "(X)".to_string(),
            2 => format!("{}.{}", i, i % 10),
            _ => i.to_string(),
        })
        .collect();

    group.throughput(Throughput::Elements(cells.len() as u64));
    group.bench_function("mixed_cells", |b| {
        b.iter(|| {
            let numbers = cells
                .iter()
                .filter_map(|c| coerce_numeric(black_box(c)))
                .count();
            black_box(numbers)
        })
    });

    group.finish();
}

criterion_group!(benches, bench_read_segment, bench_read_contents, bench_coerce);
criterion_main!(benches);

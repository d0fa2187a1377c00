//! Example: Read population and income for a few places from ACS 5-year files.
//!
//! Usage:
//!   CENSUSTAB_DATA_ROOT=<data_root> cargo run --example read_survey -- [state...]
//!
//! Example:
//!   CENSUSTAB_DATA_ROOT=/data/census cargo run --example read_survey -- RI MA

use std::env;

use censustab::{CensusConfig, DatasetKind, SurveyQuery, SurveyReader, DATA_ROOT_ENV};

fn main() -> censustab::Result<()> {
    let mut states: Vec<String> = env::args().skip(1).collect();
    if states.is_empty() {
        states.push("RI".to_string());
    }

    let config = CensusConfig::from_env();
    if config.data_root.is_none() {
        eprintln!("Error: set {} to the census data root", DATA_ROOT_ENV);
        std::process::exit(1);
    }

    let reader = SurveyReader::open(config)?;

    let separator = "=".repeat(80);
    println!("{}", separator);
    println!("ACS 5-year 2016: places in {}", states.join(", "));
    println!("{}", separator);
    println!();

    // Where the requested contents live
    let contents = ["population = B01003_001", "median_income = B19013_001"];
    println!("## File Segments");
    let segments =
        reader.lookup_content_file_segments(DatasetKind::Acs5Year, 2016, &["B01003_001", "B19013_001"])?;
    for (segment, references) in &segments {
        println!("  {:04}: {}", segment, references.join(", "));
    }
    println!();

    let query = SurveyQuery::new(DatasetKind::Acs5Year, 2016)
        .states(states)
        .table_contents(contents)
        .geo_headers(["PLACE"])
        .summary_level("place")
        .with_margin(true);

    let table = reader.read_survey(&query)?;

    println!("## Result ({} rows, {} columns)", table.row_count(), table.column_count());
    println!("  {}", table.columns().join(" | "));
    for row in table.rows().iter().take(20) {
        let cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        println!("  {}", cells.join(" | "));
    }
    if table.row_count() > 20 {
        println!("  ... {} more rows", table.row_count() - 20);
    }
    println!();

    println!("{}", separator);
    Ok(())
}

//! Segments command - show which file segments hold table contents.

use censustab::{CensusConfig, DatasetKind, SurveyReader};
use colored::Colorize;

pub fn run(
    config: CensusConfig,
    dataset: String,
    year: u16,
    references: Vec<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let kind: DatasetKind = dataset.parse()?;
    let reader = SurveyReader::open(config)?;
    let segments = reader.lookup_content_file_segments(kind, year, &references)?;
    let catalog = &reader.registry().get(kind, year)?.content;

    println!("{} {} {}", "File segments for".cyan().bold(), kind, year);
    println!();
    for (segment, refs) in &segments {
        println!("  {} {:04}", "segment".yellow(), segment);
        for reference in refs {
            let table = catalog
                .get(reference)
                .map(|e| e.table_name.as_str())
                .unwrap_or_default();
            println!("    {} {}", reference.white().bold(), table.dimmed());
        }
    }

    Ok(())
}

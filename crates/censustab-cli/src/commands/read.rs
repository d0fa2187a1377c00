//! Read command - extract a survey subset as CSV or JSON.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use censustab::{CensusConfig, DatasetKind, SurveyQuery, SurveyReader};
use colored::Colorize;

use crate::cli::OutputFormat;

/// Query arguments collected from the command line.
pub struct ReadArgs {
    pub dataset: String,
    pub year: u16,
    pub states: Vec<String>,
    pub contents: Vec<String>,
    pub areas: Vec<String>,
    pub geo_headers: Vec<String>,
    pub summary_level: String,
    pub geo_component: String,
    pub margin: bool,
    pub raw_geo_headers: bool,
}

impl ReadArgs {
    fn into_query(self) -> Result<SurveyQuery, Box<dyn std::error::Error>> {
        let dataset: DatasetKind = self.dataset.parse()?;
        Ok(SurveyQuery::new(dataset, self.year)
            .states(self.states)
            .table_contents(self.contents)
            .areas(self.areas)
            .geo_headers(self.geo_headers)
            .summary_level(self.summary_level)
            .geo_component(self.geo_component)
            .with_margin(self.margin)
            .with_raw_geo_headers(self.raw_geo_headers))
    }
}

pub fn run(
    config: CensusConfig,
    args: ReadArgs,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let query = args.into_query()?;
    let reader = SurveyReader::open(config)?;
    let table = reader.read_survey(&query)?;

    let writer: Box<dyn Write> = match &output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    match format {
        OutputFormat::Csv => table.write_csv(writer)?,
        OutputFormat::Json => {
            let mut writer = writer;
            serde_json::to_writer_pretty(&mut writer, &table)?;
            writeln!(writer)?;
            writer.flush()?;
        }
    }

    if let Some(path) = output {
        eprintln!(
            "{} {} rows x {} columns to {}",
            "Wrote".green().bold(),
            table.row_count().to_string().white().bold(),
            table.column_count(),
            path.display().to_string().cyan()
        );
    }

    Ok(())
}

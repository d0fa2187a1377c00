//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// censustab: extract tables from census survey flat files
#[derive(Parser)]
#[command(name = "censustab")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding the census files (overrides CENSUSTAB_DATA_ROOT)
    #[arg(long, global = true, value_name = "DIR")]
    pub data_root: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract table contents for a set of states
    Read {
        /// Dataset (acs5, acs1, decennial)
        #[arg(value_name = "DATASET")]
        dataset: String,

        /// Survey year
        #[arg(value_name = "YEAR")]
        year: u16,

        /// State abbreviations (comma-separated; US for the nation)
        #[arg(short, long, value_delimiter = ',', required = true)]
        states: Vec<String>,

        /// Table contents, "alias = code" or "code" (repeatable)
        #[arg(short, long = "contents")]
        contents: Vec<String>,

        /// Area specifiers (repeatable; cannot use with --geo-headers)
        #[arg(short, long, conflicts_with = "geo_headers")]
        areas: Vec<String>,

        /// Geo-headers to output (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        geo_headers: Vec<String>,

        /// Summary level alias or code
        #[arg(long, default_value = "*")]
        summary_level: String,

        /// Geographic component alias or code
        #[arg(long, default_value = "total")]
        geo_component: String,

        /// Include margins of error (ACS only)
        #[arg(long)]
        margin: bool,

        /// Also output containment geo-headers as given by the survey files
        #[arg(long)]
        raw_geo_headers: bool,

        /// Output format
        #[arg(short, long, default_value = "csv")]
        format: OutputFormat,

        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show how area specifiers resolve
    Areas {
        /// Area specifiers, e.g. "Lincoln town, RI" or "PLACE = RI59000"
        #[arg(value_name = "AREA", required = true)]
        specifiers: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show which file segments hold table contents
    Segments {
        /// Dataset (acs5, acs1, decennial)
        #[arg(value_name = "DATASET")]
        dataset: String,

        /// Survey year
        #[arg(value_name = "YEAR")]
        year: u16,

        /// Table-content references
        #[arg(value_name = "REFERENCE", required = true)]
        references: Vec<String>,
    },

    /// List summary-level and geographic-component codes
    Codes {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use csv or json.", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Csv => write!(f, "csv"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

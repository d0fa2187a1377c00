//! censustab: extract tables from census survey flat files.
//!
//! Reads the decennial census and the ACS 1-year and 5-year summary files
//! from a local data root, joins each state's geography file with the
//! requested table contents on the record key (LOGRECNO), and returns one
//! flat table with names, codes and coordinates.
//!
//! # Core Principles
//!
//! - **Validate first**: every query error surfaces before a file is opened
//! - **Reference-derived containment**: the county subdivision and place of
//!   small geographies come from a precomputed reference dataset
//! - **Nulls, not failures**: placeholder cells and unresolved areas never
//!   abort a read
//!
//! # Example
//!
//! ```no_run
//! use censustab::{CensusConfig, DatasetKind, SurveyQuery, SurveyReader};
//!
//! let reader = SurveyReader::open(CensusConfig::from_env()).unwrap();
//! let query = SurveyQuery::new(DatasetKind::Acs5Year, 2016)
//!     .states(["RI"])
//!     .table_contents(["population = B01003_001"])
//!     .geo_headers(["PLACE"])
//!     .summary_level("place");
//! let table = reader.read_survey(&query).unwrap();
//!
//! println!("Rows: {}", table.row_count());
//! ```

pub mod availability;
pub mod catalog;
pub mod config;
pub mod dataset;
pub mod error;
pub mod query;
pub mod read;
pub mod resolve;

pub use availability::{DatasetAvailability, LocalFiles};
pub use catalog::{lookup_file_segments, CatalogRegistry, ContentCatalog, NameTables};
pub use config::{CensusConfig, DATA_ROOT_ENV};
pub use dataset::{DataLayout, DatasetKind, ValueKind};
pub use error::{CensusError, Result};
pub use query::{ResultTable, SurveyQuery, SurveyReader, Value};
pub use resolve::{resolve_areas, resolve_geo_component, resolve_summary_level, ResolvedArea};

//! Reference catalogs: static and loaded lookup tables.
//!
//! - Content catalogs: which file segment and column hold each table-content
//!   reference, per dataset and year
//! - Geo-header layouts: column positions in the geography files
//! - Code tables: states, summary levels, geographic components
//! - Name tables: FIPS and CBSA names for area lookup
//!
//! Catalogs are immutable once loaded and are selected through
//! [`CatalogRegistry`] by `(DatasetKind, year)`.

mod codes;
mod content;
mod geoheader;
mod names;
mod registry;

pub use codes::{
    state_by_abbr, state_by_fips, GeoComponent, StateCode, SummaryLevel, GEO_COMPONENTS, STATES,
    SUMMARY_LEVELS,
};
pub use content::{lookup_file_segments, ContentCatalog, ContentEntry};
pub use geoheader::{
    GeoHeaderColumn, GeoHeaderLayout, KeyColumns, CONTAINMENT_HEADERS, SINGLE_ENTITY_HEADERS,
};
pub use names::{CbsaName, FipsName, NameTables};
pub use registry::{Catalog, CatalogRegistry};

//! Reference resolution: user-facing names to canonical codes.

mod area;
mod codes;
mod content;

pub use area::{resolve_areas, AreaSpecifier, CodePattern, ResolvedArea};
pub use codes::{resolve_geo_component, resolve_summary_level, WILDCARD};
pub use content::{parse_content_spec, resolve_table_contents, ContentRequest};

use crate::catalog::GeoHeaderLayout;
use crate::error::{CensusError, Result};

/// How rows are selected geographically. Exactly one of areas and
/// geo-headers drives a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    Areas,
    GeoHeaders,
}

impl QueryMode {
    /// Pick the mode from the selection arguments, rejecting both or neither.
    pub fn from_selection<A: AsRef<str>, G: AsRef<str>>(areas: &[A], geo_headers: &[G]) -> Result<Self> {
        let has_areas = areas.iter().any(|a| !a.as_ref().trim().is_empty());
        let has_headers = geo_headers.iter().any(|g| !g.as_ref().trim().is_empty());
        match (has_areas, has_headers) {
            (true, false) => Ok(QueryMode::Areas),
            (false, true) => Ok(QueryMode::GeoHeaders),
            (true, true) => Err(CensusError::InvalidQuery(
                "areas and geo headers cannot both be given".to_string(),
            )),
            (false, false) => Err(CensusError::InvalidQuery(
                "either areas or geo headers must be given".to_string(),
            )),
        }
    }
}

/// Canonicalize geo-header names against a layout. Unknown headers fail
/// with `UnknownReference`; duplicates are dropped.
pub fn resolve_geo_headers<S: AsRef<str>>(
    layout: &GeoHeaderLayout,
    raw: &[S],
    context: &str,
) -> Result<Vec<String>> {
    let mut headers: Vec<String> = Vec::new();
    let mut missing = Vec::new();

    for header in raw {
        let header = header.as_ref().trim();
        if header.is_empty() {
            continue;
        }
        match layout.get(header) {
            Some(column) => {
                let name = column.reference.to_string();
                if !headers.contains(&name) {
                    headers.push(name);
                }
            }
            None => missing.push(header.to_string()),
        }
    }

    if !missing.is_empty() {
        return Err(CensusError::UnknownReference {
            context: context.to_string(),
            references: missing,
        });
    }
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::DatasetKind;

    #[test]
    fn test_query_mode_exclusive() {
        let none: [&str; 0] = [];
        assert_eq!(
            QueryMode::from_selection(&["Lincoln town, RI"], &none).unwrap(),
            QueryMode::Areas
        );
        assert_eq!(
            QueryMode::from_selection(&none, &["PLACE"]).unwrap(),
            QueryMode::GeoHeaders
        );
        assert!(matches!(
            QueryMode::from_selection(&["Lincoln town, RI"], &["PLACE"]),
            Err(CensusError::InvalidQuery(_))
        ));
        assert!(matches!(
            QueryMode::from_selection(&none, &none),
            Err(CensusError::InvalidQuery(_))
        ));
        assert!(QueryMode::from_selection(&[" "], &none).is_err());
    }

    #[test]
    fn test_resolve_geo_headers() {
        let layout = GeoHeaderLayout::for_dataset(DatasetKind::Acs5Year, 2016);
        let headers = resolve_geo_headers(&layout, &["place", "COUNTY", "Place"], "acs5year 2016")
            .unwrap();
        assert_eq!(headers, vec!["PLACE", "COUNTY"]);

        let err = resolve_geo_headers(&layout, &["PLACE", "GALAXY"], "acs5year 2016").unwrap_err();
        assert!(matches!(err, CensusError::UnknownReference { .. }));
    }
}

//! Survey query arguments.

use serde::{Deserialize, Serialize};

use crate::dataset::DatasetKind;

/// Arguments of one `read_survey` call.
///
/// Exactly one of `areas` and `geo_headers` must be non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyQuery {
    pub dataset: DatasetKind,
    pub year: u16,
    /// State abbreviations; `US` is the nationwide aggregate.
    pub states: Vec<String>,
    /// Table-content specs, `"alias = code"` or `"code"`.
    #[serde(default)]
    pub table_contents: Vec<String>,
    #[serde(default)]
    pub areas: Vec<String>,
    #[serde(default)]
    pub geo_headers: Vec<String>,
    /// Summary-level alias or code; `*` for all.
    pub summary_level: String,
    /// Geographic-component alias or code; `*` for all.
    pub geo_component: String,
    #[serde(default)]
    pub with_margin: bool,
    /// Also output containment geo-headers as given by the survey file.
    #[serde(default)]
    pub with_raw_geo_headers: bool,
}

impl SurveyQuery {
    /// A query for every summary level and the total component.
    pub fn new(dataset: DatasetKind, year: u16) -> Self {
        Self {
            dataset,
            year,
            states: Vec::new(),
            table_contents: Vec::new(),
            areas: Vec::new(),
            geo_headers: Vec::new(),
            summary_level: "*".to_string(),
            geo_component: "total".to_string(),
            with_margin: false,
            with_raw_geo_headers: false,
        }
    }

    pub fn states<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.states = states.into_iter().map(Into::into).collect();
        self
    }

    pub fn table_contents<I, S>(mut self, contents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.table_contents = contents.into_iter().map(Into::into).collect();
        self
    }

    pub fn areas<I, S>(mut self, areas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.areas = areas.into_iter().map(Into::into).collect();
        self
    }

    pub fn geo_headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.geo_headers = headers.into_iter().map(Into::into).collect();
        self
    }

    pub fn summary_level(mut self, level: impl Into<String>) -> Self {
        self.summary_level = level.into();
        self
    }

    pub fn geo_component(mut self, component: impl Into<String>) -> Self {
        self.geo_component = component.into();
        self
    }

    pub fn with_margin(mut self, with_margin: bool) -> Self {
        self.with_margin = with_margin;
        self
    }

    pub fn with_raw_geo_headers(mut self, raw: bool) -> Self {
        self.with_raw_geo_headers = raw;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let query = SurveyQuery::new(DatasetKind::Acs5Year, 2016);
        assert_eq!(query.summary_level, "*");
        assert_eq!(query.geo_component, "total");
        assert!(!query.with_margin);
        assert!(!query.with_raw_geo_headers);
    }

    #[test]
    fn test_builder() {
        let query = SurveyQuery::new(DatasetKind::Acs5Year, 2016)
            .states(["RI", "MA"])
            .table_contents(["population = B01003_001"])
            .geo_headers(vec!["PLACE".to_string()])
            .summary_level("place")
            .with_margin(true);
        assert_eq!(query.states, vec!["RI", "MA"]);
        assert_eq!(query.geo_headers, vec!["PLACE"]);
        assert_eq!(query.summary_level, "place");
        assert!(query.with_margin);
    }
}

//! Query orchestration: validation, the per-state pipeline and result
//! assembly.
//!
//! A query is fully validated and resolved before any flat file is opened.
//! States are then processed one at a time:
//!
//! 1. read the geography file and keep rows at the requested summary level
//!    and geographic component
//! 2. join coordinates and corrected containment codes by GEOID
//! 3. read and merge the requested content segments
//! 4. attach content to geography rows by record key
//!
//! Each state's content table is dropped once its rows are attached. Rows
//! from all states are then ordered, tagged and laid out as a
//! [`ResultTable`].

use std::collections::HashSet;
use std::sync::Arc;

use indexmap::IndexMap;

use super::request::SurveyQuery;
use super::result::{ResultTable, Value};
use crate::availability::{DatasetAvailability, LocalFiles};
use crate::catalog::{lookup_file_segments, state_by_abbr, Catalog, CatalogRegistry};
use crate::config::CensusConfig;
use crate::dataset::{DataLayout, DatasetKind, ValueKind};
use crate::error::{CensusError, Result};
use crate::read::{
    enrich, read_contents, read_geography, GeographyRow, RecordKey, ReferenceDataset, SegmentReader,
};
use crate::resolve::{
    resolve_areas, resolve_geo_component, resolve_geo_headers, resolve_summary_level,
    resolve_table_contents, ContentRequest, QueryMode, ResolvedArea, WILDCARD,
};

/// Suffix of margin-of-error output columns.
pub const MARGIN_SUFFIX: &str = "_margin";

/// Suffix of raw containment geo-header output columns.
pub const RAW_SUFFIX: &str = "_raw";

/// Reads census survey extracts from a local data root.
pub struct SurveyReader {
    config: CensusConfig,
    registry: Arc<CatalogRegistry>,
    availability: Box<dyn DatasetAvailability>,
}

/// A validated, resolved query.
struct QueryPlan {
    layout: DataLayout,
    mode: QueryMode,
    states: Vec<String>,
    contents: Vec<ContentRequest>,
    summary_level: String,
    geo_component: String,
    areas: Vec<ResolvedArea>,
    /// Geo-headers read from the geography files.
    read_headers: Vec<String>,
    /// Geo-headers output as columns (geo-header mode).
    output_headers: Vec<String>,
    /// Header whose code names each row (geo-header mode).
    area_header: Option<String>,
    with_margin: bool,
    with_raw: bool,
}

impl QueryPlan {
    fn columns(&self) -> Vec<String> {
        let mut columns = Vec::new();
        if self.mode == QueryMode::Areas || self.area_header.is_some() {
            columns.push("area".to_string());
        }
        columns.extend(["GEOID", "lon", "lat", "state"].map(String::from));
        for header in &self.output_headers {
            columns.push(header.clone());
            if self.wants_raw(header) {
                columns.push(format!("{}{}", header, RAW_SUFFIX));
            }
        }
        for request in &self.contents {
            columns.push(request.name.clone());
            if self.with_margin {
                columns.push(format!("{}{}", request.name, MARGIN_SUFFIX));
            }
        }
        columns.extend(["GEOCOMP", "SUMLEV", "NAME"].map(String::from));
        columns
    }

    fn wants_raw(&self, header: &str) -> bool {
        self.with_raw && crate::catalog::CONTAINMENT_HEADERS.contains(&header)
    }

    fn keeps(&self, row: &GeographyRow) -> bool {
        (self.summary_level == WILDCARD || row.summary_level == self.summary_level)
            && (self.geo_component == WILDCARD || row.geo_component == self.geo_component)
    }
}

/// A geography row with its content values attached.
struct JoinedRow {
    geo: GeographyRow,
    values: Vec<Option<f64>>,
}

impl SurveyReader {
    /// Open a reader over the configured data root, loading every catalog
    /// found under it.
    pub fn open(config: CensusConfig) -> Result<Self> {
        let registry = CatalogRegistry::load(config.require_data_root()?)?;
        Ok(Self::with_registry(config, Arc::new(registry)))
    }

    /// Create a reader over prebuilt catalogs.
    pub fn with_registry(config: CensusConfig, registry: Arc<CatalogRegistry>) -> Self {
        Self {
            config,
            registry,
            availability: Box::new(LocalFiles),
        }
    }

    /// Replace the availability collaborator.
    pub fn with_availability(mut self, availability: impl DatasetAvailability + 'static) -> Self {
        self.availability = Box::new(availability);
        self
    }

    pub fn config(&self) -> &CensusConfig {
        &self.config
    }

    pub fn registry(&self) -> &CatalogRegistry {
        &self.registry
    }

    /// Resolve area specifiers against the loaded name tables.
    pub fn resolve_areas<S: AsRef<str>>(&self, specifiers: &[S]) -> Vec<ResolvedArea> {
        resolve_areas(self.registry.names(), specifiers)
    }

    /// File segments holding each reference, for a dataset and year.
    pub fn lookup_content_file_segments<S: AsRef<str>>(
        &self,
        kind: DatasetKind,
        year: u16,
        references: &[S],
    ) -> Result<IndexMap<u32, Vec<String>>> {
        let catalog = self.registry.get(kind, year)?;
        lookup_file_segments(&catalog.content, references)
    }

    /// Extract a survey subset.
    ///
    /// In area mode every output row is tagged with the specifier of the
    /// area it belongs to, areas in the order given; a row inside two areas
    /// appears once per area, unless both areas name the same geo-header
    /// code. In geo-header mode rows follow state order,
    /// then geography-file order.
    pub fn read_survey(&self, query: &SurveyQuery) -> Result<ResultTable> {
        let catalog = self.registry.get(query.dataset, query.year)?;
        let plan = self.plan(query, catalog)?;
        let columns = plan.columns();

        if plan.mode == QueryMode::Areas && plan.areas.is_empty() {
            tracing::warn!("no area specifier resolved; result is empty");
            return Ok(ResultTable::new(columns));
        }

        self.availability.ensure_available(&plan.layout, &plan.states)?;
        tracing::debug!(
            availability = self.availability.name(),
            dataset = %plan.layout.kind(),
            year = plan.layout.year(),
            "dataset available"
        );

        let mut per_state = Vec::with_capacity(plan.states.len());
        for state in &plan.states {
            per_state.push(self.read_state(&plan, catalog, state)?);
        }

        let mut table = ResultTable::new(columns);
        match plan.mode {
            QueryMode::Areas => {
                // Areas naming the same geo-header code (e.g. with and
                // without a state) emit each row once, under the first.
                let mut emitted: HashSet<(&str, &str, &str, RecordKey)> = HashSet::new();
                for area in &plan.areas {
                    let tag = Value::text(area.display_name.clone());
                    let matched = per_state.iter().flatten().filter(|row| {
                        area.matches(&row.geo.state, row.geo.geo_header(&area.geoheader))
                            && emitted.insert((
                                area.geoheader.as_str(),
                                area.code.as_str(),
                                row.geo.state.as_str(),
                                row.geo.record_key,
                            ))
                    });
                    table.extend_rows(matched.map(|row| self.layout_row(&plan, Some(tag.clone()), row)));
                }
            }
            QueryMode::GeoHeaders => {
                for row in per_state.iter().flatten() {
                    let tag = plan.area_header.as_ref().map(|header| self.area_name(row, header));
                    table.push_row(self.layout_row(&plan, tag, row));
                }
            }
        }

        tracing::info!(
            dataset = %plan.layout.kind(),
            year = plan.layout.year(),
            states = plan.states.len(),
            rows = table.row_count(),
            "survey read complete"
        );
        Ok(table)
    }

    /// Validate and resolve a query without touching any flat file.
    fn plan(&self, query: &SurveyQuery, catalog: &Catalog) -> Result<QueryPlan> {
        let root = self.config.require_data_root()?;
        let mode = QueryMode::from_selection(&query.areas, &query.geo_headers)?;

        if query.with_margin && !query.dataset.has_margin() {
            return Err(CensusError::InvalidQuery(format!(
                "{} has no margins of error",
                query.dataset
            )));
        }

        let states = normalize_states(&query.states)?;
        let contents = resolve_table_contents(&catalog.content, &query.table_contents)?;
        let summary_level = resolve_summary_level(&query.summary_level)?;
        let geo_component = resolve_geo_component(&query.geo_component)?;
        let context = format!("{} {}", catalog.kind, catalog.year);

        let mut plan = QueryPlan {
            layout: DataLayout::new(root, query.dataset, query.year),
            mode,
            states,
            contents,
            summary_level,
            geo_component,
            areas: Vec::new(),
            read_headers: Vec::new(),
            output_headers: Vec::new(),
            area_header: None,
            with_margin: query.with_margin,
            with_raw: false,
        };

        match mode {
            QueryMode::Areas => {
                let areas = resolve_areas(self.registry.names(), &query.areas);
                let unknown: Vec<String> = areas
                    .iter()
                    .filter(|a| catalog.geo_headers.get(&a.geoheader).is_none())
                    .map(|a| a.geoheader.clone())
                    .collect();
                if !unknown.is_empty() {
                    return Err(CensusError::UnknownReference {
                        context,
                        references: unknown,
                    });
                }
                for area in &areas {
                    if !plan.read_headers.contains(&area.geoheader) {
                        plan.read_headers.push(area.geoheader.clone());
                    }
                }
                if query.with_raw_geo_headers {
                    tracing::debug!("raw geo-headers are only output in geo-header mode");
                }
                plan.areas = areas;
            }
            QueryMode::GeoHeaders => {
                let headers = resolve_geo_headers(&catalog.geo_headers, &query.geo_headers, &context)?;
                let single: Vec<&String> = headers
                    .iter()
                    .filter(|h| crate::catalog::SINGLE_ENTITY_HEADERS.contains(&h.as_str()))
                    .collect();
                if let [header] = single.as_slice() {
                    plan.area_header = Some((*header).clone());
                }
                if plan.summary_level != WILDCARD {
                    for column in catalog.geo_headers.columns() {
                        if headers.iter().any(|h| h == column.reference)
                            && !column.is_populated_at(&plan.summary_level)
                            && !column.is_containment()
                        {
                            tracing::warn!(
                                geo_header = column.reference,
                                summary_level = %plan.summary_level,
                                "geo-header is not populated at this summary level"
                            );
                        }
                    }
                }
                plan.read_headers = headers.clone();
                plan.output_headers = headers;
                plan.with_raw = query.with_raw_geo_headers;
            }
        }

        Ok(plan)
    }

    fn read_state(&self, plan: &QueryPlan, catalog: &Catalog, state: &str) -> Result<Vec<JoinedRow>> {
        let delimiter = self.config.delimiter;
        let layout = &plan.layout;

        let mut geography = read_geography(layout, &catalog.geo_headers, state, &plan.read_headers, delimiter)?;
        let total = geography.len();
        geography.retain(|row| plan.keeps(row));

        let reference = ReferenceDataset::load(layout.reference_file(state))?;
        let stats = enrich(&mut geography, &reference);

        let segments = SegmentReader::new(layout, &catalog.content, delimiter);
        let content = read_contents(&segments, state, &plan.contents, plan.with_margin)?;

        let mut indexes = Vec::new();
        for request in &plan.contents {
            indexes.push(column_position(content.columns(), &request.reference, ValueKind::Estimate));
            if plan.with_margin {
                indexes.push(column_position(content.columns(), &request.reference, ValueKind::Margin));
            }
        }

        let rows: Vec<JoinedRow> = geography
            .into_iter()
            .map(|geo| {
                let values = match content.row(geo.record_key) {
                    Some(cells) => indexes.iter().map(|i| i.and_then(|i| cells[i])).collect(),
                    None => vec![None; indexes.len()],
                };
                JoinedRow { geo, values }
            })
            .collect();

        tracing::info!(
            state,
            geography_rows = total,
            kept = rows.len(),
            content_rows = content.len(),
            matched = stats.matched,
            unmatched = stats.unmatched,
            "state processed"
        );
        Ok(rows)
    }

    fn area_name(&self, row: &JoinedRow, header: &str) -> Value {
        row.geo
            .geo_header(header)
            .and_then(|code| self.registry.names().name_for_code(&row.geo.state, header, code))
            .into()
    }

    fn layout_row(&self, plan: &QueryPlan, area: Option<Value>, row: &JoinedRow) -> Vec<Value> {
        let geo = &row.geo;
        let mut values = Vec::with_capacity(plan.output_headers.len() * 2 + row.values.len() + 8);
        values.extend(area);
        values.push(Value::text(geo.geoid.clone()));
        values.push(geo.lon.into());
        values.push(geo.lat.into());
        values.push(Value::text(geo.state.clone()));
        for header in &plan.output_headers {
            values.push(geo.geo_headers.get(header).cloned().flatten().into());
            if plan.wants_raw(header) {
                values.push(geo.raw_geo_headers.get(header).cloned().flatten().into());
            }
        }
        values.extend(row.values.iter().map(|v| Value::from(*v)));
        values.push(Value::text(geo.geo_component.clone()));
        values.push(Value::text(geo.summary_level.clone()));
        values.push(Value::text(geo.name.clone()));
        values
    }
}

fn column_position(columns: &[String], reference: &str, value: ValueKind) -> Option<usize> {
    let name = format!("{}{}", reference, value.suffix());
    columns.iter().position(|c| *c == name)
}

/// Upper-case, validate and de-duplicate state abbreviations.
fn normalize_states(raw: &[String]) -> Result<Vec<String>> {
    let mut states: Vec<String> = Vec::new();
    let mut unknown = Vec::new();
    for state in raw {
        let state = state.trim().to_uppercase();
        if state.is_empty() {
            continue;
        }
        if state_by_abbr(&state).is_none() {
            unknown.push(state);
        } else if !states.contains(&state) {
            states.push(state);
        }
    }

    if !unknown.is_empty() {
        return Err(CensusError::InvalidQuery(format!(
            "unknown state(s): {}",
            unknown.join(", ")
        )));
    }
    if states.is_empty() {
        return Err(CensusError::InvalidQuery("at least one state is required".to_string()));
    }
    Ok(states)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ContentCatalog, ContentEntry, NameTables};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts availability checks; any check means validation passed.
    #[derive(Default, Clone)]
    struct Counting(Arc<AtomicUsize>);

    impl DatasetAvailability for Counting {
        fn name(&self) -> &str {
            "counting"
        }

        fn ensure_available(&self, _layout: &DataLayout, _states: &[String]) -> Result<()> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Err(CensusError::DatasetUnavailable("test".to_string()))
        }
    }

    fn reader(counter: &Counting) -> SurveyReader {
        let content = ContentCatalog::from_entries(
            DatasetKind::Acs5Year,
            2016,
            [ContentEntry {
                reference: "B01003_001".to_string(),
                file_segment: 3,
                position: 0,
                table_name: "TOTAL POPULATION".to_string(),
                universe: String::new(),
            }],
        );
        let decennial = ContentCatalog::from_entries(
            DatasetKind::Decennial,
            2010,
            [ContentEntry {
                reference: "P0010001".to_string(),
                file_segment: 1,
                position: 0,
                table_name: String::new(),
                universe: String::new(),
            }],
        );
        let registry = CatalogRegistry::new(NameTables::new())
            .with_catalog(content)
            .with_catalog(decennial);
        SurveyReader::with_registry(
            CensusConfig::new().with_data_root("/nonexistent"),
            Arc::new(registry),
        )
        .with_availability(counter.clone())
    }

    fn query() -> SurveyQuery {
        SurveyQuery::new(DatasetKind::Acs5Year, 2016)
            .states(["ri"])
            .table_contents(["population = B01003_001"])
            .geo_headers(["PLACE"])
            .summary_level("place")
    }

    #[test]
    fn test_valid_query_reaches_availability() {
        let counter = Counting::default();
        let err = reader(&counter).read_survey(&query()).unwrap_err();
        assert!(matches!(err, CensusError::DatasetUnavailable(_)));
        assert_eq!(counter.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_validation_errors_precede_io() {
        let counter = Counting::default();
        let reader = reader(&counter);

        let cases = vec![
            query().areas(["Lincoln town, RI"]),
            query().geo_headers(Vec::<String>::new()),
            query().states(["XX"]),
            query().states(Vec::<String>::new()),
            query().summary_level("galaxy"),
            query().table_contents(["B99999_999"]),
            query().geo_headers(["NOPE"]),
            SurveyQuery::new(DatasetKind::Decennial, 2010)
                .states(["RI"])
                .table_contents(["P0010001"])
                .geo_headers(["COUNTY"])
                .with_margin(true),
        ];
        for case in cases {
            let err = reader.read_survey(&case).unwrap_err();
            assert!(err.is_validation(), "expected validation error, got {err}");
        }
        assert_eq!(counter.0.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_missing_data_root() {
        let counter = Counting::default();
        let reader = SurveyReader::with_registry(
            CensusConfig::new(),
            reader(&counter).registry.clone(),
        );
        let err = reader.read_survey(&query()).unwrap_err();
        assert!(matches!(err, CensusError::PreconditionMissing { .. }));
    }

    #[test]
    fn test_unsupported_year() {
        let counter = Counting::default();
        let mut q = query();
        q.year = 1999;
        let err = reader(&counter).read_survey(&q).unwrap_err();
        assert!(matches!(err, CensusError::UnsupportedDataset(_)));
    }

    #[test]
    fn test_unresolved_areas_give_empty_table() {
        let counter = Counting::default();
        let q = query()
            .geo_headers(Vec::<String>::new())
            .areas(["Nowhere village, RI"]);
        let table = reader(&counter).read_survey(&q).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.columns()[0], "area");
        assert!(table.column_index("population").is_some());
        assert_eq!(counter.0.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_column_order() {
        let counter = Counting::default();
        let reader = reader(&counter);
        let q = query().with_margin(true).with_raw_geo_headers(true);
        let catalog = reader.registry.get(DatasetKind::Acs5Year, 2016).unwrap();
        let plan = reader.plan(&q, catalog).unwrap();
        assert_eq!(
            plan.columns(),
            vec![
                "area", "GEOID", "lon", "lat", "state", "PLACE", "PLACE_raw", "population",
                "population_margin", "GEOCOMP", "SUMLEV", "NAME"
            ]
        );
    }

    #[test]
    fn test_normalize_states() {
        let states = normalize_states(&["ri".to_string(), "RI".to_string(), " us ".to_string()]).unwrap();
        assert_eq!(states, vec!["RI", "US"]);
    }
}

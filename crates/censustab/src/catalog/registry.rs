//! Registry mapping (dataset, year) to its catalogs.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use super::content::ContentCatalog;
use super::geoheader::GeoHeaderLayout;
use super::names::NameTables;
use crate::dataset::DatasetKind;
use crate::error::{CensusError, Result};

/// Everything needed to read one dataset-year.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub kind: DatasetKind,
    pub year: u16,
    pub content: ContentCatalog,
    pub geo_headers: GeoHeaderLayout,
}

/// Immutable catalogs, populated once at startup.
#[derive(Debug, Clone, Default)]
pub struct CatalogRegistry {
    catalogs: BTreeMap<(DatasetKind, u16), Catalog>,
    names: NameTables,
}

impl CatalogRegistry {
    /// Create an empty registry with the given name tables.
    pub fn new(names: NameTables) -> Self {
        Self {
            catalogs: BTreeMap::new(),
            names,
        }
    }

    /// Load every content catalog under `<root>/generated_data/lookup/` plus
    /// the name tables. Catalog files are named `<dataset>_<year>.csv`; files
    /// that do not follow the pattern are skipped.
    pub fn load(root: impl AsRef<Path>) -> Result<Self> {
        let generated = root.as_ref().join("generated_data");
        let names = NameTables::load(
            generated.join("fips_names.csv"),
            generated.join("cbsa_names.csv"),
        )?;
        let mut registry = Self::new(names);

        let lookup_dir = generated.join("lookup");
        if !lookup_dir.exists() {
            tracing::warn!(path = %lookup_dir.display(), "no content catalogs found");
            return Ok(registry);
        }

        let entries = fs::read_dir(&lookup_dir).map_err(|e| CensusError::io(&lookup_dir, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| CensusError::io(&lookup_dir, e))?;
            let path = entry.path();
            let Some((kind, year)) = parse_catalog_name(&path) else {
                tracing::debug!(path = %path.display(), "skipping non-catalog file");
                continue;
            };
            let content = ContentCatalog::load(kind, year, &path)?;
            tracing::debug!(dataset = %kind, year, references = content.len(), "loaded catalog");
            registry.insert(content);
        }

        Ok(registry)
    }

    /// Register a content catalog; its geo-header layout is the built-in one.
    pub fn insert(&mut self, content: ContentCatalog) {
        let (kind, year) = (content.kind(), content.year());
        self.catalogs.insert(
            (kind, year),
            Catalog {
                kind,
                year,
                content,
                geo_headers: GeoHeaderLayout::for_dataset(kind, year),
            },
        );
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_catalog(mut self, content: ContentCatalog) -> Self {
        self.insert(content);
        self
    }

    /// Catalog for a dataset-year, or `UnsupportedDataset`.
    pub fn get(&self, kind: DatasetKind, year: u16) -> Result<&Catalog> {
        self.catalogs.get(&(kind, year)).ok_or_else(|| {
            CensusError::UnsupportedDataset(format!("no catalog for {} {}", kind, year))
        })
    }

    pub fn names(&self) -> &NameTables {
        &self.names
    }

    /// Registered (dataset, year) pairs, sorted.
    pub fn available(&self) -> impl Iterator<Item = (DatasetKind, u16)> + '_ {
        self.catalogs.keys().copied()
    }
}

fn parse_catalog_name(path: &Path) -> Option<(DatasetKind, u16)> {
    if path.extension()? != "csv" {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    let (dataset, year) = stem.rsplit_once('_')?;
    Some((dataset.parse().ok()?, year.parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_parse_catalog_name() {
        assert_eq!(
            parse_catalog_name(&PathBuf::from("lookup/acs5year_2016.csv")),
            Some((DatasetKind::Acs5Year, 2016))
        );
        assert_eq!(
            parse_catalog_name(&PathBuf::from("decennial_2010.csv")),
            Some((DatasetKind::Decennial, 2010))
        );
        assert_eq!(parse_catalog_name(&PathBuf::from("readme.txt")), None);
        assert_eq!(parse_catalog_name(&PathBuf::from("acs3year_2012.csv")), None);
    }

    #[test]
    fn test_get_unregistered_is_unsupported() {
        let registry = CatalogRegistry::default()
            .with_catalog(ContentCatalog::new(DatasetKind::Acs1Year, 2017));
        assert!(registry.get(DatasetKind::Acs1Year, 2017).is_ok());
        let err = registry.get(DatasetKind::Acs5Year, 2017).unwrap_err();
        assert!(matches!(err, CensusError::UnsupportedDataset(_)));
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        let lookup = dir.path().join("generated_data").join("lookup");
        fs::create_dir_all(&lookup).unwrap();
        fs::write(
            lookup.join("acs5year_2016.csv"),
            "reference,file_segment,position,table_name,universe\nB01003_001,3,0,Total Population,Total population\n",
        )
        .unwrap();
        fs::write(lookup.join("notes.md"), "ignored").unwrap();

        let registry = CatalogRegistry::load(dir.path()).unwrap();
        let available: Vec<_> = registry.available().collect();
        assert_eq!(available, vec![(DatasetKind::Acs5Year, 2016)]);
        assert_eq!(registry.names().fips_len(), 0);
    }
}

//! Configuration threaded through the reader and its collaborators.

use std::path::{Path, PathBuf};

use crate::error::{CensusError, Result};

/// Environment variable naming the directory that holds the flat files.
pub const DATA_ROOT_ENV: &str = "CENSUSTAB_DATA_ROOT";

/// Configuration for survey extraction.
#[derive(Debug, Clone)]
pub struct CensusConfig {
    /// Directory holding the survey flat files and generated reference data.
    pub data_root: Option<PathBuf>,
    /// Delimiter of the content and geography files.
    pub delimiter: u8,
}

impl Default for CensusConfig {
    fn default() -> Self {
        Self {
            data_root: None,
            delimiter: b',',
        }
    }
}

impl CensusConfig {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a configuration from `CENSUSTAB_DATA_ROOT`, if set.
    pub fn from_env() -> Self {
        let data_root = std::env::var_os(DATA_ROOT_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        Self {
            data_root,
            ..Self::default()
        }
    }

    /// Set the data root.
    pub fn with_data_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.data_root = Some(root.into());
        self
    }

    /// Set the flat-file delimiter.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// The data root, or `PreconditionMissing` with guidance when unset.
    pub fn require_data_root(&self) -> Result<&Path> {
        self.data_root
            .as_deref()
            .ok_or_else(|| CensusError::PreconditionMissing {
                what: "data root".to_string(),
                remedy: format!(
                    "set {} or pass --data-root to the directory holding the census files",
                    DATA_ROOT_ENV
                ),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_root_is_precondition() {
        let config = CensusConfig::new();
        let err = config.require_data_root().unwrap_err();
        assert!(matches!(err, CensusError::PreconditionMissing { .. }));
        assert!(err.to_string().contains(DATA_ROOT_ENV));
    }

    #[test]
    fn test_builder() {
        let config = CensusConfig::new()
            .with_data_root("/census")
            .with_delimiter(b'|');
        assert_eq!(config.require_data_root().unwrap(), Path::new("/census"));
        assert_eq!(config.delimiter, b'|');
    }
}

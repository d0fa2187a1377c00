//! Dataset availability: whether the flat files for a query are present.
//!
//! Fetching missing files is not the reader's job. A collaborator either
//! confirms the files are in place (possibly after obtaining them) or
//! reports them unavailable; the reader never prompts.

use crate::dataset::DataLayout;
use crate::error::{CensusError, Result};

/// Supplies or vouches for the files a query needs.
pub trait DatasetAvailability: Send + Sync {
    /// Name of this collaborator for logging.
    fn name(&self) -> &str;

    /// Succeed when the geography files for every state are readable.
    fn ensure_available(&self, layout: &DataLayout, states: &[String]) -> Result<()>;
}

/// Checks the local data root and reports what is missing.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFiles;

impl DatasetAvailability for LocalFiles {
    fn name(&self) -> &str {
        "local"
    }

    fn ensure_available(&self, layout: &DataLayout, states: &[String]) -> Result<()> {
        let dir = layout.dataset_dir();
        if !dir.is_dir() {
            return Err(CensusError::DatasetUnavailable(format!(
                "{} {} not found under '{}'",
                layout.kind(),
                layout.year(),
                layout.root().display()
            )));
        }

        let missing: Vec<&str> = states
            .iter()
            .filter(|st| !layout.geography_file(st).is_file())
            .map(|st| st.as_str())
            .collect();
        if !missing.is_empty() {
            return Err(CensusError::DatasetUnavailable(format!(
                "{} {} has no geography file for {}",
                layout.kind(),
                layout.year(),
                missing.join(", ")
            )));
        }
        Ok(())
    }
}

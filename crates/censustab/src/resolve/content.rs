//! Table-content reference resolution.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::catalog::ContentCatalog;
use crate::error::{CensusError, Result};

/// A requested content cell: the output column name and its canonical reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRequest {
    pub name: String,
    pub reference: String,
}

/// Split `"alias = code"` into its parts. Without `=`, or with an empty
/// alias, the alias is `None`.
pub fn parse_content_spec(raw: &str) -> (Option<String>, String) {
    match raw.split_once('=') {
        Some((alias, code)) => {
            let alias = alias.trim();
            let alias = (!alias.is_empty()).then(|| alias.to_string());
            (alias, code.trim().to_string())
        }
        None => (None, raw.trim().to_string()),
    }
}

/// Resolve raw table-content specs against a year's catalog.
///
/// Every code must exist in the catalog (case-insensitive); otherwise the
/// whole resolution fails with `UnknownReference` naming all misses. A
/// reference requested twice is kept once, with its first name.
pub fn resolve_table_contents<S: AsRef<str>>(
    catalog: &ContentCatalog,
    raw: &[S],
) -> Result<Vec<ContentRequest>> {
    let mut requests: Vec<ContentRequest> = Vec::new();
    let mut missing = Vec::new();
    let mut seen_refs = HashSet::new();
    let mut seen_names = HashSet::new();

    for spec in raw {
        let (alias, code) = parse_content_spec(spec.as_ref());
        if code.is_empty() {
            continue;
        }
        let Some(entry) = catalog.get(&code) else {
            missing.push(code);
            continue;
        };
        if !seen_refs.insert(entry.reference.clone()) {
            continue;
        }

        let name = alias.unwrap_or_else(|| entry.reference.clone());
        if !seen_names.insert(name.clone()) {
            return Err(CensusError::InvalidQuery(format!(
                "content name '{}' is used for more than one reference",
                name
            )));
        }
        requests.push(ContentRequest {
            name,
            reference: entry.reference.clone(),
        });
    }

    if !missing.is_empty() {
        return Err(CensusError::UnknownReference {
            context: catalog.context(),
            references: missing,
        });
    }

    Ok(requests)
}

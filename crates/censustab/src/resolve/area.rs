//! Area specifier parsing and resolution.
//!
//! Three forms are accepted:
//!
//! - `"Lincoln town, RI"`: a FIPS name (with its type word) and a state
//! - `"PLACE = RI59000"`: a geo-header and code, optionally state-prefixed
//! - `"Providence metro"`: a core-based statistical area by title
//!
//! An unresolvable specifier is dropped with a warning; it contributes no
//! rows to a query rather than failing it.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::codes::WILDCARD;
use crate::catalog::{state_by_abbr, FipsName, NameTables};
use crate::error::{CensusError, Result};

/// `GEOHEADER = [ST]code`
static CODE_SPEC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([A-Za-z][A-Za-z0-9]*)\s*=\s*([A-Za-z]{2})?\s*([0-9A-Za-z]+|\*)\s*$")
        .expect("valid code specifier regex")
});

/// Trailing `metro` / `metro area` marker.
static METRO_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\s+metro(\s+area)?\s*$").expect("valid metro suffix regex")
});

/// Geo-header preference when a name matches several entities in a state.
const NAME_PRIORITY: &[&str] = &["PLACE", "COUSUB", "COUNTY"];

/// A user-facing description of a geographic area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AreaSpecifier {
    /// A FIPS name plus state, e.g. "Lincoln town, RI".
    Named { name: String, state: String },
    /// A direct geo-header code, e.g. "PLACE = RI59000".
    Code {
        geoheader: String,
        state: Option<String>,
        code: String,
    },
    /// A metro/micropolitan statistical area by title.
    Metro { title: String },
}

impl FromStr for AreaSpecifier {
    type Err = CensusError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(CensusError::InvalidQuery("empty area specifier".to_string()));
        }

        if trimmed.contains('=') {
            let caps = CODE_SPEC.captures(trimmed).ok_or_else(|| {
                CensusError::InvalidQuery(format!("malformed area code '{}'", trimmed))
            })?;
            let state = caps
                .get(2)
                .map(|m| m.as_str().to_uppercase())
                .filter(|st| state_by_abbr(st).is_some());
            // A two-letter prefix that is not a state belongs to the code.
            let code = match (caps.get(2), &state) {
                (Some(prefix), None) => format!("{}{}", prefix.as_str(), &caps[3]),
                _ => caps[3].to_string(),
            };
            return Ok(AreaSpecifier::Code {
                geoheader: caps[1].to_uppercase(),
                state,
                code,
            });
        }

        if METRO_SUFFIX.is_match(trimmed) {
            return Ok(AreaSpecifier::Metro {
                title: trimmed.to_string(),
            });
        }

        if let Some((name, state)) = trimmed.rsplit_once(',') {
            let state = state.trim();
            if state.len() == 2 && state_by_abbr(state).is_some() {
                return Ok(AreaSpecifier::Named {
                    name: name.trim().to_string(),
                    state: state.to_uppercase(),
                });
            }
        }

        Ok(AreaSpecifier::Metro {
            title: trimmed.to_string(),
        })
    }
}

/// A code or state pattern. `*` matches everything; otherwise a value
/// matches when it starts with the pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CodePattern(String);

impl CodePattern {
    pub fn new(pattern: impl Into<String>) -> Self {
        let pattern = pattern.into().trim().to_string();
        if pattern.is_empty() {
            Self::any()
        } else {
            Self(pattern)
        }
    }

    pub fn any() -> Self {
        Self(WILDCARD.to_string())
    }

    pub fn is_any(&self) -> bool {
        self.0 == WILDCARD
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `value` matches this pattern (ASCII case-insensitive prefix).
    pub fn matches(&self, value: &str) -> bool {
        if self.is_any() {
            return true;
        }
        let value = value.trim();
        value.len() >= self.0.len()
            && value.as_bytes()[..self.0.len()].eq_ignore_ascii_case(self.0.as_bytes())
    }
}

impl fmt::Display for CodePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An area specifier translated to a geo-header filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedArea {
    pub geoheader: String,
    pub code: CodePattern,
    pub state: CodePattern,
    /// The specifier as typed; tags every row this area matches.
    pub display_name: String,
}

impl ResolvedArea {
    /// Whether a row with this state and geo-header value belongs to the area.
    pub fn matches(&self, state: &str, geoheader_value: Option<&str>) -> bool {
        match geoheader_value {
            Some(value) if !value.trim().is_empty() => {
                self.state.matches(state) && self.code.matches(value)
            }
            _ => false,
        }
    }
}

/// Resolve area specifiers to geo-header filters.
///
/// Returns at most one entry per specifier, in input order. Specifiers that
/// fail to parse or match nothing are skipped with a warning, and entries
/// resolving to the same geo-header, code and state keep only the first.
pub fn resolve_areas<S: AsRef<str>>(names: &NameTables, specifiers: &[S]) -> Vec<ResolvedArea> {
    let mut resolved = Vec::new();
    let mut seen = HashSet::new();

    for raw in specifiers {
        let raw = raw.as_ref().trim();
        let area = match raw.parse::<AreaSpecifier>() {
            Ok(spec) => resolve_one(names, &spec, raw),
            Err(e) => {
                tracing::warn!(area = raw, error = %e, "skipping area specifier");
                None
            }
        };

        let Some(area) = area else {
            tracing::warn!(area = raw, "area specifier matched no geography");
            continue;
        };

        let key = (area.geoheader.clone(), area.code.clone(), area.state.clone());
        if seen.insert(key) {
            resolved.push(area);
        } else {
            tracing::debug!(area = raw, "area specifier duplicates an earlier one");
        }
    }

    resolved
}

fn resolve_one(names: &NameTables, spec: &AreaSpecifier, raw: &str) -> Option<ResolvedArea> {
    match spec {
        AreaSpecifier::Code {
            geoheader,
            state,
            code,
        } => Some(ResolvedArea {
            geoheader: geoheader.clone(),
            code: CodePattern::new(code.clone()),
            state: state.clone().map(CodePattern::new).unwrap_or_else(CodePattern::any),
            display_name: raw.to_string(),
        }),
        AreaSpecifier::Named { name, state } => {
            let hits = names.find_by_name(state, name);
            let entry = pick_by_priority(&hits)?;
            if hits.len() > 1 {
                tracing::warn!(
                    area = raw,
                    matches = hits.len(),
                    chosen = %entry.geoheader,
                    "area name is ambiguous; using highest-priority geo-header"
                );
            }
            Some(ResolvedArea {
                geoheader: entry.geoheader.clone(),
                code: CodePattern::new(entry.code.clone()),
                state: CodePattern::new(entry.state.clone()),
                display_name: raw.to_string(),
            })
        }
        AreaSpecifier::Metro { title } => {
            let mut hits = names.find_cbsa(title);
            if hits.is_empty() {
                let stripped = METRO_SUFFIX.replace(title, "");
                hits = names.find_cbsa(&stripped);
            }
            let cbsa = hits.first()?;
            if hits.len() > 1 {
                tracing::warn!(area = raw, matches = hits.len(), chosen = %cbsa.title, "metro name is ambiguous");
            }
            Some(ResolvedArea {
                geoheader: "CBSA".to_string(),
                code: CodePattern::new(cbsa.code.clone()),
                state: CodePattern::any(),
                display_name: raw.to_string(),
            })
        }
    }
}

fn pick_by_priority<'a>(hits: &[&'a FipsName]) -> Option<&'a FipsName> {
    let rank = |geoheader: &str| {
        NAME_PRIORITY
            .iter()
            .position(|p| *p == geoheader)
            .unwrap_or(NAME_PRIORITY.len())
    };
    hits.iter().copied().min_by_key(|e| rank(&e.geoheader))
}

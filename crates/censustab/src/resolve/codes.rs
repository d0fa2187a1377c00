//! Summary-level and geographic-component alias resolution.

use crate::catalog::{GEO_COMPONENTS, SUMMARY_LEVELS};
use crate::error::{CensusError, Result};

/// Wildcard accepted by both resolvers.
pub const WILDCARD: &str = "*";

/// Resolve a summary-level alias or numeric code to its 3-digit code.
///
/// Numeric input is zero-padded and returned unchanged otherwise, so the
/// resolution is idempotent. `"*"` passes through.
pub fn resolve_summary_level(alias: &str) -> Result<String> {
    let alias = alias.trim();
    if alias == WILDCARD {
        return Ok(WILDCARD.to_string());
    }

    if !alias.is_empty() && alias.chars().all(|c| c.is_ascii_digit()) {
        if alias.len() > 3 {
            return Err(CensusError::InvalidQuery(format!(
                "summary level code '{}' is longer than 3 digits",
                alias
            )));
        }
        return Ok(format!("{:0>3}", alias));
    }

    let lowered = alias.to_lowercase();
    SUMMARY_LEVELS
        .iter()
        .find(|level| level.name == lowered || level.aliases.contains(&lowered.as_str()))
        .map(|level| level.code.to_string())
        .ok_or_else(|| {
            CensusError::InvalidQuery(format!("unknown summary level '{}'", alias))
        })
}

/// Resolve a geographic-component alias or code to its 2-character code.
/// `"*"` passes through.
pub fn resolve_geo_component(alias: &str) -> Result<String> {
    let alias = alias.trim();
    if alias == WILDCARD {
        return Ok(WILDCARD.to_string());
    }

    if let Some(comp) = GEO_COMPONENTS
        .iter()
        .find(|c| c.code.eq_ignore_ascii_case(alias))
    {
        return Ok(comp.code.to_string());
    }

    // Unlisted components are accepted only as numeric codes.
    if !alias.is_empty() && alias.len() <= 2 && alias.chars().all(|c| c.is_ascii_digit()) {
        return Ok(format!("{:0>2}", alias));
    }

    let lowered = alias.to_lowercase();
    GEO_COMPONENTS
        .iter()
        .find(|c| c.name == lowered || c.aliases.contains(&lowered.as_str()))
        .map(|c| c.code.to_string())
        .ok_or_else(|| {
            CensusError::InvalidQuery(format!("unknown geographic component '{}'", alias))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_level_aliases() {
        assert_eq!(resolve_summary_level("county").unwrap(), "050");
        assert_eq!(resolve_summary_level("Place").unwrap(), "160");
        assert_eq!(resolve_summary_level("block group").unwrap(), "150");
        assert_eq!(resolve_summary_level("metro").unwrap(), "310");
        assert_eq!(resolve_summary_level("*").unwrap(), "*");
    }

    #[test]
    fn test_summary_level_numeric_is_idempotent() {
        assert_eq!(resolve_summary_level("140").unwrap(), "140");
        assert_eq!(resolve_summary_level("40").unwrap(), "040");
        let once = resolve_summary_level("tract").unwrap();
        assert_eq!(resolve_summary_level(&once).unwrap(), once);
        assert!(resolve_summary_level("1400").is_err());
        assert!(resolve_summary_level("galaxy").is_err());
    }

    #[test]
    fn test_geo_component_aliases() {
        assert_eq!(resolve_geo_component("total").unwrap(), "00");
        assert_eq!(resolve_geo_component("rural").unwrap(), "43");
        assert_eq!(resolve_geo_component("urbanized area").unwrap(), "04");
        assert_eq!(resolve_geo_component("c1").unwrap(), "C1");
        assert_eq!(resolve_geo_component("1").unwrap(), "01");
        assert_eq!(resolve_geo_component("*").unwrap(), "*");
        assert!(resolve_geo_component("suburban").is_err());
    }

    #[test]
    fn test_geo_component_rejects_unlisted_letter_codes() {
        assert_eq!(resolve_geo_component("95").unwrap(), "95");
        assert!(matches!(resolve_geo_component("zz"), Err(CensusError::InvalidQuery(_))));
        assert!(matches!(resolve_geo_component("C9"), Err(CensusError::InvalidQuery(_))));
        assert!(resolve_geo_component("123").is_err());
    }
}

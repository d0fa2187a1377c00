//! Codes command - list summary-level and geographic-component aliases.

use censustab::catalog::{GEO_COMPONENTS, SUMMARY_LEVELS};
use colored::Colorize;

pub fn run(json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json_output {
        let codes = serde_json::json!({
            "summary_levels": SUMMARY_LEVELS
                .iter()
                .map(|l| serde_json::json!({ "code": l.code, "name": l.name, "aliases": l.aliases }))
                .collect::<Vec<_>>(),
            "geo_components": GEO_COMPONENTS
                .iter()
                .map(|c| serde_json::json!({ "code": c.code, "name": c.name, "aliases": c.aliases }))
                .collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&codes)?);
        return Ok(());
    }

    println!("{}", "Summary levels:".yellow().bold());
    for level in SUMMARY_LEVELS {
        println!(
            "  {}  {} {}",
            level.code.green(),
            level.name.white(),
            level.aliases.join(", ").dimmed()
        );
    }
    println!();

    println!("{}", "Geographic components:".yellow().bold());
    for comp in GEO_COMPONENTS {
        println!(
            "  {}  {} {}",
            comp.code.green(),
            comp.name.white(),
            comp.aliases.join(", ").dimmed()
        );
    }

    Ok(())
}

//! Areas command - show how area specifiers resolve.

use censustab::{CensusConfig, NameTables};
use colored::Colorize;

pub fn run(
    config: CensusConfig,
    specifiers: Vec<String>,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let generated = config.require_data_root()?.join("generated_data");
    let names = NameTables::load(
        generated.join("fips_names.csv"),
        generated.join("cbsa_names.csv"),
    )?;
    let areas = censustab::resolve_areas(&names, &specifiers);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&areas)?);
        return Ok(());
    }

    println!(
        "{} {} of {} specifiers",
        "Resolved".cyan().bold(),
        areas.len().to_string().white().bold(),
        specifiers.len()
    );
    println!();

    for area in &areas {
        println!("  {}", area.display_name.white().bold());
        println!(
            "    {} = {} (state {})",
            area.geoheader.yellow(),
            area.code.to_string().green(),
            area.state
        );
    }

    let unresolved: Vec<&String> = specifiers
        .iter()
        .filter(|s| !areas.iter().any(|a| a.display_name == s.trim()))
        .collect();
    if !unresolved.is_empty() {
        println!();
        println!("{}", "Unresolved or duplicate:".yellow().bold());
        for spec in unresolved {
            println!("  {}", spec.red());
        }
    }

    Ok(())
}

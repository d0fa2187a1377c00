//! censustab CLI - census survey flat-file extraction.

mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::{Cli, Commands};
use censustab::CensusConfig;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let mut config = CensusConfig::from_env();
    if let Some(root) = cli.data_root {
        config = config.with_data_root(root);
    }

    let result = match cli.command {
        Commands::Read {
            dataset,
            year,
            states,
            contents,
            areas,
            geo_headers,
            summary_level,
            geo_component,
            margin,
            raw_geo_headers,
            format,
            output,
        } => commands::read::run(
            config,
            commands::read::ReadArgs {
                dataset,
                year,
                states,
                contents,
                areas,
                geo_headers,
                summary_level,
                geo_component,
                margin,
                raw_geo_headers,
            },
            format,
            output,
        ),

        Commands::Areas { specifiers, json } => commands::areas::run(config, specifiers, json),

        Commands::Segments {
            dataset,
            year,
            references,
        } => commands::segments::run(config, dataset, year, references),

        Commands::Codes { json } => commands::codes::run(json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

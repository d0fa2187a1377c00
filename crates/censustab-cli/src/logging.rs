//! tracing-subscriber setup for the CLI.

use std::io::IsTerminal;
use std::sync::Once;

use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::EnvFilter;

/// Log level applied to the workspace crates (default `info`).
static LOG_ENV_VAR: &str = "CENSUSTAB_LOG";

/// Crates whose level `CENSUSTAB_LOG` controls.
const CRATES: &[&str] = &["censustab", "censustab_cli"];

/// Install the stderr subscriber. `verbose` forces `debug` for our crates.
pub fn init(verbose: bool) {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let (env_filter, level) = env_filter_and_log_level(verbose);

        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_ansi(std::io::stderr().is_terminal())
            .init();

        tracing::debug!("log level: {}", level);
    });
}

fn env_filter_and_log_level(verbose: bool) -> (EnvFilter, String) {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default();
    let mut env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .parse_lossy(&directives);

    let level = if verbose {
        "debug".to_string()
    } else {
        std::env::var(LOG_ENV_VAR).unwrap_or_else(|_| "info".to_string())
    };

    for name in CRATES {
        if directives.contains(&format!("{name}=")) {
            continue;
        }
        match format!("{name}={level}").parse::<Directive>() {
            Ok(directive) => env_filter = env_filter.add_directive(directive),
            Err(e) => eprintln!("Ignoring {}={}: {}", LOG_ENV_VAR, level, e),
        }
    }

    (env_filter, level)
}

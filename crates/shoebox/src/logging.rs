//! Logging initialization.
//!
//! All log output goes to stderr; stdout carries the timeline when no
//! output file is given. `RUST_LOG` overrides the configured level.

use shoebox_core::config::LoggingConfig;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Filter directive for the configured level; `--verbose` forces debug.
fn default_directive(level: &str, verbose: bool) -> &str {
    if verbose {
        "debug"
    } else {
        level
    }
}

/// Initialize the global subscriber.
pub fn init(level: &str, verbose: bool, json_format: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(level, verbose)));

    if json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(true),
            )
            .init();
    }
}

/// Initialize logging from the `[logging]` section with CLI overrides.
pub fn init_from_config(config: &shoebox_core::Config, verbose: bool, json_logs: bool) {
    let LoggingConfig { level, format } = &config.logging;
    init(level, verbose, json_logs || format == "json");
}

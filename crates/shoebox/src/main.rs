//! Shoebox CLI - import a folder of photos and videos into a dated timeline.
//!
//! Shoebox thumbnails every top-level image and video in a folder, dates it
//! from EXIF or the container metadata, and writes the timeline newest first
//! with a section per capture day.
//!
//! # Usage
//!
//! ```bash
//! # Import a folder, timeline to stdout
//! shoebox import ~/Pictures/2021
//!
//! # Smaller thumbnails, one entry per line, to a file
//! shoebox import ./DCIM --height 120 --format jsonl --output timeline.jsonl
//!
//! # View configuration
//! shoebox config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Shoebox - import a folder of photos and videos into a dated thumbnail timeline.
#[derive(Parser, Debug)]
#[command(name = "shoebox")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Import a folder and write its thumbnail timeline
    Import(cli::import::ImportArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config warnings go through eprintln.
    let config = match shoebox_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `shoebox config path`."
            );
            shoebox_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Shoebox v{}", shoebox_core::VERSION);

    match cli.command {
        Commands::Import(args) => cli::import::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args, &config).await,
    }
}

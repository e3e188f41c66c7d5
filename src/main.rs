//! Vidpress CLI Video Compressor
//!
//! Shrinks video files by frame skipping, downscaling, or both.
//!
//! # Usage
//!
//! ```bash
//! vidpress compress --input talk.mp4 --method combined --skip-rate 2 --scale-percent 50
//! vidpress inspect --input output/talk_combined.mp4 --format json
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use vidpress::cli::{commands, Cli, Commands};
use vidpress::config_initialization::initialize_configuration_hierarchy;
use vidpress::utils::logging::init_logging;

/// Main entry point for the Vidpress CLI application
fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    let resolved = initialize_configuration_hierarchy(cli.config.as_deref(), &cli.overrides())
        .context("Failed to load configuration")?;
    let config = &resolved.config;

    // Initialize logging
    init_logging(&config.logging()?).context("Failed to initialize logging")?;
    resolved.log_summary();

    vidpress::init()?;
    info!("Starting Vidpress {}", env!("CARGO_PKG_VERSION"));

    // Execute the requested command
    match cli.command {
        Commands::Compress(args) => {
            info!("Executing compress command");
            commands::compress(args, config)?;
        }
        Commands::Inspect(args) => {
            info!("Executing inspect command");
            commands::inspect(args)?;
        }
    }

    info!("Vidpress completed successfully");
    Ok(())
}

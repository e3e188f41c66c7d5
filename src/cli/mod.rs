//! CLI module for Vidpress
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config_initialization::ConfigOverrides;

pub mod args;
pub mod commands;

/// Vidpress batch video compressor
///
/// Shrinks videos by dropping frames, downscaling, or both, and reports the
/// properties of the result.
#[derive(Parser, Debug)]
#[command(name = "vidpress")]
#[command(about = "Vidpress - frame-skip and downscale video compressor")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Configuration file (default: ./vidpress.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log output format (pretty, compact, json)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compress a video file
    Compress(args::CompressArgs),
    /// Show the properties of a video file
    Inspect(args::InspectArgs),
}

impl Cli {
    /// Configuration values given on the command line
    pub fn overrides(&self) -> ConfigOverrides {
        let mut overrides = ConfigOverrides {
            log_level: self.log_level.clone(),
            log_format: self.log_format.clone(),
            ..ConfigOverrides::default()
        };

        if let Commands::Compress(args) = &self.command {
            overrides.output_dir = args.output_dir.clone();
            overrides.codec = args.codec.clone();
            overrides.method = args.method.clone();
            overrides.skip_rate = args.skip_rate;
            overrides.scale_percent = args.scale_percent;
        }

        overrides
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compress_flags_become_overrides() {
        let cli = Cli::parse_from([
            "vidpress",
            "--log-level",
            "debug",
            "compress",
            "--input",
            "in.mp4",
            "--method",
            "frameskip",
            "--skip-rate",
            "3",
        ]);
        let overrides = cli.overrides();
        assert_eq!(overrides.log_level.as_deref(), Some("debug"));
        assert_eq!(overrides.method.as_deref(), Some("frameskip"));
        assert_eq!(overrides.skip_rate, Some(3));
        assert_eq!(overrides.scale_percent, None);
    }

    #[test]
    fn test_inspect_has_no_compress_overrides() {
        let cli = Cli::parse_from(["vidpress", "inspect", "--input", "in.mp4", "--format", "json"]);
        let overrides = cli.overrides();
        assert_eq!(overrides.method, None);
        assert_eq!(overrides.output_dir, None);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["vidpress", "inspect", "-i", "a.mp4", "--log-format", "json"]);
        assert_eq!(cli.log_format.as_deref(), Some("json"));
    }
}

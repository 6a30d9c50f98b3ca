//! CLI command definitions.
//!
//! This module defines all CLI commands and their arguments using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// plan-assets - Converts infrastructure plans into canonical cloud assets.
#[derive(Parser, Debug)]
#[command(name = "plan-assets")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the configuration file.
    #[arg(short, long, global = true, env = "PLAN_ASSETS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    /// Log format (text, json).
    #[arg(long, global = true, default_value = "text")]
    pub log_format: LogFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a JSON plan (`terraform show -json`) into assets.
    Convert {
        /// Path to the JSON plan.
        plan: PathBuf,

        /// Default project for resources that do not name one.
        #[arg(short, long)]
        project: Option<String>,

        /// Ancestry of the default project, e.g. `organizations/123/folders/456`.
        #[arg(long)]
        ancestry: Option<String>,

        /// Do not call any API; use the configured or a synthetic ancestry.
        #[arg(long)]
        offline: bool,

        /// Write the assets to this file instead of stdout.
        #[arg(short = 'f', long)]
        output_file: Option<PathBuf>,
    },

    /// List the supported resource types.
    Resources,

    /// Show the effective configuration.
    Config {
        /// Show validation warnings.
        #[arg(short, long)]
        warnings: bool,
    },
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// Log format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable log lines.
    #[default]
    Text,
    /// One JSON object per log event.
    Json,
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

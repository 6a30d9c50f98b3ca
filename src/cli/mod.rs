//! CLI module for the plan-assets tool.
//!
//! This module provides the command-line interface for converting plans
//! into canonical assets.

mod commands;
mod output;

pub use commands::{Cli, Commands, LogFormat, OutputFormat};
pub use output::OutputFormatter;

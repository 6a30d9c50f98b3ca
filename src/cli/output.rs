//! Output formatting for CLI commands.
//!
//! This module provides formatting utilities for displaying
//! information to the user in various formats.

use colored::Colorize;
use std::fmt::Write;
use std::path::Path;
use tabled::{Table, Tabled};

use crate::assets::Asset;
use crate::config::{Settings, ValidationResult};
use crate::engine::BatchReport;
use crate::error::Result;

use super::commands::OutputFormat;

/// Output formatter for CLI.
#[derive(Debug)]
pub struct OutputFormatter {
    /// Output format.
    format: OutputFormat,
}

/// Asset row for table display.
#[derive(Tabled)]
struct AssetRow {
    #[tabled(rename = "Type")]
    asset_type: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Payload")]
    payload: String,
    #[tabled(rename = "IAM roles")]
    roles: String,
    #[tabled(rename = "Org policies")]
    org_policies: usize,
}

/// Resource type row for table display.
#[derive(Tabled)]
struct ResourceRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Resource type")]
    resource_type: String,
}

impl OutputFormatter {
    /// Creates a new output formatter.
    #[must_use]
    pub const fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Serializes assets for the policy engine. Always JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn format_assets(assets: &[Asset]) -> Result<String> {
        let mut json = serde_json::to_string_pretty(assets)?;
        json.push('\n');
        Ok(json)
    }

    /// Formats the summary of a conversion.
    #[must_use]
    pub fn format_summary(&self, report: &BatchReport, assets: &[Asset], digest: &str) -> String {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(&SummaryJson::new(report, assets, digest))
                    .unwrap_or_default()
            }
            OutputFormat::Text => Self::format_summary_text(report, assets, digest),
        }
    }

    /// Formats a summary as text.
    fn format_summary_text(report: &BatchReport, assets: &[Asset], digest: &str) -> String {
        let mut output = String::new();

        if assets.is_empty() {
            let _ = writeln!(output, "{} No assets produced.", "✓".green());
        } else {
            let rows: Vec<AssetRow> = assets
                .iter()
                .map(|a| AssetRow {
                    asset_type: a.asset_type.clone(),
                    name: Self::truncate(&a.name, 70),
                    payload: if a.resource.is_some() { "yes" } else { "no" }.to_string(),
                    roles: a
                        .iam_policy
                        .as_ref()
                        .map_or_else(|| String::from("-"), |p| p.bindings.len().to_string()),
                    org_policies: a.org_policy.len(),
                })
                .collect();

            output.push('\n');
            output.push_str(&Table::new(rows).to_string());
            output.push('\n');
        }

        let _ = write!(
            output,
            "\nConverted {} of {} records: {} assets, {} skipped\n",
            report.converted.to_string().green(),
            report.records,
            assets.len().to_string().green(),
            report.total_skipped().to_string().yellow()
        );
        for (reason, count) in &report.skipped {
            let _ = writeln!(output, "   - {reason}: {count}");
        }
        let _ = writeln!(output, "Digest: {}", Self::truncate(digest, 16).dimmed());

        output
    }

    /// Formats the list of supported resource types.
    #[must_use]
    pub fn format_resources(&self, resource_types: &[&str]) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(resource_types).unwrap_or_default(),
            OutputFormat::Text => {
                let rows: Vec<ResourceRow> = resource_types
                    .iter()
                    .enumerate()
                    .map(|(i, t)| ResourceRow {
                        index: i + 1,
                        resource_type: (*t).to_string(),
                    })
                    .collect();

                let mut output = Table::new(rows).to_string();
                let _ = write!(
                    output,
                    "\n\n{} resource types supported\n",
                    resource_types.len().to_string().green()
                );
                output
            }
        }
    }

    /// Formats the effective configuration.
    #[must_use]
    pub fn format_config(
        &self,
        settings: &Settings,
        source: Option<&Path>,
        validation: &ValidationResult,
        show_warnings: bool,
    ) -> String {
        match self.format {
            OutputFormat::Json => {
                let json = ConfigJson {
                    source: source.map(|p| p.display().to_string()),
                    project: &settings.project,
                    ancestry: settings.ancestry.to_string(),
                    offline: settings.offline,
                    resource_manager_url: &settings.resource_manager_url,
                    credentials: settings.credentials.describe(),
                    warnings: &validation.warnings,
                };
                serde_json::to_string_pretty(&json).unwrap_or_default()
            }
            OutputFormat::Text => {
                let mut output = String::new();
                let _ = writeln!(output, "{} Configuration is valid", "✓".green());
                let _ = writeln!(
                    output,
                    "   Source: {}",
                    source.map_or_else(|| String::from("(none)"), |p| p.display().to_string())
                );
                let _ = writeln!(output, "   Project: {}", settings.project);
                let ancestry = if settings.ancestry.is_empty() {
                    String::from("(none)")
                } else {
                    settings.ancestry.to_string()
                };
                let _ = writeln!(output, "   Ancestry: {ancestry}");
                let mode = if settings.offline { "offline".yellow() } else { "online".green() };
                let _ = writeln!(output, "   Mode: {mode}");
                let _ = writeln!(output, "   Resource Manager: {}", settings.resource_manager_url);
                let _ = writeln!(output, "   Credentials: {}", settings.credentials.describe());

                if show_warnings && validation.warning_count() > 0 {
                    let _ = write!(output, "\n{} Warnings:\n", "⚠".yellow());
                    for warning in &validation.warnings {
                        let _ = writeln!(output, "   - {warning}");
                    }
                }

                output
            }
        }
    }

    /// Truncates a string to a maximum number of characters.
    fn truncate(s: &str, max_len: usize) -> String {
        if s.chars().count() <= max_len {
            s.to_string()
        } else {
            let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
            format!("{kept}...")
        }
    }
}

// JSON serialization helpers

#[derive(serde::Serialize)]
struct SummaryJson<'a> {
    records: usize,
    converted: usize,
    fragments: usize,
    skipped: Vec<SkipJson>,
    assets: usize,
    digest: &'a str,
}

#[derive(serde::Serialize)]
struct SkipJson {
    reason: String,
    count: usize,
}

impl<'a> SummaryJson<'a> {
    fn new(report: &BatchReport, assets: &[Asset], digest: &'a str) -> Self {
        Self {
            records: report.records,
            converted: report.converted,
            fragments: report.fragments,
            skipped: report
                .skipped
                .iter()
                .map(|(reason, count)| SkipJson {
                    reason: reason.to_string(),
                    count: *count,
                })
                .collect(),
            assets: assets.len(),
            digest,
        }
    }
}

#[derive(serde::Serialize)]
struct ConfigJson<'a> {
    source: Option<String>,
    project: &'a str,
    ancestry: String,
    offline: bool,
    resource_manager_url: &'a str,
    credentials: &'static str,
    warnings: &'a [String],
}

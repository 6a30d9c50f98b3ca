//! Plan documents (`terraform show -json` output).

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{PlanError, Result};

use super::change::ResourceChange;

/// The parts of a JSON plan the converter reads.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PlanDocument {
    /// Plan format version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format_version: Option<String>,
    /// Version of the tool that produced the plan.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terraform_version: Option<String>,
    /// Change records in plan order.
    #[serde(default)]
    pub resource_changes: Vec<ResourceChange>,
}

impl PlanDocument {
    /// Loads a plan from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(PlanError::FileNotFound {
                path: path.to_path_buf(),
            }
            .into());
        }

        info!("Loading plan from: {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Parses a plan from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not a valid plan document.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let plan: Self = serde_json::from_str(content).map_err(|e| PlanError::ParseError {
            message: e.to_string(),
            location: Some(format!("line {}, column {}", e.line(), e.column())),
        })?;

        debug!(
            "Parsed plan with {} resource changes (format {})",
            plan.resource_changes.len(),
            plan.format_version.as_deref().unwrap_or("unknown")
        );
        Ok(plan)
    }
}

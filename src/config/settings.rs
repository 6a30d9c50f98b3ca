//! Effective settings for one conversion pass.
//!
//! Precedence, highest first: command-line flags, `PLAN_ASSETS_*`
//! variables, the configuration file, then the Google SDK variables.

use tracing::debug;

use crate::ancestry::{AncestryPath, RESOURCE_MANAGER_URL};
use crate::error::{ConfigError, Result};

use super::credentials::{Credentials, PROJECT_VARS, default_project};
use super::types::PlanAssetsConfig;

/// Values given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    /// `--project`
    pub project: Option<String>,
    /// `--ancestry`
    pub ancestry: Option<String>,
    /// `--offline`
    pub offline: bool,
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Default project.
    pub project: String,
    /// Configured ancestry, without the project leaf. May be empty.
    pub ancestry: AncestryPath,
    /// Whether network calls are forbidden.
    pub offline: bool,
    /// Resource Manager endpoint.
    pub resource_manager_url: String,
    /// Discovered credentials.
    pub credentials: Credentials,
}

impl Settings {
    /// Resolves settings, reading Google SDK variables through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns an error if no project can be found or the ancestry is malformed.
    pub fn resolve(
        config: &PlanAssetsConfig,
        overrides: &Overrides,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let project = overrides
            .project
            .clone()
            .or_else(|| config.project.clone())
            .or_else(|| default_project(&lookup))
            .ok_or_else(|| ConfigError::MissingProject {
                candidates: PROJECT_VARS.join(", "),
            })?;

        let ancestry = overrides
            .ancestry
            .as_deref()
            .or(config.ancestry.as_deref())
            .map(AncestryPath::parse)
            .transpose()?
            .unwrap_or_default();

        let settings = Self {
            project,
            ancestry,
            offline: overrides.offline || config.offline,
            resource_manager_url: config
                .resource_manager_url
                .clone()
                .unwrap_or_else(|| RESOURCE_MANAGER_URL.to_string()),
            credentials: Credentials::resolve(&lookup),
        };

        debug!(
            "Resolved settings: project={}, offline={}, credentials={}",
            settings.project,
            settings.offline,
            settings.credentials.describe()
        );
        Ok(settings)
    }

    /// Resolves settings against the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if no project can be found or the ancestry is malformed.
    pub fn from_env(config: &PlanAssetsConfig, overrides: &Overrides) -> Result<Self> {
        Self::resolve(config, overrides, |name| std::env::var(name).ok())
    }
}

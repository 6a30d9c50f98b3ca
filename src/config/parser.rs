//! Configuration parser for loading configuration files.
//!
//! This module handles loading configuration from YAML files, `.env` files
//! and environment variables, with proper precedence and error handling.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{ConfigError, PlanAssetsError, Result};

use super::types::PlanAssetsConfig;

/// Environment variable overriding `project`.
pub const PROJECT_ENV: &str = "PLAN_ASSETS_PROJECT";
/// Environment variable overriding `ancestry`.
pub const ANCESTRY_ENV: &str = "PLAN_ASSETS_ANCESTRY";
/// Environment variable overriding `offline`.
pub const OFFLINE_ENV: &str = "PLAN_ASSETS_OFFLINE";
/// Environment variable overriding `resource_manager_url`.
pub const RESOURCE_MANAGER_URL_ENV: &str = "PLAN_ASSETS_RESOURCE_MANAGER_URL";

/// Configuration parser.
#[derive(Debug, Default)]
pub struct ConfigParser {
    /// Base path for resolving the `.env` file.
    base_path: Option<PathBuf>,
}

impl ConfigParser {
    /// Creates a new configuration parser.
    #[must_use]
    pub const fn new() -> Self {
        Self { base_path: None }
    }

    /// Sets the base path for resolving the `.env` file.
    #[must_use]
    pub fn with_base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<PlanAssetsConfig> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());

        if !path.exists() {
            return Err(PlanAssetsError::Config(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            }));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            PlanAssetsError::Config(ConfigError::ParseError {
                message: format!("Failed to read file: {e}"),
                location: Some(path.display().to_string()),
            })
        })?;

        self.parse_yaml(&content, Some(path))
    }

    /// Parses configuration from a YAML string. An empty document is the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid.
    pub fn parse_yaml(&self, content: &str, source: Option<&Path>) -> Result<PlanAssetsConfig> {
        debug!("Parsing YAML configuration");

        if content.trim().is_empty() {
            return Ok(PlanAssetsConfig::default());
        }

        serde_yaml::from_str(content).map_err(|e| {
            let location = source.map(|p| p.display().to_string());
            PlanAssetsError::Config(ConfigError::ParseError {
                message: format!("YAML parse error: {e}"),
                location,
            })
        })
    }

    /// Applies `PLAN_ASSETS_*` overrides read through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns an error if `PLAN_ASSETS_OFFLINE` is not a boolean.
    pub fn apply_env_overrides(
        config: &mut PlanAssetsConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<()> {
        if let Some(project) = lookup(PROJECT_ENV) {
            debug!("Overriding project from environment");
            config.project = Some(project);
        }

        if let Some(ancestry) = lookup(ANCESTRY_ENV) {
            debug!("Overriding ancestry from environment");
            config.ancestry = Some(ancestry);
        }

        if let Some(offline) = lookup(OFFLINE_ENV) {
            debug!("Overriding offline from environment");
            config.offline = parse_bool(&offline).ok_or_else(|| {
                ConfigError::validation(
                    format!("{OFFLINE_ENV} must be true or false, got '{offline}'"),
                    "offline",
                )
            })?;
        }

        if let Some(url) = lookup(RESOURCE_MANAGER_URL_ENV) {
            debug!("Overriding resource_manager_url from environment");
            config.resource_manager_url = Some(url);
        }

        Ok(())
    }

    /// Loads the discovered configuration, or the default when there is none,
    /// then applies environment overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a file exists but cannot be parsed.
    pub fn load_with_env(&self, path: Option<&Path>) -> Result<PlanAssetsConfig> {
        let mut config = match path {
            Some(path) => self.load_file(path)?,
            None => {
                debug!("No configuration file, using defaults");
                PlanAssetsConfig::default()
            }
        };

        Self::apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Loads the .env file if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the .env file exists but cannot be loaded.
    pub fn load_dotenv(&self) -> Result<()> {
        let env_path = self
            .base_path
            .as_ref()
            .map_or_else(|| PathBuf::from(".env"), |p| p.join(".env"));

        if env_path.exists() {
            info!("Loading environment from: {}", env_path.display());
            dotenvy::from_path(&env_path).map_err(|e| {
                PlanAssetsError::Config(ConfigError::ParseError {
                    message: format!("Failed to load .env file: {e}"),
                    location: Some(env_path.display().to_string()),
                })
            })?;
        } else {
            debug!(".env file not found at: {}", env_path.display());
        }

        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

/// Default configuration file names to search for.
pub const DEFAULT_CONFIG_FILES: &[&str] = &["plan-assets.yaml", "plan-assets.yml"];

/// Finds the configuration file in the given directory or its parents.
///
/// # Errors
///
/// Returns an error if no configuration file is found.
pub fn find_config_file(start_dir: impl AsRef<Path>) -> Result<PathBuf> {
    let start = start_dir.as_ref();
    let mut current = start.to_path_buf();

    loop {
        for filename in DEFAULT_CONFIG_FILES {
            let config_path = current.join(filename);
            if config_path.exists() {
                info!("Found configuration file: {}", config_path.display());
                return Ok(config_path);
            }
        }

        if !current.pop() {
            break;
        }
    }

    Err(PlanAssetsError::Config(ConfigError::FileNotFound {
        path: start.join(DEFAULT_CONFIG_FILES[0]),
    }))
}

/// Returns the per-user configuration file, `<config dir>/plan-assets/config.yaml`.
#[must_use]
pub fn user_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("plan-assets").join("config.yaml"))
}

/// Locates the configuration to use: a project file found from `start_dir`
/// upwards, else an existing per-user file, else none.
#[must_use]
pub fn discover_config_file(start_dir: impl AsRef<Path>) -> Option<PathBuf> {
    find_config_file(start_dir)
        .ok()
        .or_else(|| user_config_file().filter(|path| path.exists()))
}

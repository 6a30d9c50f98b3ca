//! Configuration module for the plan-to-asset converter.
//!
//! This module handles all configuration-related functionality:
//! - Parsing `plan-assets.yaml` and `.env` files
//! - `PLAN_ASSETS_*` environment overrides
//! - Google credential and default-project discovery
//! - Validation and resolution of the effective settings

mod credentials;
mod parser;
mod settings;
mod types;
mod validator;

pub use credentials::{ACCESS_TOKEN_VAR, CREDENTIALS_VARS, Credentials, PROJECT_VARS, default_project};
pub use parser::{
    ANCESTRY_ENV, ConfigParser, DEFAULT_CONFIG_FILES, OFFLINE_ENV, PROJECT_ENV,
    RESOURCE_MANAGER_URL_ENV, discover_config_file, find_config_file, user_config_file,
};
pub use settings::{Overrides, Settings};
pub use types::PlanAssetsConfig;
pub use validator::{ConfigValidator, ValidationError, ValidationResult};

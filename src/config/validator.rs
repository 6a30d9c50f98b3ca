//! Configuration validation.
//!
//! This module validates configuration values before a conversion pass, so
//! that a typo in a project id or ancestry path is reported up front instead
//! of surfacing inside every converted asset.

use tracing::debug;

use crate::ancestry::AncestryPath;
use crate::error::{ConfigError, PlanAssetsError, Result};

use super::types::PlanAssetsConfig;

/// Validator for configurations.
#[derive(Debug, Default)]
pub struct ConfigValidator;

/// Validation result containing all errors found.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// List of validation errors.
    pub errors: Vec<ValidationError>,
    /// List of warnings (non-fatal issues).
    pub warnings: Vec<String>,
}

/// A single validation error.
#[derive(Debug)]
pub struct ValidationError {
    /// The field path that failed validation.
    pub field: String,
    /// The error message.
    pub message: String,
}

impl ConfigValidator {
    /// Creates a new validator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates a configuration.
    ///
    /// # Errors
    ///
    /// Returns the first validation error, if any.
    pub fn validate(&self, config: &PlanAssetsConfig) -> Result<ValidationResult> {
        let mut result = ValidationResult::default();

        if let Some(project) = &config.project {
            Self::validate_project(project, &mut result);
        }
        if let Some(ancestry) = &config.ancestry {
            Self::validate_ancestry(ancestry, &mut result);
        }
        Self::validate_endpoint(config, &mut result);

        if result.errors.is_empty() {
            debug!("Configuration validation passed");
            Ok(result)
        } else {
            let first_error = &result.errors[0];
            Err(PlanAssetsError::Config(ConfigError::ValidationError {
                message: first_error.message.clone(),
                field: Some(first_error.field.clone()),
            }))
        }
    }

    /// Validates a project id.
    fn validate_project(project: &str, result: &mut ValidationResult) {
        if project.is_empty() {
            result.errors.push(ValidationError {
                field: String::from("project"),
                message: String::from("Project cannot be empty"),
            });
            return;
        }

        // Domain-scoped ids look like `example.com:my-project`.
        let id = project.rsplit(':').next().unwrap_or(project);
        if !is_valid_project_id(id) {
            result.errors.push(ValidationError {
                field: String::from("project"),
                message: format!(
                    "Project '{project}' is invalid. Must start with a letter and contain only lowercase letters, digits and hyphens."
                ),
            });
        } else if !(6..=30).contains(&id.len()) {
            result.warnings.push(format!(
                "Project '{project}' is {} characters long; project ids are usually 6 to 30",
                id.len()
            ));
        }
    }

    /// Validates the configured ancestry path.
    fn validate_ancestry(ancestry: &str, result: &mut ValidationResult) {
        match AncestryPath::parse(ancestry) {
            Ok(path) if path.find("projects").is_some() => result.warnings.push(format!(
                "Ancestry '{ancestry}' already names a project; the default project is appended only if it differs"
            )),
            Ok(_) => {}
            Err(e) => result.errors.push(ValidationError {
                field: String::from("ancestry"),
                message: e.to_string(),
            }),
        }
    }

    /// Validates the Resource Manager endpoint.
    fn validate_endpoint(config: &PlanAssetsConfig, result: &mut ValidationResult) {
        let Some(url) = &config.resource_manager_url else {
            return;
        };

        if !url.starts_with("https://") && !url.starts_with("http://") {
            result.errors.push(ValidationError {
                field: String::from("resource_manager_url"),
                message: format!("Resource Manager URL '{url}' must start with http:// or https://"),
            });
        } else if config.offline {
            result
                .warnings
                .push(String::from("resource_manager_url is ignored in offline mode"));
        }
    }
}

/// Checks if a project id is valid: a lowercase letter first, then lowercase
/// letters, digits or hyphens, not ending with a hyphen.
fn is_valid_project_id(id: &str) -> bool {
    let mut chars = id.chars();

    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => {}
        _ => return false,
    }

    if !chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-') {
        return false;
    }

    !id.ends_with('-')
}

impl ValidationResult {
    /// Returns true if validation passed (no errors).
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of warnings.
    #[must_use]
    pub const fn warning_count(&self) -> usize {
        self.warnings.len()
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(project: &str) -> PlanAssetsConfig {
        PlanAssetsConfig {
            project: Some(project.to_string()),
            ..PlanAssetsConfig::default()
        }
    }

    #[test]
    fn test_valid_project_id() {
        assert!(is_valid_project_id("test-project"));
        assert!(is_valid_project_id("my-project-123"));
        assert!(is_valid_project_id("p"));
    }

    #[test]
    fn test_invalid_project_id() {
        assert!(!is_valid_project_id(""));
        assert!(!is_valid_project_id("Test-Project")); // uppercase
        assert!(!is_valid_project_id("123-project")); // starts with digit
        assert!(!is_valid_project_id("my_project")); // underscore
        assert!(!is_valid_project_id("project-")); // ends with hyphen
    }

    #[test]
    fn test_validate_config() {
        let validator = ConfigValidator::new();

        let result = validator.validate(&config("test-project")).unwrap();
        assert!(result.is_valid());
        assert_eq!(result.warning_count(), 0);

        let result = validator.validate(&config("example.com:short")).unwrap();
        assert_eq!(result.warning_count(), 1);

        let err = validator.validate(&config("My_Project")).unwrap_err();
        assert!(matches!(
            err,
            PlanAssetsError::Config(ConfigError::ValidationError { field: Some(ref f), .. }) if f == "project"
        ));
    }

    #[test]
    fn test_validate_ancestry() {
        let validator = ConfigValidator::new();
        let mut cfg = config("test-project");

        cfg.ancestry = Some(String::from("organizations/123/folders/456"));
        assert!(validator.validate(&cfg).is_ok());

        cfg.ancestry = Some(String::from("organizations/123/teams/9"));
        assert!(validator.validate(&cfg).is_err());
    }

    #[test]
    fn test_validate_endpoint() {
        let validator = ConfigValidator::new();
        let mut cfg = PlanAssetsConfig {
            resource_manager_url: Some(String::from("localhost:8080")),
            ..PlanAssetsConfig::default()
        };
        assert!(validator.validate(&cfg).is_err());

        cfg.resource_manager_url = Some(String::from("http://localhost:8080"));
        cfg.offline = true;
        let result = validator.validate(&cfg).unwrap();
        assert_eq!(result.warnings.len(), 1);
    }
}

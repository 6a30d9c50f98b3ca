//! Error types for the plan-to-asset conversion system.
//!
//! This module provides the error hierarchy for every stage of a conversion
//! pass: configuration, plan parsing, attribute access, conversion, timestamp
//! decoding and ancestry resolution.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the plan-to-asset conversion system.
#[derive(Debug, Error)]
pub enum PlanAssetsError {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Plan document errors.
    #[error("Plan error: {0}")]
    Plan(#[from] PlanError),

    /// A change record could not be converted.
    #[error("Conversion error: {0}")]
    Conversion(#[from] ConversionError),

    /// A timestamp could not be encoded or decoded.
    #[error("Timestamp error: {0}")]
    Timestamp(#[from] TimestampError),

    /// Ancestry resolution errors.
    #[error("Ancestry error: {0}")]
    Ancestry(#[from] AncestryError),

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file was not found.
    #[error("Configuration file not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// The configuration file could not be parsed.
    #[error("Failed to parse configuration: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Optional source location.
        location: Option<String>,
    },

    /// Validation failed.
    #[error("Configuration validation failed: {message}")]
    ValidationError {
        /// Description of the validation error.
        message: String,
        /// Field that failed validation.
        field: Option<String>,
    },

    /// No project could be resolved from flags, config or environment.
    #[error("No project configured: pass --project or set one of {candidates}")]
    MissingProject {
        /// Environment variables that were consulted.
        candidates: String,
    },
}

/// Plan document errors.
#[derive(Debug, Error)]
pub enum PlanError {
    /// The plan file was not found.
    #[error("Plan file not found: {path}")]
    FileNotFound {
        /// Path to the missing plan.
        path: PathBuf,
    },

    /// The plan document is not valid JSON or has the wrong shape.
    #[error("Failed to parse plan: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Optional source location.
        location: Option<String>,
    },
}

/// A structural mismatch between an attribute snapshot and what a converter expects.
///
/// Converters return this without knowing which change record they were handed;
/// dispatch wraps it into [`ConversionError::Attributes`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AttributeError {
    /// A required attribute is absent or null.
    #[error("missing required attribute '{path}'")]
    Missing {
        /// Dotted attribute path.
        path: String,
    },

    /// An attribute holds the wrong kind of value.
    #[error("attribute '{path}' has the wrong kind: expected {expected}, found {found}")]
    WrongKind {
        /// Dotted attribute path.
        path: String,
        /// Expected value kind.
        expected: &'static str,
        /// Kind actually found.
        found: &'static str,
    },

    /// An attribute has the right kind but an unusable value.
    #[error("attribute '{path}' is invalid: {message}")]
    Invalid {
        /// Dotted attribute path.
        path: String,
        /// Description of the problem.
        message: String,
    },
}

/// Conversion errors. Every variant carries the offending record's address.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConversionError {
    /// The converter rejected the record's "after" snapshot.
    #[error("Failed to convert {address} ({resource_type}): {source}")]
    Attributes {
        /// Address of the change record.
        address: String,
        /// Resource type of the change record.
        resource_type: String,
        /// Underlying attribute error.
        #[source]
        source: AttributeError,
    },

    /// The action set is not one the engine understands.
    #[error("Malformed action set for {address}: [{actions}]")]
    MalformedActions {
        /// Address of the change record.
        address: String,
        /// The actions as they appeared in the plan.
        actions: String,
    },

    /// A convertible action set came without an "after" snapshot.
    #[error("Missing \"after\" snapshot for {address} ({action})")]
    MissingAfter {
        /// Address of the change record.
        address: String,
        /// The change kind that required a snapshot.
        action: String,
    },
}

/// Timestamp codec errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TimestampError {
    /// The wire value is not an RFC3339 timestamp.
    #[error("Invalid RFC3339 timestamp '{value}': {message}")]
    Invalid {
        /// The rejected input.
        value: String,
        /// Parser message.
        message: String,
    },

    /// The seconds value cannot be represented as a UTC instant.
    #[error("Timestamp seconds {seconds} are out of range")]
    OutOfRange {
        /// The rejected seconds value.
        seconds: i64,
    },
}

/// Ancestry resolution errors.
#[derive(Debug, Error)]
pub enum AncestryError {
    /// An ancestry path string could not be parsed.
    #[error("Invalid ancestry path '{path}': {message}")]
    InvalidPath {
        /// The rejected path.
        path: String,
        /// Description of the problem.
        message: String,
    },

    /// Online resolution was requested without an access token.
    #[error("Online ancestry lookup requires an access token (set GOOGLE_OAUTH_ACCESS_TOKEN or use --offline)")]
    MissingAccessToken,

    /// Authentication failed.
    #[error("Resource Manager authentication failed: {message}")]
    AuthenticationFailed {
        /// Description of the auth failure.
        message: String,
    },

    /// API request failed.
    #[error("Resource Manager request failed: {status} - {message}")]
    ApiRequestFailed {
        /// HTTP status code.
        status: u16,
        /// Error message from API.
        message: String,
    },

    /// Rate limited.
    #[error("Resource Manager rate limited, retry after {retry_after_secs} seconds")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },

    /// Network error.
    #[error("Network error communicating with Resource Manager: {message}")]
    NetworkError {
        /// Description of the network error.
        message: String,
    },

    /// Invalid response from API.
    #[error("Invalid response from Resource Manager: {message}")]
    InvalidResponse {
        /// Description of the response issue.
        message: String,
    },
}

/// Result type alias for plan-to-asset operations.
pub type Result<T> = std::result::Result<T, PlanAssetsError>;

impl PlanAssetsError {
    /// Creates a new internal error with the given message.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns the address of the change record that caused this error, if any.
    #[must_use]
    pub fn address(&self) -> Option<&str> {
        match self {
            Self::Conversion(err) => Some(err.address()),
            _ => None,
        }
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Ancestry(err) if err.is_retryable())
    }
}

impl ConfigError {
    /// Creates a validation error for a specific field.
    #[must_use]
    pub fn validation(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
            field: Some(field.into()),
        }
    }
}

impl AttributeError {
    /// Creates a missing-attribute error.
    #[must_use]
    pub fn missing(path: impl Into<String>) -> Self {
        Self::Missing { path: path.into() }
    }

    /// Creates an invalid-value error.
    #[must_use]
    pub fn invalid(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl ConversionError {
    /// Wraps a converter's attribute error with the record it came from.
    #[must_use]
    pub fn attributes(
        address: impl Into<String>,
        resource_type: impl Into<String>,
        source: AttributeError,
    ) -> Self {
        Self::Attributes {
            address: address.into(),
            resource_type: resource_type.into(),
            source,
        }
    }

    /// Returns the address of the offending change record.
    #[must_use]
    pub fn address(&self) -> &str {
        match self {
            Self::Attributes { address, .. }
            | Self::MalformedActions { address, .. }
            | Self::MissingAfter { address, .. } => address,
        }
    }
}

impl AncestryError {
    /// Creates a network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::NetworkError {
            message: message.into(),
        }
    }

    /// Creates an API request error.
    #[must_use]
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiRequestFailed {
            status,
            message: message.into(),
        }
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::NetworkError { .. })
    }

    /// Returns the suggested retry delay in seconds, if applicable.
    #[must_use]
    pub const fn retry_delay_secs(&self) -> Option<u64> {
        match self {
            Self::RateLimited { retry_after_secs } => Some(*retry_after_secs),
            Self::NetworkError { .. } => Some(1),
            _ => None,
        }
    }
}

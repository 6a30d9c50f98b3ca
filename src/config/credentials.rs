//! Google credential and default-project discovery.
//!
//! Lookups go through a caller-supplied function so that resolution can be
//! exercised without touching the process environment.

use std::fmt;

/// Variables holding a service-account key (JSON contents or a file path), in priority order.
pub const CREDENTIALS_VARS: &[&str] = &[
    "GOOGLE_CREDENTIALS",
    "GOOGLE_CLOUD_KEYFILE_JSON",
    "GCLOUD_KEYFILE_JSON",
];

/// Variable holding an OAuth access token.
pub const ACCESS_TOKEN_VAR: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";

/// Variables naming the default project, in priority order.
pub const PROJECT_VARS: &[&str] = &[
    "GOOGLE_PROJECT",
    "GOOGLE_CLOUD_PROJECT",
    "GCLOUD_PROJECT",
    "CLOUDSDK_CORE_PROJECT",
];

/// Discovered credentials.
#[derive(Clone, PartialEq, Eq, Default)]
pub enum Credentials {
    /// A service-account key from one of [`CREDENTIALS_VARS`].
    ServiceAccount {
        /// Variable the key came from.
        source: &'static str,
        /// Key contents or path.
        key: String,
    },
    /// An OAuth access token from [`ACCESS_TOKEN_VAR`].
    AccessToken(String),
    /// Nothing configured.
    #[default]
    None,
}

/// Returns the first non-empty value among `names`, with the name it came from.
fn first_set(
    names: &'static [&'static str],
    lookup: &impl Fn(&str) -> Option<String>,
) -> Option<(&'static str, String)> {
    names.iter().find_map(|name| {
        lookup(*name)
            .filter(|value| !value.trim().is_empty())
            .map(|value| (*name, value))
    })
}

impl Credentials {
    /// Resolves credentials through `lookup`.
    ///
    /// A service-account key takes precedence over an access token.
    #[must_use]
    pub fn resolve(lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some((source, key)) = first_set(CREDENTIALS_VARS, &lookup) {
            return Self::ServiceAccount { source, key };
        }
        lookup(ACCESS_TOKEN_VAR)
            .filter(|token| !token.trim().is_empty())
            .map_or(Self::None, Self::AccessToken)
    }

    /// Resolves credentials from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::resolve(|name| std::env::var(name).ok())
    }

    /// Returns the access token, if one was configured.
    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        match self {
            Self::AccessToken(token) => Some(token),
            _ => None,
        }
    }

    /// Describes where the credentials came from, without revealing them.
    #[must_use]
    pub const fn describe(&self) -> &'static str {
        match self {
            Self::ServiceAccount { source, .. } => *source,
            Self::AccessToken(_) => ACCESS_TOKEN_VAR,
            Self::None => "none",
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ServiceAccount { source, .. } => f
                .debug_struct("ServiceAccount")
                .field("source", source)
                .field("key", &"<redacted>")
                .finish(),
            Self::AccessToken(_) => f.debug_tuple("AccessToken").field(&"<redacted>").finish(),
            Self::None => f.write_str("None"),
        }
    }
}

/// Resolves the default project through `lookup`.
#[must_use]
pub fn default_project(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    first_set(PROJECT_VARS, &lookup).map(|(_, project)| project.trim().to_string())
}

//! Cloud Resource Manager client for online ancestry lookup.
//!
//! This module provides the HTTP client calling `projects.getAncestry`.

use async_trait::async_trait;
use reqwest::{Client, header};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, trace};

use crate::error::{AncestryError, PlanAssetsError, Result};

use super::path::AncestryPath;
use super::resolver::AncestryResolver;

/// Resource Manager API base URL.
pub const RESOURCE_MANAGER_URL: &str = "https://cloudresourcemanager.googleapis.com";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum number of attempts for transient failures.
const MAX_RETRIES: u32 = 3;

/// Delay between retries in milliseconds.
const RETRY_DELAY_MS: u64 = 500;

/// Upper bound on a server-requested `Retry-After`.
const MAX_RETRY_AFTER_SECS: u64 = 30;

/// Resource Manager API client.
#[derive(Clone)]
pub struct ResourceManagerClient {
    /// HTTP client.
    client: Client,
    /// OAuth access token.
    access_token: String,
    /// API base URL.
    base_url: String,
}

/// `getAncestry` response body.
#[derive(Debug, Deserialize)]
struct GetAncestryResponse {
    #[serde(default)]
    ancestor: Vec<Ancestor>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Ancestor {
    resource_id: ResourceId,
}

#[derive(Debug, Deserialize)]
struct ResourceId {
    #[serde(rename = "type")]
    kind: String,
    id: String,
}

impl ResourceManagerClient {
    /// Creates a client for the public API.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(access_token: &str) -> Result<Self> {
        Self::with_base_url(access_token, RESOURCE_MANAGER_URL)
    }

    /// Creates a client against a custom endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_base_url(access_token: &str, base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| AncestryError::network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            access_token: access_token.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetches the ancestry of a project, retrying transient failures.
    async fn get_ancestry(&self, project: &str) -> Result<AncestryPath> {
        let mut last_error = None;
        let mut delay = Duration::ZERO;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                debug!("Retry attempt {attempt} of {MAX_RETRIES} in {delay:?}");
                tokio::time::sleep(delay).await;
            }

            match self.get_ancestry_once(project).await {
                Ok(path) => return Ok(path),
                Err(e) if e.is_retryable() => {
                    delay = retry_delay(&e, attempt + 1);
                    last_error = Some(e);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(PlanAssetsError::Ancestry(last_error.unwrap_or_else(|| {
            AncestryError::network("Max retries exceeded")
        })))
    }

    /// Executes a single `getAncestry` request.
    async fn get_ancestry_once(&self, project: &str) -> std::result::Result<AncestryPath, AncestryError> {
        let url = format!("{}/v1/projects/{project}:getAncestry", self.base_url);
        trace!("POST {url}");

        let response = self
            .client
            .post(&url)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.access_token))
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(|e| AncestryError::network(format!("Request failed: {e}")))?;

        let status = response.status();

        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(1);
            return Err(AncestryError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(AncestryError::AuthenticationFailed {
                message: format!("Access to projects/{project} denied ({status})"),
            });
        }

        if status.is_server_error() {
            return Err(AncestryError::network(format!("Server error {status}")));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AncestryError::api_error(status.as_u16(), body));
        }

        let body: GetAncestryResponse = response.json().await.map_err(|e| {
            AncestryError::InvalidResponse {
                message: format!("Failed to parse response: {e}"),
            }
        })?;

        path_from_response(body)
    }
}

/// Delay before the next attempt. A rate limit waits for the server's
/// `Retry-After`, capped at `MAX_RETRY_AFTER_SECS`.
fn retry_delay(error: &AncestryError, attempt: u32) -> Duration {
    match error {
        AncestryError::RateLimited { retry_after_secs } => {
            Duration::from_secs((*retry_after_secs).min(MAX_RETRY_AFTER_SECS))
        }
        _ => Duration::from_millis(RETRY_DELAY_MS * u64::from(attempt)),
    }
}

/// Converts the leaf-first API response into a root-first path.
fn path_from_response(body: GetAncestryResponse) -> std::result::Result<AncestryPath, AncestryError> {
    if body.ancestor.is_empty() {
        return Err(AncestryError::InvalidResponse {
            message: String::from("Empty ancestry"),
        });
    }

    let segments = body
        .ancestor
        .into_iter()
        .rev()
        .map(|a| {
            let kind = match a.resource_id.kind.as_str() {
                "organization" => "organizations",
                "folder" => "folders",
                "project" => "projects",
                other => {
                    return Err(AncestryError::InvalidResponse {
                        message: format!("Unknown ancestor type '{other}'"),
                    });
                }
            };
            Ok(format!("{kind}/{}", a.resource_id.id))
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(AncestryPath::from_segments(segments))
}

#[async_trait]
impl AncestryResolver for ResourceManagerClient {
    async fn resolve(&self, project: &str) -> Result<AncestryPath> {
        debug!("Resolving ancestry of {project} online");
        self.get_ancestry(project).await
    }

    fn resolver_type(&self) -> &'static str {
        "resource-manager"
    }
}

impl std::fmt::Debug for ResourceManagerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceManagerClient")
            .field("base_url", &self.base_url)
            .field("access_token", &"<redacted>")
            .finish_non_exhaustive()
    }
}

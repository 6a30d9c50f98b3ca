//! Ancestry resolver trait and the offline implementation.

use async_trait::async_trait;
use tracing::debug;

use crate::error::Result;

use super::path::AncestryPath;

/// Resolves the ancestry path of a project.
///
/// Resolution happens before a conversion pass starts; converters only ever
/// see the resolved path.
#[async_trait]
pub trait AncestryResolver: Send + Sync {
    /// Resolves the path from the root scope down to `projects/{project}`.
    async fn resolve(&self, project: &str) -> Result<AncestryPath>;

    /// Gets the resolver name for logging.
    fn resolver_type(&self) -> &'static str;
}

/// Offline resolver: a configured ancestry, or a synthetic project-only path.
#[derive(Debug, Clone, Default)]
pub struct OfflineAncestry {
    /// Ancestry configured by the caller, without the project leaf.
    configured: AncestryPath,
}

impl OfflineAncestry {
    /// Creates an offline resolver from a configured ancestry.
    #[must_use]
    pub const fn new(configured: AncestryPath) -> Self {
        Self { configured }
    }
}

#[async_trait]
impl AncestryResolver for OfflineAncestry {
    async fn resolve(&self, project: &str) -> Result<AncestryPath> {
        if self.configured.is_empty() {
            debug!("No ancestry configured, using synthetic path for {project}");
            return Ok(AncestryPath::for_project(project));
        }
        Ok(self.configured.clone().with_project(project))
    }

    fn resolver_type(&self) -> &'static str {
        "offline"
    }
}

#[async_trait]
impl AncestryResolver for Box<dyn AncestryResolver> {
    async fn resolve(&self, project: &str) -> Result<AncestryPath> {
        (**self).resolve(project).await
    }

    fn resolver_type(&self) -> &'static str {
        (**self).resolver_type()
    }
}

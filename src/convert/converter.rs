//! The per-resource-type converter contract.

use serde_json::Value;

use crate::ancestry::AncestryPath;
use crate::error::AttributeError;

use super::fragment::AssetFragment;

/// Converts the "after" snapshot of one resource type into asset fragments.
///
/// Implementations must not perform network calls when the context is
/// offline. A snapshot whose shape does not match what the converter expects
/// is an [`AttributeError`]; missing optional data is not.
pub trait ResourceConverter: Send + Sync {
    /// Converts one snapshot. A single record may yield several fragments.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot violates the expected structure.
    fn convert(
        &self,
        attributes: &Value,
        context: &ConvertContext,
    ) -> Result<Vec<AssetFragment>, AttributeError>;
}

/// Pre-resolved inputs shared by every conversion in one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertContext {
    /// Default project for resources that do not name one.
    project: String,
    /// Ancestry of the default project, root to leaf.
    ancestry: AncestryPath,
    /// Whether converters are forbidden from making network calls.
    offline: bool,
}

impl ConvertContext {
    /// Creates a context.
    #[must_use]
    pub fn new(project: impl Into<String>, ancestry: AncestryPath, offline: bool) -> Self {
        Self {
            project: project.into(),
            ancestry,
            offline,
        }
    }

    /// Creates an offline context with the synthetic `projects/{project}` ancestry.
    #[must_use]
    pub fn offline(project: impl Into<String>) -> Self {
        let project = project.into();
        let ancestry = AncestryPath::for_project(&project);
        Self::new(project, ancestry, true)
    }

    /// Returns the default project.
    #[must_use]
    pub fn project(&self) -> &str {
        &self.project
    }

    /// Returns the resolved ancestry path.
    #[must_use]
    pub const fn ancestry(&self) -> &AncestryPath {
        &self.ancestry
    }

    /// Returns true if network calls are forbidden.
    #[must_use]
    pub const fn is_offline(&self) -> bool {
        self.offline
    }

    /// Picks the project named by a resource, falling back to the default.
    #[must_use]
    pub fn project_or_default<'a>(&'a self, named: Option<&'a str>) -> &'a str {
        named.filter(|p| !p.is_empty()).unwrap_or(&self.project)
    }

    /// Ancestors of an asset in `project`. `None` for the default project,
    /// whose resolved path the engine applies.
    #[must_use]
    pub fn ancestors_for(&self, project: &str) -> Option<Vec<String>> {
        (project != self.project).then(|| AncestryPath::for_project(project).segments().to_vec())
    }
}

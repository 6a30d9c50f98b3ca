//! Ordered containing-scope paths.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AncestryError;

/// Scope kinds allowed in an ancestry path.
const SCOPE_KINDS: &[&str] = &["organizations", "folders", "projects"];

/// Containing scopes of a resource, root to leaf, e.g.
/// `["organizations/123", "folders/456", "projects/my-project"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AncestryPath {
    segments: Vec<String>,
}

impl AncestryPath {
    /// Creates an empty path.
    #[must_use]
    pub const fn new() -> Self {
        Self { segments: vec![] }
    }

    /// The synthetic path for a project with unknown ancestry.
    #[must_use]
    pub fn for_project(project: &str) -> Self {
        Self {
            segments: vec![format!("projects/{project}")],
        }
    }

    /// Parses `kind/id[/kind/id...]`, e.g. `organizations/123/folders/456`.
    ///
    /// # Errors
    ///
    /// Returns an error on an odd number of components, an unknown kind or an empty id.
    pub fn parse(path: &str) -> Result<Self, AncestryError> {
        let trimmed = path.trim().trim_matches('/');
        if trimmed.is_empty() {
            return Ok(Self::new());
        }

        let parts: Vec<&str> = trimmed.split('/').collect();
        if parts.len() % 2 != 0 {
            return Err(invalid(path, "expected kind/id pairs"));
        }

        let mut segments = Vec::with_capacity(parts.len() / 2);
        for pair in parts.chunks(2) {
            let (kind, id) = (pair[0], pair[1]);
            if !SCOPE_KINDS.contains(&kind) {
                return Err(invalid(
                    path,
                    format!("unknown scope kind '{kind}', expected one of {}", SCOPE_KINDS.join(", ")),
                ));
            }
            if id.is_empty() {
                return Err(invalid(path, format!("empty id for '{kind}'")));
            }
            segments.push(format!("{kind}/{id}"));
        }

        Ok(Self { segments })
    }

    /// Builds a path from already-formatted segments.
    #[must_use]
    pub const fn from_segments(segments: Vec<String>) -> Self {
        Self { segments }
    }

    /// Appends `projects/{project}` unless the path already ends with it.
    #[must_use]
    pub fn with_project(mut self, project: &str) -> Self {
        let leaf = format!("projects/{project}");
        if self.segments.last() != Some(&leaf) {
            self.segments.push(leaf);
        }
        self
    }

    /// Returns the segments, root first.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns the first segment of the given kind, e.g. the organization.
    #[must_use]
    pub fn find(&self, kind: &str) -> Option<&str> {
        self.segments
            .iter()
            .find(|s| s.split('/').next() == Some(kind))
            .map(String::as_str)
    }

    /// Returns true if the path has no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

fn invalid(path: &str, message: impl Into<String>) -> AncestryError {
    AncestryError::InvalidPath {
        path: path.to_string(),
        message: message.into(),
    }
}

impl FromStr for AncestryPath {
    type Err = AncestryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for AncestryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_org_and_folder() {
        let path = AncestryPath::parse("organizations/123/folders/456").unwrap();
        assert_eq!(path.segments(), ["organizations/123", "folders/456"]);
        assert_eq!(path.to_string(), "organizations/123/folders/456");
        assert_eq!(path.find("organizations"), Some("organizations/123"));
    }

    #[test]
    fn test_parse_empty_is_empty_path() {
        assert!(AncestryPath::parse("").unwrap().is_empty());
        assert!(AncestryPath::parse("/").unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_bad_paths() {
        assert!(AncestryPath::parse("organizations").is_err());
        assert!(AncestryPath::parse("orgs/123").is_err());
        assert!(AncestryPath::parse("organizations//folders/1").is_err());
    }

    #[test]
    fn test_with_project_appends_once() {
        let path = AncestryPath::parse("organizations/123")
            .unwrap()
            .with_project("p")
            .with_project("p");
        assert_eq!(path.segments(), ["organizations/123", "projects/p"]);
    }
}

//! Configuration file types.
//!
//! These structs map to `plan-assets.yaml`. Every field is optional: a
//! conversion can run from flags and environment variables alone.

use serde::{Deserialize, Serialize};

/// The root of `plan-assets.yaml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PlanAssetsConfig {
    /// Default project for resources that do not name one.
    #[serde(default)]
    pub project: Option<String>,
    /// Ancestry of the default project without the project leaf,
    /// e.g. `organizations/123/folders/456`.
    #[serde(default)]
    pub ancestry: Option<String>,
    /// Forbid network calls; ancestry comes from `ancestry` only.
    #[serde(default)]
    pub offline: bool,
    /// Resource Manager endpoint used for online ancestry lookup.
    #[serde(default)]
    pub resource_manager_url: Option<String>,
}

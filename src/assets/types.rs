//! Canonical asset types handed to the policy engine.
//!
//! These types mirror the Cloud Asset Inventory export format and are the
//! final output of a conversion pass.

use serde::{Deserialize, Serialize};

use super::timestamp::Timestamp;

/// A merged, canonical asset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Asset {
    /// Full asset name, e.g. `//compute.googleapis.com/projects/p/zones/z/disks/d`.
    pub name: String,
    /// Asset type, e.g. `compute.googleapis.com/Disk`.
    pub asset_type: String,
    /// Resource payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<AssetResource>,
    /// Effective IAM policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iam_policy: Option<IamPolicy>,
    /// Organization policies set on the asset, sorted by constraint.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub org_policy: Vec<OrgPolicy>,
    /// Containing scopes, root to leaf.
    #[serde(default)]
    pub ancestors: Vec<String>,
}

impl Asset {
    /// Returns the canonical name `{asset_type}{name}` this asset is keyed by.
    #[must_use]
    pub fn canonical_name(&self) -> String {
        canonical_name(&self.asset_type, &self.name)
    }
}

/// Builds the canonical merge key for an asset type and asset name.
#[must_use]
pub fn canonical_name(asset_type: &str, name: &str) -> String {
    format!("{asset_type}{name}")
}

/// The resource payload of an asset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssetResource {
    /// API version of the payload schema.
    pub version: String,
    /// Discovery document describing the payload schema.
    pub discovery_document_uri: String,
    /// Schema name inside the discovery document.
    pub discovery_name: String,
    /// Full name of the parent resource.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub parent: String,
    /// The payload itself.
    pub data: serde_json::Value,
}

/// An IAM policy: one binding per role.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct IamPolicy {
    /// Role bindings.
    pub bindings: Vec<IamBinding>,
}

/// A role granted to a set of members.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IamBinding {
    /// Role name, e.g. `roles/viewer`.
    pub role: String,
    /// Principals granted the role.
    pub members: Vec<String>,
}

impl IamBinding {
    /// Creates a binding.
    #[must_use]
    pub fn new<I, S>(role: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            role: role.into(),
            members: members.into_iter().map(Into::into).collect(),
        }
    }
}

/// An organization policy applied to an asset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrgPolicy {
    /// Constraint name, e.g. `constraints/compute.disableSerialPortAccess`.
    pub constraint: String,
    /// List constraint settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_policy: Option<ListPolicy>,
    /// Boolean constraint settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boolean_policy: Option<BooleanPolicy>,
    /// Restores the constraint default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restore_default: Option<RestoreDefault>,
    /// Concurrency token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    /// Last modification time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<Timestamp>,
}

/// Settings of a list constraint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListPolicy {
    /// Explicitly allowed values.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_values: Vec<String>,
    /// Explicitly denied values.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub denied_values: Vec<String>,
    /// `ALLOW` or `DENY` for all values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_values: Option<String>,
    /// Suggested value for the constraint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_value: Option<String>,
    /// Whether the parent's policy is inherited.
    #[serde(default)]
    pub inherit_from_parent: bool,
}

/// Settings of a boolean constraint.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BooleanPolicy {
    /// Whether the constraint is enforced.
    pub enforced: bool,
}

/// Marker restoring a constraint's default behavior.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RestoreDefault {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_serialization_omits_empty_parts() {
        let asset = Asset {
            name: String::from("//storage.googleapis.com/my-bucket"),
            asset_type: String::from("storage.googleapis.com/Bucket"),
            resource: None,
            iam_policy: None,
            org_policy: vec![],
            ancestors: vec![String::from("projects/test-project")],
        };

        let json = serde_json::to_value(&asset).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "//storage.googleapis.com/my-bucket",
                "asset_type": "storage.googleapis.com/Bucket",
                "ancestors": ["projects/test-project"],
            })
        );
    }

    #[test]
    fn test_canonical_name() {
        assert_eq!(
            canonical_name(
                "compute.googleapis.com/Disk",
                "//compute.googleapis.com/projects/p/zones/z/disks/d"
            ),
            "compute.googleapis.com/Disk//compute.googleapis.com/projects/p/zones/z/disks/d"
        );
    }
}

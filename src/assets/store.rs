//! Accumulation of fragments into one asset per canonical name.
//!
//! Resource payloads are complete snapshots: the last one wins. IAM state is
//! merged by [`IamMerger`]. Organization policies are last-write-wins per
//! constraint.

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, trace};

use crate::convert::AssetFragment;

use super::iam::IamMerger;
use super::types::{Asset, AssetResource, OrgPolicy};

/// In-memory merge store for one conversion pass.
#[derive(Debug, Default)]
pub struct AssetStore {
    /// Entries keyed by canonical name.
    entries: HashMap<String, AssetEntry>,
}

/// Accumulated state for one canonical asset.
#[derive(Debug, Clone)]
struct AssetEntry {
    asset_type: String,
    name: String,
    resource: Option<AssetResource>,
    iam: Option<IamMerger>,
    org_policies: BTreeMap<String, OrgPolicy>,
    ancestors: Vec<String>,
}

impl AssetStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges one fragment.
    ///
    /// Explicit ancestors on the fragment replace the recorded ones.
    /// `default_ancestors` only fills an asset that has none yet.
    pub fn merge(&mut self, fragment: AssetFragment, default_ancestors: &[String]) {
        let key = fragment.canonical_name();
        let AssetFragment {
            asset_type,
            name,
            resource,
            iam,
            org_policies,
            ancestors,
        } = fragment;

        let entry = self.entries.entry(key).or_insert_with_key(|key| {
            debug!("New asset {key}");
            AssetEntry {
                asset_type,
                name,
                resource: None,
                iam: None,
                org_policies: BTreeMap::new(),
                ancestors: vec![],
            }
        });

        if let Some(resource) = resource {
            if entry.resource.is_some() {
                trace!("Replacing payload of {}{}", entry.asset_type, entry.name);
            }
            entry.resource = Some(resource);
        }

        if let Some(contribution) = iam {
            entry
                .iam
                .get_or_insert_with(IamMerger::new)
                .apply(&contribution);
        }

        for policy in org_policies {
            entry.org_policies.insert(policy.constraint.clone(), policy);
        }

        match ancestors {
            Some(ancestors) => entry.ancestors = ancestors,
            None if entry.ancestors.is_empty() => entry.ancestors = default_ancestors.to_vec(),
            None => {}
        }
    }

    /// Returns the number of distinct assets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no asset has been merged yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if an asset with this canonical name exists.
    #[must_use]
    pub fn contains(&self, canonical_name: &str) -> bool {
        self.entries.contains_key(canonical_name)
    }

    /// Returns the asset with this canonical name.
    #[must_use]
    pub fn get(&self, canonical_name: &str) -> Option<Asset> {
        self.entries.get(canonical_name).map(AssetEntry::to_asset)
    }

    /// Returns every asset, in no particular order.
    #[must_use]
    pub fn assets(&self) -> Vec<Asset> {
        self.entries.values().map(AssetEntry::to_asset).collect()
    }
}

impl AssetEntry {
    fn to_asset(&self) -> Asset {
        Asset {
            name: self.name.clone(),
            asset_type: self.asset_type.clone(),
            resource: self.resource.clone(),
            iam_policy: self.iam.as_ref().map(IamMerger::to_policy),
            org_policy: self.org_policies.values().cloned().collect(),
            ancestors: self.ancestors.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{BooleanPolicy, IamBinding};
    use crate::convert::IamContribution;
    use serde_json::json;

    const BUCKET_TYPE: &str = "storage.googleapis.com/Bucket";
    const BUCKET_NAME: &str = "//storage.googleapis.com/my-bucket";

    fn ancestors() -> Vec<String> {
        vec![String::from("projects/test-project")]
    }

    fn payload(data: serde_json::Value) -> AssetResource {
        AssetResource {
            version: String::from("v1"),
            discovery_document_uri: String::from(
                "https://www.googleapis.com/discovery/v1/apis/storage/v1/rest",
            ),
            discovery_name: String::from("Bucket"),
            parent: String::new(),
            data,
        }
    }

    fn key() -> String {
        format!("{BUCKET_TYPE}{BUCKET_NAME}")
    }

    #[test]
    fn test_new_fragment_inserted_verbatim() {
        let mut store = AssetStore::new();
        store.merge(
            AssetFragment::new(BUCKET_TYPE, BUCKET_NAME).with_resource(payload(json!({"a": 1}))),
            &ancestors(),
        );

        let asset = store.get(&key()).unwrap();
        assert_eq!(asset.resource.unwrap().data, json!({"a": 1}));
        assert!(asset.iam_policy.is_none());
        assert_eq!(asset.ancestors, ancestors());
    }

    #[test]
    fn test_payload_last_wins() {
        let mut store = AssetStore::new();
        store.merge(
            AssetFragment::new(BUCKET_TYPE, BUCKET_NAME).with_resource(payload(json!({"a": 1}))),
            &ancestors(),
        );
        store.merge(
            AssetFragment::new(BUCKET_TYPE, BUCKET_NAME).with_resource(payload(json!({"b": 2}))),
            &ancestors(),
        );

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&key()).unwrap().resource.unwrap().data, json!({"b": 2}));
    }

    #[test]
    fn test_iam_fragment_keeps_payload() {
        let mut store = AssetStore::new();
        store.merge(
            AssetFragment::new(BUCKET_TYPE, BUCKET_NAME).with_resource(payload(json!({"a": 1}))),
            &ancestors(),
        );
        store.merge(
            AssetFragment::new(BUCKET_TYPE, BUCKET_NAME)
                .with_iam(IamContribution::member("roles/viewer", "user:a@example.com")),
            &ancestors(),
        );

        let asset = store.get(&key()).unwrap();
        assert!(asset.resource.is_some());
        assert_eq!(
            asset.iam_policy.unwrap().bindings,
            vec![IamBinding::new("roles/viewer", ["user:a@example.com"])]
        );
    }

    #[test]
    fn test_same_name_different_type_are_distinct() {
        let mut store = AssetStore::new();
        store.merge(AssetFragment::new("a.googleapis.com/X", "//thing"), &ancestors());
        store.merge(AssetFragment::new("b.googleapis.com/X", "//thing"), &ancestors());

        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_org_policy_last_wins_per_constraint() {
        let policy = |constraint: &str, enforced: bool| OrgPolicy {
            constraint: constraint.to_string(),
            list_policy: None,
            boolean_policy: Some(BooleanPolicy { enforced }),
            restore_default: None,
            etag: None,
            update_time: None,
        };

        let mut store = AssetStore::new();
        store.merge(
            AssetFragment::new(BUCKET_TYPE, BUCKET_NAME)
                .with_org_policy(policy("constraints/b", true))
                .with_org_policy(policy("constraints/a", true)),
            &ancestors(),
        );
        store.merge(
            AssetFragment::new(BUCKET_TYPE, BUCKET_NAME).with_org_policy(policy("constraints/b", false)),
            &ancestors(),
        );

        let asset = store.get(&key()).unwrap();
        assert_eq!(asset.org_policy.len(), 2);
        assert_eq!(asset.org_policy[0].constraint, "constraints/a");
        assert_eq!(asset.org_policy[1].boolean_policy, Some(BooleanPolicy { enforced: false }));
    }

    #[test]
    fn test_explicit_ancestors_override_default() {
        let mut store = AssetStore::new();
        store.merge(
            AssetFragment::new(BUCKET_TYPE, BUCKET_NAME)
                .with_ancestors(vec![String::from("organizations/1")]),
            &ancestors(),
        );

        assert_eq!(store.get(&key()).unwrap().ancestors, vec!["organizations/1"]);
    }

    #[test]
    fn test_default_ancestors_do_not_replace_explicit_ones() {
        let mut store = AssetStore::new();
        store.merge(
            AssetFragment::new(BUCKET_TYPE, BUCKET_NAME)
                .with_resource(payload(json!({"a": 1})))
                .with_ancestors(vec![String::from("projects/other-project")]),
            &ancestors(),
        );
        store.merge(
            AssetFragment::new(BUCKET_TYPE, BUCKET_NAME)
                .with_iam(IamContribution::member("roles/viewer", "user:a@example.com")),
            &ancestors(),
        );

        assert_eq!(store.get(&key()).unwrap().ancestors, vec!["projects/other-project"]);
    }

    #[test]
    fn test_explicit_ancestors_replace_defaults() {
        let mut store = AssetStore::new();
        store.merge(
            AssetFragment::new(BUCKET_TYPE, BUCKET_NAME)
                .with_iam(IamContribution::member("roles/viewer", "user:a@example.com")),
            &ancestors(),
        );
        store.merge(
            AssetFragment::new(BUCKET_TYPE, BUCKET_NAME)
                .with_resource(payload(json!({"a": 1})))
                .with_ancestors(vec![String::from("projects/other-project")]),
            &ancestors(),
        );

        assert_eq!(store.get(&key()).unwrap().ancestors, vec!["projects/other-project"]);
    }
}

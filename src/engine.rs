//! Conversion engine.
//!
//! This module drives one conversion pass: it filters change records,
//! dispatches the survivors to their converters and merges the resulting
//! fragments into one asset per canonical name.

use std::collections::BTreeMap;

use tracing::{debug, info, trace, warn};

use crate::assets::{Asset, AssetStore, sort_assets};
use crate::convert::{AssetFragment, ConvertContext, ConverterRegistry};
use crate::error::{ConversionError, PlanAssetsError, Result};
use crate::plan::{Disposition, ResourceChange, SkipReason, filter_change};

/// Converts change records into merged assets.
///
/// A converter owns its merge store and lives for one conversion pass.
pub struct Converter<'a> {
    /// Registered resource converters.
    registry: &'a ConverterRegistry,
    /// Pre-resolved inputs handed to every converter.
    context: ConvertContext,
    /// Merged assets.
    store: AssetStore,
}

/// Summary of one `add_resource_changes` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Records supplied.
    pub records: usize,
    /// Records handed to a converter.
    pub converted: usize,
    /// Fragments produced and merged.
    pub fragments: usize,
    /// Skipped records per reason.
    pub skipped: BTreeMap<SkipReason, usize>,
}

impl<'a> Converter<'a> {
    /// Creates a converter with an empty store.
    #[must_use]
    pub fn new(registry: &'a ConverterRegistry, context: ConvertContext) -> Self {
        Self {
            registry,
            context,
            store: AssetStore::new(),
        }
    }

    /// Returns the conversion context.
    #[must_use]
    pub const fn context(&self) -> &ConvertContext {
        &self.context
    }

    /// Converts and merges a batch of change records, in order.
    ///
    /// Every record is converted before anything is merged, so a failed call
    /// leaves the store exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns the first conversion error. The error names the offending record.
    pub fn add_resource_changes(&mut self, records: &[ResourceChange]) -> Result<BatchReport> {
        let mut report = BatchReport {
            records: records.len(),
            ..BatchReport::default()
        };
        let mut pending: Vec<AssetFragment> = Vec::new();

        for record in records {
            let fragments = self.convert_record(record, &mut report).inspect_err(|e| {
                warn!("Rejecting batch of {} records: {e}", records.len());
            })?;
            pending.extend(fragments);
        }

        report.fragments = pending.len();
        let ancestors = self.context.ancestry().segments();
        for fragment in pending {
            self.store.merge(fragment, ancestors);
        }

        info!(
            "Converted {} of {} records into {} fragments ({} assets total)",
            report.converted,
            report.records,
            report.fragments,
            self.store.len()
        );
        Ok(report)
    }

    fn convert_record(
        &self,
        record: &ResourceChange,
        report: &mut BatchReport,
    ) -> Result<Vec<AssetFragment>> {
        let (kind, after) = match filter_change(record, self.registry)? {
            Disposition::Skip(reason) => {
                debug!("Skipping {} ({reason})", record.address);
                *report.skipped.entry(reason).or_default() += 1;
                return Ok(vec![]);
            }
            Disposition::Convert { kind, after } => (kind, after),
        };

        let converter = self.registry.get(&record.resource_type).ok_or_else(|| {
            PlanAssetsError::internal(format!("No converter for {}", record.resource_type))
        })?;

        trace!("Converting {} ({kind})", record.address);
        let fragments = converter
            .convert(after, &self.context)
            .map_err(|e| ConversionError::attributes(&record.address, &record.resource_type, e))?;

        report.converted += 1;
        Ok(fragments)
    }

    /// Returns every asset merged so far, in no particular order.
    #[must_use]
    pub fn assets(&self) -> Vec<Asset> {
        self.store.assets()
    }

    /// Returns every asset sorted by name, then type.
    #[must_use]
    pub fn sorted_assets(&self) -> Vec<Asset> {
        let mut assets = self.store.assets();
        sort_assets(&mut assets);
        assets
    }

    /// Returns the asset with a canonical name.
    #[must_use]
    pub fn get(&self, canonical_name: &str) -> Option<Asset> {
        self.store.get(canonical_name)
    }

    /// Returns the number of distinct assets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns true if no asset has been merged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

impl std::fmt::Debug for Converter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Converter")
            .field("context", &self.context)
            .field("assets", &self.store.len())
            .finish_non_exhaustive()
    }
}

impl BatchReport {
    /// Returns the total number of skipped records.
    #[must_use]
    pub fn total_skipped(&self) -> usize {
        self.skipped.values().sum()
    }
}

impl std::fmt::Display for BatchReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Conversion summary:")?;
        writeln!(f, "  Records: {}", self.records)?;
        writeln!(f, "  Converted: {}", self.converted)?;
        writeln!(f, "  Fragments: {}", self.fragments)?;
        write!(f, "  Skipped: {}", self.total_skipped())?;
        for (reason, count) in &self.skipped {
            write!(f, "\n    - {reason}: {count}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ancestry::AncestryPath;
    use crate::assets::IamBinding;
    use crate::convert::google::default_registry;
    use crate::convert::{IamContribution, ResourceConverter};
    use crate::error::AttributeError;
    use crate::plan::Action;
    use mockall::mock;
    use serde_json::{Value, json};

    mock! {
        Plugin {}

        impl ResourceConverter for Plugin {
            fn convert(
                &self,
                attributes: &Value,
                context: &ConvertContext,
            ) -> std::result::Result<Vec<AssetFragment>, AttributeError>;
        }
    }

    const DISK_KEY: &str = "compute.googleapis.com/Disk//compute.googleapis.com/projects/test-project/zones/us-central1-a/disks/test-disk";
    const PROJECT_KEY: &str = "cloudresourcemanager.googleapis.com/Project//cloudresourcemanager.googleapis.com/projects/test-project";
    const BILLING_KEY: &str = "cloudbilling.googleapis.com/ProjectBillingInfo//cloudbilling.googleapis.com/projects/test-project/billingInfo";

    fn context() -> ConvertContext {
        ConvertContext::offline("test-project")
    }

    fn disk_after() -> Value {
        json!({
            "project": "test-project",
            "name": "test-disk",
            "type": "pd-ssd",
            "zone": "us-central1-a",
            "image": "projects/debian-cloud/global/images/debian-8-jessie-v20170523",
            "labels": {"environment": "dev"},
            "physical_block_size_bytes": 4096
        })
    }

    fn record(resource_type: &str, name: &str, actions: &[&str], after: Option<Value>) -> ResourceChange {
        ResourceChange::new(
            resource_type,
            name,
            actions.iter().copied().map(Action::from).collect(),
            after,
        )
    }

    fn disk(actions: &[&str]) -> ResourceChange {
        let mut record = record("google_compute_disk", "foo", actions, Some(disk_after()));
        record.address = String::from("whatever.google_compute_disk.foo");
        record
    }

    fn project_member(role: &str, member: &str) -> ResourceChange {
        record(
            "google_project_iam_member",
            "member",
            &["create"],
            Some(json!({"project": "test-project", "role": role, "member": member})),
        )
    }

    fn project_binding(role: &str, members: &[&str]) -> ResourceChange {
        record(
            "google_project_iam_binding",
            "binding",
            &["create"],
            Some(json!({"project": "test-project", "role": role, "members": members})),
        )
    }

    fn bindings(asset: &Asset) -> Vec<IamBinding> {
        asset.iam_policy.clone().unwrap_or_default().bindings
    }

    #[test]
    fn test_noop_and_delete_leave_collection_unchanged() {
        let registry = default_registry();
        let mut converter = Converter::new(&registry, context());

        let noop = record("google_compute_disk", "foo", &["no-op"], None);
        let mut delete = record("google_compute_disk", "foo", &["delete"], None);
        delete.change.before = Some(disk_after());

        let report = converter.add_resource_changes(&[noop, delete]).unwrap();

        assert!(converter.is_empty());
        assert_eq!(report.total_skipped(), 2);
        assert_eq!(report.skipped.get(&SkipReason::Delete), Some(&1));
    }

    #[test]
    fn test_unsupported_types_are_skipped() {
        let registry = default_registry();
        let mut converter = Converter::new(&registry, context());

        let budget = record(
            "google_billing_budget",
            "budget",
            &["create"],
            Some(json!({"billing_account": "000000-000000-000000"})),
        );
        let unknown = record("not_a_real_type", "x", &["frobnicate"], None);

        let report = converter.add_resource_changes(&[budget, unknown]).unwrap();

        assert!(converter.is_empty());
        assert_eq!(report.skipped.get(&SkipReason::Unsupported), Some(&2));
    }

    #[test]
    fn test_create_update_and_replace_convert_the_disk() {
        let registry = default_registry();
        let mut produced = Vec::new();

        for actions in [&["create"][..], &["update"][..], &["delete", "create"][..]] {
            let mut converter = Converter::new(&registry, context());
            converter.add_resource_changes(&[disk(actions)]).unwrap();

            assert!(converter.get(DISK_KEY).is_some(), "{actions:?}");
            produced.push(converter.sorted_assets());
        }

        assert_eq!(produced[0], produced[2]);
    }

    #[test]
    fn test_adding_twice_is_idempotent() {
        let registry = default_registry();
        let batch = [
            disk(&["create"]),
            project_member("roles/viewer", "user:a@example.com"),
        ];

        let mut converter = Converter::new(&registry, context());
        converter.add_resource_changes(&batch).unwrap();
        let once = converter.sorted_assets();
        converter.add_resource_changes(&batch).unwrap();

        assert_eq!(converter.sorted_assets(), once);
    }

    #[test]
    fn test_non_iam_order_does_not_matter() {
        let registry = default_registry();
        let bucket = record(
            "google_storage_bucket",
            "bucket",
            &["create"],
            Some(json!({"name": "my-bucket", "location": "US"})),
        );
        let project = record(
            "google_project",
            "project",
            &["create"],
            Some(json!({"name": "My Project", "billing_account": "000000-000000-000000"})),
        );

        let mut forward = Converter::new(&registry, context());
        forward
            .add_resource_changes(&[disk(&["create"]), bucket.clone(), project.clone()])
            .unwrap();
        let mut backward = Converter::new(&registry, context());
        backward
            .add_resource_changes(&[project, bucket, disk(&["create"])])
            .unwrap();

        assert_eq!(forward.sorted_assets(), backward.sorted_assets());
        assert_eq!(forward.len(), 4);
    }

    #[test]
    fn test_iam_contributions_apply_in_order() {
        let registry = default_registry();

        let mut member_first = Converter::new(&registry, context());
        member_first
            .add_resource_changes(&[
                project_member("roles/viewer", "user:a@example.com"),
                project_binding("roles/viewer", &["user:b@example.com"]),
            ])
            .unwrap();
        let asset = member_first.get(PROJECT_KEY).unwrap();
        assert_eq!(
            bindings(&asset),
            vec![IamBinding::new("roles/viewer", ["user:b@example.com"])]
        );

        let mut binding_first = Converter::new(&registry, context());
        binding_first
            .add_resource_changes(&[
                project_binding("roles/viewer", &["user:b@example.com"]),
                project_member("roles/viewer", "user:a@example.com"),
            ])
            .unwrap();
        let asset = binding_first.get(PROJECT_KEY).unwrap();
        assert_eq!(
            bindings(&asset),
            vec![IamBinding::new(
                "roles/viewer",
                ["user:a@example.com", "user:b@example.com"]
            )]
        );
    }

    #[test]
    fn test_two_member_fragments_merge() {
        let registry = default_registry();
        let mut converter = Converter::new(&registry, context());

        let member = |name: &str, principal: &str| {
            record(
                "google_storage_bucket_iam_member",
                name,
                &["create"],
                Some(json!({"bucket": "b/my-bucket", "role": "roles/storage.objectViewer", "member": principal})),
            )
        };
        converter
            .add_resource_changes(&[
                member("b", "user:b@example.com"),
                member("a", "user:a@example.com"),
            ])
            .unwrap();

        let asset = converter
            .get("storage.googleapis.com/Bucket//storage.googleapis.com/my-bucket")
            .unwrap();
        assert!(asset.resource.is_none());
        assert_eq!(
            bindings(&asset),
            vec![IamBinding::new(
                "roles/storage.objectViewer",
                ["user:a@example.com", "user:b@example.com"]
            )]
        );
    }

    #[test]
    fn test_empty_binding_still_emits_policy() {
        let registry = default_registry();
        let mut converter = Converter::new(&registry, context());
        converter
            .add_resource_changes(&[project_binding("roles/editor", &[])])
            .unwrap();

        let asset = converter.get(PROJECT_KEY).unwrap();
        assert_eq!(asset.iam_policy.map(|p| p.bindings.len()), Some(0));
    }

    #[test]
    fn test_duplicated_resources_collapse() {
        let registry = default_registry();
        let mut converter = Converter::new(&registry, context());

        let budget = |name: &str| {
            record(
                "google_billing_budget",
                name,
                &["create"],
                Some(json!({"billing_account": "000000-000000-000000", "display_name": name})),
            )
        };
        let project = |name: &str| {
            record(
                "google_project",
                name,
                &["create"],
                Some(json!({
                    "auto_create_network": true,
                    "billing_account": "000000-000000-000000",
                    "labels": null,
                    "name": name,
                    "org_id": "00000000000000",
                    "timeouts": null
                })),
            )
        };

        let report = converter
            .add_resource_changes(&[
                budget("budget1"),
                budget("budget2"),
                project("My Project1"),
                project("My Project2"),
            ])
            .unwrap();

        // Budgets have no converter; the billing info comes from the projects.
        assert_eq!(report.skipped.get(&SkipReason::Unsupported), Some(&2));
        assert_eq!(report.converted, 2);
        assert_eq!(converter.len(), 2);
        assert!(converter.get(BILLING_KEY).is_some());
        let project = converter.get(PROJECT_KEY).unwrap();
        assert_eq!(project.resource.unwrap().data["name"], "My Project2");
    }

    #[test]
    fn test_bucket_with_unknown_after_values() {
        let registry = default_registry();
        let mut converter = Converter::new(&registry, context());

        let mut bucket = record(
            "google_storage_bucket",
            "buckets",
            &["create"],
            Some(json!({
                "cors": [null],
                "default_event_based_hold": null,
                "encryption": [null],
                "lifecycle_rule": [],
                "location": "US",
                "logging": [],
                "project": "test-project",
                "requester_pays": null,
                "retention_policy": [],
                "storage_class": "MULTI_REGIONAL",
                "versioning": [null],
                "website": [null]
            })),
        );
        bucket.address = String::from("module.gcs_buckets.google_storage_bucket.buckets[0]");
        bucket.module_address = Some(String::from("module.gcs_buckets"));
        bucket.index = Some(json!(0));

        converter.add_resource_changes(&[bucket]).unwrap();

        let assets = converter.assets();
        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].asset_type, "storage.googleapis.com/Bucket");
        assert_eq!(assets[0].ancestors, vec![String::from("projects/test-project")]);
    }

    #[test]
    fn test_bucket_iam_member_with_random_suffix_bucket() {
        let registry = default_registry();
        let mut converter = Converter::new(&registry, context());

        let bucket = record(
            "google_storage_bucket",
            "bucket",
            &["create"],
            Some(json!({"location": "EU", "project": "test-project", "name": null})),
        );
        let member = record(
            "google_storage_bucket_iam_member",
            "member",
            &["create"],
            Some(json!({
                "bucket": null,
                "role": "roles/storage.objectViewer",
                "member": "user:a@example.com"
            })),
        );

        converter.add_resource_changes(&[bucket, member]).unwrap();

        assert_eq!(converter.len(), 1);
        let asset = converter
            .get("storage.googleapis.com/Bucket//storage.googleapis.com/unknown")
            .unwrap();
        assert_eq!(asset.resource.as_ref().unwrap().data["location"], "EU");
        assert_eq!(
            bindings(&asset),
            vec![IamBinding::new("roles/storage.objectViewer", ["user:a@example.com"])]
        );
    }

    #[test]
    fn test_iam_member_with_computed_principal() {
        let registry = default_registry();
        let mut converter = Converter::new(&registry, context());

        let computed = record(
            "google_project_iam_member",
            "sa",
            &["create"],
            Some(json!({"project": "test-project", "role": "roles/editor", "member": null})),
        );
        let report = converter
            .add_resource_changes(&[
                project_member("roles/viewer", "user:a@example.com"),
                computed,
            ])
            .unwrap();

        assert_eq!(report.converted, 2);
        assert_eq!(report.fragments, 1);
        let asset = converter.get(PROJECT_KEY).unwrap();
        assert_eq!(
            bindings(&asset),
            vec![IamBinding::new("roles/viewer", ["user:a@example.com"])]
        );
    }

    #[test]
    fn test_bucket_with_kms_key_created_in_same_plan() {
        let registry = default_registry();
        let mut converter = Converter::new(&registry, context());

        let bucket = record(
            "google_storage_bucket",
            "bucket",
            &["create"],
            Some(json!({"name": "my-bucket", "location": "US", "encryption": [{}]})),
        );

        converter.add_resource_changes(&[bucket]).unwrap();

        let asset = converter
            .get("storage.googleapis.com/Bucket//storage.googleapis.com/my-bucket")
            .unwrap();
        assert!(asset.resource.unwrap().data.get("encryption").is_none());
    }

    #[test]
    fn test_resources_in_other_projects_get_their_own_ancestors() {
        let registry = default_registry();
        let ancestry = AncestryPath::parse("organizations/1/projects/ctx-project").unwrap();
        let mut converter = Converter::new(&registry, ConvertContext::new("ctx-project", ancestry, true));

        let mut other = disk_after();
        other["project"] = json!("other-project");
        let bucket = record(
            "google_storage_bucket",
            "bucket",
            &["create"],
            Some(json!({"name": "my-bucket", "project": "other-project"})),
        );
        let member = record(
            "google_storage_bucket_iam_member",
            "member",
            &["create"],
            Some(json!({"bucket": "my-bucket", "role": "roles/viewer", "member": "user:a@example.com"})),
        );

        converter
            .add_resource_changes(&[
                record("google_compute_disk", "other", &["create"], Some(other)),
                bucket,
                member,
            ])
            .unwrap();

        let disk = converter
            .get("compute.googleapis.com/Disk//compute.googleapis.com/projects/other-project/zones/us-central1-a/disks/test-disk")
            .unwrap();
        assert_eq!(disk.ancestors, vec!["projects/other-project"]);

        let bucket = converter
            .get("storage.googleapis.com/Bucket//storage.googleapis.com/my-bucket")
            .unwrap();
        assert_eq!(bucket.ancestors, vec!["projects/other-project"]);
        assert!(bucket.iam_policy.is_some());
    }

    #[test]
    fn test_failed_batch_commits_nothing() {
        let registry = default_registry();
        let mut converter = Converter::new(&registry, context());
        converter.add_resource_changes(&[disk(&["create"])]).unwrap();
        let before = converter.sorted_assets();

        let bucket = record("google_storage_bucket", "bucket", &["create"], Some(json!({"name": "b"})));
        let mut broken = disk(&["create"]);
        broken.address = String::from("google_compute_disk.broken");
        broken.change.after = Some(json!({"name": "broken", "zone": 7}));

        let err = converter
            .add_resource_changes(&[bucket, broken])
            .unwrap_err();

        assert_eq!(err.address(), Some("google_compute_disk.broken"));
        assert!(matches!(
            err,
            PlanAssetsError::Conversion(ConversionError::Attributes { .. })
        ));
        assert_eq!(converter.sorted_assets(), before);
    }

    #[test]
    fn test_malformed_actions_surface_address() {
        let registry = default_registry();
        let mut converter = Converter::new(&registry, context());

        let err = converter
            .add_resource_changes(&[disk(&["update", "delete"])])
            .unwrap_err();

        assert_eq!(err.address(), Some("whatever.google_compute_disk.foo"));
        assert!(converter.is_empty());
    }

    #[test]
    fn test_missing_after_is_an_error() {
        let registry = default_registry();
        let mut converter = Converter::new(&registry, context());

        let err = converter
            .add_resource_changes(&[record("google_compute_disk", "foo", &["create"], None)])
            .unwrap_err();

        assert!(matches!(
            err,
            PlanAssetsError::Conversion(ConversionError::MissingAfter { .. })
        ));
    }

    #[test]
    fn test_plugin_receives_after_and_context() {
        let mut plugin = MockPlugin::new();
        plugin
            .expect_convert()
            .withf(|after, context| after["id"] == "x" && context.project() == "test-project")
            .times(1)
            .returning(|_, _| {
                Ok(vec![
                    AssetFragment::new("example.googleapis.com/Thing", "//example.googleapis.com/things/x")
                        .with_iam(IamContribution::member("roles/owner", "user:a@example.com")),
                    AssetFragment::new("example.googleapis.com/Thing", "//example.googleapis.com/things/y")
                        .with_ancestors(vec![String::from("organizations/1")]),
                ])
            });
        let registry = ConverterRegistry::new().with("example_thing", plugin);

        let ancestry = AncestryPath::parse("organizations/1/folders/2/projects/test-project").unwrap();
        let mut converter = Converter::new(&registry, ConvertContext::new("test-project", ancestry, true));
        let report = converter
            .add_resource_changes(&[record("example_thing", "t", &["create"], Some(json!({"id": "x"})))])
            .unwrap();

        assert_eq!(report.converted, 1);
        assert_eq!(report.fragments, 2);

        let sorted = converter.sorted_assets();
        assert_eq!(sorted[0].name, "//example.googleapis.com/things/x");
        assert_eq!(
            sorted[0].ancestors,
            vec!["organizations/1", "folders/2", "projects/test-project"]
        );
        assert_eq!(sorted[1].ancestors, vec!["organizations/1"]);
    }

    #[test]
    fn test_plugin_error_is_wrapped_with_record() {
        let mut plugin = MockPlugin::new();
        plugin
            .expect_convert()
            .returning(|_, _| Err(AttributeError::missing("spec.template")));
        let registry = ConverterRegistry::new().with("example_thing", plugin);

        let mut converter = Converter::new(&registry, context());
        let err = converter
            .add_resource_changes(&[record("example_thing", "t", &["update"], Some(json!({})))])
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Conversion error: Failed to convert example_thing.t (example_thing): missing required attribute 'spec.template'"
        );
    }

    #[test]
    fn test_report_display() {
        let mut report = BatchReport {
            records: 3,
            converted: 1,
            fragments: 2,
            ..BatchReport::default()
        };
        report.skipped.insert(SkipReason::NoOp, 2);

        let text = report.to_string();
        assert!(text.contains("Converted: 1"));
        assert!(text.contains("no-op: 2"));
    }
}

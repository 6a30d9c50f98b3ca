//! Built-in Google Cloud converters.
//!
//! This is a reference set covering the resource types most plans touch,
//! enough to run the engine end to end. Larger catalogues are registered the
//! same way through [`ConverterRegistry::register`].

mod compute;
mod iam;
mod resourcemanager;
mod storage;

pub use compute::ComputeDisk;
pub use iam::{IamConverter, IamKind, IamTarget};
pub use resourcemanager::{Project, ProjectOrganizationPolicy};
pub use storage::StorageBucket;

use crate::assets::AssetResource;
use crate::convert::{AssetFragment, ConvertContext};

use super::registry::ConverterRegistry;

/// Asset type of compute disks.
pub const DISK_ASSET_TYPE: &str = "compute.googleapis.com/Disk";
/// Asset type of storage buckets.
pub const BUCKET_ASSET_TYPE: &str = "storage.googleapis.com/Bucket";
/// Asset type of projects.
pub const PROJECT_ASSET_TYPE: &str = "cloudresourcemanager.googleapis.com/Project";
/// Asset type of organizations.
pub const ORGANIZATION_ASSET_TYPE: &str = "cloudresourcemanager.googleapis.com/Organization";
/// Asset type of project billing info.
pub const BILLING_INFO_ASSET_TYPE: &str = "cloudbilling.googleapis.com/ProjectBillingInfo";

/// Returns a registry holding every built-in converter.
#[must_use]
pub fn default_registry() -> ConverterRegistry {
    let mut registry = ConverterRegistry::new();
    registry
        .register("google_compute_disk", ComputeDisk)
        .register("google_storage_bucket", StorageBucket)
        .register("google_project", Project)
        .register(
            "google_project_organization_policy",
            ProjectOrganizationPolicy,
        );

    for (prefix, target) in [
        ("google_project_iam", IamTarget::Project),
        ("google_storage_bucket_iam", IamTarget::Bucket),
        ("google_organization_iam", IamTarget::Organization),
    ] {
        for kind in [IamKind::Policy, IamKind::Binding, IamKind::Member] {
            registry.register(
                format!("{prefix}_{}", kind.suffix()),
                IamConverter::new(target, kind),
            );
        }
    }

    registry
}

/// Full resource name of a project, used as the parent of project-scoped assets.
fn project_parent(project: &str) -> String {
    format!("//cloudresourcemanager.googleapis.com/projects/{project}")
}

/// Pins a project-scoped fragment to its own project when it is not the
/// context project.
fn in_project(fragment: AssetFragment, project: &str, context: &ConvertContext) -> AssetFragment {
    match context.ancestors_for(project) {
        Some(ancestors) => fragment.with_ancestors(ancestors),
        None => fragment,
    }
}

/// Builds a payload described by a v1 discovery document.
fn discovered(
    service: &str,
    discovery_name: &str,
    parent: String,
    data: serde_json::Value,
) -> AssetResource {
    AssetResource {
        version: String::from("v1"),
        discovery_document_uri: format!(
            "https://www.googleapis.com/discovery/v1/apis/{service}/v1/rest"
        ),
        discovery_name: discovery_name.to_string(),
        parent,
        data,
    }
}

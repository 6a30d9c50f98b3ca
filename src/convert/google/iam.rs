//! IAM policy, binding and member resources.
//!
//! Each scope (project, bucket, organization) has three resource types that
//! share one converter, parameterized by the target scope and the shape of
//! the contribution.
//!
//! Values computed at apply time arrive as `null`. A bucket name unknown
//! until apply maps to [`UNKNOWN_BUCKET`], like the bucket itself. A role,
//! member or policy unknown until apply yields no contribution at all.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::assets::IamBinding;
use crate::convert::{
    AssetFragment, AttrResult, Attributes, ConvertContext, IamContribution, ResourceConverter,
};
use crate::error::AttributeError;

use super::storage::{UNKNOWN_BUCKET, bucket_asset_name};
use super::{BUCKET_ASSET_TYPE, ORGANIZATION_ASSET_TYPE, PROJECT_ASSET_TYPE, in_project, project_parent};

/// The resource an IAM contribution applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IamTarget {
    /// A project, named by the `project` attribute.
    Project,
    /// A bucket, named by the `bucket` attribute.
    Bucket,
    /// An organization, named by the `org_id` attribute.
    Organization,
}

/// The shape of the contribution carried by the resource type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IamKind {
    /// `*_iam_policy`: an authoritative policy in `policy_data`.
    Policy,
    /// `*_iam_binding`: an authoritative member list for one role.
    Binding,
    /// `*_iam_member`: one member added to one role.
    Member,
}

impl IamKind {
    /// Returns the resource-type suffix following `_iam_`.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Policy => "policy",
            Self::Binding => "binding",
            Self::Member => "member",
        }
    }
}

/// Converts one IAM resource type of one scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IamConverter {
    target: IamTarget,
    kind: IamKind,
}

/// Shape of the `policy_data` JSON document.
#[derive(Debug, Deserialize)]
struct PolicyData {
    #[serde(default)]
    bindings: Vec<IamBinding>,
}

impl IamConverter {
    /// Creates a converter for a scope and contribution shape.
    #[must_use]
    pub const fn new(target: IamTarget, kind: IamKind) -> Self {
        Self { target, kind }
    }

    fn fragment(&self, attrs: &Attributes<'_>, context: &ConvertContext) -> AttrResult<AssetFragment> {
        Ok(match self.target {
            IamTarget::Project => {
                let project = context.project_or_default(
                    attrs
                        .opt_str("project")?
                        .map(|p| p.trim_start_matches("projects/")),
                );
                in_project(
                    AssetFragment::new(PROJECT_ASSET_TYPE, project_parent(project)),
                    project,
                    context,
                )
            }
            IamTarget::Bucket => {
                let bucket = attrs
                    .opt_nonempty_str("bucket")?
                    .map_or(UNKNOWN_BUCKET, |b| b.strip_prefix("b/").unwrap_or(b));
                AssetFragment::new(BUCKET_ASSET_TYPE, bucket_asset_name(bucket))
            }
            IamTarget::Organization => {
                let org = attrs.str("org_id")?.trim_start_matches("organizations/");
                AssetFragment::new(
                    ORGANIZATION_ASSET_TYPE,
                    format!("//cloudresourcemanager.googleapis.com/organizations/{org}"),
                )
                .with_ancestors(vec![format!("organizations/{org}")])
            }
        })
    }

    fn contribution(&self, attrs: &Attributes<'_>) -> AttrResult<Option<IamContribution>> {
        Ok(match self.kind {
            IamKind::Policy => attrs
                .opt_nonempty_str("policy_data")?
                .map(|raw| {
                    serde_json::from_str::<PolicyData>(raw)
                        .map(|policy| IamContribution::Policy(policy.bindings))
                        .map_err(|e| AttributeError::invalid("policy_data", e.to_string()))
                })
                .transpose()?,
            IamKind::Binding => match (attrs.opt_nonempty_str("role")?, attrs.raw("members")) {
                (Some(role), Some(_)) => Some(IamContribution::Binding(IamBinding::new(
                    role,
                    attrs.string_list("members")?,
                ))),
                _ => None,
            },
            IamKind::Member => match (attrs.opt_nonempty_str("role")?, attrs.opt_nonempty_str("member")?) {
                (Some(role), Some(member)) => Some(IamContribution::member(role, member)),
                _ => None,
            },
        })
    }
}

impl ResourceConverter for IamConverter {
    fn convert(&self, attributes: &Value, context: &ConvertContext) -> AttrResult<Vec<AssetFragment>> {
        let attrs = Attributes::root(attributes)?;
        let fragment = self.fragment(&attrs, context)?;
        let Some(contribution) = self.contribution(&attrs)? else {
            debug!("IAM {} for {} unknown until apply", self.kind.suffix(), fragment.name);
            return Ok(vec![]);
        };
        Ok(vec![fragment.with_iam(contribution)])
    }
}

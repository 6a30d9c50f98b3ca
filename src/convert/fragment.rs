//! Asset fragments produced by converters.
//!
//! A fragment is a partial or complete contribution to one canonical asset.
//! Fragments live only for the duration of one conversion call.

use crate::assets::{AssetResource, IamBinding, OrgPolicy, canonical_name};

/// A contribution to one asset, produced by converting one change record.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetFragment {
    /// Asset type, e.g. `storage.googleapis.com/Bucket`.
    pub asset_type: String,
    /// Asset name, e.g. `//storage.googleapis.com/my-bucket`.
    pub name: String,
    /// Complete resource payload, if this fragment describes the object itself.
    pub resource: Option<AssetResource>,
    /// Access-control contribution.
    pub iam: Option<IamContribution>,
    /// Organization policy contributions.
    pub org_policies: Vec<OrgPolicy>,
    /// Explicit ancestors; the conversion context's path is used when unset.
    pub ancestors: Option<Vec<String>>,
}

/// The three shapes an IAM contribution can take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IamContribution {
    /// A complete policy that replaces everything accumulated so far.
    Policy(Vec<IamBinding>),
    /// Sets one role's members to exactly this list.
    Binding(IamBinding),
    /// Adds one member to one role.
    Member {
        /// Role name.
        role: String,
        /// Principal to add.
        member: String,
    },
}

impl AssetFragment {
    /// Creates an empty fragment for an asset.
    #[must_use]
    pub fn new(asset_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            asset_type: asset_type.into(),
            name: name.into(),
            resource: None,
            iam: None,
            org_policies: vec![],
            ancestors: None,
        }
    }

    /// Attaches a resource payload.
    #[must_use]
    pub fn with_resource(mut self, resource: AssetResource) -> Self {
        self.resource = Some(resource);
        self
    }

    /// Attaches an IAM contribution.
    #[must_use]
    pub fn with_iam(mut self, iam: IamContribution) -> Self {
        self.iam = Some(iam);
        self
    }

    /// Attaches an organization policy.
    #[must_use]
    pub fn with_org_policy(mut self, policy: OrgPolicy) -> Self {
        self.org_policies.push(policy);
        self
    }

    /// Overrides the ancestors recorded on the asset.
    #[must_use]
    pub fn with_ancestors(mut self, ancestors: Vec<String>) -> Self {
        self.ancestors = Some(ancestors);
        self
    }

    /// Returns the canonical merge key of the target asset.
    #[must_use]
    pub fn canonical_name(&self) -> String {
        canonical_name(&self.asset_type, &self.name)
    }
}

impl IamContribution {
    /// Creates a member contribution.
    #[must_use]
    pub fn member(role: impl Into<String>, member: impl Into<String>) -> Self {
        Self::Member {
            role: role.into(),
            member: member.into(),
        }
    }

    /// Returns a short label for logging.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Policy(_) => "policy",
            Self::Binding(_) => "binding",
            Self::Member { .. } => "member",
        }
    }
}

//! Merging of IAM contributions into one policy per asset.
//!
//! Contributions are applied strictly in the order their change records were
//! supplied. A whole policy resets the role map, a binding replaces one role,
//! a member is unioned into one role.

use std::collections::{BTreeMap, BTreeSet};

use tracing::trace;

use crate::convert::IamContribution;

use super::types::{IamBinding, IamPolicy};

/// Accumulated `role -> members` state for one asset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IamMerger {
    roles: BTreeMap<String, BTreeSet<String>>,
}

impl IamMerger {
    /// Creates an empty merger.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            roles: BTreeMap::new(),
        }
    }

    /// Applies one contribution.
    pub fn apply(&mut self, contribution: &IamContribution) {
        trace!("Applying IAM {} contribution", contribution.kind());
        match contribution {
            IamContribution::Policy(bindings) => {
                self.roles.clear();
                // A policy document may repeat a role; its members are unioned.
                for binding in bindings {
                    self.roles
                        .entry(binding.role.clone())
                        .or_default()
                        .extend(binding.members.iter().cloned());
                }
            }
            IamContribution::Binding(binding) => {
                self.roles.insert(
                    binding.role.clone(),
                    binding.members.iter().cloned().collect(),
                );
            }
            IamContribution::Member { role, member } => {
                self.roles
                    .entry(role.clone())
                    .or_default()
                    .insert(member.clone());
            }
        }
    }

    /// Returns the members currently granted a role.
    #[must_use]
    pub fn members(&self, role: &str) -> Option<&BTreeSet<String>> {
        self.roles.get(role)
    }

    /// Builds the serialized policy: sorted roles, sorted members, empty roles omitted.
    #[must_use]
    pub fn to_policy(&self) -> IamPolicy {
        IamPolicy {
            bindings: self
                .roles
                .iter()
                .filter(|(_, members)| !members.is_empty())
                .map(|(role, members)| IamBinding::new(role.as_str(), members.iter().map(String::as_str)))
                .collect(),
        }
    }
}

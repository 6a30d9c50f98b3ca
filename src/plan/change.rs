//! Change records as emitted by `terraform show -json`.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Whether a record describes a managed resource or a data source.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResourceMode {
    /// A resource managed by the plan.
    #[default]
    Managed,
    /// A data source read during planning.
    Data,
}

/// One proposed transition of one infrastructure object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResourceChange {
    /// Address, unique within the plan, e.g. `module.a.google_compute_disk.foo[0]`.
    pub address: String,
    /// Address of the containing module, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_address: Option<String>,
    /// Resource mode.
    #[serde(default)]
    pub mode: ResourceMode,
    /// Resource type, e.g. `google_compute_disk`.
    #[serde(rename = "type")]
    pub resource_type: String,
    /// Resource name within its module.
    pub name: String,
    /// Index for `count` (number) or `for_each` (string) expansions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<Value>,
    /// Provider that owns the resource type.
    #[serde(default)]
    pub provider_name: String,
    /// The proposed change.
    pub change: Change,
}

/// Actions and snapshots of one change.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Change {
    /// Ordered actions.
    pub actions: Vec<Action>,
    /// State before the change.
    #[serde(default)]
    pub before: Option<Value>,
    /// Desired state after the change.
    #[serde(default)]
    pub after: Option<Value>,
}

/// One plan action.
///
/// Unknown action strings are kept verbatim so they can be reported.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Action {
    /// `no-op`
    NoOp,
    /// `create`
    Create,
    /// `read`
    Read,
    /// `update`
    Update,
    /// `delete`
    Delete,
    /// Anything else.
    Other(String),
}

/// How a convertible change record is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// `[create]`
    Create,
    /// `[update]`
    Update,
    /// `[delete, create]` or `[create, delete]`
    Replace,
}

impl ResourceChange {
    /// Creates a managed record with the given actions and "after" snapshot.
    #[must_use]
    pub fn new(
        resource_type: impl Into<String>,
        name: impl Into<String>,
        actions: Vec<Action>,
        after: Option<Value>,
    ) -> Self {
        let resource_type = resource_type.into();
        let name = name.into();
        Self {
            address: format!("{resource_type}.{name}"),
            module_address: None,
            mode: ResourceMode::Managed,
            resource_type,
            name,
            index: None,
            provider_name: String::from("registry.terraform.io/hashicorp/google"),
            change: Change {
                actions,
                before: None,
                after,
            },
        }
    }

    /// Returns the actions joined for display, e.g. `delete, create`.
    #[must_use]
    pub fn actions_label(&self) -> String {
        self.change
            .actions
            .iter()
            .map(Action::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Action {
    /// Returns the wire form of the action.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::NoOp => "no-op",
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Other(other) => other,
        }
    }
}

impl From<String> for Action {
    fn from(value: String) -> Self {
        match value.as_str() {
            "no-op" => Self::NoOp,
            "create" => Self::Create,
            "read" => Self::Read,
            "update" => Self::Update,
            "delete" => Self::Delete,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for Action {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<Action> for String {
    fn from(action: Action) -> Self {
        match action {
            Action::Other(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Replace => "replace",
        };
        f.write_str(label)
    }
}

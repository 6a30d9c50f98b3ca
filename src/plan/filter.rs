//! Classification of change records.

use std::fmt;

use serde_json::Value;

use crate::convert::ConverterRegistry;
use crate::error::ConversionError;

use super::change::{Action, ChangeKind, ResourceChange};

/// Why a record was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SkipReason {
    /// No converter is registered for the resource type.
    Unsupported,
    /// `[no-op]`
    NoOp,
    /// `[delete]`: the object will not exist after apply.
    Delete,
    /// `[read]`: a data source refresh with no desired end state.
    Read,
}

/// What to do with one record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Disposition<'a> {
    /// Ignore the record.
    Skip(SkipReason),
    /// Convert the "after" snapshot.
    Convert {
        /// How the change is applied.
        kind: ChangeKind,
        /// The snapshot handed to the converter.
        after: &'a Value,
    },
}

/// Decides whether a record is skipped or converted.
///
/// The decision depends only on the record and the registry. Records of
/// unsupported types are skipped before their actions are looked at.
///
/// # Errors
///
/// Returns an error if the action set is not recognized, or if a convertible
/// action set has no "after" snapshot.
pub fn filter_change<'a>(
    record: &'a ResourceChange,
    registry: &ConverterRegistry,
) -> Result<Disposition<'a>, ConversionError> {
    if !registry.supports(&record.resource_type) {
        return Ok(Disposition::Skip(SkipReason::Unsupported));
    }

    let kind = match record.change.actions.as_slice() {
        [Action::NoOp] => return Ok(Disposition::Skip(SkipReason::NoOp)),
        [Action::Delete] => return Ok(Disposition::Skip(SkipReason::Delete)),
        [Action::Read] => return Ok(Disposition::Skip(SkipReason::Read)),
        [Action::Create] => ChangeKind::Create,
        [Action::Update] => ChangeKind::Update,
        [Action::Delete, Action::Create] | [Action::Create, Action::Delete] => ChangeKind::Replace,
        _ => {
            return Err(ConversionError::MalformedActions {
                address: record.address.clone(),
                actions: record.actions_label(),
            });
        }
    };

    match record.change.after.as_ref() {
        Some(after) if !after.is_null() => Ok(Disposition::Convert { kind, after }),
        _ => Err(ConversionError::MissingAfter {
            address: record.address.clone(),
            action: kind.to_string(),
        }),
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Unsupported => "unsupported",
            Self::NoOp => "no-op",
            Self::Delete => "delete",
            Self::Read => "read",
        };
        f.write_str(label)
    }
}

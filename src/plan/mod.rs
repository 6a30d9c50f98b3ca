//! Plan input.
//!
//! This module provides:
//! - `ResourceChange` records and their actions
//! - The change filter deciding which records are converted
//! - Loading of JSON plan documents

mod change;
mod document;
mod filter;

pub use change::{Action, Change, ChangeKind, ResourceChange, ResourceMode};
pub use document::PlanDocument;
pub use filter::{Disposition, SkipReason, filter_change};

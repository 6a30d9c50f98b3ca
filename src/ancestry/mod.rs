//! Ancestry resolution for conversion contexts.
//!
//! This module provides the organizational ancestry (organization, folders,
//! project) recorded on every converted asset:
//! - `AncestryPath` parsing and formatting
//! - An offline resolver using a configured or synthetic path
//! - An online resolver backed by the Cloud Resource Manager API

mod client;
mod path;
mod resolver;

pub use client::{RESOURCE_MANAGER_URL, ResourceManagerClient};
pub use path::AncestryPath;
pub use resolver::{AncestryResolver, OfflineAncestry};

//! Asset module: canonical asset types and the merge store.
//!
//! This module owns everything downstream of conversion:
//! - The canonical `Asset` shape handed to the policy engine
//! - Fragment merging, including IAM policy reconciliation
//! - Deterministic ordering of the final collection
//! - The timestamp codec used inside payloads

mod iam;
mod ordering;
mod store;
mod timestamp;
mod types;

pub use iam::IamMerger;
pub use ordering::{compare_assets, digest, sort_assets};
pub use store::AssetStore;
pub use timestamp::Timestamp;
pub use types::{
    Asset, AssetResource, BooleanPolicy, IamBinding, IamPolicy, ListPolicy, OrgPolicy,
    RestoreDefault, canonical_name,
};

//! Deterministic ordering of the final asset collection.

use std::cmp::Ordering;

use sha2::{Digest, Sha256};

use crate::error::Result;

use super::types::Asset;

/// Orders assets by name, then by type.
#[must_use]
pub fn compare_assets(a: &Asset, b: &Asset) -> Ordering {
    a.name
        .cmp(&b.name)
        .then_with(|| a.asset_type.cmp(&b.asset_type))
}

/// Sorts assets in place (stable) by name, then by type.
pub fn sort_assets(assets: &mut [Asset]) {
    assets.sort_by(compare_assets);
}

/// Computes a SHA-256 hex digest of a sorted collection's JSON form.
///
/// Two runs over the same logical plan produce the same digest.
///
/// # Errors
///
/// Returns an error if an asset cannot be serialized.
pub fn digest(sorted: &[Asset]) -> Result<String> {
    let bytes = serde_json::to_vec(sorted)?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(name: &str, asset_type: &str) -> Asset {
        Asset {
            name: name.to_string(),
            asset_type: asset_type.to_string(),
            resource: None,
            iam_policy: None,
            org_policy: vec![],
            ancestors: vec![],
        }
    }

    #[test]
    fn test_sort_empty() {
        let mut assets: Vec<Asset> = vec![];
        sort_assets(&mut assets);
        assert!(assets.is_empty());
    }

    #[test]
    fn test_sort_by_name() {
        let mut assets = vec![asset("b", "b-type"), asset("c", "c-type"), asset("a", "a-type")];
        sort_assets(&mut assets);
        assert_eq!(
            assets,
            vec![asset("a", "a-type"), asset("b", "b-type"), asset("c", "c-type")]
        );
    }

    #[test]
    fn test_type_breaks_name_ties() {
        let mut assets = vec![asset("a", "z-type"), asset("a", "m-type")];
        sort_assets(&mut assets);
        assert_eq!(assets[0].asset_type, "m-type");
        assert_eq!(assets[1].asset_type, "z-type");
    }

    #[test]
    fn test_digest_is_stable_and_content_sensitive() {
        let one = vec![asset("a", "t"), asset("b", "t")];
        let two = vec![asset("a", "t"), asset("b", "t")];
        let other = vec![asset("a", "t"), asset("c", "t")];

        assert_eq!(digest(&one).unwrap(), digest(&two).unwrap());
        assert_ne!(digest(&one).unwrap(), digest(&other).unwrap());
        assert_eq!(digest(&one).unwrap().len(), 64);
    }
}

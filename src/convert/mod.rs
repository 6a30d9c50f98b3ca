//! Conversion of attribute snapshots into asset fragments.
//!
//! This module provides:
//! - The `ResourceConverter` contract and its `ConvertContext`
//! - The `ConverterRegistry` mapping resource types to converters
//! - Typed `Attributes` accessors used by converters
//! - The built-in Google Cloud converters

mod attributes;
mod converter;
mod fragment;
pub mod google;
mod registry;

pub use attributes::{AttrResult, Attributes, kind_of};
pub use converter::{ConvertContext, ResourceConverter};
pub use fragment::{AssetFragment, IamContribution};
pub use registry::ConverterRegistry;

// ============================================================================
// Strict linting - Dangerous or non-idiomatic practices are forbidden
// ============================================================================

#![deny(warnings)]                    // All warnings are treated as errors
#![deny(unsafe_code)]                 // Unsafe code is forbidden
#![deny(missing_docs)]                // All public items must be documented
#![deny(dead_code)]                   // Unused code is forbidden
#![deny(non_camel_case_types)]        // Types must follow CamelCase convention

// Additional strictness - Leave nothing unchecked
#![deny(unused_imports)]              // Unused imports are forbidden
#![deny(unused_variables)]            // Unused variables are forbidden
#![deny(unused_must_use)]             // Must handle Result and Option explicitly
#![deny(non_snake_case)]              // Variables and functions must be snake_case
#![deny(non_upper_case_globals)]      // Constants must be UPPER_CASE
#![deny(nonstandard_style)]           // Non-standard code style is forbidden
#![forbid(unsafe_op_in_unsafe_fn)]    // Unsafe ops in unsafe fns are forbidden

// Clippy lints (warnings only)
#![warn(clippy::all)]                 // All standard Clippy lints
#![warn(clippy::pedantic)]            // Very strict Clippy lints
#![warn(clippy::nursery)]             // Experimental lints
#![warn(clippy::unwrap_used)]         // unwrap() warning
#![warn(clippy::expect_used)]         // expect() warning
#![warn(clippy::panic)]               // panic!() warning
#![warn(clippy::print_stdout)]        // println!() warning
#![warn(clippy::todo)]                // TODO warning
#![warn(clippy::unimplemented)]       // unimplemented!() warning
#![warn(clippy::missing_const_for_fn)] // Force const when possible
#![warn(clippy::unwrap_in_result)]    // unwrap() in Result warning
#![warn(clippy::module_inception)]    // Module with same name as crate warning
#![warn(clippy::redundant_clone)]     // Useless clones warning
#![warn(clippy::shadow_unrelated)]    // Shadowing unrelated variables warning
#![warn(clippy::too_many_arguments)]  // Limit function arguments
#![warn(clippy::cognitive_complexity)] // Limit cognitive complexity

// Safety and robustness lints
#![deny(overflowing_literals)]        // Overflowing literals are forbidden
#![deny(arithmetic_overflow)]         // Arithmetic overflow is forbidden

// ============================================================================
// Crate Documentation
// ============================================================================

//! # Plan Assets
//!
//! Converts the resource changes of an infrastructure plan into canonical
//! cloud assets, ready for a policy engine.
//!
//! ## Overview
//!
//! A plan (`terraform show -json`) lists the change records a run would
//! apply. `plan_assets` turns the post-change state of each record into the
//! asset a cloud inventory would report once the plan is applied:
//!
//! - Records that create or update nothing are skipped
//! - Each surviving record is handed to the converter registered for its type
//! - Fragments that name the same asset are merged into one
//! - IAM policies, bindings and members reconcile into a single policy
//!
//! ## Architecture
//!
//! 1. **Plan**: change records parsed from the plan document
//! 2. **Filter**: action sets decide which records are converted
//! 3. **Converters**: per-type plugins producing asset fragments
//! 4. **Store**: one merged asset per canonical name, in deterministic order
//!
//! ## Modules
//!
//! - [`plan`]: Plan documents, change records and the change filter
//! - [`convert`]: Converter trait, registry and the built-in Google converters
//! - [`assets`]: Canonical asset types, merging and ordering
//! - [`engine`]: The conversion pass tying the above together
//! - [`ancestry`]: Offline and Resource Manager ancestry resolution
//! - [`config`]: Configuration parsing and validation
//! - [`cli`]: Command-line interface
//!
//! ## Example
//!
//! ```no_run
//! use plan_assets::{Converter, ConvertContext, PlanDocument, default_registry};
//!
//! # fn main() -> plan_assets::Result<()> {
//! let plan = PlanDocument::from_path(std::path::Path::new("plan.json"))?;
//! let registry = default_registry();
//! let mut converter = Converter::new(&registry, ConvertContext::offline("my-project"));
//!
//! converter.add_resource_changes(&plan.resource_changes)?;
//! for asset in converter.sorted_assets() {
//!     eprintln!("{} {}", asset.asset_type, asset.name);
//! }
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod ancestry;
pub mod assets;
pub mod cli;
pub mod config;
pub mod convert;
pub mod engine;
pub mod error;
pub mod plan;

// ============================================================================
// Re-exports
// ============================================================================

pub use ancestry::{AncestryPath, AncestryResolver, OfflineAncestry, ResourceManagerClient};
pub use assets::{Asset, AssetStore, IamPolicy, Timestamp, digest, sort_assets};
pub use cli::{Cli, Commands, OutputFormatter};
pub use config::{ConfigParser, ConfigValidator, PlanAssetsConfig, Settings};
pub use convert::google::default_registry;
pub use convert::{AssetFragment, ConvertContext, ConverterRegistry, ResourceConverter};
pub use engine::{BatchReport, Converter};
pub use error::{PlanAssetsError, Result};
pub use plan::{Action, PlanDocument, ResourceChange};

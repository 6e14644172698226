//! # chainpack-matcher
//!
//! Decides, per dependency module, whether it must be transpiled.
//!
//! A module is attributed to the package whose descriptor (`package.json`) is
//! found nearest above it. The owning package's name and version are then
//! checked against a [`PackageMatchRuleSet`]:
//!
//! - **Blanket**: transpile everything except the exclusion table.
//! - **Selective**: transpile only what the inclusion table lists.
//!
//! ```
//! use chainpack_matcher::{BoundaryResolver, MemoryFs, PackageMatchRuleSet, PackageMatcher};
//! use chainpack_config::NodeModulesTransform;
//! use std::sync::Arc;
//!
//! let fs = MemoryFs::new()
//!     .with_package("/app/node_modules/lodash", "lodash", "4.17.0")
//!     .with_package("/app/node_modules/nanoid", "nanoid", "3.3.0");
//! let resolver = Arc::new(BoundaryResolver::new(Arc::new(fs)));
//! let rules = PackageMatchRuleSet::from_policy(&NodeModulesTransform::all()).unwrap();
//! let matcher = PackageMatcher::new(rules, resolver);
//!
//! assert!(!matcher.matches("/app/node_modules/lodash/lodash.js".as_ref()));
//! assert!(matcher.matches("/app/node_modules/nanoid/index.js".as_ref()));
//! ```

pub mod boundary;
pub mod descriptor;
pub mod error;
pub mod matcher;
pub mod rule_set;
pub mod specifier;
pub mod tables;

pub use boundary::{BoundaryResolver, PackageBoundary};
pub use descriptor::{DescriptorSource, MemoryFs, NativeFs, PackageDescriptor};
pub use error::{MatcherError, Result};
pub use matcher::PackageMatcher;
pub use rule_set::{PackageMatchRuleSet, PackageTable};
pub use specifier::{PackageSpecifier, VersionConstraint};

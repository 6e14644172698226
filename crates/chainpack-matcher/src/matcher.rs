//! Per-module transpilation decision.

use std::path::Path;
use std::sync::Arc;

use crate::boundary::{BoundaryResolver, PackageBoundary};
use crate::error::Result;
use crate::rule_set::PackageMatchRuleSet;

/// Answers "should this dependency module be transpiled?".
///
/// Cheap to clone; clones share the resolver's boundary cache.
#[derive(Debug, Clone)]
pub struct PackageMatcher {
    rule_set: Arc<PackageMatchRuleSet>,
    resolver: Arc<BoundaryResolver>,
}

impl PackageMatcher {
    pub fn new(rule_set: PackageMatchRuleSet, resolver: Arc<BoundaryResolver>) -> Self {
        Self {
            rule_set: Arc::new(rule_set),
            resolver,
        }
    }

    /// Matcher accepting only packages that satisfy `specifier`.
    ///
    /// Shares this matcher's resolver, so boundary lookups stay memoized
    /// across every predicate of a build.
    pub fn for_specifier(&self, specifier: &str) -> Result<Self> {
        Ok(Self {
            rule_set: Arc::new(PackageMatchRuleSet::selective_for(specifier)?),
            resolver: Arc::clone(&self.resolver),
        })
    }

    /// Whether the module at `path` must be transpiled.
    ///
    /// Modules without an enclosing package are never transpiled.
    pub fn matches(&self, path: &Path) -> bool {
        match self.resolver.resolve(path) {
            Ok(boundary) => self.accepts(&boundary),
            Err(err) => {
                tracing::trace!(path = %path.display(), error = %err, "no owning package");
                false
            }
        }
    }

    /// Whether the module at `path` belongs to a package satisfying `specifier`.
    pub fn matches_specifier(&self, path: &Path, specifier: &str) -> Result<bool> {
        Ok(self.for_specifier(specifier)?.matches(path))
    }

    /// Package owning the module at `path`
    pub fn owning_package(&self, path: &Path) -> Result<Arc<PackageBoundary>> {
        self.resolver.resolve(path)
    }

    pub fn rule_set(&self) -> &PackageMatchRuleSet {
        &self.rule_set
    }

    pub fn resolver(&self) -> &Arc<BoundaryResolver> {
        &self.resolver
    }

    fn accepts(&self, boundary: &PackageBoundary) -> bool {
        let Some(name) = boundary.name() else {
            tracing::trace!(root = %boundary.root.display(), "package without a name");
            return false;
        };

        let accepted = self.rule_set.accepts(name, boundary.version());
        tracing::trace!(
            package = name,
            version = boundary.version(),
            rule_set = self.rule_set.kind(),
            accepted,
            "package match"
        );
        accepted
    }
}

//! Memoized package-boundary resolution.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::descriptor::{DescriptorSource, PackageDescriptor};
use crate::error::{MatcherError, Result};

/// Directory name that terminates the upward walk
const MODULE_ROOT_DIR: &str = "node_modules";

/// The package owning a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageBoundary {
    /// Directory carrying the descriptor
    pub root: PathBuf,
    pub descriptor: PackageDescriptor,
}

impl PackageBoundary {
    pub fn name(&self) -> Option<&str> {
        self.descriptor.name.as_deref()
    }

    pub fn version(&self) -> Option<&str> {
        self.descriptor.version.as_deref()
    }
}

/// Finds the nearest enclosing package of a module path.
///
/// A descriptor without a `name` (such as a nested `{"type":"module"}`
/// marker in a dual-format package) is not a boundary; the walk continues
/// past it.
///
/// Every directory visited during a walk is cached with the walk's outcome,
/// so sibling files and nested directories resolve without touching the
/// descriptor source again. The cache only grows; descriptors are assumed
/// stable for the lifetime of a build.
#[derive(Debug)]
pub struct BoundaryResolver {
    source: Arc<dyn DescriptorSource>,
    module_root: Option<PathBuf>,
    cache: RwLock<FxHashMap<PathBuf, Option<Arc<PackageBoundary>>>>,
}

impl BoundaryResolver {
    pub fn new(source: Arc<dyn DescriptorSource>) -> Self {
        Self {
            source,
            module_root: None,
            cache: RwLock::new(FxHashMap::default()),
        }
    }

    /// Stop walking when this directory is reached, in addition to
    /// `node_modules` directories and the filesystem root.
    pub fn with_module_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.module_root = Some(root.into());
        self
    }

    /// Resolve the package owning `module_path`.
    pub fn resolve(&self, module_path: &Path) -> Result<Arc<PackageBoundary>> {
        let resolution_error = || MatcherError::Resolution {
            path: module_path.to_path_buf(),
        };

        let start = module_path.parent().ok_or_else(resolution_error)?;
        let mut visited: Vec<PathBuf> = Vec::new();
        let mut current = Some(start);

        let outcome = loop {
            let Some(dir) = current else {
                break None;
            };

            if let Some(cached) = self.cache.read().get(dir) {
                break cached.clone();
            }

            visited.push(dir.to_path_buf());

            if self.is_walk_limit(dir) {
                break None;
            }

            match self.source.read_descriptor(dir) {
                Some(Ok(descriptor)) if descriptor.name.is_some() => {
                    break Some(Arc::new(PackageBoundary {
                        root: dir.to_path_buf(),
                        descriptor,
                    }));
                }
                Some(Ok(_)) => {
                    tracing::trace!(dir = %dir.display(), "skipping descriptor without a name");
                }
                Some(Err(err)) => {
                    tracing::debug!(error = %err, "unreadable package descriptor");
                    break None;
                }
                None => {}
            }
            current = dir.parent().filter(|parent| !parent.as_os_str().is_empty());
        };

        if !visited.is_empty() {
            let mut cache = self.cache.write();
            for dir in visited {
                cache.insert(dir, outcome.clone());
            }
        }

        outcome.ok_or_else(resolution_error)
    }

    /// Number of directories with a memoized outcome
    pub fn cached_dirs(&self) -> usize {
        self.cache.read().len()
    }

    fn is_walk_limit(&self, dir: &Path) -> bool {
        dir.file_name().is_some_and(|name| name == MODULE_ROOT_DIR)
            || self.module_root.as_deref() == Some(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{MemoryFs, PackageDescriptor};

    fn resolver(fs: MemoryFs) -> (Arc<MemoryFs>, BoundaryResolver) {
        let fs = Arc::new(fs);
        let resolver = BoundaryResolver::new(fs.clone());
        (fs, resolver)
    }

    #[test]
    fn finds_nearest_descriptor() {
        let (_, resolver) = resolver(
            MemoryFs::new()
                .with_package("/app/node_modules/outer", "outer", "1.0.0")
                .with_package("/app/node_modules/outer/node_modules/inner", "inner", "2.0.0"),
        );

        let boundary = resolver
            .resolve(Path::new(
                "/app/node_modules/outer/node_modules/inner/lib/index.js",
            ))
            .unwrap();
        assert_eq!(boundary.name(), Some("inner"));
        assert_eq!(boundary.version(), Some("2.0.0"));
    }

    #[test]
    fn nameless_descriptor_is_not_a_boundary() {
        let fs = MemoryFs::new().with_package("/app/node_modules/dual-pkg", "dual-pkg", "2.0.0");
        fs.insert(
            "/app/node_modules/dual-pkg/dist/esm",
            PackageDescriptor {
                name: None,
                version: None,
            },
        );
        let (_, resolver) = resolver(fs);

        let boundary = resolver
            .resolve(Path::new("/app/node_modules/dual-pkg/dist/esm/index.js"))
            .unwrap();
        assert_eq!(boundary.root, PathBuf::from("/app/node_modules/dual-pkg"));
        assert_eq!(boundary.name(), Some("dual-pkg"));
    }

    #[test]
    fn stops_at_node_modules_directory() {
        let (_, resolver) = resolver(MemoryFs::new().with_package("/app", "app", "0.0.0"));

        let err = resolver
            .resolve(Path::new("/app/node_modules/stray.js"))
            .unwrap_err();
        assert!(matches!(err, MatcherError::Resolution { .. }));
    }

    #[test]
    fn stops_at_configured_module_root() {
        let fs = Arc::new(MemoryFs::new().with_package("/", "root", "1.0.0"));
        let resolver = BoundaryResolver::new(fs).with_module_root("/workspace");

        assert!(resolver.resolve(Path::new("/workspace/src/a.js")).is_err());
        assert!(resolver.resolve(Path::new("/elsewhere/a.js")).is_ok());
    }

    #[test]
    fn memoizes_every_visited_directory() {
        let (fs, resolver) = resolver(
            MemoryFs::new().with_package("/app/node_modules/pkg", "pkg", "1.0.0"),
        );

        resolver
            .resolve(Path::new("/app/node_modules/pkg/lib/deep/a.js"))
            .unwrap();
        let after_first = fs.lookups();
        assert_eq!(after_first, 3);

        resolver
            .resolve(Path::new("/app/node_modules/pkg/lib/deep/b.js"))
            .unwrap();
        resolver
            .resolve(Path::new("/app/node_modules/pkg/lib/c.js"))
            .unwrap();
        assert_eq!(fs.lookups(), after_first);
        assert_eq!(resolver.cached_dirs(), 3);
    }

    #[test]
    fn failed_walks_are_memoized_too() {
        let (fs, resolver) = resolver(MemoryFs::new());

        assert!(resolver.resolve(Path::new("/tmp/x/a.js")).is_err());
        let lookups = fs.lookups();
        assert!(resolver.resolve(Path::new("/tmp/x/b.js")).is_err());
        assert_eq!(fs.lookups(), lookups);
    }
}

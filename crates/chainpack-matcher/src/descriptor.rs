//! Package descriptor lookup.
//!
//! The matcher only needs a package's `name` and `version`. Reading them is
//! delegated to a [`DescriptorSource`] so tests and embedders can provide
//! an in-memory tree instead of the real filesystem.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{MatcherError, Result};

/// Descriptor file marking a package boundary
pub const DESCRIPTOR_FILE: &str = "package.json";

/// Maximum allowed size for descriptor files (10MB)
const MAX_DESCRIPTOR_SIZE: u64 = 10 * 1024 * 1024;

/// Identity fields of a package descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDescriptor {
    /// Declared package name
    pub name: Option<String>,
    /// Declared package version
    pub version: Option<String>,
}

impl PackageDescriptor {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            version: Some(version.into()),
        }
    }
}

/// Filesystem collaborator used by the boundary resolver.
pub trait DescriptorSource: Send + Sync + std::fmt::Debug {
    /// Read the descriptor stored directly in `dir`.
    ///
    /// Returns `None` when `dir` carries no descriptor.
    fn read_descriptor(&self, dir: &Path) -> Option<Result<PackageDescriptor>>;
}

/// Reads descriptors from disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeFs;

impl NativeFs {
    pub fn new() -> Self {
        Self
    }
}

impl DescriptorSource for NativeFs {
    fn read_descriptor(&self, dir: &Path) -> Option<Result<PackageDescriptor>> {
        let path = dir.join(DESCRIPTOR_FILE);
        let metadata = std::fs::metadata(&path).ok()?;
        if !metadata.is_file() {
            return None;
        }

        if metadata.len() > MAX_DESCRIPTOR_SIZE {
            return Some(Err(MatcherError::Descriptor {
                path,
                message: format!(
                    "exceeds maximum size of {}MB",
                    MAX_DESCRIPTOR_SIZE / 1024 / 1024
                ),
            }));
        }

        let parsed = std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|content| {
                serde_json::from_str::<PackageDescriptor>(&content).map_err(|e| e.to_string())
            });

        Some(parsed.map_err(|message| MatcherError::Descriptor { path, message }))
    }
}

/// In-memory descriptor tree.
///
/// Counts lookups so callers can observe memoization.
#[derive(Debug, Default)]
pub struct MemoryFs {
    packages: RwLock<FxHashMap<PathBuf, PackageDescriptor>>,
    lookups: AtomicUsize,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a package rooted at `dir`
    pub fn with_package(
        self,
        dir: impl Into<PathBuf>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        self.insert(dir, PackageDescriptor::new(name, version));
        self
    }

    pub fn insert(&self, dir: impl Into<PathBuf>, descriptor: PackageDescriptor) {
        self.packages.write().insert(dir.into(), descriptor);
    }

    /// Number of `read_descriptor` calls served so far
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::Relaxed)
    }
}

impl DescriptorSource for MemoryFs {
    fn read_descriptor(&self, dir: &Path) -> Option<Result<PackageDescriptor>> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        self.packages.read().get(dir).cloned().map(Ok)
    }
}

//! The bundler backend as seen by the synthesis engine.
//!
//! Only the backend's identity and version matter here: newer majors ship
//! without Node.js core-module polyfills and get a different finalization.

use semver::Version;

use crate::{Result, SynthError};

/// First backend major that needs explicit Node.js polyfills
pub const MODERN_BACKEND_MAJOR: u64 = 5;

/// Reference to the bundler backend that will consume the configuration.
pub trait BundlerBackend: Send + Sync + std::fmt::Debug {
    /// Backend name (e.g. `webpack`)
    fn name(&self) -> &str;

    fn version(&self) -> &Version;

    fn major(&self) -> u64 {
        self.version().major
    }

    /// Whether the backend leaves Node.js core modules unpolyfilled
    fn is_modern(&self) -> bool {
        self.major() >= MODERN_BACKEND_MAJOR
    }
}

/// A backend described by name and version only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticBackend {
    name: String,
    version: Version,
}

impl StaticBackend {
    pub fn new(name: impl Into<String>, version: Version) -> Self {
        Self {
            name: name.into(),
            version,
        }
    }

    /// Parse a version such as `5.88.2` or a bare major such as `4`
    pub fn parse(name: impl Into<String>, version: &str) -> Result<Self> {
        let version = version.trim();
        let parsed = Version::parse(version).or_else(|_| {
            version
                .parse::<u64>()
                .map(|major| Version::new(major, 0, 0))
                .map_err(|_| {
                    SynthError::InvalidConfig(format!("invalid backend version '{version}'"))
                })
        })?;
        Ok(Self::new(name, parsed))
    }
}

impl BundlerBackend for StaticBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> &Version {
        &self.version
    }
}

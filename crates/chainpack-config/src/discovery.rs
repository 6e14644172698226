//! File-based config discovery for CLI use
//!
//! Handles finding and loading chainpack configuration files from the filesystem.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{ConfigError, Result};
use crate::project::ProjectConfig;

/// Name of the dedicated configuration file
pub const CONFIG_FILE: &str = "chainpack.toml";

/// Field holding the configuration inside `package.json`
pub const PACKAGE_JSON_FIELD: &str = "chainpack";

/// File-based configuration discovery
///
/// Searches for chainpack configuration files in conventional locations and loads them.
/// This is primarily for CLI use - library users should use `ProjectConfig::from_value()` directly.
///
/// # Example
///
/// ```no_run
/// use chainpack_config::ConfigDiscovery;
///
/// let discovery = ConfigDiscovery::new(".");
/// let config = discovery.load().unwrap();
/// ```
pub struct ConfigDiscovery {
    root: PathBuf,
}

impl ConfigDiscovery {
    /// Create a new config discovery with a root directory
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Find a config file in the root directory
    ///
    /// Searches in this order:
    /// 1. TOML config: chainpack.toml
    /// 2. package.json (chainpack field)
    pub fn find(&self) -> Option<PathBuf> {
        let toml_path = self.root.join(CONFIG_FILE);
        if toml_path.exists() {
            return Some(toml_path);
        }

        let pkg_path = self.root.join("package.json");
        if pkg_path.exists() {
            if let Ok(content) = fs::read_to_string(&pkg_path) {
                if let Ok(parsed) = serde_json::from_str::<Value>(&content) {
                    if parsed
                        .get(PACKAGE_JSON_FIELD)
                        .is_some_and(|value| !value.is_null())
                    {
                        return Some(pkg_path);
                    }
                }
            }
        }

        None
    }

    /// Load config from discovered file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if no config file is found.
    pub fn load(&self) -> Result<ProjectConfig> {
        let path = self.find().ok_or(ConfigError::NotFound)?;
        self.load_from(&path)
    }

    /// Load config with profile merging
    pub fn load_with_profile(&self, profile: &str) -> Result<ProjectConfig> {
        self.load()?.materialize_profile(Some(profile))
    }

    /// Load config from a specific file path
    pub fn load_from(&self, path: &Path) -> Result<ProjectConfig> {
        if path.file_name() == Some(std::ffi::OsStr::new("package.json")) {
            return self.load_from_package_json(path);
        }

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => {}
            Some("json") => return self.load_from_json(path),
            other => {
                return Err(ConfigError::UnsupportedFormat(
                    other.unwrap_or("<none>").to_string(),
                ));
            }
        }

        let content = fs::read_to_string(path)?;

        let toml_val: toml::Value =
            toml::from_str(&content).map_err(|e| ConfigError::InvalidValue {
                field: "toml".to_string(),
                hint: Some(format!("Invalid TOML syntax: {}", e)),
            })?;

        let value = serde_json::to_value(toml_val).map_err(|e| ConfigError::InvalidValue {
            field: "toml".to_string(),
            hint: Some(format!("TOML to JSON conversion failed: {}", e)),
        })?;

        tracing::debug!(path = %path.display(), "loaded project config");
        ProjectConfig::from_value(value)
    }

    fn load_from_json(&self, path: &Path) -> Result<ProjectConfig> {
        let content = fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&content).map_err(|e| ConfigError::InvalidValue {
            field: "json".to_string(),
            hint: Some(format!("Invalid JSON: {}", e)),
        })?;
        ProjectConfig::from_value(value)
    }

    fn load_from_package_json(&self, path: &Path) -> Result<ProjectConfig> {
        let content = fs::read_to_string(path)?;

        let parsed: Value =
            serde_json::from_str(&content).map_err(|e| ConfigError::InvalidValue {
                field: "package.json".to_string(),
                hint: Some(format!("Invalid JSON: {}", e)),
            })?;

        let section = parsed
            .get(PACKAGE_JSON_FIELD)
            .ok_or_else(|| ConfigError::InvalidValue {
                field: PACKAGE_JSON_FIELD.to_string(),
                hint: Some("Add a 'chainpack' field to your package.json".to_string()),
            })?;

        if section.is_null() {
            return Err(ConfigError::InvalidValue {
                field: PACKAGE_JSON_FIELD.to_string(),
                hint: Some("The 'chainpack' field cannot be null".to_string()),
            });
        }

        ProjectConfig::from_value(section.clone())
    }
}

/// Discover and load config from current directory (convenience function)
///
/// # Example
///
/// ```no_run
/// use chainpack_config::discover;
///
/// let config = discover().unwrap();
/// ```
pub fn discover() -> Result<ProjectConfig> {
    let root = std::env::current_dir()?;
    ConfigDiscovery::new(&root).load()
}

/// Discover and load config with profile (convenience function)
pub fn discover_with_profile(profile: &str) -> Result<ProjectConfig> {
    let root = std::env::current_dir()?;
    ConfigDiscovery::new(&root).load_with_profile(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn find_returns_none_when_no_config() {
        let dir = TempDir::new().unwrap();
        let discovery = ConfigDiscovery::new(dir.path());
        assert!(discovery.find().is_none());
    }

    #[test]
    fn find_prefers_toml_over_package_json() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join(CONFIG_FILE);
        fs::write(&config_path, "hash = true\n").unwrap();
        fs::write(
            dir.path().join("package.json"),
            r#"{ "name": "app", "chainpack": { "hash": false } }"#,
        )
        .unwrap();

        let discovery = ConfigDiscovery::new(dir.path());
        assert_eq!(discovery.find().unwrap(), config_path);
    }

    #[test]
    fn package_json_without_field_is_ignored() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("package.json"), r#"{ "name": "app" }"#).unwrap();

        let discovery = ConfigDiscovery::new(dir.path());
        assert!(discovery.find().is_none());
        assert!(matches!(discovery.load(), Err(ConfigError::NotFound)));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("chainpack.yaml");
        fs::write(&path, "hash: true").unwrap();

        let err = ConfigDiscovery::new(dir.path()).load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(ext) if ext == "yaml"));
    }
}

//! Pluggable config validation strategies
//!
//! Separates filesystem validation (for CLI use) from schema validation (for library use).

use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};
use crate::project::ProjectConfig;

/// Trait for pluggable config validation strategies
pub trait ConfigValidator {
    /// Validate project settings
    fn validate(&self, config: &ProjectConfig) -> Result<()>;
}

/// Schema-only validation (no filesystem checks)
///
/// # Example
///
/// ```
/// use chainpack_config::{ProjectConfig, SchemaValidator, ConfigValidator};
///
/// let config = ProjectConfig::default().with_alias("@", "src");
/// SchemaValidator.validate(&config).unwrap();
/// ```
pub struct SchemaValidator;

impl ConfigValidator for SchemaValidator {
    fn validate(&self, config: &ProjectConfig) -> Result<()> {
        for (alias, target) in &config.alias {
            if alias.trim().is_empty() {
                return Err(ConfigError::SchemaValidation {
                    message: "alias names cannot be empty".to_string(),
                    hint: Some("Remove empty keys from the 'alias' table".to_string()),
                });
            }
            if target.trim().is_empty() {
                return Err(ConfigError::SchemaValidation {
                    message: format!("alias '{alias}' points to an empty path"),
                    hint: None,
                });
            }
        }

        for entry in &config.copy {
            if entry.source().trim().is_empty() {
                return Err(ConfigError::SchemaValidation {
                    message: "copy sources cannot be empty".to_string(),
                    hint: Some("Every 'copy' entry needs a 'from' path".to_string()),
                });
            }
        }

        let policy = &config.node_modules_transform;
        for specifier in policy.include.iter().chain(&policy.exclude) {
            if specifier.trim().is_empty() || specifier.trim() == "@" {
                return Err(ConfigError::SchemaValidation {
                    message: "package specifiers cannot be empty".to_string(),
                    hint: Some(
                        "Use 'name', '@scope/name' or 'name@<version range>'".to_string(),
                    ),
                });
            }
        }

        for include in &config.extra_babel_includes {
            if include.trim().is_empty() {
                return Err(ConfigError::SchemaValidation {
                    message: "extra_babel_includes entries cannot be empty".to_string(),
                    hint: None,
                });
            }
        }

        if config.inline_limit == 0 {
            return Err(ConfigError::SchemaValidation {
                message: "inline_limit must be greater than zero".to_string(),
                hint: Some("Use a small value such as 1 to effectively disable inlining".to_string()),
            });
        }

        if let Some(manifest) = &config.manifest {
            if !manifest.is_object() {
                return Err(ConfigError::SchemaValidation {
                    message: "manifest must be a table of plugin options".to_string(),
                    hint: None,
                });
            }
        }

        Ok(())
    }
}

/// Filesystem validator (for CLI use)
///
/// Validates copy sources and absolute transpile includes exist on disk.
pub struct FsValidator {
    root: PathBuf,
}

impl FsValidator {
    /// Create a new filesystem validator with a root directory
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl ConfigValidator for FsValidator {
    fn validate(&self, config: &ProjectConfig) -> Result<()> {
        // First run schema validation
        SchemaValidator.validate(config)?;

        for entry in &config.copy {
            let path = self.root.join(entry.source());
            if !path.exists() {
                return Err(ConfigError::CopySourceNotFound { path });
            }
        }

        for include in &config.extra_babel_includes {
            let path = Path::new(include);
            if path.is_absolute() && !path.exists() {
                return Err(ConfigError::IncludeNotFound {
                    path: path.to_path_buf(),
                });
            }
        }

        Ok(())
    }
}

/// Convenience function for schema-only validation
pub fn validate_schema(config: &ProjectConfig) -> Result<()> {
    SchemaValidator.validate(config)
}

/// Convenience function for filesystem validation
pub fn validate_fs(config: &ProjectConfig, root: impl AsRef<Path>) -> Result<()> {
    FsValidator::new(root).validate(config)
}

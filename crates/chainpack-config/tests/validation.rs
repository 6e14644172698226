//! Tests for schema and filesystem validation.

use chainpack_config::{
    validate_fs, validate_schema, ConfigError, CopyEntry, NodeModulesTransform, ProjectConfig,
};
use serde_json::json;
use std::fs;
use tempfile::TempDir;

#[test]
fn default_config_is_valid() {
    validate_schema(&ProjectConfig::default()).unwrap();
}

#[test]
fn empty_alias_is_rejected() {
    let config = ProjectConfig::default().with_alias("", "src");
    let err = validate_schema(&config).unwrap_err();
    assert!(matches!(err, ConfigError::SchemaValidation { .. }));
}

#[test]
fn empty_specifier_is_rejected() {
    let config = ProjectConfig::default()
        .with_node_modules_transform(NodeModulesTransform::all().exclude("  "));
    assert!(validate_schema(&config).is_err());
}

#[test]
fn zero_inline_limit_is_rejected() {
    let config = ProjectConfig {
        inline_limit: 0,
        ..ProjectConfig::default()
    };
    assert!(validate_schema(&config).is_err());
}

#[test]
fn manifest_must_be_a_table() {
    let config = ProjectConfig {
        manifest: Some(json!("asset-manifest.json")),
        ..ProjectConfig::default()
    };
    assert!(validate_schema(&config).is_err());
}

#[test]
fn fs_validation_checks_copy_sources() {
    let dir = TempDir::new().unwrap();
    let mut config = ProjectConfig::default();
    config.copy.push(CopyEntry::Dir("static".to_string()));

    let err = validate_fs(&config, dir.path()).unwrap_err();
    assert!(matches!(err, ConfigError::CopySourceNotFound { .. }));

    fs::create_dir(dir.path().join("static")).unwrap();
    validate_fs(&config, dir.path()).unwrap();
}

#[test]
fn fs_validation_checks_absolute_includes_only() {
    let dir = TempDir::new().unwrap();
    let mut config = ProjectConfig::default();
    config.extra_babel_includes.push("some-package".to_string());
    validate_fs(&config, dir.path()).unwrap();

    let missing = dir.path().join("vendor/lib");
    config
        .extra_babel_includes
        .push(missing.to_string_lossy().into_owned());
    let err = validate_fs(&config, dir.path()).unwrap_err();
    assert!(matches!(err, ConfigError::IncludeNotFound { .. }));
}

//! Tests for file discovery and profile materialization.

use chainpack_config::{ConfigDiscovery, ConfigError, Devtool, TransformKind};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn load_parses_toml_config() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(
        dir.path().join("chainpack.toml"),
        r#"
output_path = "build"
hash = false
devtool = false

[alias]
"@" = "src"

[node_modules_transform]
type = "none"
include = ["some-es2020-pkg@1.0.0"]
"#,
    )
    .expect("write config");

    let config = ConfigDiscovery::new(dir.path()).load().expect("load");
    assert_eq!(config.output_path, PathBuf::from("build"));
    assert!(!config.hash);
    assert_eq!(config.devtool, Some(Devtool::Toggle(false)));
    assert_eq!(config.alias["@"], "src");
    assert_eq!(config.node_modules_transform.kind, TransformKind::None);
}

#[test]
fn load_from_package_json() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(
        dir.path().join("package.json"),
        r#"{
            "name": "app",
            "version": "1.0.0",
            "chainpack": { "ssr": true, "dynamic_import": true }
        }"#,
    )
    .expect("write package.json");

    let config = ConfigDiscovery::new(dir.path()).load().expect("load");
    assert!(config.ssr);
    assert!(config.dynamic_import);
}

#[test]
fn invalid_toml_reports_hint() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("chainpack.toml"), "hash = ").expect("write config");

    let err = ConfigDiscovery::new(dir.path()).load().unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { .. }));
    assert!(err.hint().unwrap().contains("Invalid TOML syntax"));
}

#[test]
fn profile_overrides_and_preserves_base() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(
        dir.path().join("chainpack.toml"),
        r#"
hash = false
public_path = "/static/"

[define]
API = "https://dev.example.com"

[profiles.production]
hash = true

[profiles.production.define]
API = "https://example.com"
"#,
    )
    .expect("write config");

    let config = ConfigDiscovery::new(dir.path())
        .load_with_profile("production")
        .expect("load with profile");

    assert!(config.hash);
    assert_eq!(config.public_path, "/static/");
    assert_eq!(config.define["API"], "https://example.com");
}

#[test]
fn profile_arrays_replace_base_arrays() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(
        dir.path().join("chainpack.toml"),
        r#"
extra_babel_includes = ["a", "b"]

[profiles.ci]
extra_babel_includes = ["c"]
"#,
    )
    .expect("write config");

    let config = ConfigDiscovery::new(dir.path())
        .load_with_profile("ci")
        .expect("load with profile");
    assert_eq!(config.extra_babel_includes, vec!["c".to_string()]);
}

#[test]
fn missing_profile_is_reported() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("chainpack.toml"), "hash = true\n").expect("write config");

    let err = ConfigDiscovery::new(dir.path())
        .load_with_profile("staging")
        .unwrap_err();
    assert!(matches!(err, ConfigError::ProfileNotFound(_)));
}

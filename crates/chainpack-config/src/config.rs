//! Value conversion and profile merging for `ProjectConfig`.
//!
//! For file discovery, see the `discovery` module.

use serde_json::Value;

use crate::error::{ConfigError, Result as ConfigResult};
use crate::project::ProjectConfig;

impl ProjectConfig {
    /// Create from serde_json::Value (for programmatic config from DB/API)
    ///
    /// # Example
    ///
    /// ```
    /// use chainpack_config::ProjectConfig;
    /// use serde_json::json;
    /// use std::path::PathBuf;
    ///
    /// let value = json!({
    ///     "output_path": "build",
    ///     "hash": false
    /// });
    ///
    /// let config = ProjectConfig::from_value(value).unwrap();
    /// assert_eq!(config.output_path, PathBuf::from("build"));
    /// assert!(!config.hash);
    /// ```
    pub fn from_value(value: Value) -> ConfigResult<Self> {
        serde_json::from_value(value).map_err(|e| ConfigError::InvalidValue {
            field: "config".to_string(),
            hint: Some(e.to_string()),
        })
    }

    /// Convert to serde_json::Value
    pub fn to_value(&self) -> ConfigResult<Value> {
        serde_json::to_value(self).map_err(|e| ConfigError::InvalidValue {
            field: "config".to_string(),
            hint: Some(e.to_string()),
        })
    }

    /// Apply the named profile on top of the base settings.
    ///
    /// Objects merge key by key; arrays and scalars replace. `None` returns the
    /// configuration unchanged. The profile table itself is kept so the result
    /// can be materialized again.
    pub fn materialize_profile(self, profile: Option<&str>) -> ConfigResult<Self> {
        let Some(name) = profile else {
            return Ok(self);
        };

        let overrides = self
            .profiles
            .get(name)
            .cloned()
            .ok_or_else(|| ConfigError::ProfileNotFound(name.to_string()))?;

        if overrides.is_null() {
            return Ok(self);
        }

        if overrides.get("profiles").is_some() {
            return Err(ConfigError::InvalidProfileOverride {
                message: format!("profile '{name}' cannot define nested profiles"),
            });
        }

        let profiles = self.profiles.clone();
        let mut base = serde_json::to_value(&self).map_err(|err| {
            ConfigError::InvalidProfileOverride {
                message: err.to_string(),
            }
        })?;
        merge_values(&mut base, &overrides);

        let mut merged: ProjectConfig =
            serde_json::from_value(base).map_err(|err| ConfigError::InvalidProfileOverride {
                message: err.to_string(),
            })?;
        merged.profiles = profiles;

        tracing::debug!(profile = name, "applied configuration profile");
        Ok(merged)
    }
}

/// Deep-merge `update` into `target`.
///
/// Objects merge recursively; any other value in `update` replaces the slot.
pub fn merge_values(target: &mut Value, update: &Value) {
    match (target, update) {
        (Value::Object(target_map), Value::Object(update_map)) => {
            for (key, value) in update_map {
                merge_values(target_map.entry(key.clone()).or_insert(Value::Null), value);
            }
        }
        (target_slot, Value::Object(update_map)) => {
            let mut new_obj = serde_json::Map::with_capacity(update_map.len());
            for (key, value) in update_map {
                new_obj.insert(key.clone(), value.clone());
            }
            *target_slot = Value::Object(new_obj);
        }
        (target_slot, _) => {
            *target_slot = update.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;

    #[test]
    fn from_value_creates_config() {
        let value = json!({
            "output_path": "out",
            "alias": { "@": "src" }
        });

        let config = ProjectConfig::from_value(value).unwrap();
        assert_eq!(config.output_path, PathBuf::from("out"));
        assert_eq!(config.alias.get("@").map(String::as_str), Some("src"));
    }

    #[test]
    fn to_value_serializes_config() {
        let config = ProjectConfig {
            hash: false,
            ..ProjectConfig::default()
        };

        let value = config.to_value().unwrap();
        assert_eq!(value["hash"], json!(false));
        assert!(value.get("profiles").is_none());
    }

    #[test]
    fn profile_merging_works() {
        let value = json!({
            "hash": false,
            "inline_limit": 2048,
            "profiles": {
                "production": {
                    "hash": true,
                    "terser_options": { "compress": { "drop_console": true } }
                }
            }
        });

        let config = ProjectConfig::from_value(value)
            .unwrap()
            .materialize_profile(Some("production"))
            .unwrap();

        assert!(config.hash);
        assert_eq!(config.inline_limit, 2048);
        assert_eq!(
            config.terser_options,
            Some(json!({ "compress": { "drop_console": true } }))
        );
        assert!(config.profiles.contains_key("production"));
    }

    #[test]
    fn unknown_profile_is_an_error() {
        let err = ProjectConfig::default()
            .materialize_profile(Some("staging"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::ProfileNotFound(name) if name == "staging"));
    }

    #[test]
    fn merge_values_replaces_arrays() {
        let mut target = json!({ "a": [1, 2], "b": { "c": 1, "d": 2 } });
        merge_values(&mut target, &json!({ "a": [3], "b": { "d": 4 } }));
        assert_eq!(target, json!({ "a": [3], "b": { "c": 1, "d": 4 } }));
    }
}

//! Accumulator sections of the builder.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;

use super::plugin::PluginSpec;

/// Backend mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Development,
    Production,
}

/// Output naming and location
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Output {
    pub path: PathBuf,
    pub filename: String,
    pub chunk_filename: String,
    pub public_path: String,
    pub pathinfo: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub library_target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub future_emit_assets: Option<bool>,
}

impl Default for Output {
    fn default() -> Self {
        Self {
            path: PathBuf::from("dist"),
            filename: "[name].js".to_string(),
            chunk_filename: "[name].async.js".to_string(),
            public_path: "/".to_string(),
            pathinfo: false,
            library_target: None,
            future_emit_assets: None,
        }
    }
}

/// Module resolution
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolve {
    pub symlinks: bool,
    pub modules: Vec<String>,
    pub extensions: Vec<String>,
    pub alias: IndexMap<String, String>,
    /// Replacement modules; `false` disables a module outright
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub fallback: IndexMap<String, Value>,
}

/// Optimization flags
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Optimization {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimize: Option<bool>,
    pub no_emit_on_errors: bool,
    #[serde(rename = "minimizer", skip_serializing_if = "Vec::is_empty")]
    pub minimizers: Vec<PluginSpec>,
}

impl Optimization {
    pub fn has_minimizer(&self) -> bool {
        !self.minimizers.is_empty()
    }
}

/// Asset size warnings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Performance {
    pub hints: bool,
}

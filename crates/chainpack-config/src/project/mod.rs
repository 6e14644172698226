//! Declarative project settings consumed by the synthesis engine.

mod helpers;
mod transform;
mod types;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;

pub use transform::{NodeModulesTransform, TransformKind};
pub use types::{CopyEntry, CssOptions, Devtool};

use helpers::{
    default_hash, default_inline_limit, default_output_path, default_public_path, default_targets,
};

/// User-authored project configuration.
///
/// Read-only for the duration of a synthesis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Output directory, relative to the working directory
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// Public URL prefix of emitted assets
    #[serde(default = "default_public_path")]
    pub public_path: String,

    /// Prepend the runtime public path entry to every entry point
    #[serde(default)]
    pub runtime_public_path: bool,

    /// Import aliases (`"@" -> "src"`)
    #[serde(default)]
    pub alias: IndexMap<String, String>,

    /// Modules provided by the host environment, forwarded verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub externals: Option<Value>,

    /// Source map setting (`false` or a devtool name)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub devtool: Option<Devtool>,

    /// Content-hash output filenames in production, on unless set to `false`
    #[serde(default = "default_hash")]
    pub hash: bool,

    /// Server-side rendering is enabled for the project
    #[serde(default)]
    pub ssr: bool,

    /// Code splitting through dynamic `import()`
    #[serde(default)]
    pub dynamic_import: bool,

    #[serde(default)]
    pub css: CssOptions,

    /// Extra directories or files to copy into the output
    #[serde(default)]
    pub copy: Vec<CopyEntry>,

    /// Compile-time constants, JSON-encoded into the bundle
    #[serde(default)]
    pub define: IndexMap<String, Value>,

    /// Browser targets (`browser -> minimum version`)
    #[serde(default = "default_targets")]
    pub targets: IndexMap<String, Value>,

    #[serde(default)]
    pub node_modules_transform: NodeModulesTransform,

    /// Dependency paths or package specifiers transpiled as first-party code
    #[serde(default)]
    pub extra_babel_includes: Vec<String>,

    /// Images below this size (bytes) are inlined as data URLs
    #[serde(default = "default_inline_limit")]
    pub inline_limit: u64,

    /// Worker loader options; enables the worker rule when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_loader: Option<Value>,

    /// Drop moment.js locale files from the bundle
    #[serde(default)]
    pub ignore_moment_locale: bool,

    /// Asset manifest options; enables manifest emission when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest: Option<Value>,

    /// Minifier options merged over the built-in defaults
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terser_options: Option<Value>,

    /// Named partial overrides, applied with `materialize_profile`
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub profiles: HashMap<String, Value>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            public_path: default_public_path(),
            runtime_public_path: false,
            alias: IndexMap::new(),
            externals: None,
            devtool: None,
            hash: default_hash(),
            ssr: false,
            dynamic_import: false,
            css: CssOptions::default(),
            copy: Vec::new(),
            define: IndexMap::new(),
            targets: default_targets(),
            node_modules_transform: NodeModulesTransform::default(),
            extra_babel_includes: Vec::new(),
            inline_limit: default_inline_limit(),
            worker_loader: None,
            ignore_moment_locale: false,
            manifest: None,
            terser_options: None,
            profiles: HashMap::new(),
        }
    }
}

impl ProjectConfig {
    /// Add an import alias
    ///
    /// # Example
    /// ```
    /// use chainpack_config::ProjectConfig;
    ///
    /// let config = ProjectConfig::default()
    ///     .with_alias("@", "src")
    ///     .with_alias("@components", "src/components");
    /// assert_eq!(config.alias.len(), 2);
    /// ```
    pub fn with_alias(mut self, alias: impl Into<String>, path: impl Into<String>) -> Self {
        self.alias.insert(alias.into(), path.into());
        self
    }

    /// Add a compile-time constant
    pub fn with_define(mut self, key: impl Into<String>, value: Value) -> Self {
        self.define.insert(key.into(), value);
        self
    }

    /// Replace the dependency transpilation policy
    pub fn with_node_modules_transform(mut self, policy: NodeModulesTransform) -> Self {
        self.node_modules_transform = policy;
        self
    }
}

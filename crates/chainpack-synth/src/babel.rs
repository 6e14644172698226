//! Transpilation options passed into the script rules.
//!
//! Resolved once per run from the project's targets. Callers can adjust both
//! the preset options and the final loader options through the
//! [`OptionsModifier`](crate::OptionsModifier) hooks on the invocation context.

use chainpack_config::ProjectConfig;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::path::Path;

use crate::context::{BuildVariant, InvocationContext};
use crate::hooks::HookStage;
use crate::{Result, SynthError};

/// App preset applied to first-party code
pub const APP_PRESET: &str = "@chainpack/babel-preset-app";

/// Preset applied to transpiled dependencies
pub const DEPENDENCY_PRESET: &str = "@chainpack/babel-preset-dependency";

/// Loader cache, relative to the working directory
pub const CACHE_DIRECTORY: &str = "node_modules/.cache/babel-loader";

/// Compilation targets and the equivalent browserslist queries
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetsAndBrowserslist {
    pub targets: IndexMap<String, Value>,
    pub browserslist: Vec<String>,
}

/// Targets for the build variant.
///
/// Server builds target the running Node.js. Browser targets set to `false`
/// are dropped; the `node` key never becomes a browserslist query.
///
/// ```
/// use chainpack_config::ProjectConfig;
/// use chainpack_synth::{BuildVariant, targets_and_browserslist};
///
/// let resolved = targets_and_browserslist(&ProjectConfig::default(), BuildVariant::Csr);
/// assert!(resolved.browserslist.contains(&"chrome >= 49".to_string()));
/// ```
pub fn targets_and_browserslist(
    config: &ProjectConfig,
    variant: BuildVariant,
) -> TargetsAndBrowserslist {
    let targets: IndexMap<String, Value> = if variant.is_server() {
        IndexMap::from([("node".to_string(), Value::Bool(true))])
    } else {
        config
            .targets
            .iter()
            .filter(|(_, version)| !matches!(version, Value::Bool(false) | Value::Null))
            .map(|(browser, version)| (browser.clone(), version.clone()))
            .collect()
    };

    let browserslist = targets
        .iter()
        .filter(|(browser, _)| browser.as_str() != "node")
        .map(|(browser, version)| {
            let version = match version {
                Value::String(v) => v.clone(),
                Value::Bool(true) => "0".to_string(),
                other => other.to_string(),
            };
            format!("{browser} >= {version}")
        })
        .collect();

    TargetsAndBrowserslist {
        targets,
        browserslist,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactPreset {
    pub development: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvPreset {
    pub targets: IndexMap<String, Value>,
    pub use_built_ins: String,
    pub corejs: u32,
    /// Keep ES modules for the bundler's tree shaking
    pub modules: bool,
}

/// Options of the app preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BabelPresetOptions {
    pub node_env: String,
    pub typescript: bool,
    pub react: ReactPreset,
    pub env: EnvPreset,
    pub auto_css_modules: bool,
    pub svgr: bool,
    pub dynamic_import_node: bool,
}

impl BabelPresetOptions {
    pub fn new(config: &ProjectConfig, ctx: &InvocationContext, targets: &TargetsAndBrowserslist) -> Self {
        let development = ctx.environment.is_development();
        Self {
            node_env: ctx.environment.as_str().to_string(),
            typescript: true,
            react: ReactPreset { development },
            env: EnvPreset {
                targets: targets.targets.clone(),
                use_built_ins: "entry".to_string(),
                corejs: 3,
                modules: false,
            },
            auto_css_modules: true,
            svgr: true,
            dynamic_import_node: !config.dynamic_import || ctx.variant.is_server(),
        }
    }
}

/// Loader options of a script rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BabelOptions {
    pub source_type: String,
    pub babelrc: bool,
    pub config_file: bool,
    pub cache_directory: Option<String>,
    pub presets: Vec<Value>,
    pub plugins: Vec<Value>,
}

impl BabelOptions {
    fn with_preset(cwd: &Path, preset: &str, options: Value) -> Self {
        Self {
            source_type: "unambiguous".to_string(),
            babelrc: false,
            config_file: false,
            cache_directory: Some(cwd.join(CACHE_DIRECTORY).display().to_string()),
            presets: vec![json!([preset, options])],
            plugins: Vec::new(),
        }
    }

    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(|e| SynthError::InvalidConfig(e.to_string()))
    }
}

/// Options for dependency transpilation.
///
/// Dependencies are already compiled from their source language; they only
/// get syntax lowering for the targets.
pub fn dependency_babel_options(ctx: &InvocationContext, targets: &TargetsAndBrowserslist) -> BabelOptions {
    BabelOptions::with_preset(
        &ctx.cwd,
        DEPENDENCY_PRESET,
        json!({
            "nodeEnv": ctx.environment.as_str(),
            "env": { "targets": targets.targets },
        }),
    )
}

/// Options shared by every script rule of a run
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedBabelOptions {
    pub targets: TargetsAndBrowserslist,
    /// First-party code
    pub app: BabelOptions,
    /// Transpiled dependencies
    pub dependencies: BabelOptions,
}

impl ResolvedBabelOptions {
    /// Derive the options and run the caller's modifiers, preset first.
    pub async fn resolve(config: &ProjectConfig, ctx: &InvocationContext) -> Result<Self> {
        let targets = targets_and_browserslist(config, ctx.variant);

        let mut preset = BabelPresetOptions::new(config, ctx, &targets);
        if let Some(modifier) = &ctx.modify_babel_preset_opts {
            preset = modifier
                .modify(preset, ctx.variant, ctx.environment)
                .await
                .map_err(|source| SynthError::Hook {
                    stage: HookStage::PresetModifier,
                    source,
                })?;
        }

        let preset_value =
            serde_json::to_value(&preset).map_err(|e| SynthError::InvalidConfig(e.to_string()))?;
        let mut app = BabelOptions::with_preset(&ctx.cwd, APP_PRESET, preset_value);
        if let Some(modifier) = &ctx.modify_babel_opts {
            app = modifier
                .modify(app, ctx.variant, ctx.environment)
                .await
                .map_err(|source| SynthError::Hook {
                    stage: HookStage::OptionsModifier,
                    source,
                })?;
        }

        let dependencies = dependency_babel_options(ctx, &targets);
        tracing::debug!(browserslist = ?targets.browserslist, "resolved transpilation options");

        Ok(Self {
            targets,
            app,
            dependencies,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_builds_target_node() {
        let resolved = targets_and_browserslist(&ProjectConfig::default(), BuildVariant::Ssr);
        assert_eq!(resolved.targets.len(), 1);
        assert_eq!(resolved.targets["node"], Value::Bool(true));
        assert!(resolved.browserslist.is_empty());
    }

    #[test]
    fn browserslist_skips_node_and_disabled_targets() {
        let mut config = ProjectConfig::default();
        config.targets.clear();
        config.targets.insert("chrome".into(), json!(80));
        config.targets.insert("ie".into(), json!(false));
        config.targets.insert("node".into(), json!(12));
        config.targets.insert("safari".into(), json!("13.1"));

        let resolved = targets_and_browserslist(&config, BuildVariant::Csr);
        assert_eq!(resolved.browserslist, ["chrome >= 80", "safari >= 13.1"]);
        assert!(!resolved.targets.contains_key("ie"));
        assert!(resolved.targets.contains_key("node"));
    }

    #[test]
    fn loader_options_are_self_contained() {
        let options = BabelOptions::with_preset(Path::new("/app"), APP_PRESET, json!({}));
        let value = options.to_value().unwrap();
        assert_eq!(value["sourceType"], "unambiguous");
        assert_eq!(value["babelrc"], false);
        assert_eq!(
            value["cacheDirectory"],
            "/app/node_modules/.cache/babel-loader"
        );
        assert_eq!(value["presets"][0][0], APP_PRESET);
    }
}

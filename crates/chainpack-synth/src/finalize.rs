//! Last-mile adjustments and materialization.
//!
//! Node.js core-module handling differs by backend generation: modern
//! backends no longer polyfill core modules and need explicit fallbacks,
//! legacy backends take a `node` shim table instead.

use chainpack_config::{SpeedMeasureOutput, SynthesisOptions};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Value, json};
use std::ops::Deref;
use std::path::PathBuf;

use crate::builder::{BundlerConfig, ConfigBuilder, PluginSpec};
use crate::context::InvocationContext;
use crate::{Result, SynthError};

/// Core modules with no browser counterpart
pub const UNPOLYFILLED_CORE_MODULES: &[&str] = &[
    "child_process",
    "dgram",
    "dns",
    "fs",
    "http2",
    "module",
    "net",
    "tls",
];

/// Hot module replacement plugin name
const HMR_PLUGIN: &str = "hmr";

const NODE_POLYFILL_PLUGIN: &str = "node-polyfill";

/// Configuration wrapped with build-timing instrumentation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasuredConfig {
    #[serde(flatten)]
    pub config: BundlerConfig,
    pub speed_measure: SpeedMeasureSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeedMeasureSettings {
    /// `humanVerbose` or `json`
    pub output_format: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_target: Option<PathBuf>,
}

impl From<&SpeedMeasureOutput> for SpeedMeasureSettings {
    fn from(output: &SpeedMeasureOutput) -> Self {
        match output {
            SpeedMeasureOutput::Console => Self {
                output_format: "humanVerbose".to_string(),
                output_target: None,
            },
            SpeedMeasureOutput::Json(target) => Self {
                output_format: "json".to_string(),
                output_target: Some(target.clone()),
            },
        }
    }
}

/// Result of a synthesis run.
///
/// Serializes to the bare configuration object in both cases; a measured
/// config only adds its `speedMeasure` key.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum FinalConfig {
    Plain(BundlerConfig),
    Measured(MeasuredConfig),
}

impl FinalConfig {
    pub fn is_measured(&self) -> bool {
        matches!(self, FinalConfig::Measured(_))
    }

    pub fn speed_measure(&self) -> Option<&SpeedMeasureSettings> {
        match self {
            FinalConfig::Plain(_) => None,
            FinalConfig::Measured(measured) => Some(&measured.speed_measure),
        }
    }

    pub fn into_inner(self) -> BundlerConfig {
        match self {
            FinalConfig::Plain(config) => config,
            FinalConfig::Measured(measured) => measured.config,
        }
    }
}

impl Deref for FinalConfig {
    type Target = BundlerConfig;

    fn deref(&self) -> &Self::Target {
        match self {
            FinalConfig::Plain(config) => config,
            FinalConfig::Measured(measured) => &measured.config,
        }
    }
}

/// Apply core-module handling, materialize, check and optionally wrap.
///
/// Core-module handling only fills gaps: fallbacks, shims and the polyfill
/// plugin already set by a hook are kept as they are.
///
/// # Errors
///
/// [`SynthError::ConflictingBranches`] when hot replacement and minification
/// ended up in the same configuration; [`SynthError::InvalidConfig`] when the
/// builder cannot be materialized.
pub fn finalize(
    builder: &mut ConfigBuilder,
    ctx: &InvocationContext,
    options: &SynthesisOptions,
) -> Result<FinalConfig> {
    if ctx.backend.is_modern() {
        if !builder.has_plugin(NODE_POLYFILL_PLUGIN) {
            builder.set_plugin(PluginSpec::new(NODE_POLYFILL_PLUGIN, "NodePolyfillPlugin"));
        }
        for module in UNPOLYFILLED_CORE_MODULES {
            builder
                .resolve
                .fallback
                .entry((*module).to_string())
                .or_insert(Value::Bool(false));
        }
    } else {
        let node = builder.node.get_or_insert_with(IndexMap::new);
        for (module, shim) in legacy_node_shims() {
            node.entry(module).or_insert(shim);
        }
    }

    let config = builder.to_config()?;

    if config.has_plugin(HMR_PLUGIN) && config.optimization.has_minimizer() {
        return Err(SynthError::ConflictingBranches(
            "hot module replacement and a minimizer are both configured".to_string(),
        ));
    }

    match (&options.speed_measure, ctx.variant.is_server()) {
        (Some(output), false) => {
            tracing::debug!(?output, "wrapping configuration with speed measurement");
            Ok(FinalConfig::Measured(MeasuredConfig {
                config,
                speed_measure: output.into(),
            }))
        }
        _ => Ok(FinalConfig::Plain(config)),
    }
}

fn legacy_node_shims() -> IndexMap<String, Value> {
    [
        ("setImmediate", json!(false)),
        ("module", json!("empty")),
        ("dns", json!("mock")),
        ("http2", json!("empty")),
        ("process", json!("mock")),
        ("dgram", json!("empty")),
        ("fs", json!("empty")),
        ("net", json!("empty")),
        ("tls", json!("empty")),
        ("child_process", json!("empty")),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::StaticBackend;
    use crate::context::{BuildVariant, Environment};
    use std::sync::Arc;

    fn ctx(backend: &str) -> InvocationContext {
        InvocationContext::new(
            "/app",
            Environment::Production,
            Arc::new(StaticBackend::parse("webpack", backend).unwrap()),
        )
    }

    fn builder() -> ConfigBuilder {
        let mut builder = ConfigBuilder::new();
        builder.add_entry("main", "/app/src/index");
        builder
    }

    #[test]
    fn modern_backend_gets_fallbacks() {
        let config = finalize(&mut builder(), &ctx("5.1.0"), &SynthesisOptions::default()).unwrap();
        assert!(config.has_plugin("node-polyfill"));
        assert_eq!(config.resolve.fallback["fs"], json!(false));
        assert!(config.node.is_none());
    }

    #[test]
    fn legacy_backend_gets_shims() {
        let config = finalize(&mut builder(), &ctx("4.46.0"), &SynthesisOptions::default()).unwrap();
        let node = config.node.as_ref().unwrap();
        assert_eq!(node["setImmediate"], json!(false));
        assert_eq!(node["process"], json!("mock"));
        assert!(!config.has_plugin("node-polyfill"));
        assert!(config.resolve.fallback.is_empty());
    }

    #[test]
    fn hook_supplied_core_module_handling_is_kept() {
        let mut modern = builder();
        modern.resolve.fallback.insert("fs".into(), json!("memfs"));
        modern.set_plugin(
            PluginSpec::new(NODE_POLYFILL_PLUGIN, "NodePolyfillPlugin")
                .arg(json!({ "excludeAliases": ["console"] })),
        );
        let config = finalize(&mut modern, &ctx("5.0.0"), &SynthesisOptions::default()).unwrap();
        assert_eq!(config.resolve.fallback["fs"], json!("memfs"));
        assert_eq!(config.resolve.fallback["net"], json!(false));
        assert_eq!(
            config.plugin(NODE_POLYFILL_PLUGIN).unwrap().options().unwrap()["excludeAliases"],
            json!(["console"])
        );

        let mut legacy = builder();
        legacy.node = Some(IndexMap::from([("fs".to_string(), json!(false))]));
        let config = finalize(&mut legacy, &ctx("4.46.0"), &SynthesisOptions::default()).unwrap();
        let node = config.node.as_ref().unwrap();
        assert_eq!(node["fs"], json!(false));
        assert_eq!(node["net"], json!("empty"));
    }

    #[test]
    fn hot_replacement_with_minimizer_is_rejected() {
        let mut builder = builder();
        builder.set_plugin(PluginSpec::new(HMR_PLUGIN, "HotModuleReplacementPlugin"));
        builder
            .optimization
            .minimizers
            .push(PluginSpec::new("terser", "TerserPlugin"));

        let err = finalize(&mut builder, &ctx("5.0.0"), &SynthesisOptions::default()).unwrap_err();
        assert!(matches!(err, SynthError::ConflictingBranches(_)));
    }

    #[test]
    fn speed_measure_wraps_client_builds_only() {
        let options = SynthesisOptions {
            speed_measure: Some(SpeedMeasureOutput::Json("/tmp/speed.json".into())),
            ..SynthesisOptions::default()
        };

        let client = finalize(&mut builder(), &ctx("5.0.0"), &options).unwrap();
        assert!(client.is_measured());
        let value = serde_json::to_value(&client).unwrap();
        assert_eq!(value["speedMeasure"]["outputFormat"], "json");
        assert_eq!(value["speedMeasure"]["outputTarget"], "/tmp/speed.json");
        assert_eq!(value["entry"]["main"], json!(["/app/src/index"]));

        let server = finalize(
            &mut builder(),
            &ctx("5.0.0").variant(BuildVariant::Ssr),
            &options,
        )
        .unwrap();
        assert!(!server.is_measured());
    }
}

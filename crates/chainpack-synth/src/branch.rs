//! Development/production split.
//!
//! The branch is selected once from the environment tag and applied once.
//! Because it is a single enum value, a run can never carry the plugins of
//! both branches.

use chainpack_config::{ProjectConfig, SynthesisOptions, merge_values};
use serde::Serialize;
use serde_json::{Value, json};

use crate::builder::{ConfigBuilder, Performance, PluginSpec};
use crate::context::{Environment, InvocationContext};
use crate::rules::resolve_devtool;
use crate::Result;

/// Default asset manifest file
pub const MANIFEST_FILE: &str = "asset-manifest.json";

/// Minification step of a production build
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MinifierSettings {
    /// Built-in defaults deep-merged with the project's `terser_options`
    pub terser_options: Value,
    /// Link source maps through minification, only when the production
    /// build emits them
    pub source_map: bool,
    pub cache: bool,
    pub parallel: bool,
    pub extract_comments: bool,
}

impl MinifierSettings {
    pub fn new(config: &ProjectConfig, options: &SynthesisOptions) -> Self {
        let mut terser_options = default_terser_options();
        if let Some(user) = &config.terser_options {
            merge_values(&mut terser_options, user);
        }

        Self {
            terser_options,
            source_map: resolve_devtool(config, Environment::Production).is_some(),
            cache: options.minifier_cache,
            parallel: true,
            extract_comments: false,
        }
    }

    fn to_plugin(&self) -> Result<PluginSpec> {
        let options = serde_json::to_value(self)
            .map_err(|e| crate::SynthError::InvalidConfig(e.to_string()))?;
        Ok(PluginSpec::new("terser", "TerserPlugin").arg(options))
    }
}

/// Minifier options applied before the project's own
pub fn default_terser_options() -> Value {
    json!({
        "parse": { "ecma": 8 },
        "compress": {
            "ecma": 5,
            "warnings": false,
            "comparisons": false,
            "inline": 2,
        },
        "mangle": { "safari10": true },
        "output": {
            "ecma": 5,
            "comments": false,
            "ascii_only": true,
        },
    })
}

#[derive(Debug, Clone, PartialEq)]
pub enum EnvironmentBranch {
    Development {
        /// Hot module replacement
        hot: bool,
        /// Emit the asset manifest for server-side rendering with code splitting
        ssr_manifest: bool,
    },
    Production {
        /// `None` when minification is disabled
        minify: Option<MinifierSettings>,
        /// Deterministic module identifiers (legacy backends)
        hashed_module_ids: bool,
        /// Emit the asset manifest (client builds)
        manifest: bool,
    },
}

impl EnvironmentBranch {
    pub fn select(config: &ProjectConfig, ctx: &InvocationContext, options: &SynthesisOptions) -> Self {
        match ctx.environment {
            Environment::Development => EnvironmentBranch::Development {
                hot: ctx.hot,
                ssr_manifest: config.ssr && config.dynamic_import,
            },
            Environment::Production => EnvironmentBranch::Production {
                minify: options
                    .compress
                    .then(|| MinifierSettings::new(config, options)),
                hashed_module_ids: !ctx.backend.is_modern(),
                manifest: !ctx.variant.is_server(),
            },
        }
    }

    pub fn environment(&self) -> Environment {
        match self {
            EnvironmentBranch::Development { .. } => Environment::Development,
            EnvironmentBranch::Production { .. } => Environment::Production,
        }
    }

    pub fn apply(&self, builder: &mut ConfigBuilder, config: &ProjectConfig) -> Result<()> {
        match self {
            EnvironmentBranch::Development { hot, ssr_manifest } => {
                if *hot {
                    builder.set_plugin(PluginSpec::new("hmr", "HotModuleReplacementPlugin"));
                }
                if *ssr_manifest {
                    builder.set_plugin(manifest_plugin(config));
                }
            }
            EnvironmentBranch::Production {
                minify,
                hashed_module_ids,
                manifest,
            } => {
                builder.optimization.no_emit_on_errors = true;
                builder.performance = Some(Performance { hints: false });

                if *hashed_module_ids {
                    builder.set_plugin(PluginSpec::new("hash-module-ids", "HashedModuleIdsPlugin"));
                }
                if *manifest {
                    builder.set_plugin(manifest_plugin(config));
                }

                match minify {
                    Some(settings) => {
                        builder.optimization.minimize = Some(true);
                        builder.optimization.minimizers.push(settings.to_plugin()?);
                    }
                    None => builder.optimization.minimize = Some(false),
                }
            }
        }

        tracing::debug!(environment = %self.environment(), "applied environment branch");
        Ok(())
    }
}

fn manifest_plugin(config: &ProjectConfig) -> PluginSpec {
    let mut options = json!({ "fileName": MANIFEST_FILE });
    if let Some(user) = &config.manifest {
        merge_values(&mut options, user);
    }
    PluginSpec::new("manifest", "WebpackManifestPlugin").arg(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::StaticBackend;
    use chainpack_config::Devtool;
    use std::sync::Arc;

    fn ctx(environment: Environment, backend: &str) -> InvocationContext {
        InvocationContext::new(
            "/app",
            environment,
            Arc::new(StaticBackend::parse("webpack", backend).unwrap()),
        )
    }

    #[test]
    fn user_terser_options_merge_over_defaults() {
        let mut config = ProjectConfig::default();
        config.terser_options = Some(json!({ "compress": { "drop_console": true } }));

        let settings = MinifierSettings::new(&config, &SynthesisOptions::default());
        assert_eq!(settings.terser_options["compress"]["drop_console"], true);
        assert_eq!(settings.terser_options["compress"]["inline"], 2);
        assert_eq!(settings.terser_options["mangle"]["safari10"], true);
    }

    #[test]
    fn source_maps_are_linked_only_when_emitted() {
        let options = SynthesisOptions::default();
        let mut config = ProjectConfig::default();
        assert!(!MinifierSettings::new(&config, &options).source_map);

        config.devtool = Some(Devtool::Named("source-map".into()));
        assert!(MinifierSettings::new(&config, &options).source_map);

        config.devtool = Some(Devtool::Toggle(false));
        assert!(!MinifierSettings::new(&config, &options).source_map);
    }

    #[test]
    fn default_production_minifier_has_no_source_maps() {
        let config = ProjectConfig::default();
        let branch = EnvironmentBranch::select(
            &config,
            &ctx(Environment::Production, "5.0.0"),
            &SynthesisOptions::default(),
        );

        let mut builder = ConfigBuilder::new();
        branch.apply(&mut builder, &config).unwrap();
        let terser = &builder.optimization.minimizers[0];
        assert_eq!(terser.options().unwrap()["sourceMap"], false);
    }

    #[test]
    fn development_emits_manifest_for_ssr_with_code_splitting() {
        let mut config = ProjectConfig::default();
        config.ssr = true;
        let dev = ctx(Environment::Development, "5.0.0");
        let options = SynthesisOptions::default();

        let mut without_splitting = ConfigBuilder::new();
        EnvironmentBranch::select(&config, &dev, &options)
            .apply(&mut without_splitting, &config)
            .unwrap();
        assert!(!without_splitting.has_plugin("manifest"));

        config.dynamic_import = true;
        let branch = EnvironmentBranch::select(&config, &dev, &options);
        assert_eq!(
            branch,
            EnvironmentBranch::Development {
                hot: false,
                ssr_manifest: true
            }
        );
        let mut with_splitting = ConfigBuilder::new();
        branch.apply(&mut with_splitting, &config).unwrap();
        assert!(with_splitting.has_plugin("manifest"));
        assert_eq!(
            with_splitting.plugin("manifest").unwrap().options().unwrap()["fileName"],
            MANIFEST_FILE
        );
    }

    #[test]
    fn compress_off_disables_minimize() {
        let options = SynthesisOptions {
            compress: false,
            ..SynthesisOptions::default()
        };
        let config = ProjectConfig::default();
        let branch = EnvironmentBranch::select(&config, &ctx(Environment::Production, "5.0.0"), &options);

        let mut builder = ConfigBuilder::new();
        branch.apply(&mut builder, &config).unwrap();
        assert_eq!(builder.optimization.minimize, Some(false));
        assert!(!builder.optimization.has_minimizer());
        assert!(builder.optimization.no_emit_on_errors);
    }

    #[test]
    fn legacy_production_hashes_module_ids() {
        let config = ProjectConfig::default();
        let options = SynthesisOptions::default();

        let mut legacy = ConfigBuilder::new();
        EnvironmentBranch::select(&config, &ctx(Environment::Production, "4.46.0"), &options)
            .apply(&mut legacy, &config)
            .unwrap();
        assert!(legacy.has_plugin("hash-module-ids"));

        let mut modern = ConfigBuilder::new();
        EnvironmentBranch::select(&config, &ctx(Environment::Production, "5.0.0"), &options)
            .apply(&mut modern, &config)
            .unwrap();
        assert!(!modern.has_plugin("hash-module-ids"));
        assert!(modern.has_plugin("manifest"));
    }

    #[test]
    fn development_never_minifies() {
        let config = ProjectConfig::default();
        let branch = EnvironmentBranch::select(
            &config,
            &ctx(Environment::Development, "5.0.0").hot(true),
            &SynthesisOptions::default(),
        );

        let mut builder = ConfigBuilder::new();
        branch.apply(&mut builder, &config).unwrap();
        assert!(builder.has_plugin("hmr"));
        assert!(!builder.has_plugin("manifest"));
        assert_eq!(builder.optimization.minimize, None);
    }

    #[test]
    fn manifest_options_merge_with_file_name() {
        let mut config = ProjectConfig::default();
        config.manifest = Some(json!({ "basePath": "/static/" }));
        let plugin = manifest_plugin(&config);
        let options = plugin.options().unwrap();
        assert_eq!(options["fileName"], MANIFEST_FILE);
        assert_eq!(options["basePath"], "/static/");
    }
}

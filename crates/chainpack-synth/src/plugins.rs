//! Cross-cutting plugins, independent of the environment branch.

use chainpack_config::{CopyEntry, ProjectConfig, SynthesisOptions};
use serde_json::{Map, Value, json};

use crate::builder::{ConfigBuilder, PluginSpec};
use crate::context::InvocationContext;
use crate::{Result, SynthError};

/// Conventional static directory name, relative to the working directory
pub const PUBLIC_DIR: &str = "public";

/// Append definitions, progress, locale, copy, error-reporting and profiling plugins.
pub fn apply_plugins(
    builder: &mut ConfigBuilder,
    config: &ProjectConfig,
    ctx: &InvocationContext,
    options: &SynthesisOptions,
) -> Result<()> {
    if config.ignore_moment_locale {
        builder.set_plugin(PluginSpec::new("ignore-moment-locale", "IgnorePlugin").arg(json!({
            "resourceRegExp": r"^\./locale$",
            "contextRegExp": "moment$",
        })));
    }

    builder.set_plugin(PluginSpec::new("define", "DefinePlugin").arg(definitions(config, ctx, options)?));

    if options.progress && !ctx.backend.is_modern() {
        let progress = if config.ssr {
            json!({ "name": if ctx.variant.is_server() { "Server" } else { "Client" } })
        } else {
            json!({})
        };
        builder.set_plugin(PluginSpec::new("progress", "WebpackBar").arg(progress));
    }

    let patterns = copy_patterns(config, ctx, &builder.output.path);
    if !patterns.is_empty() {
        builder.set_plugin(PluginSpec::new("copy", "CopyPlugin").arg(json!({ "patterns": patterns })));
    }

    if options.friendly_errors {
        builder.set_plugin(
            PluginSpec::new("friendly-error", "FriendlyErrorsWebpackPlugin")
                .arg(json!({ "clearConsole": false })),
        );
    }

    if let Some(level) = options.profile {
        builder.profile = true;
        builder.set_plugin(PluginSpec::new("stats", "StatsWriterPlugin").arg(json!({
            "context": options.process_cwd.display().to_string(),
            "preset": level.preset().unwrap_or("verbose"),
            "filename": "stats.json",
        })));
    }

    tracing::debug!(plugins = builder.plugins().len(), "assembled plugins");
    Ok(())
}

/// Compile-time replacements.
///
/// `process.env` carries `NODE_ENV` and the forwarded app variables; user
/// definitions follow, each JSON-encoded so the bundle sees literals.
pub fn definitions(
    config: &ProjectConfig,
    ctx: &InvocationContext,
    options: &SynthesisOptions,
) -> Result<Value> {
    let mut env = Map::new();
    env.insert("NODE_ENV".to_string(), encode(&json!(ctx.environment.as_str()))?);
    for (key, value) in &options.app_env {
        env.insert(key.clone(), encode(&json!(value))?);
    }

    let mut defines = Map::new();
    defines.insert("process.env".to_string(), Value::Object(env));
    for (key, value) in &config.define {
        defines.insert(key.clone(), encode(value)?);
    }
    Ok(Value::Object(defines))
}

fn encode(value: &Value) -> Result<Value> {
    serde_json::to_string(value)
        .map(Value::String)
        .map_err(|e| SynthError::InvalidConfig(format!("cannot encode definition: {e}")))
}

fn copy_patterns(config: &ProjectConfig, ctx: &InvocationContext, output: &std::path::Path) -> Vec<Value> {
    let mut patterns = Vec::new();

    if let Some(public) = &ctx.public_dir {
        patterns.push(json!({
            "from": public.display().to_string(),
            "to": output.display().to_string(),
        }));
    }

    for entry in &config.copy {
        let pattern = match entry {
            CopyEntry::Dir(from) => json!({
                "from": ctx.cwd.join(from).display().to_string(),
                "to": output.display().to_string(),
            }),
            CopyEntry::Pattern { from, to } => json!({
                "from": ctx.cwd.join(from).display().to_string(),
                "to": output.join(to).display().to_string(),
            }),
        };
        patterns.push(pattern);
    }
    patterns
}

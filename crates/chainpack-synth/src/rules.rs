//! Base settings and the module rule pipeline.
//!
//! Rule order is significant and fixed:
//!
//! 1. `js`: first-party scripts
//! 2. `extra-babel-include-<n>`: whitelisted dependency paths or packages
//! 3. `ts-in-node-modules`: dependency sources shipped untranspiled
//! 4. `js-in-node-modules`: dependency transpilation, decided by the matcher
//! 5. `images`, `svg`, `fonts`, `plaintext`: static assets
//! 6. `worker`: worker sources, when configured
//!
//! Rules are only ever appended; nothing here reorders or merges them.

use chainpack_config::{ProjectConfig, SynthesisOptions};
use chainpack_matcher::PackageMatcher;
use path_clean::PathClean;
use serde_json::{Value, json};
use std::path::{Path, PathBuf};

use crate::babel::ResolvedBabelOptions;
use crate::builder::{Condition, ConfigBuilder, DEPENDENCY_ROOT, Mode, Rule, UseEntry, pattern};
use crate::context::{Environment, InvocationContext};
use crate::Result;

/// Resolvable script extensions, in lookup order
pub const EXTENSIONS: &[&str] = &[
    ".web.js", ".wasm", ".mjs", ".js", ".web.jsx", ".jsx", ".web.ts", ".ts", ".web.tsx", ".tsx",
    ".json",
];

/// Output name of emitted static assets
pub const ASSET_NAME: &str = "static/[name].[hash:8].[ext]";

/// Development source maps when the project does not choose
pub const DEFAULT_DEV_DEVTOOL: &str = "cheap-module-source-map";

/// Client module prepended to entries for hot reload
pub const HOT_CLIENT_ENTRY: &str = "@chainpack/hot-client";

/// Module prepended to entries to set the public path at runtime
pub const RUNTIME_PUBLIC_PATH_ENTRY: &str = "@chainpack/runtime-public-path";

const SCRIPT_TEST: &str = r"\.(js|mjs|jsx|ts|tsx)$";
const BABEL_LOADER: &str = "babel-loader";

/// Mode, entries, output naming, resolution and externals.
pub fn configure_base(
    builder: &mut ConfigBuilder,
    config: &ProjectConfig,
    ctx: &InvocationContext,
) -> Result<()> {
    let production = ctx.environment == Environment::Production;
    let server = ctx.variant.is_server();

    builder.mode = if production {
        Mode::Production
    } else {
        Mode::Development
    };
    builder.context = ctx.cwd.clone();
    builder.target = Some(if server { "node" } else { "web" }.to_string());
    builder.devtool = resolve_devtool(config, ctx.environment);

    for (name, source) in &ctx.entries {
        if config.runtime_public_path {
            builder.add_entry(name, RUNTIME_PUBLIC_PATH_ENTRY);
        }
        if ctx.hot && !production && !server {
            let client = match ctx.port {
                Some(port) => format!("{HOT_CLIENT_ENTRY}?port={port}"),
                None => HOT_CLIENT_ENTRY.to_string(),
            };
            builder.add_entry(name, client);
        }
        builder.add_entry(name, absolute(&ctx.cwd, source).display().to_string());
    }

    let hashed = production && config.hash && !server;
    builder.output.path = absolute(&ctx.cwd, &config.output_path);
    builder.output.filename = if hashed {
        "[name].[contenthash:8].js"
    } else {
        "[name].js"
    }
    .to_string();
    builder.output.chunk_filename = if hashed {
        "[name].[contenthash:8].async.js"
    } else {
        "[name].async.js"
    }
    .to_string();
    builder.output.public_path = config.public_path.clone();
    builder.output.pathinfo = false;
    builder.output.library_target = server.then(|| "commonjs2".to_string());
    builder.output.future_emit_assets = (!ctx.backend.is_modern()).then_some(true);

    builder.resolve.symlinks = true;
    builder.resolve.modules = vec![
        DEPENDENCY_ROOT.to_string(),
        ctx.cwd.join(DEPENDENCY_ROOT).display().to_string(),
    ];
    builder.resolve.extensions = EXTENSIONS.iter().map(|e| (*e).to_string()).collect();
    builder.resolve.alias = config.alias.clone();

    builder.externals = config.externals.clone();

    tracing::debug!(
        entries = builder.entries.len(),
        devtool = ?builder.devtool,
        "configured base settings"
    );
    Ok(())
}

/// Devtool for the environment: explicit `false` disables source maps, a
/// name selects one, anything else keeps the environment default.
pub fn resolve_devtool(config: &ProjectConfig, environment: Environment) -> Option<String> {
    match &config.devtool {
        Some(devtool) if devtool.is_disabled() => None,
        Some(devtool) if devtool.name().is_some() => devtool.name().map(str::to_string),
        _ if environment.is_development() => Some(DEFAULT_DEV_DEVTOOL.to_string()),
        _ => None,
    }
}

/// Append the module rules in pipeline order.
pub fn apply_rules(
    builder: &mut ConfigBuilder,
    config: &ProjectConfig,
    ctx: &InvocationContext,
    options: &SynthesisOptions,
    babel: &ResolvedBabelOptions,
    matcher: &PackageMatcher,
) -> Result<()> {
    let app_babel = babel.app.to_value()?;
    let babel_use =
        |loader_options: &Value| UseEntry::new(BABEL_LOADER, BABEL_LOADER).options(loader_options.clone());

    // 1. first-party scripts
    let mut js = Rule::new("js", pattern(SCRIPT_TEST)?)
        .include(Condition::path(&ctx.cwd))
        .exclude(Condition::dependency_root()?)
        .with_use(babel_use(&app_babel));
    if options.app_root && options.process_cwd != ctx.cwd {
        js = js.include(Condition::path(&options.process_cwd));
    }
    builder.add_rule(js);

    // 2. explicitly whitelisted dependencies
    for (index, include) in config.extra_babel_includes.iter().enumerate() {
        let condition = if Path::new(include).is_absolute() {
            Condition::path(PathBuf::from(include).clean())
        } else {
            Condition::Dependency(matcher.for_specifier(include)?)
        };
        builder.add_rule(
            Rule::new(format!("extra-babel-include-{index}"), pattern(SCRIPT_TEST)?)
                .include(condition)
                .with_use(babel_use(&app_babel)),
        );
    }

    // 3. dependency sources that are never published pre-compiled
    builder.add_rule(
        Rule::new("ts-in-node-modules", pattern(r"\.(jsx|ts|tsx)$")?)
            .include(Condition::dependency_root()?)
            .with_use(babel_use(&app_babel)),
    );

    // 4. dependency transpilation
    builder.add_rule(
        Rule::new("js-in-node-modules", pattern(r"\.(js|mjs)$")?)
            .include(Condition::Dependency(matcher.clone()))
            .with_use(babel_use(&babel.dependencies.to_value()?)),
    );

    // 5. static assets
    let file_loader = json!({ "name": ASSET_NAME, "esModule": false });
    builder.add_rule(
        Rule::new("images", pattern(r"\.(bmp|gif|jpe?g|png)$")?).with_use(
            UseEntry::new("url-loader", "url-loader").options(json!({
                "limit": config.inline_limit,
                "name": ASSET_NAME,
                "esModule": false,
                "fallback": { "loader": "file-loader", "options": file_loader },
            })),
        ),
    );
    builder.add_rule(
        Rule::new("svg", pattern(r"\.(svg)(\?.*)?$")?)
            .with_use(UseEntry::new("file-loader", "file-loader").options(file_loader.clone())),
    );
    builder.add_rule(
        Rule::new("fonts", pattern(r"\.(eot|woff|woff2|ttf)(\?.*)?$")?)
            .with_use(UseEntry::new("file-loader", "file-loader").options(file_loader)),
    );
    builder.add_rule(
        Rule::new("plaintext", pattern(r"\.(txt|text|md)$")?)
            .with_use(UseEntry::new("raw-loader", "raw-loader")),
    );

    // 6. workers
    if let Some(worker) = &config.worker_loader {
        let worker_options = match worker {
            Value::Object(_) => worker.clone(),
            _ => json!({}),
        };
        builder.add_rule(
            Rule::new("worker", pattern(r"\.worker\.(js|ts)$")?)
                .with_use(UseEntry::new("worker-loader", "worker-loader").options(worker_options)),
        );
    }

    tracing::debug!(
        rules = builder.rules().len(),
        policy = matcher.rule_set().kind(),
        "appended module rules"
    );
    Ok(())
}

fn absolute(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf().clean()
    } else {
        cwd.join(path).clean()
    }
}

//! Style-sheet rules.
//!
//! The style sub-builder is a collaborator: it reads the shared state in
//! [`StyleContext`] and appends its own rules. [`BasicStyleRules`] covers
//! plain CSS and Less; embedders with richer pipelines supply their own
//! [`StyleRules`] through the invocation context.

use chainpack_config::CssOptions;
use regex::Regex;
use serde_json::{Value, json};

use crate::builder::{ConfigBuilder, PluginSpec, Rule, UseEntry, pattern};
use crate::context::{BuildVariant, Environment};
use crate::Result;

/// Shared state handed to the style sub-builder
#[derive(Debug, Clone, PartialEq)]
pub struct StyleContext {
    pub environment: Environment,
    pub variant: BuildVariant,
    pub css: CssOptions,
    /// Whether the build emits source maps at all
    pub source_maps: bool,
}

/// One style language rule
#[derive(Debug, Clone)]
pub struct CssRuleOptions {
    /// Rule name, usually the language (`css`, `less`)
    pub lang: String,
    pub test: Regex,
    /// Pre-processor loader run before the CSS loader
    pub loader: Option<String>,
    pub options: Option<Value>,
}

impl CssRuleOptions {
    pub fn new(lang: impl Into<String>, test: Regex) -> Self {
        Self {
            lang: lang.into(),
            test,
            loader: None,
            options: None,
        }
    }

    pub fn loader(mut self, loader: impl Into<String>, options: Option<Value>) -> Self {
        self.loader = Some(loader.into());
        self.options = options;
        self
    }
}

pub trait StyleRules: Send + Sync + std::fmt::Debug {
    /// Append every style rule and plugin of the build
    fn apply(&self, builder: &mut ConfigBuilder, ctx: &StyleContext) -> Result<()>;

    /// Append a single language rule
    fn create_css_rule(
        &self,
        builder: &mut ConfigBuilder,
        ctx: &StyleContext,
        options: CssRuleOptions,
    ) -> Result<()>;
}

/// CSS and Less support.
///
/// Development client builds inject styles at runtime, production client
/// builds extract them into files, server builds only keep class names.
#[derive(Debug, Default, Clone, Copy)]
pub struct BasicStyleRules;

const EXTRACT_LOADER: &str = "mini-css-extract-plugin/loader";

impl StyleRules for BasicStyleRules {
    fn apply(&self, builder: &mut ConfigBuilder, ctx: &StyleContext) -> Result<()> {
        self.create_css_rule(builder, ctx, CssRuleOptions::new("css", pattern(r"\.css(\?.*)?$")?))?;
        self.create_css_rule(
            builder,
            ctx,
            CssRuleOptions::new("less", pattern(r"\.less(\?.*)?$")?)
                .loader("less-loader", Some(json!({ "javascriptEnabled": true }))),
        )?;

        if extracts(ctx) {
            builder.set_plugin(
                PluginSpec::new("extract-css", "MiniCssExtractPlugin").arg(json!({
                    "filename": "[name].[contenthash:8].css",
                    "chunkFilename": "[name].[contenthash:8].chunk.css",
                    "ignoreOrder": true,
                })),
            );
        }
        Ok(())
    }

    fn create_css_rule(
        &self,
        builder: &mut ConfigBuilder,
        ctx: &StyleContext,
        options: CssRuleOptions,
    ) -> Result<()> {
        let mut rule = Rule::new(options.lang, options.test);

        if !ctx.variant.is_server() {
            rule = if extracts(ctx) {
                rule.with_use(UseEntry::new("extract-css-loader", EXTRACT_LOADER))
            } else {
                rule.with_use(UseEntry::new("style-loader", "style-loader"))
            };
        }

        let modules = if ctx.css.modules {
            json!({
                "localIdentName": "[local]___[hash:base64:5]",
                "exportOnlyLocals": ctx.variant.is_server(),
            })
        } else {
            Value::Bool(false)
        };
        rule = rule.with_use(UseEntry::new("css-loader", "css-loader").options(json!({
            "importLoaders": 1,
            "sourceMap": ctx.source_maps && ctx.css.source_map,
            "modules": modules,
        })));

        if let Some(loader) = options.loader {
            let mut entry = UseEntry::new(loader.clone(), loader);
            entry.options = options.options;
            rule = rule.with_use(entry);
        }

        builder.add_rule(rule);
        Ok(())
    }
}

fn extracts(ctx: &StyleContext) -> bool {
    !ctx.environment.is_development() && !ctx.variant.is_server()
}

//! The synthesis pipeline.

use chainpack_config::{ProjectConfig, SynthesisOptions, validate_schema};
use chainpack_matcher::{BoundaryResolver, PackageMatchRuleSet, PackageMatcher};
use std::fmt;
use std::sync::Arc;

use crate::babel::ResolvedBabelOptions;
use crate::branch::EnvironmentBranch;
use crate::builder::ConfigBuilder;
use crate::context::InvocationContext;
use crate::finalize::{FinalConfig, finalize};
use crate::hooks::{ConfigHook, HookChain, HookContext};
use crate::plugins::apply_plugins;
use crate::rules::{apply_rules, configure_base};
use crate::style::StyleContext;
use crate::Result;

/// A project: its declarative configuration plus the user's chain hook.
#[derive(Clone)]
pub struct Project {
    pub config: ProjectConfig,
    /// Runs after every built-in stage and the internal hook
    pub chain_hook: Option<Arc<dyn ConfigHook>>,
}

impl Project {
    pub fn new(config: ProjectConfig) -> Self {
        Self {
            config,
            chain_hook: None,
        }
    }

    pub fn with_chain_hook(mut self, hook: Arc<dyn ConfigHook>) -> Self {
        self.chain_hook = Some(hook);
        self
    }
}

impl fmt::Debug for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Project")
            .field("config", &self.config)
            .field("chain_hook", &self.chain_hook.is_some())
            .finish()
    }
}

/// Produce the final bundler configuration for one build.
///
/// Each call owns its builder, so client and server variants of a project
/// can be synthesized concurrently from clones of the same [`Project`].
///
/// # Errors
///
/// Fails without producing a partial configuration when the backend never
/// becomes ready, the project configuration is invalid, the transform policy
/// is contradictory, a hook or options modifier fails, or the finished
/// configuration mixes development and production directives.
#[tracing::instrument(
    skip_all,
    fields(variant = %ctx.variant, environment = %ctx.environment, backend = %ctx.backend.version())
)]
pub async fn synthesize(
    project: &Project,
    ctx: InvocationContext,
    options: &SynthesisOptions,
) -> Result<FinalConfig> {
    ctx.readiness.wait().await?;

    let config = &project.config;
    validate_schema(config)?;

    let rule_set = PackageMatchRuleSet::from_policy(&config.node_modules_transform)?;
    let resolver = BoundaryResolver::new(Arc::clone(&ctx.descriptors)).with_module_root(&ctx.cwd);
    let matcher = PackageMatcher::new(rule_set, Arc::new(resolver));

    let babel = ResolvedBabelOptions::resolve(config, &ctx).await?;

    let mut builder = ConfigBuilder::new();
    configure_base(&mut builder, config, &ctx)?;
    apply_rules(&mut builder, config, &ctx, options, &babel, &matcher)?;

    let style = StyleContext {
        environment: ctx.environment,
        variant: ctx.variant,
        css: config.css.clone(),
        source_maps: builder.devtool.is_some(),
    };
    ctx.style_rules.apply(&mut builder, &style)?;

    apply_plugins(&mut builder, config, &ctx, options)?;

    let branch = EnvironmentBranch::select(config, &ctx, options);
    branch.apply(&mut builder, config)?;

    let hooks = HookChain::new(ctx.chain_hook.clone(), project.chain_hook.clone());
    if !hooks.is_empty() {
        let hook_ctx = HookContext::new(
            ctx.variant,
            Arc::clone(&ctx.backend),
            Arc::clone(&ctx.style_rules),
            style,
        );
        hooks.run(&mut builder, &hook_ctx, ctx.environment).await?;
    }

    let final_config = finalize(&mut builder, &ctx, options)?;
    tracing::debug!(
        rules = final_config.module.rules.len(),
        plugins = final_config.plugins.len(),
        measured = final_config.is_measured(),
        "synthesized configuration"
    );
    Ok(final_config)
}

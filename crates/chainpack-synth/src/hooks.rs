//! Customization hooks run against the builder before finalization.
//!
//! The chain is fixed: the engine-internal hook from the invocation context
//! runs first, the project's user hook runs last. Each hook is awaited before
//! the next starts, so it always observes the previous hook's mutations. The
//! user hook has the final word on every setting.

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

use crate::backend::BundlerBackend;
use crate::builder::ConfigBuilder;
use crate::context::{BuildVariant, Environment};
use crate::style::{CssRuleOptions, StyleContext, StyleRules};
use crate::{Result, SynthError};

/// A customization callback mutating the in-progress builder.
#[async_trait]
pub trait ConfigHook: Send + Sync {
    async fn apply(&self, builder: &mut ConfigBuilder, ctx: &HookContext) -> anyhow::Result<()>;
}

/// Adapts a synchronous closure into a [`ConfigHook`].
///
/// ```
/// use chainpack_synth::{FnHook, PluginSpec};
///
/// let hook = FnHook::new(|builder, _ctx| {
///     builder.set_plugin(PluginSpec::new("banner", "BannerPlugin"));
///     Ok(())
/// });
/// ```
pub struct FnHook<F> {
    f: F,
}

impl<F> FnHook<F>
where
    F: Fn(&mut ConfigBuilder, &HookContext) -> anyhow::Result<()> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F> ConfigHook for FnHook<F>
where
    F: Fn(&mut ConfigBuilder, &HookContext) -> anyhow::Result<()> + Send + Sync,
{
    async fn apply(&self, builder: &mut ConfigBuilder, ctx: &HookContext) -> anyhow::Result<()> {
        (self.f)(builder, ctx)
    }
}

/// Adjusts a resolved options value before it is used.
#[async_trait]
pub trait OptionsModifier<T: Send + 'static>: Send + Sync {
    async fn modify(
        &self,
        options: T,
        variant: BuildVariant,
        environment: Environment,
    ) -> anyhow::Result<T>;
}

/// Stage a hook failure is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookStage {
    Internal,
    User,
    PresetModifier,
    OptionsModifier,
}

impl fmt::Display for HookStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HookStage::Internal => "internal chain hook",
            HookStage::User => "user chain hook",
            HookStage::PresetModifier => "transpiler preset modifier",
            HookStage::OptionsModifier => "transpiler options modifier",
        })
    }
}

/// What a hook gets to see besides the builder.
pub struct HookContext {
    pub variant: BuildVariant,
    pub backend: Arc<dyn BundlerBackend>,
    /// Only set for the user hook
    pub environment: Option<Environment>,
    style_rules: Arc<dyn StyleRules>,
    style: StyleContext,
}

impl HookContext {
    pub(crate) fn new(
        variant: BuildVariant,
        backend: Arc<dyn BundlerBackend>,
        style_rules: Arc<dyn StyleRules>,
        style: StyleContext,
    ) -> Self {
        Self {
            variant,
            backend,
            environment: None,
            style_rules,
            style,
        }
    }

    fn for_user(&self, environment: Environment) -> Self {
        Self {
            variant: self.variant,
            backend: Arc::clone(&self.backend),
            environment: Some(environment),
            style_rules: Arc::clone(&self.style_rules),
            style: self.style.clone(),
        }
    }

    /// Add a style-sheet rule the same way the built-in style rules do
    pub fn create_css_rule(&self, builder: &mut ConfigBuilder, options: CssRuleOptions) -> Result<()> {
        self.style_rules.create_css_rule(builder, &self.style, options)
    }
}

impl fmt::Debug for HookContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookContext")
            .field("variant", &self.variant)
            .field("backend", &self.backend)
            .field("environment", &self.environment)
            .finish_non_exhaustive()
    }
}

/// The internal-then-user hook sequence.
#[derive(Clone, Default)]
pub struct HookChain {
    internal: Option<Arc<dyn ConfigHook>>,
    user: Option<Arc<dyn ConfigHook>>,
}

impl HookChain {
    pub fn new(internal: Option<Arc<dyn ConfigHook>>, user: Option<Arc<dyn ConfigHook>>) -> Self {
        Self { internal, user }
    }

    pub fn is_empty(&self) -> bool {
        self.internal.is_none() && self.user.is_none()
    }

    /// Run the hooks in order, aborting on the first failure.
    ///
    /// Changes the user hook makes to optimization settings are allowed but
    /// reported with a warning.
    pub async fn run(
        &self,
        builder: &mut ConfigBuilder,
        ctx: &HookContext,
        environment: Environment,
    ) -> Result<()> {
        if let Some(hook) = &self.internal {
            tracing::debug!("running internal chain hook");
            hook.apply(builder, ctx)
                .await
                .map_err(|source| SynthError::Hook {
                    stage: HookStage::Internal,
                    source,
                })?;
        }

        if let Some(hook) = &self.user {
            tracing::debug!("running user chain hook");
            let before = builder.optimization.clone();
            let user_ctx = ctx.for_user(environment);
            hook.apply(builder, &user_ctx)
                .await
                .map_err(|source| SynthError::Hook {
                    stage: HookStage::User,
                    source,
                })?;

            if builder.optimization != before {
                tracing::warn!(
                    minimize = ?builder.optimization.minimize,
                    minimizers = builder.optimization.minimizers.len(),
                    "user chain hook overrode optimization settings"
                );
            }
        }

        Ok(())
    }
}

impl fmt::Debug for HookChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookChain")
            .field("internal", &self.internal.is_some())
            .field("user", &self.user.is_some())
            .finish()
    }
}

#![cfg_attr(docsrs, feature(doc_cfg))]

//! # chainpack-synth
//!
//! Synthesizes a complete bundler configuration from a declarative
//! [`ProjectConfig`](chainpack_config::ProjectConfig) and a per-build
//! [`InvocationContext`].
//!
//! Stages run in a fixed order on one exclusively owned [`ConfigBuilder`]:
//!
//! 1. wait for the backend's one-time [`Readiness`] signal
//! 2. base settings and the module rule pipeline ([`rules`])
//! 3. style rules ([`StyleRules`])
//! 4. cross-cutting plugins ([`plugins`])
//! 5. the development/production [`EnvironmentBranch`]
//! 6. the internal hook, then the user hook ([`hooks`])
//! 7. the [`finalize`] step, producing a [`FinalConfig`]
//!
//! ## Quick Start
//!
//! ```no_run
//! use chainpack_config::{ProjectConfig, SynthesisOptions};
//! use chainpack_synth::{Environment, InvocationContext, Project, StaticBackend, synthesize};
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = Arc::new(StaticBackend::parse("webpack", "5.88.0")?);
//! let ctx = InvocationContext::new("/app", Environment::Production, backend)
//!     .entry("main", "src/index");
//!
//! let project = Project::new(ProjectConfig::default());
//! let config = synthesize(&project, ctx, &SynthesisOptions::default()).await?;
//! println!("{}", serde_json::to_string_pretty(&config)?);
//! # Ok(()) }
//! ```

pub mod babel;
pub mod backend;
pub mod branch;
pub mod builder;
pub mod context;
pub mod finalize;
pub mod hooks;
pub mod plugins;
pub mod readiness;
pub mod rules;
pub mod style;
pub mod synth;

pub use babel::{
    BabelOptions, BabelPresetOptions, ResolvedBabelOptions, TargetsAndBrowserslist,
    targets_and_browserslist,
};
pub use backend::{BundlerBackend, MODERN_BACKEND_MAJOR, StaticBackend};
pub use branch::{EnvironmentBranch, MinifierSettings};
pub use builder::{
    BundlerConfig, Condition, ConfigBuilder, Mode, Optimization, Output, PluginSpec, Resolve,
    Rule, UseEntry,
};
pub use context::{BuildVariant, Environment, InvocationContext};
pub use finalize::{FinalConfig, MeasuredConfig, SpeedMeasureSettings};
pub use hooks::{ConfigHook, FnHook, HookChain, HookContext, HookStage, OptionsModifier};
pub use readiness::{ReadySignal, Readiness};
pub use style::{BasicStyleRules, CssRuleOptions, StyleContext, StyleRules};
pub use synth::{Project, synthesize};

// Logging utilities (optional, enabled with "logging" feature)
#[cfg(feature = "logging")]
#[cfg_attr(docsrs, doc(cfg(feature = "logging")))]
pub mod logging;

#[cfg(feature = "logging")]
#[cfg_attr(docsrs, doc(cfg(feature = "logging")))]
pub use logging::{LogLevel, init_logging, init_logging_from_env};

use chainpack_config::ConfigError;
use chainpack_matcher::MatcherError;

/// Error types for configuration synthesis.
#[derive(Debug, thiserror::Error)]
pub enum SynthError {
    /// The transform policy cannot be turned into a rule set.
    #[error("Invalid transform rule set: {specifier}: {reason}")]
    InvalidRuleSet { specifier: String, reason: String },

    /// A customization hook failed; synthesis was aborted.
    #[error("{stage} failed: {source}")]
    Hook {
        stage: HookStage,
        #[source]
        source: anyhow::Error,
    },

    /// The backend dropped its readiness signal without firing it.
    #[error("Bundler backend never signalled readiness")]
    BackendUnavailable,

    /// Development-only and production-only directives ended up together.
    #[error("Conflicting environment branches: {0}")]
    ConflictingBranches(String),

    /// The builder cannot be materialized.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Error from the project configuration layer.
    #[error("Project configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for synthesis operations.
pub type Result<T> = std::result::Result<T, SynthError>;

impl From<MatcherError> for SynthError {
    fn from(err: MatcherError) -> Self {
        match err {
            MatcherError::InvalidRuleSet { specifier, reason } => {
                SynthError::InvalidRuleSet { specifier, reason }
            }
            other => SynthError::InvalidConfig(other.to_string()),
        }
    }
}

impl miette::Diagnostic for SynthError {
    fn code(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        Some(Box::new(match self {
            SynthError::InvalidRuleSet { .. } => "INVALID_RULE_SET",
            SynthError::Hook { .. } => "HOOK_FAILED",
            SynthError::BackendUnavailable => "BACKEND_UNAVAILABLE",
            SynthError::ConflictingBranches(_) => "CONFLICTING_BRANCHES",
            SynthError::InvalidConfig(_) => "INVALID_CONFIG",
            SynthError::Config(_) => "PROJECT_CONFIG_ERROR",
        }))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(miette::Severity::Error)
    }

    fn help(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        match self {
            SynthError::InvalidRuleSet { specifier, .. } => Some(Box::new(format!(
                "Check 'node_modules_transform' and 'extra_babel_includes' for '{}'.\nA package cannot be both included and excluded.",
                specifier
            ))),
            SynthError::Hook { stage, .. } => Some(Box::new(format!(
                "The {} returned an error. No configuration was produced.",
                stage
            ))),
            SynthError::BackendUnavailable => Some(Box::new(
                "The bundler backend shut down before finishing initialization.",
            )),
            SynthError::ConflictingBranches(_) => Some(Box::new(
                "Hot reload is a development feature and minification a production one.\nCheck that your hooks do not mix them.",
            )),
            SynthError::Config(err) => err
                .hint()
                .map(|h| Box::new(h) as Box<dyn std::fmt::Display + '_>),
            SynthError::InvalidConfig(_) => None,
        }
    }
}

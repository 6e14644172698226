//! Per-build invocation parameters.

use chainpack_matcher::{DescriptorSource, NativeFs};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::babel::{BabelOptions, BabelPresetOptions};
use crate::backend::BundlerBackend;
use crate::hooks::{ConfigHook, OptionsModifier};
use crate::readiness::Readiness;
use crate::style::{BasicStyleRules, StyleRules};

/// Client- or server-rendered build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildVariant {
    #[default]
    Csr,
    Ssr,
}

impl BuildVariant {
    pub fn is_server(&self) -> bool {
        matches!(self, BuildVariant::Ssr)
    }
}

impl fmt::Display for BuildVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BuildVariant::Csr => "csr",
            BuildVariant::Ssr => "ssr",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }

    /// Value of `process.env.NODE_ENV` in the bundle
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters of one build invocation.
///
/// Built once by the caller and consumed by [`synthesize`](crate::synthesize).
/// Concurrent builds (e.g. the client and server variant of one project)
/// each get their own context and, through it, their own builder.
#[derive(Clone)]
pub struct InvocationContext {
    pub cwd: PathBuf,
    pub variant: BuildVariant,
    pub environment: Environment,
    /// Entry name -> source path (relative to `cwd` or absolute)
    pub entries: IndexMap<String, PathBuf>,
    pub hot: bool,
    /// Dev server port, forwarded to the hot-reload client
    pub port: Option<u16>,
    /// Existing static directory copied verbatim into the output
    pub public_dir: Option<PathBuf>,
    pub backend: Arc<dyn BundlerBackend>,
    pub readiness: Readiness,
    /// Engine-internal customization hook, run before the user hook
    pub chain_hook: Option<Arc<dyn ConfigHook>>,
    pub modify_babel_preset_opts: Option<Arc<dyn OptionsModifier<BabelPresetOptions>>>,
    pub modify_babel_opts: Option<Arc<dyn OptionsModifier<BabelOptions>>>,
    pub style_rules: Arc<dyn StyleRules>,
    /// Package descriptor lookup used by the dependency matcher
    pub descriptors: Arc<dyn DescriptorSource>,
}

impl InvocationContext {
    /// Client-rendered build with no entries, hooks or readiness wait
    pub fn new(
        cwd: impl Into<PathBuf>,
        environment: Environment,
        backend: Arc<dyn BundlerBackend>,
    ) -> Self {
        Self {
            cwd: cwd.into(),
            variant: BuildVariant::Csr,
            environment,
            entries: IndexMap::new(),
            hot: false,
            port: None,
            public_dir: None,
            backend,
            readiness: Readiness::ready(),
            chain_hook: None,
            modify_babel_preset_opts: None,
            modify_babel_opts: None,
            style_rules: Arc::new(BasicStyleRules),
            descriptors: Arc::new(NativeFs::new()),
        }
    }

    pub fn variant(mut self, variant: BuildVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn entry(mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.entries.insert(name.into(), path.into());
        self
    }

    pub fn hot(mut self, hot: bool) -> Self {
        self.hot = hot;
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Copy this directory into the output. The caller checks that it exists.
    pub fn public_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.public_dir = Some(dir.into());
        self
    }

    pub fn readiness(mut self, readiness: Readiness) -> Self {
        self.readiness = readiness;
        self
    }

    pub fn chain_hook(mut self, hook: Arc<dyn ConfigHook>) -> Self {
        self.chain_hook = Some(hook);
        self
    }

    pub fn modify_babel_preset_opts(
        mut self,
        modifier: Arc<dyn OptionsModifier<BabelPresetOptions>>,
    ) -> Self {
        self.modify_babel_preset_opts = Some(modifier);
        self
    }

    pub fn modify_babel_opts(mut self, modifier: Arc<dyn OptionsModifier<BabelOptions>>) -> Self {
        self.modify_babel_opts = Some(modifier);
        self
    }

    pub fn style_rules(mut self, style_rules: Arc<dyn StyleRules>) -> Self {
        self.style_rules = style_rules;
        self
    }

    pub fn descriptors(mut self, descriptors: Arc<dyn DescriptorSource>) -> Self {
        self.descriptors = descriptors;
        self
    }
}

impl fmt::Debug for InvocationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvocationContext")
            .field("cwd", &self.cwd)
            .field("variant", &self.variant)
            .field("environment", &self.environment)
            .field("entries", &self.entries)
            .field("hot", &self.hot)
            .field("port", &self.port)
            .field("public_dir", &self.public_dir)
            .field("backend", &self.backend)
            .field("chain_hook", &self.chain_hook.is_some())
            .finish_non_exhaustive()
    }
}

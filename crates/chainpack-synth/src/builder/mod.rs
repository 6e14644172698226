//! The staged, mutable bundler configuration.
//!
//! Every synthesis stage and hook receives `&mut ConfigBuilder`. Rules and
//! plugins keep their append order and are addressable by name, so a later
//! stage can reach back and adjust what an earlier one added.

mod options;
mod plugin;
mod rule;

pub use options::{Mode, Optimization, Output, Performance, Resolve};
pub use plugin::PluginSpec;
pub use rule::{Condition, DEPENDENCY_ROOT, Rule, UseEntry, pattern};

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::path::PathBuf;

use crate::{Result, SynthError};

/// Mutable configuration accumulated by the synthesis stages.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    pub mode: Mode,
    /// Base directory for resolving entries and loaders
    pub context: PathBuf,
    /// Backend target environment (`web`, `node`)
    pub target: Option<String>,
    /// Source map style; `None` disables source maps
    pub devtool: Option<String>,
    /// Entry name -> ordered source modules
    pub entries: IndexMap<String, Vec<String>>,
    pub output: Output,
    pub resolve: Resolve,
    pub optimization: Optimization,
    pub performance: Option<Performance>,
    pub externals: Option<Value>,
    /// Node.js global and core-module shims (legacy backends)
    pub node: Option<IndexMap<String, Value>>,
    /// Record per-module build timings
    pub profile: bool,
    rules: Vec<Rule>,
    plugins: Vec<PluginSpec>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a source module to an entry point, creating it if needed
    pub fn add_entry(&mut self, name: impl Into<String>, source: impl Into<String>) -> &mut Self {
        self.entries
            .entry(name.into())
            .or_default()
            .push(source.into());
        self
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.name == name)
    }

    pub fn rule_mut(&mut self, name: &str) -> Option<&mut Rule> {
        self.rules.iter_mut().find(|r| r.name == name)
    }

    /// Append a rule.
    ///
    /// A rule with the same name is replaced in place and keeps its position.
    pub fn add_rule(&mut self, rule: Rule) -> &mut Self {
        match self.rules.iter_mut().find(|r| r.name == rule.name) {
            Some(existing) => *existing = rule,
            None => self.rules.push(rule),
        }
        self
    }

    pub fn remove_rule(&mut self, name: &str) -> Option<Rule> {
        let index = self.rules.iter().position(|r| r.name == name)?;
        Some(self.rules.remove(index))
    }

    pub fn plugins(&self) -> &[PluginSpec] {
        &self.plugins
    }

    pub fn plugin(&self, name: &str) -> Option<&PluginSpec> {
        self.plugins.iter().find(|p| p.name == name)
    }

    pub fn plugin_mut(&mut self, name: &str) -> Option<&mut PluginSpec> {
        self.plugins.iter_mut().find(|p| p.name == name)
    }

    pub fn has_plugin(&self, name: &str) -> bool {
        self.plugin(name).is_some()
    }

    /// Append a plugin.
    ///
    /// A plugin with the same name is replaced in place and keeps its position.
    pub fn set_plugin(&mut self, plugin: PluginSpec) -> &mut Self {
        match self.plugins.iter_mut().find(|p| p.name == plugin.name) {
            Some(existing) => *existing = plugin,
            None => self.plugins.push(plugin),
        }
        self
    }

    pub fn remove_plugin(&mut self, name: &str) -> Option<PluginSpec> {
        let index = self.plugins.iter().position(|p| p.name == name)?;
        Some(self.plugins.remove(index))
    }

    /// Materialize the plain configuration value.
    ///
    /// # Errors
    ///
    /// [`SynthError::InvalidConfig`] when no entry point was declared or an
    /// entry point has no source modules.
    pub fn to_config(&self) -> Result<BundlerConfig> {
        if self.entries.is_empty() {
            return Err(SynthError::InvalidConfig(
                "at least one entry point is required".to_string(),
            ));
        }
        if let Some((name, _)) = self.entries.iter().find(|(_, sources)| sources.is_empty()) {
            return Err(SynthError::InvalidConfig(format!(
                "entry point '{name}' has no source modules"
            )));
        }

        Ok(BundlerConfig {
            mode: self.mode,
            context: self.context.clone(),
            target: self.target.clone(),
            devtool: self.devtool.clone(),
            entry: self.entries.clone(),
            output: self.output.clone(),
            resolve: self.resolve.clone(),
            module: ModuleConfig {
                rules: self.rules.clone(),
            },
            plugins: self.plugins.clone(),
            optimization: self.optimization.clone(),
            performance: self.performance,
            externals: self.externals.clone(),
            node: self.node.clone(),
            profile: self.profile,
        })
    }
}

/// Module rule list
#[derive(Debug, Clone, Serialize)]
pub struct ModuleConfig {
    pub rules: Vec<Rule>,
}

/// Concrete configuration handed to the bundler backend.
///
/// Embedders evaluate rules in process through [`Rule::matches`]. The JSON
/// form is for inspection: path and pattern conditions serialize the way
/// the backend accepts them, but a [`Condition::Dependency`] predicate has
/// no JSON equivalent and serializes as a descriptive
/// `{"packages": "<policy>"}` object that the backend schema rejects.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BundlerConfig {
    pub mode: Mode,
    pub context: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(serialize_with = "serialize_devtool")]
    pub devtool: Option<String>,
    pub entry: IndexMap<String, Vec<String>>,
    pub output: Output,
    pub resolve: Resolve,
    pub module: ModuleConfig,
    pub plugins: Vec<PluginSpec>,
    pub optimization: Optimization,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performance: Option<Performance>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub externals: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node: Option<IndexMap<String, Value>>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub profile: bool,
}

fn serialize_devtool<S: Serializer>(devtool: &Option<String>, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    match devtool {
        Some(name) => serializer.serialize_str(name),
        None => serializer.serialize_bool(false),
    }
}

impl BundlerConfig {
    pub fn plugin(&self, name: &str) -> Option<&PluginSpec> {
        self.plugins.iter().find(|p| p.name == name)
    }

    pub fn has_plugin(&self, name: &str) -> bool {
        self.plugin(name).is_some()
    }

    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.module.rules.iter().find(|r| r.name == name)
    }

    /// Rule names in evaluation order
    pub fn rule_names(&self) -> Vec<&str> {
        self.module.rules.iter().map(|r| r.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plugins_keep_position_when_replaced() {
        let mut builder = ConfigBuilder::new();
        builder
            .set_plugin(PluginSpec::new("define", "DefinePlugin").arg(json!({ "A": "1" })))
            .set_plugin(PluginSpec::new("copy", "CopyPlugin"))
            .set_plugin(PluginSpec::new("define", "DefinePlugin").arg(json!({ "A": "2" })));

        let names: Vec<_> = builder.plugins().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["define", "copy"]);
        assert_eq!(builder.plugin("define").unwrap().options().unwrap()["A"], "2");
    }

    #[test]
    fn rules_are_addressable_by_name() {
        let mut builder = ConfigBuilder::new();
        builder
            .add_rule(Rule::new("js", pattern(r"\.js$").unwrap()))
            .add_rule(Rule::new("svg", pattern(r"\.svg$").unwrap()));

        builder
            .rule_mut("js")
            .unwrap()
            .uses
            .push(UseEntry::new("babel-loader", "babel-loader"));
        assert_eq!(builder.rule("js").unwrap().uses.len(), 1);
        assert!(builder.remove_rule("svg").is_some());
        assert!(builder.rule("svg").is_none());
    }

    #[test]
    fn to_config_requires_entries() {
        let builder = ConfigBuilder::new();
        assert!(matches!(builder.to_config(), Err(SynthError::InvalidConfig(_))));
    }

    #[test]
    fn disabled_devtool_serializes_as_false() {
        let mut builder = ConfigBuilder::new();
        builder.add_entry("main", "./src/index");
        let value = serde_json::to_value(builder.to_config().unwrap()).unwrap();
        assert_eq!(value["devtool"], json!(false));
        assert_eq!(value["entry"]["main"], json!(["./src/index"]));
        assert!(value.get("profile").is_none());
    }
}

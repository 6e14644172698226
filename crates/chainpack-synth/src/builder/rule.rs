//! Module rules: a file predicate bound to an ordered loader chain.

use chainpack_matcher::PackageMatcher;
use regex::Regex;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::path::{Component, Path, PathBuf};

/// Directory name of installed dependencies
pub const DEPENDENCY_ROOT: &str = "node_modules";

/// A file predicate used in `include`/`exclude` lists.
#[derive(Debug, Clone)]
pub enum Condition {
    /// Files under this directory
    Path(PathBuf),
    /// Files whose path matches the pattern
    Pattern(Regex),
    /// Dependency files accepted by a package matcher.
    ///
    /// Only evaluable in process; its JSON form names the matcher's policy.
    Dependency(PackageMatcher),
}

impl Condition {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Condition::Path(path.into())
    }

    /// Files inside any dependency root
    pub fn dependency_root() -> crate::Result<Self> {
        pattern(r"[\\/]node_modules[\\/]").map(Condition::Pattern)
    }

    pub fn matches(&self, path: &Path) -> bool {
        match self {
            Condition::Path(prefix) => path.starts_with(prefix),
            Condition::Pattern(pattern) => pattern.is_match(&path.to_string_lossy()),
            Condition::Dependency(matcher) => in_dependency_root(path) && matcher.matches(path),
        }
    }
}

impl Serialize for Condition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Condition::Path(path) => serializer.collect_str(&path.display()),
            Condition::Pattern(pattern) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("test", pattern.as_str())?;
                map.end()
            }
            Condition::Dependency(matcher) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("packages", matcher.rule_set().kind())?;
                map.end()
            }
        }
    }
}

/// Compile a rule pattern
pub fn pattern(source: &str) -> crate::Result<Regex> {
    Regex::new(source)
        .map_err(|e| crate::SynthError::InvalidConfig(format!("invalid rule pattern '{source}': {e}")))
}

fn in_dependency_root(path: &Path) -> bool {
    path.components()
        .any(|c| matches!(c, Component::Normal(name) if name == DEPENDENCY_ROOT))
}

/// One loader in a rule's chain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UseEntry {
    /// Name the loader is addressed by
    #[serde(skip)]
    pub name: String,
    pub loader: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
}

impl UseEntry {
    pub fn new(name: impl Into<String>, loader: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            loader: loader.into(),
            options: None,
        }
    }

    pub fn options(mut self, options: Value) -> Self {
        self.options = Some(options);
        self
    }
}

/// A module rule.
///
/// A file is handled by the rule when it matches `test`, at least one
/// `include` condition (if any are given), and no `exclude` condition.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    #[serde(skip)]
    pub name: String,
    #[serde(serialize_with = "serialize_regex")]
    pub test: Regex,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<Condition>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<Condition>,
    #[serde(rename = "use")]
    pub uses: Vec<UseEntry>,
}

fn serialize_regex<S: Serializer>(regex: &Regex, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(regex.as_str())
}

impl Rule {
    pub fn new(name: impl Into<String>, test: Regex) -> Self {
        Self {
            name: name.into(),
            test,
            include: Vec::new(),
            exclude: Vec::new(),
            uses: Vec::new(),
        }
    }

    pub fn include(mut self, condition: Condition) -> Self {
        self.include.push(condition);
        self
    }

    pub fn exclude(mut self, condition: Condition) -> Self {
        self.exclude.push(condition);
        self
    }

    pub fn with_use(mut self, entry: UseEntry) -> Self {
        self.uses.push(entry);
        self
    }

    /// Loader entry by name
    pub fn use_entry(&self, name: &str) -> Option<&UseEntry> {
        self.uses.iter().find(|u| u.name == name)
    }

    pub fn use_entry_mut(&mut self, name: &str) -> Option<&mut UseEntry> {
        self.uses.iter_mut().find(|u| u.name == name)
    }

    /// Evaluate the rule against a file the way the backend does.
    pub fn matches(&self, path: &Path) -> bool {
        self.test.is_match(&path.to_string_lossy())
            && (self.include.is_empty() || self.include.iter().any(|c| c.matches(path)))
            && !self.exclude.iter().any(|c| c.matches(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn js() -> Regex {
        Regex::new(r"\.(js|mjs|jsx|ts|tsx)$").unwrap()
    }

    #[test]
    fn include_and_exclude_are_honored() {
        let rule = Rule::new("js", js())
            .include(Condition::path("/app"))
            .exclude(Condition::dependency_root().unwrap());

        assert!(rule.matches(Path::new("/app/src/index.tsx")));
        assert!(!rule.matches(Path::new("/app/node_modules/react/index.js")));
        assert!(!rule.matches(Path::new("/other/index.js")));
        assert!(!rule.matches(Path::new("/app/src/index.css")));
    }

    #[test]
    fn path_condition_respects_component_boundaries() {
        let condition = Condition::path("/app");
        assert!(condition.matches(Path::new("/app/a.js")));
        assert!(!condition.matches(Path::new("/application/a.js")));
    }

    #[test]
    fn serializes_like_a_backend_rule() {
        let rule = Rule::new("js", js())
            .include(Condition::path("/app"))
            .with_use(UseEntry::new("babel-loader", "babel-loader").options(serde_json::json!({ "babelrc": false })));

        let value = serde_json::to_value(&rule).unwrap();
        assert_eq!(value["test"], r"\.(js|mjs|jsx|ts|tsx)$");
        assert_eq!(value["include"][0], "/app");
        assert_eq!(value["use"][0]["loader"], "babel-loader");
        assert!(value.get("exclude").is_none());
        assert!(value.get("name").is_none());
    }

    #[test]
    fn dependency_condition_serializes_its_policy() {
        use chainpack_config::NodeModulesTransform;
        use chainpack_matcher::{BoundaryResolver, MemoryFs, PackageMatchRuleSet};
        use std::sync::Arc;

        let resolver = Arc::new(BoundaryResolver::new(Arc::new(MemoryFs::new())));
        let rule_set = PackageMatchRuleSet::from_policy(&NodeModulesTransform::all()).unwrap();
        let condition = Condition::Dependency(PackageMatcher::new(rule_set, resolver));

        let value = serde_json::to_value(&condition).unwrap();
        assert_eq!(value, serde_json::json!({ "packages": "blanket" }));
    }
}

use serde::{Deserialize, Serialize};

/// Dependency transpilation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformKind {
    /// Transpile every dependency except the exclusion set
    #[default]
    All,
    /// Transpile only dependencies in the inclusion set
    None,
}

/// Policy for transpiling modules under `node_modules`.
///
/// Entries are package specifiers: `name`, `@scope/name`, optionally suffixed
/// with a version constraint (`lodash@4.17.0`, `@scope/name@^2`).
///
/// ```toml
/// [node_modules_transform]
/// type = "none"
/// include = ["query-string@6"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeModulesTransform {
    #[serde(rename = "type", default)]
    pub kind: TransformKind,

    /// Packages never transpiled (merged with the built-in exclusion table)
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Packages always transpiled (merged with the built-in syntax table)
    #[serde(default)]
    pub include: Vec<String>,
}

impl NodeModulesTransform {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn none() -> Self {
        Self {
            kind: TransformKind::None,
            ..Self::default()
        }
    }

    pub fn exclude(mut self, specifier: impl Into<String>) -> Self {
        self.exclude.push(specifier.into());
        self
    }

    pub fn include(mut self, specifier: impl Into<String>) -> Self {
        self.include.push(specifier.into());
        self
    }
}

use serde::{Deserialize, Serialize};

/// Source map setting.
///
/// Accepts `false` to disable source maps entirely, or the name of a
/// backend devtool (e.g. `"source-map"`). `true` keeps the environment default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Devtool {
    Toggle(bool),
    Named(String),
}

impl Devtool {
    /// Whether source maps were explicitly turned off.
    pub fn is_disabled(&self) -> bool {
        matches!(self, Devtool::Toggle(false))
    }

    /// Explicit devtool name, if one was given.
    pub fn name(&self) -> Option<&str> {
        match self {
            Devtool::Named(name) => Some(name),
            Devtool::Toggle(_) => None,
        }
    }
}

/// Entry of the `copy` list.
///
/// A bare string copies a project directory into the output root; the
/// object form copies `from` (project-relative) into `to` (output-relative).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CopyEntry {
    Dir(String),
    Pattern { from: String, to: String },
}

impl CopyEntry {
    /// Project-relative source of the copy operation.
    pub fn source(&self) -> &str {
        match self {
            CopyEntry::Dir(from) => from,
            CopyEntry::Pattern { from, .. } => from,
        }
    }
}

/// Settings forwarded to the style-sheet rule sub-builder
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CssOptions {
    /// Treat `*.module.css` (and friends) as CSS modules
    #[serde(default)]
    pub modules: bool,

    /// Emit CSS source maps
    #[serde(default)]
    pub source_map: bool,
}

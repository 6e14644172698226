use serde::Serialize;
use serde_json::Value;

/// A bundler plugin instantiation.
///
/// `plugin` names the constructor the backend instantiates; `args` are the
/// constructor arguments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PluginSpec {
    /// Name the plugin is addressed by inside the builder
    pub name: String,
    pub plugin: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<Value>,
}

impl PluginSpec {
    pub fn new(name: impl Into<String>, plugin: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            plugin: plugin.into(),
            args: Vec::new(),
        }
    }

    /// Append a constructor argument
    pub fn arg(mut self, arg: Value) -> Self {
        self.args.push(arg);
        self
    }

    /// First constructor argument, which carries the options by convention
    pub fn options(&self) -> Option<&Value> {
        self.args.first()
    }

    pub fn options_mut(&mut self) -> Option<&mut Value> {
        self.args.first_mut()
    }
}

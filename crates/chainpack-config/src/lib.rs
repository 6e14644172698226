pub mod config;
pub mod discovery;
pub mod error;
pub mod options;
pub mod project;
pub mod validation;

// Re-export main types
pub use config::*;
pub use error::*;
pub use options::{ProfileLevel, SpeedMeasureOutput, SynthesisOptions, APP_ENV_PREFIX};
pub use project::*;

// Re-export discovery and validation
pub use discovery::{discover, discover_with_profile, ConfigDiscovery};
pub use validation::{validate_fs, validate_schema, ConfigValidator, FsValidator, SchemaValidator};

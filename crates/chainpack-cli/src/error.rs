//! Error handling for the chainpack CLI.
//!
//! Library errors convert into [`CliError`] through `#[from]`; at the edge
//! [`cli_error_to_miette`] turns them into diagnostics, reusing the codes and
//! help text the synthesis crate attaches.

use chainpack_config::ConfigError;
use chainpack_synth::SynthError;
use miette::Report;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Loading or validating the project configuration failed
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Synthesis failed
    #[error("Synthesis error: {0}")]
    Synth(#[from] SynthError),

    /// Invalid command-line arguments or options
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Working directory does not exist
    #[error("Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    /// I/O errors from file system operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// Convert CliError to miette Report
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Synth(e) => Report::new(e),
        CliError::Config(e) => Report::new(SynthError::Config(e)),
        CliError::DirectoryNotFound(path) => miette::miette!(
            help = "Pass an existing project directory with --cwd",
            "Directory not found: {}",
            path.display()
        ),
        other => miette::miette!("{}", other),
    }
}

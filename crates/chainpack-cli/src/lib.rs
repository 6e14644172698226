//! chainpack CLI.
//!
//! The binary is a thin collaborator around the synthesis engine: it reads
//! the project configuration and the process environment once, invokes
//! [`chainpack_synth::synthesize`] and prints the result.
//!
//! - [`cli`] - argument definitions
//! - [`commands`] - `print` and `check`
//! - [`error`] - error types and miette conversion
//! - [`logger`] - tracing subscriber setup
//! - [`ui`] - status messages on stderr

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{CliError, Result};

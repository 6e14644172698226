//! Command-line interface definition for chainpack.
//!
//! # Command Structure
//!
//! - `chainpack print` - synthesize a configuration and print it as JSON
//! - `chainpack check` - validate the project configuration

mod commands;
pub mod enums;
mod validation;

use clap::Parser;

pub use commands::{CheckArgs, Command, PrintArgs, ProjectArgs, DEFAULT_BACKEND_VERSION};
pub use enums::*;
pub use validation::parse_entry;

/// chainpack - bundler configuration synthesis
#[derive(Parser, Debug)]
#[command(
    name = "chainpack",
    version,
    about = "Synthesize bundler configurations from a declarative project config",
    long_about = "chainpack turns a chainpack.toml (or the \"chainpack\" field of package.json)\n\
                  into a complete bundler configuration for one build: development or production,\n\
                  client- or server-rendered."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    ///
    /// Shows every synthesis stage, including rule-set construction and
    /// hook execution.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

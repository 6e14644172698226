use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::cli::enums::*;
use crate::cli::validation::parse_entry;

/// Backend version assumed when `--backend-version` is not given
pub const DEFAULT_BACKEND_VERSION: &str = "5.0.0";

/// Available chainpack subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Synthesize the bundler configuration and print it as JSON
    ///
    /// Environment toggles (COMPRESS, PROGRESS, SPEED_MEASURE, ...) are read
    /// once from the process environment.
    Print(PrintArgs),

    /// Validate the project configuration without synthesizing
    ///
    /// Runs the schema checks and verifies that copy sources and absolute
    /// transpile includes exist on disk.
    Check(CheckArgs),
}

/// Where to find the project configuration
#[derive(Args, Debug, Clone, Default)]
pub struct ProjectArgs {
    /// Configuration file (chainpack.toml, *.json or package.json)
    ///
    /// Without this flag, chainpack.toml and then the "chainpack" field of
    /// package.json are searched in the working directory.
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Named profile merged over the base configuration
    #[arg(short = 'p', long, value_name = "NAME")]
    pub profile: Option<String>,

    /// Working directory of the project
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,
}

/// Arguments for the print command
#[derive(Args, Debug)]
pub struct PrintArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Build environment
    #[arg(short = 'e', long, value_enum, default_value = "development")]
    pub env: BuildEnv,

    /// Client- or server-rendered build
    #[arg(long, value_enum, default_value = "csr")]
    pub variant: Variant,

    /// Entry point, repeatable
    ///
    /// Examples:
    ///   --entry main=src/index.ts
    ///   --entry main=src/index.ts --entry admin=src/admin.ts
    #[arg(long = "entry", value_name = "NAME=PATH", value_parser = parse_entry, required = true)]
    pub entries: Vec<(String, PathBuf)>,

    /// Enable hot module replacement (development client builds)
    #[arg(long)]
    pub hot: bool,

    /// Dev server port forwarded to the hot-reload client
    #[arg(long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Version of the bundler backend consuming the configuration
    #[arg(long, value_name = "VERSION", default_value = DEFAULT_BACKEND_VERSION)]
    pub backend_version: String,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
}

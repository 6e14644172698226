//! Command implementations.

pub mod check;
pub mod print;

pub use check::execute as check_execute;
pub use print::execute as print_execute;

use chainpack_config::{ConfigDiscovery, ConfigError, ProjectConfig};
use std::path::{Path, PathBuf};

use crate::cli::ProjectArgs;
use crate::error::{CliError, Result};

/// Resolve the project directory, absolute.
pub(crate) fn project_dir(args: &ProjectArgs) -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    let dir = match &args.cwd {
        Some(dir) if dir.is_absolute() => dir.clone(),
        Some(dir) => cwd.join(dir),
        None => cwd,
    };
    if !dir.is_dir() {
        return Err(CliError::DirectoryNotFound(dir));
    }
    Ok(dir)
}

/// Load the project configuration.
///
/// Returns the configuration and whether it came from a file. Without an
/// explicit `--config` and with no discoverable file, the defaults are used
/// unless a profile was requested.
pub(crate) fn load_project(args: &ProjectArgs, dir: &Path) -> Result<(ProjectConfig, bool)> {
    let discovery = ConfigDiscovery::new(dir);

    let loaded = match &args.config {
        Some(path) => {
            let path = if path.is_absolute() {
                path.clone()
            } else {
                dir.join(path)
            };
            discovery.load_from(&path)
        }
        None => discovery.load(),
    };

    match loaded {
        Ok(config) => {
            let config = config.materialize_profile(args.profile.as_deref())?;
            Ok((config, true))
        }
        Err(ConfigError::NotFound) if args.profile.is_none() => {
            tracing::debug!(dir = %dir.display(), "no project configuration found, using defaults");
            Ok((ProjectConfig::default(), false))
        }
        Err(err) => Err(err.into()),
    }
}

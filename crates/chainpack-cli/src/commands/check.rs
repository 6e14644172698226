//! Check command implementation.

use chainpack_config::validate_fs;

use crate::cli::CheckArgs;
use crate::commands::{load_project, project_dir};
use crate::error::Result;
use crate::ui;

/// Execute the check command.
///
/// # Validation Steps
///
/// 1. Load the configuration (and profile, if given)
/// 2. Schema checks
/// 3. Filesystem checks for copy sources and absolute transpile includes
///
/// # Errors
///
/// Returns the first validation failure.
pub async fn execute(args: CheckArgs) -> Result<()> {
    let dir = project_dir(&args.project)?;
    ui::info("Checking configuration...");

    let (config, from_file) = load_project(&args.project, &dir)?;
    if !from_file {
        ui::warning("No chainpack configuration found, using defaults");
    }

    validate_fs(&config, &dir)?;

    ui::success("Configuration is valid!");
    Ok(())
}

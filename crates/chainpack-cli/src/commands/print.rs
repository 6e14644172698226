//! Print command implementation.

use chainpack_config::SynthesisOptions;
use chainpack_synth::plugins::PUBLIC_DIR;
use chainpack_synth::{InvocationContext, Project, StaticBackend, synthesize};
use std::io::Write;
use std::sync::Arc;

use crate::cli::PrintArgs;
use crate::commands::{load_project, project_dir};
use crate::error::{CliError, Result};

/// Backend name reported to hooks and logs
const BACKEND_NAME: &str = "webpack";

/// Execute the print command.
///
/// Loads the project configuration, resolves the environment toggles,
/// synthesizes one build's configuration and writes it to stdout as JSON.
///
/// # Errors
///
/// Returns errors for unreadable or invalid configuration, an unparsable
/// backend version, and any synthesis failure.
pub async fn execute(args: PrintArgs) -> Result<()> {
    let dir = project_dir(&args.project)?;
    let (config, from_file) = load_project(&args.project, &dir)?;
    if !from_file {
        tracing::info!("no chainpack configuration found, using defaults");
    }

    let backend = StaticBackend::parse(BACKEND_NAME, &args.backend_version)
        .map_err(|_| CliError::InvalidArgument(format!(
            "--backend-version must be a version such as 5.0.0, got '{}'",
            args.backend_version
        )))?;

    let mut ctx = InvocationContext::new(&dir, args.env.into(), Arc::new(backend))
        .variant(args.variant.into())
        .hot(args.hot);
    if let Some(port) = args.port {
        ctx = ctx.port(port);
    }
    let public = dir.join(PUBLIC_DIR);
    if public.is_dir() {
        ctx = ctx.public_dir(public);
    }
    for (name, path) in args.entries {
        ctx = ctx.entry(name, path);
    }

    let options = SynthesisOptions::from_env()?;
    tracing::debug!(?options, "resolved synthesis options");

    let final_config = synthesize(&Project::new(config), ctx, &options).await?;

    let json = if args.pretty {
        serde_json::to_string_pretty(&final_config)?
    } else {
        serde_json::to_string(&final_config)?
    };

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", json)?;
    Ok(())
}

//! Logging setup for the chainpack CLI.
//!
//! Logs go to stderr so stdout carries only the printed configuration.
//!
//! The logging level is determined in this order:
//! 1. `--verbose`: debug for chainpack crates
//! 2. `--quiet`: errors only
//! 3. `RUST_LOG`
//! 4. Default: info for chainpack crates

use chainpack_synth::logging::{LogLevel, env_filter_or, init_with_filter};
use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber with the specified options.
///
/// Call once at the start of the program.
///
/// ```rust,no_run
/// use chainpack_cli::logger::init_logger;
///
/// init_logger(true, false, false);
/// ```
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    init_logger_with_filter(filter_for(verbose, quiet), no_color);
}

/// Initialize logger with a custom environment filter.
pub fn init_logger_with_filter(filter: EnvFilter, no_color: bool) {
    init_with_filter(filter, !no_color && should_use_colors());
}

fn filter_for(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        LogLevel::Debug.filter()
    } else if quiet {
        LogLevel::Error.filter()
    } else {
        env_filter_or(LogLevel::Info)
    }
}

/// Check if colored output should be enabled.
///
/// `NO_COLOR` disables colors, `FORCE_COLOR` forces them, otherwise the
/// terminal's capabilities decide.
pub fn should_use_colors() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }

    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }

    console::Term::stderr().features().colors_supported()
}

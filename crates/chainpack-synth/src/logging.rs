//! Subscriber setup for binaries embedding chainpack.
//!
//! Only available with the `logging` feature. Library consumers get the
//! synthesis events as plain tracing events and install their own subscriber.
//!
//! Filters built here scope the level to the chainpack crates, so a debug
//! run shows per-stage synthesis details without the noise of every
//! dependency. Output always goes to stderr: a synthesized configuration is
//! usually printed on stdout.

use std::sync::Once;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: Once = Once::new();

/// Crates emitting synthesis events
pub const CHAINPACK_CRATES: &[&str] = &[
    "chainpack",
    "chainpack_config",
    "chainpack_matcher",
    "chainpack_synth",
    "chainpack_cli",
];

/// Verbosity of synthesis output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    Silent,
    Error,
    /// Errors plus hook overrides of optimization settings
    Warn,
    #[default]
    Info,
    /// Per-stage details
    Debug,
    /// Every package-match decision
    Trace,
}

impl LogLevel {
    fn as_level_filter(&self) -> LevelFilter {
        match self {
            LogLevel::Silent => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }

    /// Filter directives for this level.
    ///
    /// `Silent` and `Error` apply to every crate; higher levels only raise
    /// the chainpack crates.
    pub fn directives(&self) -> String {
        match self {
            LogLevel::Silent | LogLevel::Error => self.to_string(),
            _ => CHAINPACK_CRATES
                .iter()
                .map(|krate| format!("{krate}={self}"))
                .collect::<Vec<_>>()
                .join(","),
        }
    }

    pub fn filter(&self) -> EnvFilter {
        EnvFilter::new(self.directives())
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" | "off" => Ok(LogLevel::Silent),
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!("Invalid log level: {}", other)),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_level_filter())
    }
}

/// `RUST_LOG` when it is set, otherwise the chainpack filter for `fallback`.
pub fn env_filter_or(fallback: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.filter())
}

/// Install a global subscriber at `level`.
///
/// Only the first initialization in a process takes effect.
///
/// ```rust,no_run
/// use chainpack_synth::logging::{init_logging, LogLevel};
///
/// init_logging(LogLevel::Debug);
/// ```
pub fn init_logging(level: LogLevel) {
    init_with_filter(level.filter(), true);
}

/// Install a global subscriber configured from `RUST_LOG`, defaulting to info.
pub fn init_logging_from_env() {
    init_with_filter(env_filter_or(LogLevel::Info), true);
}

/// Install a global stderr subscriber with a custom filter.
///
/// `ansi` enables colored level names. A subscriber installed by someone
/// else is left in place.
pub fn init_with_filter(filter: EnvFilter, ansi: bool) {
    INIT.call_once(|| {
        let layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_level(true)
            .with_ansi(ansi)
            .without_time()
            .compact();

        if tracing_subscriber::registry().with(filter).with(layer).try_init().is_err() {
            tracing::debug!("global subscriber already installed");
        }
    });
}

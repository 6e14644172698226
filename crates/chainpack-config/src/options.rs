//! Process-wide build toggles.
//!
//! The synthesis engine never reads the environment itself. The CLI resolves
//! these toggles once with [`SynthesisOptions::from_env`] and passes the
//! struct into the entry point.

use figment::providers::Env;
use figment::Figment;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

use crate::error::{ConfigError, Result};

/// Variables with this prefix are exposed to client code through `process.env`
pub const APP_ENV_PREFIX: &str = "CHAINPACK_APP_";

/// Toggle variables read by [`SynthesisOptions::from_env`]
const ENV_TOGGLES: [&str; 7] = [
    "PROGRESS",
    "FRIENDLY_ERROR",
    "WEBPACK_PROFILE",
    "COMPRESS",
    "TERSER_CACHE",
    "SPEED_MEASURE",
    "APP_ROOT",
];

/// Statistics preset used when profiling is enabled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileLevel {
    /// Profiling without an explicit stats preset
    #[default]
    Default,
    Verbose,
    Normal,
    Minimal,
}

impl ProfileLevel {
    fn from_toggle(value: &str) -> Self {
        match value {
            "verbose" => ProfileLevel::Verbose,
            "normal" => ProfileLevel::Normal,
            "minimal" => ProfileLevel::Minimal,
            _ => ProfileLevel::Default,
        }
    }

    /// Stats preset name, if one was selected
    pub fn preset(&self) -> Option<&'static str> {
        match self {
            ProfileLevel::Default => None,
            ProfileLevel::Verbose => Some("verbose"),
            ProfileLevel::Normal => Some("normal"),
            ProfileLevel::Minimal => Some("minimal"),
        }
    }
}

/// Where build-time measurements are reported
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedMeasureOutput {
    /// Human-readable report on the console
    Console,
    /// JSON report written to the given file
    Json(PathBuf),
}

/// Explicit replacement for process-wide environment reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesisOptions {
    /// Progress reporting plugin (`PROGRESS=none` disables)
    pub progress: bool,
    /// Friendly build-error reporting (`FRIENDLY_ERROR=none` disables)
    pub friendly_errors: bool,
    /// Profiling and stats emission (`WEBPACK_PROFILE`)
    pub profile: Option<ProfileLevel>,
    /// Minification (`COMPRESS=none` disables)
    pub compress: bool,
    /// Minifier result caching (`TERSER_CACHE=none` disables)
    pub minifier_cache: bool,
    /// Build speed measurement (`SPEED_MEASURE`)
    pub speed_measure: Option<SpeedMeasureOutput>,
    /// Treat the process working directory as a first-party root (`APP_ROOT`)
    pub app_root: bool,
    /// Working directory of the invoking process
    pub process_cwd: PathBuf,
    /// `CHAINPACK_APP_*` variables forwarded into `process.env`
    pub app_env: IndexMap<String, String>,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            progress: true,
            friendly_errors: true,
            profile: None,
            compress: true,
            minifier_cache: true,
            speed_measure: None,
            app_root: false,
            process_cwd: PathBuf::from("."),
            app_env: IndexMap::new(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawToggles {
    progress: Option<Value>,
    friendly_error: Option<Value>,
    webpack_profile: Option<Value>,
    compress: Option<Value>,
    terser_cache: Option<Value>,
    speed_measure: Option<Value>,
    app_root: Option<Value>,
}

fn toggle_text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(text) => Some(text),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn is_none_toggle(value: &Option<String>) -> bool {
    value.as_deref() == Some("none")
}

impl SynthesisOptions {
    /// Resolve toggles from the process environment.
    pub fn from_env() -> Result<Self> {
        let process_cwd = std::env::current_dir()?;
        Self::from_figment(
            Figment::from(Env::raw().only(&ENV_TOGGLES)),
            Figment::from(
                Env::raw()
                    .lowercase(false)
                    .filter(|key| key.as_str().starts_with(APP_ENV_PREFIX)),
            ),
            process_cwd,
        )
    }

    fn from_figment(toggles: Figment, app_env: Figment, process_cwd: PathBuf) -> Result<Self> {
        let raw: RawToggles = toggles
            .extract()
            .map_err(|e| ConfigError::Environment(e.to_string()))?;
        let app_env: IndexMap<String, Value> = app_env
            .extract()
            .map_err(|e| ConfigError::Environment(e.to_string()))?;

        let progress = toggle_text(raw.progress);
        let friendly = toggle_text(raw.friendly_error);
        let compress = toggle_text(raw.compress);
        let cache = toggle_text(raw.terser_cache);

        let speed_measure = toggle_text(raw.speed_measure)
            .filter(|value| !value.is_empty())
            .map(|value| {
                if value == "CONSOLE" {
                    SpeedMeasureOutput::Console
                } else {
                    SpeedMeasureOutput::Json(process_cwd.join("speed-measure.json"))
                }
            });

        let mut app_env: IndexMap<String, String> = app_env
            .into_iter()
            .filter_map(|(key, value)| toggle_text(Some(value)).map(|text| (key, text)))
            .collect();
        app_env.sort_keys();

        let options = Self {
            progress: !is_none_toggle(&progress),
            friendly_errors: !is_none_toggle(&friendly),
            profile: toggle_text(raw.webpack_profile)
                .filter(|value| !value.is_empty())
                .map(|value| ProfileLevel::from_toggle(&value)),
            compress: !is_none_toggle(&compress),
            minifier_cache: !is_none_toggle(&cache),
            speed_measure,
            app_root: toggle_text(raw.app_root).is_some_and(|value| !value.is_empty()),
            process_cwd,
            app_env,
        };
        tracing::debug!(?options, "resolved synthesis options");
        Ok(options)
    }
}

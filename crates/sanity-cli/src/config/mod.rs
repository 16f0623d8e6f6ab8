// crates/sanity-cli/src/config/mod.rs
// ============================================================================
// Module: Sanity Configuration
// Description: Layered configuration for the sanity harness runner.
// Purpose: Resolve binary locations, timing, and output paths.
// Dependencies: serde, toml, thiserror
// ============================================================================

//! ## Overview
//! Settings come from four layers, highest precedence first: command-line
//! overrides, environment variables, the TOML settings file, and built-in
//! defaults. `LCC_SANITY_TIMEOUT_SEC` is the exception: it raises the bounded
//! timeout to at least its value and never lowers it.
//!
//! Without any override the subject binaries are expected in `src/` two
//! levels above the runner executable, with the Qt binary in `src/qt`.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod env;
mod file;

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod resolve_tests;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use env::EnvConfig;
pub use env::SanityEnv;
pub use file::FileConfig;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use sanity_harness::Harness;
use sanity_harness::ProcessRunner;
use sanity_harness::suite::DEFAULT_POLL_INTERVAL;
use sanity_harness::suite::DEFAULT_SCOPE_PREFIX;
use thiserror::Error;

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default deadline for bounded runs.
pub const DEFAULT_BOUNDED_TIMEOUT: Duration = Duration::from_secs(10);
/// Default grace between SIGTERM and SIGKILL.
pub const DEFAULT_STOP_GRACE: Duration = Duration::from_secs(5);
/// Default observation window for data directory and log scenarios.
pub const DEFAULT_DATADIR_WINDOW: Duration = Duration::from_secs(3);
/// Default observation window for the pid file scenario.
pub const DEFAULT_PID_WINDOW: Duration = Duration::from_secs(2);
/// Qt binary subdirectory under the source directory.
const QT_SUBDIR: &str = "qt";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
    /// Invalid environment variable.
    #[error("invalid environment: {0}")]
    Env(String),
}

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// Command-line overrides; the highest-precedence layer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CliOverrides {
    /// Settings file to load.
    pub config: Option<PathBuf>,
    /// Subject binary directory.
    pub src_dir: Option<PathBuf>,
    /// Qt binary directory.
    pub qt_dir: Option<PathBuf>,
    /// Summary output directory.
    pub summary_dir: Option<PathBuf>,
}

/// Timeouts, windows, and polling used by the scenario catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Deadline for bounded runs.
    pub bounded_timeout: Duration,
    /// Grace between SIGTERM and SIGKILL.
    pub stop_grace: Duration,
    /// Observation window for data directory and log scenarios.
    pub datadir_window: Duration,
    /// Observation window for the pid file scenario.
    pub pid_window: Duration,
    /// Poll interval while observing.
    pub poll_interval: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            bounded_timeout: DEFAULT_BOUNDED_TIMEOUT,
            stop_grace: DEFAULT_STOP_GRACE,
            datadir_window: DEFAULT_DATADIR_WINDOW,
            pid_window: DEFAULT_PID_WINDOW,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Fully resolved runner configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanityConfig {
    /// Directory of the daemon, CLI, and tx binaries.
    pub src_dir: PathBuf,
    /// Directory of the Qt binary.
    pub qt_dir: PathBuf,
    /// Scenario timing.
    pub timing: Timing,
    /// Parent directory for scopes; system temp when `None`.
    pub scope_root: Option<PathBuf>,
    /// Scope name prefix.
    pub scope_prefix: String,
    /// Summary output directory; no summary when `None`.
    pub summary_dir: Option<PathBuf>,
}

impl SanityConfig {
    /// Loads every layer and resolves the effective configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the settings file or environment is
    /// invalid, or when the runner's own location cannot be determined.
    pub fn load(cli: &CliOverrides) -> Result<Self, ConfigError> {
        let env = EnvConfig::load()?;
        let file = cli.config.as_deref().map(FileConfig::load).transpose()?.unwrap_or_default();
        let exe = std::env::current_exe()
            .map_err(|err| ConfigError::Io(format!("cannot locate runner executable: {err}")))?;
        let exe_dir = exe.parent().ok_or_else(|| {
            ConfigError::Invalid("runner executable has no parent directory".to_string())
        })?;
        Ok(Self::resolve(cli, &env, file, exe_dir))
    }

    /// Merges the layers; pure so precedence can be tested directly.
    #[must_use]
    pub fn resolve(cli: &CliOverrides, env: &EnvConfig, file: FileConfig, exe_dir: &Path) -> Self {
        let FileConfig {
            binaries,
            timing,
            scope,
            summary,
        } = file;
        let src_dir = cli
            .src_dir
            .clone()
            .or_else(|| env.src_dir.clone())
            .or(binaries.src_dir)
            .unwrap_or_else(|| default_src_dir(exe_dir));
        let qt_dir = cli
            .qt_dir
            .clone()
            .or_else(|| env.qt_dir.clone())
            .or(binaries.qt_dir)
            .unwrap_or_else(|| src_dir.join(QT_SUBDIR));

        let defaults = Timing::default();
        let millis = |value: Option<u64>, default: Duration| {
            value.map_or(default, Duration::from_millis)
        };
        let bounded_timeout = millis(timing.bounded_timeout_ms, defaults.bounded_timeout);
        let timing = Timing {
            bounded_timeout: env.timeout.map_or(bounded_timeout, |floor| bounded_timeout.max(floor)),
            stop_grace: millis(timing.stop_grace_ms, defaults.stop_grace),
            datadir_window: millis(timing.datadir_window_ms, defaults.datadir_window),
            pid_window: millis(timing.pid_window_ms, defaults.pid_window),
            poll_interval: millis(timing.poll_interval_ms, defaults.poll_interval),
        };

        Self {
            src_dir,
            qt_dir,
            timing,
            scope_root: env.scope_root.clone().or(scope.root),
            scope_prefix: scope.prefix.unwrap_or_else(|| DEFAULT_SCOPE_PREFIX.to_string()),
            summary_dir: cli
                .summary_dir
                .clone()
                .or_else(|| env.summary_dir.clone())
                .or(summary.dir),
        }
    }

    /// Builds the execution harness for this configuration.
    #[must_use]
    pub fn harness(&self) -> Harness {
        let harness = Harness::new(ProcessRunner::new())
            .with_scope_prefix(self.scope_prefix.clone())
            .with_poll_interval(self.timing.poll_interval);
        match &self.scope_root {
            Some(root) => harness.with_scope_parent(root.clone()),
            None => harness,
        }
    }
}

/// Returns `<exe dir>/../../src`.
fn default_src_dir(exe_dir: &Path) -> PathBuf {
    exe_dir.join("..").join("..").join("src")
}

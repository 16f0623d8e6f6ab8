// crates/sanity-cli/src/config/file.rs
// ============================================================================
// Module: Sanity Config File
// Description: TOML settings file for the sanity harness.
// Purpose: Parse and validate optional on-disk configuration.
// Dependencies: serde, toml
// ============================================================================

//! ## Overview
//! Every section and key is optional; unknown keys are rejected so typos fail
//! loudly instead of silently falling back to defaults.
//!
//! ```toml
//! [binaries]
//! src_dir = "/opt/litecoincash/src"
//! qt_dir = "/opt/litecoincash/src/qt"
//!
//! [timing]
//! bounded_timeout_ms = 10000
//! stop_grace_ms = 5000
//! datadir_window_ms = 3000
//! pid_window_ms = 2000
//! poll_interval_ms = 100
//!
//! [scope]
//! root = "/tmp"
//! prefix = "lcc_test_"
//!
//! [summary]
//! dir = "target/sanity"
//! ```

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use super::ConfigError;

/// Upper bound on the settings file size.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 64 * 1024;

/// Parsed settings file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Subject binary locations.
    pub binaries: BinariesSection,
    /// Timeouts, windows, and polling.
    pub timing: TimingSection,
    /// Scope placement.
    pub scope: ScopeSection,
    /// Summary artifacts.
    pub summary: SummarySection,
}

/// `[binaries]` section.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BinariesSection {
    /// Directory of the daemon, CLI, and tx binaries.
    pub src_dir: Option<PathBuf>,
    /// Directory of the Qt binary.
    pub qt_dir: Option<PathBuf>,
}

/// `[timing]` section; all values in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimingSection {
    /// Deadline for bounded runs.
    pub bounded_timeout_ms: Option<u64>,
    /// Grace between SIGTERM and SIGKILL.
    pub stop_grace_ms: Option<u64>,
    /// Observation window for data directory and log scenarios.
    pub datadir_window_ms: Option<u64>,
    /// Observation window for the pid file scenario.
    pub pid_window_ms: Option<u64>,
    /// Poll interval while observing.
    pub poll_interval_ms: Option<u64>,
}

/// `[scope]` section.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScopeSection {
    /// Parent directory for scopes.
    pub root: Option<PathBuf>,
    /// Scope name prefix.
    pub prefix: Option<String>,
}

/// `[summary]` section.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SummarySection {
    /// Directory for `summary.json` and `summary.md`.
    pub dir: Option<PathBuf>,
}

impl FileConfig {
    /// Loads and validates a settings file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read, is too large, is
    /// not UTF-8, does not parse, or carries invalid values.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let bytes = fs::read(path)
            .map_err(|err| ConfigError::Io(format!("{}: {err}", path.display())))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::parse(content)
    }

    /// Parses and validates settings from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] or [`ConfigError::Invalid`].
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects zero durations and blank strings.
    fn validate(&self) -> Result<(), ConfigError> {
        let timing = &self.timing;
        for (field, value) in [
            ("timing.bounded_timeout_ms", timing.bounded_timeout_ms),
            ("timing.stop_grace_ms", timing.stop_grace_ms),
            ("timing.datadir_window_ms", timing.datadir_window_ms),
            ("timing.pid_window_ms", timing.pid_window_ms),
            ("timing.poll_interval_ms", timing.poll_interval_ms),
        ] {
            if value == Some(0) {
                return Err(ConfigError::Invalid(format!("{field} must be greater than zero")));
            }
        }
        for (field, value) in [
            ("binaries.src_dir", self.binaries.src_dir.as_deref()),
            ("binaries.qt_dir", self.binaries.qt_dir.as_deref()),
            ("scope.root", self.scope.root.as_deref()),
            ("summary.dir", self.summary.dir.as_deref()),
        ] {
            if value.is_some_and(|path| path.as_os_str().is_empty()) {
                return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
            }
        }
        if self.scope.prefix.as_deref().is_some_and(|prefix| prefix.trim().is_empty()) {
            return Err(ConfigError::Invalid("scope.prefix must be non-empty".to_string()));
        }
        Ok(())
    }
}


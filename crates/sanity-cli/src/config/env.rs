// crates/sanity-cli/src/config/env.rs
// ============================================================================
// Module: Sanity Environment
// Description: Environment-backed overrides for the sanity harness.
// Purpose: Centralize env parsing with strict UTF-8 validation.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Environment values are parsed with strict UTF-8 enforcement to avoid silent
//! misconfiguration. Invalid UTF-8, empty values, and malformed numbers fail
//! closed with the offending variable named in the error.

use std::path::PathBuf;
use std::time::Duration;

use super::ConfigError;

// ============================================================================
// SECTION: Environment Constants
// ============================================================================

/// Environment keys read by the harness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SanityEnv {
    /// Directory holding the daemon, CLI, and tx binaries.
    SrcDir,
    /// Directory holding the Qt binary.
    QtDir,
    /// Minimum bounded timeout in seconds (positive integer).
    TimeoutSeconds,
    /// Parent directory for per-scenario scopes.
    ScopeRoot,
    /// Directory for `summary.json` and `summary.md`.
    SummaryDir,
    /// `tracing` filter directive for diagnostics on stderr.
    Log,
}

impl SanityEnv {
    /// Every key, in documentation order.
    pub const ALL: [Self; 6] =
        [Self::SrcDir, Self::QtDir, Self::TimeoutSeconds, Self::ScopeRoot, Self::SummaryDir, Self::Log];

    /// Returns the canonical environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SrcDir => "LCC_SANITY_SRC_DIR",
            Self::QtDir => "LCC_SANITY_QT_DIR",
            Self::TimeoutSeconds => "LCC_SANITY_TIMEOUT_SEC",
            Self::ScopeRoot => "LCC_SANITY_SCOPE_ROOT",
            Self::SummaryDir => "LCC_SANITY_SUMMARY_DIR",
            Self::Log => "LCC_SANITY_LOG",
        }
    }
}

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// Overrides read from the process environment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnvConfig {
    /// Subject binary directory override.
    pub src_dir: Option<PathBuf>,
    /// Qt binary directory override.
    pub qt_dir: Option<PathBuf>,
    /// Minimum bounded timeout.
    pub timeout: Option<Duration>,
    /// Scope parent override.
    pub scope_root: Option<PathBuf>,
    /// Summary output directory.
    pub summary_dir: Option<PathBuf>,
}

impl EnvConfig {
    /// Loads overrides from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Env`] when a value is not valid UTF-8, is empty,
    /// or fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let path = |key: SanityEnv| read_env_nonempty(key.as_str()).map(|v| v.map(PathBuf::from));
        let timeout = read_env_nonempty(SanityEnv::TimeoutSeconds.as_str())?
            .map(|value| parse_timeout_seconds(SanityEnv::TimeoutSeconds.as_str(), &value))
            .transpose()?;
        Ok(Self {
            src_dir: path(SanityEnv::SrcDir)?,
            qt_dir: path(SanityEnv::QtDir)?,
            timeout,
            scope_root: path(SanityEnv::ScopeRoot)?,
            summary_dir: path(SanityEnv::SummaryDir)?,
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads an environment variable and enforces UTF-8 validity.
///
/// # Errors
///
/// Returns [`ConfigError::Env`] when the variable contains invalid UTF-8.
fn read_env_strict(name: &str) -> Result<Option<String>, ConfigError> {
    std::env::var_os(name).map_or(Ok(None), |raw| {
        raw.into_string().map(Some).map_err(|_| ConfigError::Env(format!("{name} must be valid UTF-8")))
    })
}

/// Reads an environment variable and rejects empty values.
fn read_env_nonempty(name: &str) -> Result<Option<String>, ConfigError> {
    match read_env_strict(name)? {
        Some(value) if value.trim().is_empty() => {
            Err(ConfigError::Env(format!("{name} must not be empty")))
        }
        Some(value) => Ok(Some(value)),
        None => Ok(None),
    }
}

/// Parses a positive whole number of seconds.
fn parse_timeout_seconds(name: &str, raw: &str) -> Result<Duration, ConfigError> {
    let secs: u64 = raw.trim().parse().map_err(|_| {
        ConfigError::Env(format!("{name} must be a positive integer number of seconds"))
    })?;
    if secs == 0 {
        return Err(ConfigError::Env(format!("{name} must be greater than zero")));
    }
    Ok(Duration::from_secs(secs))
}

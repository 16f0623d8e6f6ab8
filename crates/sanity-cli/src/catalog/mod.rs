// crates/sanity-cli/src/catalog/mod.rs
// ============================================================================
// Module: Scenario Catalog
// Description: The LitecoinCash smoke-test suites.
// Purpose: Register concrete scenarios against the configured binaries.
// Dependencies: sanity-harness
// ============================================================================

//! ## Overview
//! Three suites run in a fixed order:
//! - [`SuiteKind::Binaries`]: existence, `--version`, and `--help` responses.
//! - [`SuiteKind::Config`]: argument and config-file parsing in the daemon.
//! - [`SuiteKind::Datadir`]: data directory, `debug.log`, and pid file
//!   creation by a briefly supervised daemon.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod binaries;
mod config_parsing;
mod datadir;


// ============================================================================
// SECTION: Imports
// ============================================================================

use sanity_harness::BinaryRef;
use sanity_harness::ScenarioSuite;
use sanity_harness::SuiteError;

use crate::config::SanityConfig;

// ============================================================================
// SECTION: Binaries
// ============================================================================

/// Daemon binary name.
pub const DAEMON: &str = "litecoincashd";
/// RPC client binary name.
pub const CLI: &str = "litecoincash-cli";
/// Transaction tool binary name.
pub const TX: &str = "litecoincash-tx";
/// GUI binary name.
pub const QT: &str = "litecoincash-qt";
/// Help output must be strictly longer than this many bytes.
const MIN_HELP_BYTES: usize = 100;

/// The four subject binaries at their configured locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectBinaries {
    /// `litecoincashd`.
    pub daemon: BinaryRef,
    /// `litecoincash-cli`.
    pub cli: BinaryRef,
    /// `litecoincash-tx`.
    pub tx: BinaryRef,
    /// `litecoincash-qt`.
    pub qt: BinaryRef,
}

impl SubjectBinaries {
    /// Resolves every binary from the configured directories.
    #[must_use]
    pub fn from_config(config: &SanityConfig) -> Self {
        Self {
            daemon: BinaryRef::new(DAEMON, &config.src_dir),
            cli: BinaryRef::new(CLI, &config.src_dir),
            tx: BinaryRef::new(TX, &config.src_dir),
            qt: BinaryRef::new(QT, &config.qt_dir),
        }
    }
}

// ============================================================================
// SECTION: Suites
// ============================================================================

/// Selectable suites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SuiteKind {
    /// Binary existence and basic response.
    Binaries,
    /// Configuration parsing.
    Config,
    /// Data directory and file creation.
    Datadir,
}

impl SuiteKind {
    /// Every suite in execution order.
    pub const ALL: [Self; 3] = [Self::Binaries, Self::Config, Self::Datadir];

    /// Returns the selector used on the command line.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Binaries => "binaries",
            Self::Config => "config",
            Self::Datadir => "datadir",
        }
    }

    /// Returns the banner title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Binaries => "Binary Existence and Basic Response",
            Self::Config => "Configuration Parsing",
            Self::Datadir => "Data Directory and File Creation",
        }
    }
}

/// Builds one suite with all of its scenarios registered.
///
/// # Errors
///
/// Returns [`SuiteError`] if registration is rejected.
pub fn build(kind: SuiteKind, config: &SanityConfig) -> Result<ScenarioSuite, SuiteError> {
    let binaries = SubjectBinaries::from_config(config);
    let scenarios = match kind {
        SuiteKind::Binaries => binaries::scenarios(&binaries, &config.timing),
        SuiteKind::Config => config_parsing::scenarios(&binaries, &config.timing),
        SuiteKind::Datadir => datadir::scenarios(&binaries, &config.timing),
    };
    let mut suite = ScenarioSuite::new(kind.title());
    for scenario in scenarios {
        suite.register(scenario)?;
    }
    Ok(suite)
}

/// Builds the selected suites in canonical order, without duplicates.
///
/// An empty selection means every suite.
///
/// # Errors
///
/// Returns [`SuiteError`] if registration is rejected.
pub fn build_selected(
    selected: &[SuiteKind],
    config: &SanityConfig,
) -> Result<Vec<ScenarioSuite>, SuiteError> {
    SuiteKind::ALL
        .into_iter()
        .filter(|kind| selected.is_empty() || selected.contains(kind))
        .map(|kind| build(kind, config))
        .collect()
}

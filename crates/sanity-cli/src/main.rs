// crates/sanity-cli/src/main.rs
// ============================================================================
// Module: LitecoinCash Sanity CLI Entry Point
// Description: Runs the selected smoke-test suites against built binaries.
// Purpose: Give build pipelines a single pass/fail gate for a fresh build.
// Dependencies: clap, sanity-harness, thiserror, tokio, tracing-subscriber
// ============================================================================

//! ## Overview
//! `lcc-sanity` resolves its configuration, runs each selected suite in
//! order, and prints a human-readable transcript to stdout. The process exits
//! 0 when no check failed, 1 when at least one did, and 2 when the runner
//! could not be configured. Diagnostics go to stderr through `tracing`,
//! filtered by `LCC_SANITY_LOG`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Parser;
use clap::ValueEnum;
use sanity_cli::catalog;
use sanity_cli::catalog::SuiteKind;
use sanity_cli::config::CliOverrides;
use sanity_cli::config::SanityConfig;
use sanity_cli::config::SanityEnv;
use sanity_harness::RunSummary;
use sanity_harness::SuiteReport;
use sanity_harness::Transcript;
use sanity_harness::summary::now_millis;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Log filter used when `LCC_SANITY_LOG` is unset or invalid.
const DEFAULT_LOG_FILTER: &str = "warn";
/// Exit status for configuration and usage errors.
const CONFIG_ERROR_STATUS: u8 = 2;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Command-line arguments for `lcc-sanity`.
#[derive(Parser, Debug)]
#[command(
    name = "lcc-sanity",
    about = "Smoke-test freshly built LitecoinCash binaries.",
    disable_version_flag = true
)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue)]
    show_version: bool,
    /// List the selected suites and their scenarios, then exit.
    #[arg(long, action = ArgAction::SetTrue)]
    list: bool,
    /// Optional TOML settings file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Directory holding litecoincashd, litecoincash-cli, and litecoincash-tx.
    #[arg(long, value_name = "DIR")]
    src_dir: Option<PathBuf>,
    /// Directory holding litecoincash-qt (defaults to `<src-dir>/qt`).
    #[arg(long, value_name = "DIR")]
    qt_dir: Option<PathBuf>,
    /// Suite to run; repeat to select several (defaults to all).
    #[arg(long = "suite", value_enum, value_name = "SUITE")]
    suites: Vec<SuiteArg>,
    /// Directory for summary.json and summary.md.
    #[arg(long, value_name = "DIR")]
    summary_dir: Option<PathBuf>,
}

/// Suite selectors accepted by `--suite`.
#[derive(ValueEnum, Copy, Clone, Debug)]
enum SuiteArg {
    /// Binary existence and basic response.
    Binaries,
    /// Configuration parsing.
    Config,
    /// Data directory and file creation.
    Datadir,
}

impl From<SuiteArg> for SuiteKind {
    fn from(arg: SuiteArg) -> Self {
        match arg {
            SuiteArg::Binaries => Self::Binaries,
            SuiteArg::Config => Self::Config,
            SuiteArg::Datadir => Self::Datadir,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error carrying the exit status to report.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
    /// Process exit status.
    status: u8,
}

impl CliError {
    /// Constructs a runtime failure (status 1).
    const fn new(message: String) -> Self {
        Self {
            message,
            status: 1,
        }
    }

    /// Constructs a configuration failure (status 2).
    const fn config(message: String) -> Self {
        Self {
            message,
            status: CONFIG_ERROR_STATUS,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_logging();
    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string(), err.status),
    }
}

/// Parses arguments and dispatches to the requested action.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&format!("lcc-sanity {version}"))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }
    let overrides = CliOverrides {
        config: cli.config,
        src_dir: cli.src_dir,
        qt_dir: cli.qt_dir,
        summary_dir: cli.summary_dir,
    };
    let config = SanityConfig::load(&overrides).map_err(|err| CliError::config(err.to_string()))?;
    let selected: Vec<SuiteKind> = cli.suites.into_iter().map(SuiteKind::from).collect();
    if cli.list {
        return list_suites(&config, &selected);
    }
    run_suites(&config, &selected).await
}

/// Installs the stderr log subscriber.
fn init_logging() {
    let filter = EnvFilter::try_from_env(SanityEnv::Log.as_str())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Prints the selected suites and their scenarios without running them.
fn list_suites(config: &SanityConfig, selected: &[SuiteKind]) -> CliResult<ExitCode> {
    let kinds = SuiteKind::ALL
        .into_iter()
        .filter(|kind| selected.is_empty() || selected.contains(kind));
    for kind in kinds {
        let suite = catalog::build(kind, config).map_err(|err| CliError::config(err.to_string()))?;
        write_stdout_line(&format!("{:<10}{}", kind.key(), kind.title()))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        for scenario in suite.scenarios() {
            write_stdout_line(&format!("  {}: {}", scenario.section(), scenario.name()))
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Runs the selected suites and derives the exit status.
async fn run_suites(config: &SanityConfig, selected: &[SuiteKind]) -> CliResult<ExitCode> {
    tracing::info!(
        src_dir = %config.src_dir.display(),
        qt_dir = %config.qt_dir.display(),
        "resolved binary directories"
    );
    let started_at_ms = now_millis();
    let harness = config.harness();
    let mut suites = catalog::build_selected(selected, config)
        .map_err(|err| CliError::config(err.to_string()))?;

    let mut transcript = Transcript::new(std::io::stdout());
    let mut reports = Vec::with_capacity(suites.len());
    for suite in &mut suites {
        let report = suite
            .run(&harness, &mut transcript)
            .await
            .map_err(|err| CliError::new(err.to_string()))?;
        reports.push(report);
    }
    transcript.overall(&reports).map_err(|err| CliError::new(output_error("stdout", &err)))?;

    let failed = reports.iter().any(SuiteReport::failed);
    if let Some(dir) = &config.summary_dir {
        let paths = RunSummary::new(started_at_ms, reports)
            .write_to(dir)
            .map_err(|err| CliError::new(err.to_string()))?;
        for path in paths {
            tracing::info!(path = %path.display(), "wrote summary");
        }
    }
    Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output stream failure.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message and returns `status`.
fn emit_error(message: &str, status: u8) -> ExitCode {
    let _ = write_stderr_line(&format!("lcc-sanity: {message}"));
    ExitCode::from(status)
}

// ============================================================================
// SECTION: Tests
// ============================================================================

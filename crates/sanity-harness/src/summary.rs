// crates/sanity-harness/src/summary.rs
// ============================================================================
// Module: Run Summary
// Description: Deterministic JSON and Markdown run summaries.
// Purpose: Persist suite outcomes for CI artifact collection.
// Dependencies: serde, serde_jcs, thiserror
// ============================================================================

//! ## Overview
//! [`RunSummary`] captures every suite report of one invocation together with
//! wall-clock bounds. [`RunSummary::write_to`] emits `summary.json` in
//! canonical JCS form and a `summary.md` digest next to it.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;
use thiserror::Error;

use crate::suite::SuiteReport;
use crate::suite::Tally;

/// JSON summary file name.
pub const SUMMARY_JSON: &str = "summary.json";
/// Markdown summary file name.
pub const SUMMARY_MD: &str = "summary.md";

/// Errors raised while writing summary artifacts.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// The summary directory or a file inside it could not be written.
    #[error("failed to write summary at {path}: {source}")]
    Io {
        /// Path being written.
        path: String,
        /// Underlying IO error.
        source: io::Error,
    },
    /// Canonical JSON serialization failed.
    #[error("failed to serialize summary: {0}")]
    Serialize(String),
}

/// Milliseconds since the Unix epoch.
#[must_use]
pub fn now_millis() -> u64 {
    let elapsed = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

/// Outcome of one harness invocation across all suites.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// "pass" or "fail".
    pub status: &'static str,
    /// Start of the run (ms since epoch).
    pub started_at_ms: u64,
    /// End of the run (ms since epoch).
    pub ended_at_ms: u64,
    /// Duration of the run in milliseconds.
    pub duration_ms: u64,
    /// Verdict totals across all suites.
    pub totals: Tally,
    /// Suite reports in execution order.
    pub suites: Vec<SuiteReport>,
}

impl RunSummary {
    /// Builds a summary for reports collected since `started_at_ms`.
    #[must_use]
    pub fn new(started_at_ms: u64, suites: Vec<SuiteReport>) -> Self {
        let ended_at_ms = now_millis();
        let totals = suites.iter().map(SuiteReport::tally).fold(Tally::default(), Tally::merge);
        let status = if suites.iter().any(SuiteReport::failed) { "fail" } else { "pass" };
        Self {
            status,
            started_at_ms,
            ended_at_ms,
            duration_ms: ended_at_ms.saturating_sub(started_at_ms),
            totals,
            suites,
        }
    }

    /// Writes `summary.json` and `summary.md` into `dir`, creating it.
    ///
    /// # Errors
    ///
    /// Returns [`SummaryError`] when serialization or any write fails.
    pub fn write_to(&self, dir: &Path) -> Result<Vec<PathBuf>, SummaryError> {
        fs::create_dir_all(dir).map_err(|source| SummaryError::Io {
            path: dir.display().to_string(),
            source,
        })?;
        let json = serde_jcs::to_vec(self).map_err(|err| SummaryError::Serialize(err.to_string()))?;
        let json_path = write_file(&dir.join(SUMMARY_JSON), &json)?;
        let md_path = write_file(&dir.join(SUMMARY_MD), self.markdown().as_bytes())?;
        Ok(vec![json_path, md_path])
    }

    /// Renders the Markdown digest.
    #[must_use]
    pub fn markdown(&self) -> String {
        let mut out = String::new();
        out.push_str("# Sanity Run Summary\n\n## Status\n\n");
        let _ = writeln!(out, "- Status: {}", self.status);
        let _ = writeln!(out, "- Duration (ms): {}", self.duration_ms);
        let _ = writeln!(
            out,
            "- Checks: {} passed, {} failed, {} skipped, {} info",
            self.totals.passed, self.totals.failed, self.totals.skipped, self.totals.info
        );
        for suite in &self.suites {
            let _ = writeln!(out, "\n## {}\n", suite.title);
            for scenario in &suite.scenarios {
                let _ = writeln!(out, "- {} ({})", scenario.name, scenario.outcome());
                for verdict in &scenario.verdicts {
                    let _ = writeln!(out, "  - {verdict}");
                }
            }
            if suite.scenarios.is_empty() {
                out.push_str("- None\n");
            }
        }
        out
    }
}

/// Writes bytes to `path`.
fn write_file(path: &Path, bytes: &[u8]) -> Result<PathBuf, SummaryError> {
    fs::write(path, bytes).map_err(|source| SummaryError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(path.to_path_buf())
}

// ============================================================================
// SECTION: Tests
// ============================================================================

// crates/sanity-harness/src/transcript.rs
// ============================================================================
// Module: Transcript
// Description: Line-oriented, human-readable run transcript.
// Purpose: Print banners, section headers, verdict lines, and result lines.
// Dependencies: std
// ============================================================================

//! ## Overview
//! The transcript is the primary interface of the harness. Every verdict is
//! written as soon as it is produced, prefixed with its outcome label, so a
//! reader tailing the output sees progress scenario by scenario.

use std::io;
use std::io::Write;

use crate::assertions::Verdict;
use crate::suite::SuiteReport;
use crate::suite::Tally;

/// Width of banner rules.
const RULE_WIDTH: usize = 60;

/// Writes the run transcript to any [`Write`] sink.
#[derive(Debug)]
pub struct Transcript<W: Write> {
    /// Output sink.
    out: W,
    /// Section most recently announced within the current suite.
    section: Option<String>,
}

impl<W: Write> Transcript<W> {
    /// Wraps an output sink.
    pub const fn new(out: W) -> Self {
        Self {
            out,
            section: None,
        }
    }

    /// Opens a suite with its banner.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn banner(&mut self, title: &str) -> io::Result<()> {
        self.section = None;
        let rule = "=".repeat(RULE_WIDTH);
        writeln!(self.out, "{rule}")?;
        writeln!(self.out, "SANITY TEST: {title}")?;
        writeln!(self.out, "{rule}")?;
        self.out.flush()
    }

    /// Announces a section unless it is already the current one.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn section(&mut self, name: &str) -> io::Result<()> {
        if self.section.as_deref() == Some(name) {
            return Ok(());
        }
        self.section = Some(name.to_string());
        writeln!(self.out)?;
        writeln!(self.out, "--- Testing {name} ---")?;
        self.out.flush()
    }

    /// Writes one verdict line.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn verdict(&mut self, verdict: &Verdict) -> io::Result<()> {
        writeln!(self.out, "{verdict}")?;
        self.out.flush()
    }

    /// Closes a suite with its result line.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn suite_result(&mut self, report: &SuiteReport) -> io::Result<()> {
        let rule = "=".repeat(RULE_WIDTH);
        writeln!(self.out)?;
        writeln!(self.out, "{rule}")?;
        if report.failed() {
            writeln!(self.out, "RESULT: Some {} checks FAILED", report.title)?;
        } else {
            writeln!(self.out, "RESULT: All {} checks PASSED", report.title)?;
        }
        writeln!(self.out, "{rule}")?;
        writeln!(self.out)?;
        self.out.flush()
    }

    /// Writes the cross-suite tally after every suite has run.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn overall(&mut self, reports: &[SuiteReport]) -> io::Result<()> {
        let tally = reports.iter().map(SuiteReport::tally).fold(Tally::default(), Tally::merge);
        let failed = reports.iter().filter(|report| report.failed()).count();
        writeln!(
            self.out,
            "OVERALL: {} suites, {} checks: {} passed, {} failed, {} skipped, {} info",
            reports.len(),
            tally.total(),
            tally.passed,
            tally.failed,
            tally.skipped,
            tally.info
        )?;
        if failed == 0 {
            writeln!(self.out, "RESULT: All suites PASSED")?;
        } else {
            writeln!(self.out, "RESULT: {failed} of {} suites FAILED", reports.len())?;
        }
        self.out.flush()
    }

    /// Returns the underlying sink.
    pub fn into_inner(self) -> W {
        self.out
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

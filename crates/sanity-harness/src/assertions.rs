// crates/sanity-harness/src/assertions.rs
// ============================================================================
// Module: Assertions
// Description: Stateless predicate evaluators over captured evidence.
// Purpose: Classify run results and filesystem probes as PASS/FAIL/INFO.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Each evaluator is pure given its inputs and returns a [`Verdict`]: an
//! [`Outcome`] plus a one-line message naming what was expected and what was
//! observed. Evaluators never retry; polling belongs to the caller (see
//! [`crate::probe`]).
//!
//! A check that cannot be answered because its precondition is absent yields
//! INFO rather than FAIL.

use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Serialize;

use crate::runner::RunResult;
use crate::runner::Stream;

// ============================================================================
// SECTION: Outcome
// ============================================================================

/// Four-valued classification of a check or scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    /// The expected behavior was observed.
    Pass,
    /// The expected behavior was not observed.
    Fail,
    /// A precondition (usually the binary) is absent; nothing was run.
    Skip,
    /// A non-fatal, inconclusive observation.
    Info,
}

impl Outcome {
    /// Returns the transcript prefix for this outcome.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
            Self::Skip => "SKIP",
            Self::Info => "INFO",
        }
    }

    /// Returns true for the only outcome that affects aggregate status.
    #[must_use]
    pub const fn is_failure(self) -> bool {
        matches!(self, Self::Fail)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// SECTION: Verdict
// ============================================================================

/// Outcome of a single check with its human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    /// Classification of the check.
    pub outcome: Outcome,
    /// One-line description of expected vs observed.
    pub message: String,
}

impl Verdict {
    /// Creates a verdict.
    #[must_use]
    pub fn new(outcome: Outcome, message: impl Into<String>) -> Self {
        Self {
            outcome,
            message: message.into(),
        }
    }

    /// Creates a PASS verdict.
    #[must_use]
    pub fn pass(message: impl Into<String>) -> Self {
        Self::new(Outcome::Pass, message)
    }

    /// Creates a FAIL verdict.
    #[must_use]
    pub fn fail(message: impl Into<String>) -> Self {
        Self::new(Outcome::Fail, message)
    }

    /// Creates a SKIP verdict.
    #[must_use]
    pub fn skip(message: impl Into<String>) -> Self {
        Self::new(Outcome::Skip, message)
    }

    /// Creates an INFO verdict.
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Outcome::Info, message)
    }

    /// Returns true when the check passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.outcome == Outcome::Pass
    }

    /// Replaces the message, keeping the outcome.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Downgrades FAIL to INFO for timing-sensitive observations whose
    /// absence does not prove the behavior is missing.
    #[must_use]
    pub fn inconclusive(mut self) -> Self {
        if self.outcome == Outcome::Fail {
            self.outcome = Outcome::Info;
        }
        self
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.outcome.label(), self.message)
    }
}

// ============================================================================
// SECTION: Predicate Parameters
// ============================================================================

/// Case handling for substring checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseMode {
    /// Exact byte-for-byte match.
    Sensitive,
    /// Unicode lowercase comparison.
    #[default]
    Insensitive,
}

/// Expected exit code(s).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitCodeMatch {
    /// Exactly this code.
    Exactly(i32),
    /// Any code other than zero.
    NonZero,
    /// Any of the listed codes.
    AnyOf(Vec<i32>),
}

impl ExitCodeMatch {
    /// Returns true when `code` satisfies the expectation.
    #[must_use]
    pub fn matches(&self, code: i32) -> bool {
        match self {
            Self::Exactly(expected) => code == *expected,
            Self::NonZero => code != 0,
            Self::AnyOf(codes) => codes.contains(&code),
        }
    }
}

impl fmt::Display for ExitCodeMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exactly(code) => write!(f, "exit code {code}"),
            Self::NonZero => f.write_str("a nonzero exit code"),
            Self::AnyOf(codes) => {
                let list = codes.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
                write!(f, "one of exit codes [{list}]")
            }
        }
    }
}

/// Filesystem entry kind for existence checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    /// Anything at the path.
    Any,
    /// A regular file.
    File,
    /// A directory.
    Directory,
}

impl PathKind {
    /// Returns a noun for messages.
    const fn noun(self) -> &'static str {
        match self {
            Self::Any => "path",
            Self::File => "file",
            Self::Directory => "directory",
        }
    }
}

// ============================================================================
// SECTION: Run Evaluators
// ============================================================================

/// Checks the exit code against an expectation.
#[must_use]
pub fn exit_code_is(result: &RunResult, expected: &ExitCodeMatch) -> Verdict {
    match result.exit_code {
        Some(code) if expected.matches(code) => {
            Verdict::pass(format!("exited with code {code} (expected {expected})"))
        }
        Some(code) => Verdict::fail(format!("exited with code {code}, expected {expected}")),
        None if result.timed_out => Verdict::fail(format!(
            "no exit code: killed after {} ms deadline, expected {expected}",
            result.elapsed.as_millis()
        )),
        None => match result.signal {
            Some(signal) => Verdict::fail(format!(
                "no exit code: terminated by signal {signal}, expected {expected}"
            )),
            None => Verdict::fail(format!("no exit code observed, expected {expected}")),
        },
    }
}

/// Checks that a stream contains `needle`.
#[must_use]
pub fn output_contains(
    result: &RunResult,
    needle: &str,
    stream: Stream,
    case: CaseMode,
) -> Verdict {
    let haystack = result.text(stream);
    let found = match case {
        CaseMode::Sensitive => haystack.contains(needle),
        CaseMode::Insensitive => haystack.to_lowercase().contains(&needle.to_lowercase()),
    };
    if found {
        Verdict::pass(format!("{} contains \"{needle}\"", stream.label()))
    } else {
        Verdict::fail(format!("{} does not contain \"{needle}\"", stream.label()))
    }
}

/// Checks that a stream carries at least `min_bytes` bytes.
#[must_use]
pub fn output_min_length(result: &RunResult, stream: Stream, min_bytes: usize) -> Verdict {
    let length = result.text(stream).len();
    if length >= min_bytes {
        Verdict::pass(format!("{} returned {length} bytes", stream.label()))
    } else {
        Verdict::fail(format!(
            "{} output too short ({length} bytes, need at least {min_bytes})",
            stream.label()
        ))
    }
}

/// Checks that the process finished on its own within `deadline`.
#[must_use]
pub fn completed_within(result: &RunResult, deadline: Duration) -> Verdict {
    if result.timed_out {
        return Verdict::fail(format!("timed out after {} ms", result.elapsed.as_millis()));
    }
    if result.elapsed > deadline {
        return Verdict::fail(format!(
            "took {} ms, limit {} ms",
            result.elapsed.as_millis(),
            deadline.as_millis()
        ));
    }
    Verdict::pass(format!("completed in {} ms", result.elapsed.as_millis()))
}

// ============================================================================
// SECTION: Filesystem Evaluators
// ============================================================================

/// Checks that an entry of `kind` exists at `path`.
#[must_use]
pub fn path_exists(path: &Path, kind: PathKind) -> Verdict {
    let present = match kind {
        PathKind::Any => path.exists(),
        PathKind::File => path.is_file(),
        PathKind::Directory => path.is_dir(),
    };
    if present {
        Verdict::pass(format!("{} exists at {}", kind.noun(), path.display()))
    } else {
        Verdict::fail(format!("{} not found at {}", kind.noun(), path.display()))
    }
}

/// Checks that a file has content. A missing file is inconclusive (INFO).
#[must_use]
pub fn file_nonempty(path: &Path) -> Verdict {
    match fs::metadata(path) {
        Err(_) => Verdict::info(format!("cannot check size, {} not found", path.display())),
        Ok(meta) if !meta.is_file() => {
            Verdict::fail(format!("{} is not a regular file", path.display()))
        }
        Ok(meta) if meta.len() == 0 => Verdict::fail(format!("{} is empty", path.display())),
        Ok(meta) => Verdict::pass(format!("{} has {} bytes", path.display(), meta.len())),
    }
}

// ============================================================================
// SECTION: Combinators
// ============================================================================

/// Passes when any verdict passes; otherwise reports every failure.
///
/// An empty input is inconclusive.
#[must_use]
pub fn any_pass(verdicts: impl IntoIterator<Item = Verdict>) -> Verdict {
    let mut misses = Vec::new();
    for verdict in verdicts {
        if verdict.passed() {
            return verdict;
        }
        misses.push(verdict);
    }
    if misses.is_empty() {
        return Verdict::info("no checks to evaluate");
    }
    let outcome = if misses.iter().any(|verdict| verdict.outcome.is_failure()) {
        Outcome::Fail
    } else {
        Outcome::Info
    };
    let message =
        misses.iter().map(|verdict| verdict.message.as_str()).collect::<Vec<_>>().join("; ");
    Verdict::new(outcome, message)
}

// ============================================================================
// SECTION: Tests
// ============================================================================

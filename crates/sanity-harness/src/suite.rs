// crates/sanity-harness/src/suite.rs
// ============================================================================
// Module: Scenario Suite
// Description: Ordered execution and aggregation of scenarios.
// Purpose: Run every scenario once, isolate failures, and derive exit status.
// Dependencies: tokio, serde, thiserror, tracing
// ============================================================================

//! ## Overview
//! A [`ScenarioSuite`] moves through [`SuiteState::Registered`] →
//! [`SuiteState::Running`] → [`SuiteState::Aggregated`] →
//! [`SuiteState::Reported`]. Scenarios run strictly in registration order,
//! one at a time, each inside its own task so an error or panic becomes a FAIL
//! verdict instead of aborting the suite.
//!
//! Invariants:
//! - Binary availability is probed once per binary per run and reused; runs
//!   against a missing binary are SKIPped without spawning anything.
//! - Every scenario is attempted; there is no fail-fast.
//! - The suite fails iff at least one verdict is FAIL.

use std::collections::HashMap;
use std::io;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tokio::task::JoinError;

use crate::assertions::Outcome;
use crate::assertions::Verdict;
use crate::locator::Availability;
use crate::locator::BinaryLocator;
use crate::probe;
use crate::probe::Observation;
use crate::runner::ProcessRunner;
use crate::runner::RunError;
use crate::runner::RunResult;
use crate::scenario::Action;
use crate::scenario::Evaluator;
use crate::scenario::Evidence;
use crate::scenario::RunMode;
use crate::scenario::Scenario;
use crate::scenario::SetupStep;
use crate::scope::ResourceScope;
use crate::scope::ScopeError;
use crate::transcript::Transcript;

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default prefix for scenario working directories.
pub const DEFAULT_SCOPE_PREFIX: &str = "lcc_test_";
/// Default polling interval while observing supervised processes.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors that stop a suite run itself (never a single scenario).
#[derive(Debug, Error)]
pub enum SuiteError {
    /// The suite was asked to register or run outside its allowed state.
    #[error("suite \"{title}\" is {state}, expected {expected}")]
    State {
        /// Suite title.
        title: String,
        /// Current state.
        state: SuiteState,
        /// State the operation requires.
        expected: SuiteState,
    },
    /// Writing the transcript failed.
    #[error("transcript write failed: {0}")]
    Transcript(#[from] io::Error),
}

/// Errors raised inside a single scenario; reported as FAIL verdicts.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// The working directory could not be created or prepared.
    #[error(transparent)]
    Scope(#[from] ScopeError),
    /// The subject process could not be spawned or waited on.
    #[error(transparent)]
    Run(#[from] RunError),
}

// ============================================================================
// SECTION: Harness
// ============================================================================

/// Execution environment shared by every scenario of a run.
#[derive(Debug, Clone)]
pub struct Harness {
    /// Process runner used for every invocation.
    runner: ProcessRunner,
    /// Binary probe.
    locator: BinaryLocator,
    /// Parent directory for scopes; system temp when `None`.
    scope_parent: Option<PathBuf>,
    /// Name prefix for scopes.
    scope_prefix: String,
    /// Poll interval for supervised observation.
    poll_interval: Duration,
}

impl Default for Harness {
    fn default() -> Self {
        Self::new(ProcessRunner::new())
    }
}

impl Harness {
    /// Creates a harness around `runner` with default scope settings.
    #[must_use]
    pub fn new(runner: ProcessRunner) -> Self {
        Self {
            runner,
            locator: BinaryLocator,
            scope_parent: None,
            scope_prefix: DEFAULT_SCOPE_PREFIX.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Places scopes under `parent` instead of the system temp directory.
    #[must_use]
    pub fn with_scope_parent(mut self, parent: impl Into<PathBuf>) -> Self {
        self.scope_parent = Some(parent.into());
        self
    }

    /// Overrides the scope name prefix.
    #[must_use]
    pub fn with_scope_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.scope_prefix = prefix.into();
        self
    }

    /// Overrides the supervised observation poll interval.
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Returns the scope parent override.
    #[must_use]
    pub fn scope_parent(&self) -> Option<&Path> {
        self.scope_parent.as_deref()
    }
}

// ============================================================================
// SECTION: Reports
// ============================================================================

/// Verdicts produced by one scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioReport {
    /// Transcript section.
    pub section: String,
    /// Scenario name.
    pub name: String,
    /// Verdicts in emission order.
    pub verdicts: Vec<Verdict>,
}

impl ScenarioReport {
    /// Folds verdicts into one outcome: FAIL over PASS over INFO over SKIP.
    #[must_use]
    pub fn outcome(&self) -> Outcome {
        let has = |outcome: Outcome| self.verdicts.iter().any(|v| v.outcome == outcome);
        if has(Outcome::Fail) {
            Outcome::Fail
        } else if has(Outcome::Pass) {
            Outcome::Pass
        } else if has(Outcome::Skip) && !has(Outcome::Info) {
            Outcome::Skip
        } else {
            Outcome::Info
        }
    }
}

/// Verdict tallies for a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Tally {
    /// PASS verdicts.
    pub passed: usize,
    /// FAIL verdicts.
    pub failed: usize,
    /// SKIP verdicts.
    pub skipped: usize,
    /// INFO verdicts.
    pub info: usize,
}

impl Tally {
    /// Counts one outcome.
    const fn add(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Pass => self.passed += 1,
            Outcome::Fail => self.failed += 1,
            Outcome::Skip => self.skipped += 1,
            Outcome::Info => self.info += 1,
        }
    }

    /// Adds another tally.
    #[must_use]
    pub const fn merge(mut self, other: Self) -> Self {
        self.passed += other.passed;
        self.failed += other.failed;
        self.skipped += other.skipped;
        self.info += other.info;
        self
    }

    /// Total verdict count.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.passed + self.failed + self.skipped + self.info
    }
}

/// Aggregated result of a suite run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuiteReport {
    /// Suite title.
    pub title: String,
    /// Per-scenario reports in registration order.
    pub scenarios: Vec<ScenarioReport>,
}

impl SuiteReport {
    /// Returns true iff any verdict failed.
    #[must_use]
    pub fn failed(&self) -> bool {
        self.scenarios.iter().any(|scenario| scenario.outcome().is_failure())
    }

    /// Counts verdicts by outcome.
    #[must_use]
    pub fn tally(&self) -> Tally {
        let mut tally = Tally::default();
        for verdict in self.scenarios.iter().flat_map(|scenario| &scenario.verdicts) {
            tally.add(verdict.outcome);
        }
        tally
    }

    /// Returns the process status: 0 when nothing failed, 1 otherwise.
    #[must_use]
    pub fn exit_status(&self) -> u8 {
        u8::from(self.failed())
    }
}

// ============================================================================
// SECTION: Suite
// ============================================================================

/// Lifecycle of a suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuiteState {
    /// Accepting registrations.
    Registered,
    /// Executing scenarios.
    Running,
    /// All scenarios done; outcomes folded.
    Aggregated,
    /// Result line written; the suite is finished.
    Reported,
}

impl std::fmt::Display for SuiteState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Registered => "registered",
            Self::Running => "running",
            Self::Aggregated => "aggregated",
            Self::Reported => "reported",
        })
    }
}

/// Named, ordered collection of scenarios.
#[derive(Debug)]
pub struct ScenarioSuite {
    /// Suite title for banners and reports.
    title: String,
    /// Scenarios in registration order.
    scenarios: Vec<Scenario>,
    /// Lifecycle state.
    state: SuiteState,
}

impl ScenarioSuite {
    /// Creates an empty suite.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            scenarios: Vec::new(),
            state: SuiteState::Registered,
        }
    }

    /// Returns the suite title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> SuiteState {
        self.state
    }

    /// Returns the registered scenarios.
    #[must_use]
    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    /// Appends a scenario.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::State`] once the suite has started running.
    pub fn register(&mut self, scenario: Scenario) -> Result<(), SuiteError> {
        self.expect_state(SuiteState::Registered)?;
        self.scenarios.push(scenario);
        Ok(())
    }

    /// Runs every scenario in order, streaming verdicts to `transcript`.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::State`] when the suite already ran, or
    /// [`SuiteError::Transcript`] when the transcript cannot be written.
    /// Scenario failures never surface here.
    pub async fn run<W: Write>(
        &mut self,
        harness: &Harness,
        transcript: &mut Transcript<W>,
    ) -> Result<SuiteReport, SuiteError> {
        self.expect_state(SuiteState::Registered)?;
        self.state = SuiteState::Running;
        transcript.banner(&self.title)?;

        let mut availability: HashMap<PathBuf, Availability> = HashMap::new();
        let mut reports = Vec::with_capacity(self.scenarios.len());
        for scenario in &self.scenarios {
            transcript.section(scenario.section())?;
            let binary = scenario.binary();
            let available = *availability
                .entry(binary.path())
                .or_insert_with(|| harness.locator.availability(binary));
            let verdicts = execute(scenario, harness, available).await;
            for verdict in &verdicts {
                transcript.verdict(verdict)?;
            }
            reports.push(ScenarioReport {
                section: scenario.section().to_string(),
                name: scenario.name().to_string(),
                verdicts,
            });
        }

        self.state = SuiteState::Aggregated;
        let report = SuiteReport {
            title: self.title.clone(),
            scenarios: reports,
        };
        transcript.suite_result(&report)?;
        self.state = SuiteState::Reported;
        tracing::info!(suite = %self.title, failed = report.failed(), "suite finished");
        Ok(report)
    }

    /// Fails unless the suite is in `expected`.
    fn expect_state(&self, expected: SuiteState) -> Result<(), SuiteError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(SuiteError::State {
                title: self.title.clone(),
                state: self.state,
                expected,
            })
        }
    }
}

// ============================================================================
// SECTION: Scenario Execution
// ============================================================================

/// Produces the verdicts for one scenario; never fails.
async fn execute(scenario: &Scenario, harness: &Harness, available: Availability) -> Vec<Verdict> {
    let binary = scenario.binary();
    match scenario.action() {
        Action::Locate => vec![match available {
            Availability::Ready => Verdict::pass(format!("{binary} exists and is executable")),
            Availability::NotExecutable => {
                Verdict::fail(format!("{binary} exists but is not executable"))
            }
            Availability::Missing => Verdict::fail(format!(
                "{binary} does not exist at {}",
                binary.path().display()
            )),
        }],
        Action::Run {
            ..
        } if !available.exists() => {
            vec![Verdict::skip(format!("{} (binary not found)", scenario.name()))]
        }
        Action::Run {
            mode,
            evaluate,
        } => {
            let task = tokio::spawn(run_isolated(scenario.clone(), harness.clone(), mode, evaluate));
            match task.await {
                Ok(Ok(verdicts)) if verdicts.is_empty() => {
                    vec![Verdict::info(format!("{}: no checks evaluated", scenario.name()))]
                }
                Ok(Ok(verdicts)) => verdicts,
                Ok(Err(err)) => vec![Verdict::fail(format!("{} error: {err}", scenario.name()))],
                Err(err) => {
                    vec![Verdict::fail(format!("{} aborted: {}", scenario.name(), join_message(err)))]
                }
            }
        }
    }
}

/// Runs a scenario inside its scope and always removes the scope afterwards.
async fn run_isolated(
    scenario: Scenario,
    harness: Harness,
    mode: RunMode,
    evaluate: Evaluator,
) -> Result<Vec<Verdict>, ScenarioError> {
    let scope = if scenario.needs_scope() {
        Some(ResourceScope::create(harness.scope_parent(), &harness.scope_prefix)?)
    } else {
        None
    };
    let result = drive(&scenario, &harness, scope.as_ref(), mode, evaluate).await;
    if let Some(scope) = scope
        && let Err(err) = scope.close()
    {
        tracing::warn!(scenario = scenario.name(), error = %err, "scope cleanup failed");
    }
    result
}

/// Prepares the scope, runs the binary, and evaluates the evidence.
async fn drive(
    scenario: &Scenario,
    harness: &Harness,
    scope: Option<&ResourceScope>,
    mode: RunMode,
    evaluate: Evaluator,
) -> Result<Vec<Verdict>, ScenarioError> {
    if let Some(scope) = scope {
        for step in scenario.setup() {
            match step {
                SetupStep::CreateDir(relative) => {
                    scope.create_dir(relative)?;
                }
                SetupStep::WriteFile {
                    path,
                    contents,
                } => {
                    scope.write_file(path, contents)?;
                }
            }
        }
    }
    let root = scope.map(ResourceScope::root);
    let args = scenario.render_args(root);
    let path = scenario.binary().path();

    let (run, observation): (RunResult, Observation) = match mode {
        RunMode::Bounded => {
            let run = harness.runner.run_bounded(&path, &args, scenario.timeout()).await?;
            (run, Observation::default())
        }
        RunMode::Supervised {
            grace,
        } => {
            let watch = match scope {
                Some(scope) => {
                    scenario.watch().iter().map(|rel| scope.path(rel)).collect::<Result<Vec<_>, _>>()?
                }
                None => Vec::new(),
            };
            let mut process = harness.runner.run_supervised(&path, &args)?;
            let observation =
                probe::observe(&mut process, &watch, scenario.timeout(), harness.poll_interval)
                    .await;
            (process.stop(grace).await?, observation)
        }
    };

    let evidence = Evidence {
        scenario,
        run: &run,
        scope: root,
        observation: &observation,
    };
    Ok(evaluate(&evidence))
}

/// Extracts a readable message from a failed scenario task.
fn join_message(err: JoinError) -> String {
    if !err.is_panic() {
        return err.to_string();
    }
    let payload = err.into_panic();
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "panicked with a non-string payload".to_string())
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;

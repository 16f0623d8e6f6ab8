// crates/sanity-harness/src/lib.rs
// ============================================================================
// Module: Sanity Harness Library
// Description: Process-orchestration and assertion engine for smoke tests.
// Purpose: Run an opaque subject binary under bounded, isolated conditions.
// Dependencies: tokio, tempfile, thiserror, tracing, serde
// ============================================================================

//! ## Overview
//! The sanity harness validates the operational contract of an externally
//! built executable without standing up its full runtime. Scenarios spawn the
//! subject binary with a bounded deadline (or supervise it and stop it with a
//! SIGTERM to SIGKILL escalation), capture its evidence, and classify each
//! check as PASS, FAIL, SKIP, or INFO.
//!
//! Invariants:
//! - Every [`ResourceScope`] is removed exactly once on every exit path.
//! - No subject process outlives the time window its scenario grants it.
//! - Only FAIL verdicts change a suite's aggregate status.
//!
//! ## Index
//! - Leaves: [`scope`], [`locator`], [`runner`], [`assertions`], [`probe`]
//! - Composition: [`scenario`], [`suite`]
//! - Reporting: [`transcript`], [`summary`]

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod assertions;
pub mod locator;
pub mod probe;
pub mod runner;
pub mod scenario;
pub mod scope;
pub mod suite;
pub mod summary;
pub mod transcript;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use assertions::CaseMode;
pub use assertions::ExitCodeMatch;
pub use assertions::Outcome;
pub use assertions::PathKind;
pub use assertions::Verdict;
pub use locator::Availability;
pub use locator::BinaryLocator;
pub use locator::BinaryRef;
pub use runner::ProcessRunner;
pub use runner::RunError;
pub use runner::RunResult;
pub use runner::Stream;
pub use runner::SupervisedProcess;
pub use scenario::Action;
pub use scenario::Evidence;
pub use scenario::RunMode;
pub use scenario::Scenario;
pub use scenario::SetupStep;
pub use scope::ResourceScope;
pub use scope::ScopeError;
pub use suite::Harness;
pub use suite::ScenarioError;
pub use suite::ScenarioReport;
pub use suite::ScenarioSuite;
pub use suite::SuiteError;
pub use suite::SuiteReport;
pub use suite::SuiteState;
pub use suite::Tally;
pub use summary::RunSummary;
pub use summary::SummaryError;
pub use transcript::Transcript;

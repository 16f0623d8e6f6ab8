// crates/sanity-harness/src/suite/tests.rs
// ============================================================================
// Module: Scenario Suite Unit Tests
// Description: Lifecycle, aggregation, and spawn-free scenario handling.
// ============================================================================

#![allow(clippy::expect_used, reason = "Unit tests use expect for setup clarity.")]

use std::time::Duration;

use tempfile::TempDir;

use super::Harness;
use super::ScenarioReport;
use super::ScenarioSuite;
use super::SuiteError;
use super::SuiteState;
use crate::assertions::Outcome;
use crate::assertions::Verdict;
use crate::locator::BinaryRef;
use crate::scenario::Evidence;
use crate::scenario::Scenario;
use crate::transcript::Transcript;

fn never_called(_evidence: &Evidence<'_>) -> Vec<Verdict> {
    vec![Verdict::fail("evaluator ran against a missing binary")]
}

fn report(verdicts: Vec<Verdict>) -> ScenarioReport {
    ScenarioReport {
        section: "s".to_string(),
        name: "n".to_string(),
        verdicts,
    }
}

#[test]
fn scenario_outcome_folds_by_precedence() {
    assert_eq!(report(vec![Verdict::pass("a"), Verdict::fail("b")]).outcome(), Outcome::Fail);
    assert_eq!(report(vec![Verdict::info("a"), Verdict::pass("b")]).outcome(), Outcome::Pass);
    assert_eq!(report(vec![Verdict::skip("a"), Verdict::info("b")]).outcome(), Outcome::Info);
    assert_eq!(report(vec![Verdict::skip("a")]).outcome(), Outcome::Skip);
    assert_eq!(report(Vec::new()).outcome(), Outcome::Info);
}

#[tokio::test]
async fn missing_binaries_fail_locate_and_skip_runs() {
    let dir = TempDir::new().expect("temp dir");
    let daemon = BinaryRef::new("litecoincashd", dir.path());
    let mut suite = ScenarioSuite::new("sanity");
    suite.register(Scenario::locate("binary existence", daemon.clone())).expect("register");
    suite
        .register(Scenario::bounded(
            "--version flag",
            "litecoincashd --version",
            daemon,
            ["--version"],
            Duration::from_secs(1),
            never_called,
        ))
        .expect("register");

    let mut transcript = Transcript::new(Vec::new());
    let report = suite.run(&Harness::default(), &mut transcript).await.expect("run");
    assert_eq!(suite.state(), SuiteState::Reported);

    assert_eq!(report.scenarios.len(), 2);
    assert_eq!(report.scenarios[0].outcome(), Outcome::Fail);
    assert!(report.scenarios[0].verdicts[0].message.starts_with("litecoincashd does not exist at"));
    assert_eq!(
        report.scenarios[1].verdicts,
        vec![Verdict::skip("litecoincashd --version (binary not found)")]
    );
    assert!(report.failed());
    assert_eq!(report.exit_status(), 1);

    let text = String::from_utf8(transcript.into_inner()).expect("utf-8");
    assert!(text.contains("SKIP: litecoincashd --version (binary not found)"));
    assert!(text.contains("RESULT: Some sanity checks FAILED"));
}

#[tokio::test]
async fn only_skips_keep_the_suite_passing() {
    let dir = TempDir::new().expect("temp dir");
    let cli = BinaryRef::new("litecoincash-cli", dir.path());
    let mut suite = ScenarioSuite::new("sanity");
    suite
        .register(Scenario::bounded(
            "--help flag",
            "litecoincash-cli --help",
            cli,
            ["--help"],
            Duration::from_secs(1),
            never_called,
        ))
        .expect("register");
    let report =
        suite.run(&Harness::default(), &mut Transcript::new(Vec::new())).await.expect("run");
    assert!(!report.failed());
    assert_eq!(report.exit_status(), 0);
    assert_eq!(report.tally().skipped, 1);
}

#[tokio::test]
async fn suite_runs_once_and_rejects_late_registration() {
    let dir = TempDir::new().expect("temp dir");
    let mut suite = ScenarioSuite::new("sanity");
    assert_eq!(suite.state(), SuiteState::Registered);
    suite.run(&Harness::default(), &mut Transcript::new(Vec::new())).await.expect("first run");

    let again = suite.run(&Harness::default(), &mut Transcript::new(Vec::new())).await;
    assert!(matches!(
        again,
        Err(SuiteError::State {
            state: SuiteState::Reported,
            ..
        })
    ));
    let late = suite.register(Scenario::locate("x", BinaryRef::new("litecoincash-tx", dir.path())));
    assert!(matches!(
        late,
        Err(SuiteError::State {
            expected: SuiteState::Registered,
            ..
        })
    ));
}

#[tokio::test]
async fn empty_suite_passes() {
    let mut suite = ScenarioSuite::new("empty");
    let report =
        suite.run(&Harness::default(), &mut Transcript::new(Vec::new())).await.expect("run");
    assert!(report.scenarios.is_empty());
    assert!(!report.failed());
}

// crates/sanity-cli/src/catalog/binaries.rs
// ============================================================================
// Module: Binary Response Suite
// Description: Existence, version, and help checks for every subject binary.
// Purpose: Catch missing or broken builds before deeper checks run.
// Dependencies: sanity-harness
// ============================================================================

use sanity_harness::CaseMode;
use sanity_harness::Evidence;
use sanity_harness::Scenario;
use sanity_harness::Stream;
use sanity_harness::Verdict;
use sanity_harness::assertions::any_pass;
use sanity_harness::assertions::output_contains;
use sanity_harness::assertions::output_min_length;

use super::MIN_HELP_BYTES;
use super::SubjectBinaries;
use crate::config::Timing;

/// Registers the suite's scenarios.
pub(super) fn scenarios(binaries: &SubjectBinaries, timing: &Timing) -> Vec<Scenario> {
    let mut scenarios = Vec::new();
    for binary in [&binaries.daemon, &binaries.cli, &binaries.tx, &binaries.qt] {
        scenarios.push(Scenario::locate("binary existence", binary.clone()));
    }
    // litecoincash-tx has no --version flag.
    for binary in [&binaries.daemon, &binaries.cli] {
        scenarios.push(Scenario::bounded(
            "--version output",
            format!("{binary} --version"),
            binary.clone(),
            ["--version"],
            timing.bounded_timeout,
            reports_version,
        ));
    }
    for binary in [&binaries.daemon, &binaries.cli, &binaries.tx] {
        scenarios.push(Scenario::bounded(
            "--help output",
            format!("{binary} --help"),
            binary.clone(),
            ["--help"],
            timing.bounded_timeout,
            prints_help,
        ));
    }
    scenarios
}

/// Passes when the output names a version or the product.
fn reports_version(evidence: &Evidence<'_>) -> Vec<Verdict> {
    let (name, run) = (evidence.binary(), evidence.run);
    if run.timed_out {
        return vec![Verdict::fail(format!("{name} --version timed out"))];
    }
    // Some tools exit nonzero yet still print their version.
    let found = any_pass([
        output_contains(run, "version", Stream::Combined, CaseMode::Insensitive),
        output_contains(run, "LitecoinCash", Stream::Combined, CaseMode::Sensitive),
    ]);
    let verdict = if found.passed() {
        Verdict::pass(format!("{name} --version: {}", run.first_line()))
    } else {
        Verdict::fail(format!("{name} --version no version info in output"))
    };
    vec![verdict]
}

/// Passes when stdout carries substantial usage text.
fn prints_help(evidence: &Evidence<'_>) -> Vec<Verdict> {
    let (name, run) = (evidence.binary(), evidence.run);
    if run.timed_out {
        return vec![Verdict::fail(format!("{name} --help timed out"))];
    }
    let bytes = run.stdout.len();
    let verdict = if output_min_length(run, Stream::Stdout, MIN_HELP_BYTES + 1).passed() {
        Verdict::pass(format!("{name} --help returned {bytes} bytes"))
    } else {
        Verdict::fail(format!("{name} --help output too short ({bytes} bytes)"))
    };
    vec![verdict]
}

// crates/sanity-cli/src/catalog/config_parsing.rs
// ============================================================================
// Module: Configuration Parsing Suite
// Description: Daemon argument and config-file handling without startup.
// Purpose: Verify rejection of bad input and acceptance of a minimal config.
// Dependencies: sanity-harness
// ============================================================================

use sanity_harness::Evidence;
use sanity_harness::ExitCodeMatch;
use sanity_harness::Scenario;
use sanity_harness::SetupStep;
use sanity_harness::Stream;
use sanity_harness::Verdict;
use sanity_harness::assertions::exit_code_is;
use sanity_harness::assertions::output_min_length;
use sanity_harness::scenario::SCOPE_TOKEN;

use super::MIN_HELP_BYTES;
use super::SubjectBinaries;
use crate::config::Timing;

/// Config file written into the scope for the parsing check.
const CONFIG_FILE: &str = "litecoincash.conf";
/// Minimal regtest configuration.
const CONFIG_CONTENTS: &str = "# Test config\nregtest=1\nserver=0\n";

/// Registers the suite's scenarios.
pub(super) fn scenarios(binaries: &SubjectBinaries, timing: &Timing) -> Vec<Scenario> {
    let daemon = &binaries.daemon;
    let timeout = timing.bounded_timeout;
    vec![
        Scenario::bounded(
            "invalid option rejection",
            "Invalid option test",
            daemon.clone(),
            ["--totallyinvalidoption12345"],
            timeout,
            rejects_invalid_option,
        ),
        Scenario::bounded(
            "conflicting options",
            "Conflicting options test",
            daemon.clone(),
            ["-regtest", "-testnet", "-datadir={scope}"],
            timeout,
            rejects_conflicting_networks,
        ),
        Scenario::bounded(
            "-printtoconsole",
            "printtoconsole test",
            daemon.clone(),
            ["-?", "-printtoconsole", "-datadir={scope}"],
            timeout,
            prints_with_console_flag,
        ),
        Scenario::bounded(
            "config file parsing",
            "Config file test",
            daemon.clone(),
            vec![
                "-?".to_string(),
                format!("-datadir={SCOPE_TOKEN}"),
                format!("-conf={SCOPE_TOKEN}/{CONFIG_FILE}"),
            ],
            timeout,
            parses_config_file,
        )
        .with_setup(SetupStep::WriteFile {
            path: CONFIG_FILE.into(),
            contents: CONFIG_CONTENTS.to_string(),
        }),
    ]
}

/// Maps a nonzero-exit expectation to fixed messages.
fn nonzero_exit(evidence: &Evidence<'_>, pass: &str, fail: &str) -> Vec<Verdict> {
    let run = evidence.run;
    if run.timed_out {
        return vec![Verdict::fail(format!("{} timed out", evidence.scenario.name()))];
    }
    let verdict = exit_code_is(run, &ExitCodeMatch::NonZero);
    vec![if verdict.passed() { Verdict::pass(pass) } else { verdict.with_message(fail) }]
}

/// Unknown options must be rejected.
fn rejects_invalid_option(evidence: &Evidence<'_>) -> Vec<Verdict> {
    nonzero_exit(evidence, "Invalid option correctly rejected", "Invalid option was not rejected")
}

/// `-regtest` together with `-testnet` must be rejected.
fn rejects_conflicting_networks(evidence: &Evidence<'_>) -> Vec<Verdict> {
    nonzero_exit(
        evidence,
        "Conflicting network options correctly rejected",
        "Conflicting network options were not rejected",
    )
}

/// `-?` with `-printtoconsole` must print something.
fn prints_with_console_flag(evidence: &Evidence<'_>) -> Vec<Verdict> {
    let run = evidence.run;
    if run.timed_out {
        return vec![Verdict::fail("printtoconsole test timed out")];
    }
    let verdict = if output_min_length(run, Stream::Combined, 1).passed() {
        Verdict::pass("-printtoconsole works with -?")
    } else {
        Verdict::fail("No output with -printtoconsole -?")
    };
    vec![verdict]
}

/// A minimal config must not stop `-?` from succeeding or printing help.
fn parses_config_file(evidence: &Evidence<'_>) -> Vec<Verdict> {
    let run = evidence.run;
    if run.timed_out {
        return vec![Verdict::fail("Config file test timed out")];
    }
    let accepted = run.success()
        || output_min_length(run, Stream::Stdout, MIN_HELP_BYTES + 1).passed();
    let verdict = if accepted {
        Verdict::pass("Config file parsed successfully")
    } else {
        Verdict::fail(format!("Config parsing issue: {}", run.stderr.trim_end()))
    };
    vec![verdict]
}

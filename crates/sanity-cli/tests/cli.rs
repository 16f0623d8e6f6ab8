// crates/sanity-cli/tests/cli.rs
// ============================================================================
// Module: Runner End-to-End Tests
// Description: Runs `lcc-sanity` against fake LitecoinCash builds.
// Purpose: Verify transcript content, exit status, summaries, and cleanup.
// Dependencies: sanity-cli, serde_json, tempfile
// ============================================================================

//! ## Overview
//! Each test launches the real runner binary against one of the script
//! builds from [`common`] and inspects its stdout, exit status, and the
//! filesystem it leaves behind.

#![cfg(unix)]
#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only panic-based assertions are permitted."
)]

mod common;

use std::fs;

use tempfile::TempDir;

use crate::common::BROKEN;
use crate::common::EMPTY;
use crate::common::GOOD;
use crate::common::HANGING;
use crate::common::build_dir;
use crate::common::fast_config;
use crate::common::runner;
use crate::common::stdout_of;

/// A healthy build passes every suite, writes a summary, and leaves no scopes.
#[test]
fn healthy_build_passes_every_suite() {
    let work = TempDir::new().expect("tempdir");
    let scopes = work.path().join("scopes");
    fs::create_dir_all(&scopes).expect("scope root");
    let summary = work.path().join("summary");

    let output = runner()
        .arg("--config")
        .arg(fast_config(work.path(), 5_000))
        .arg("--src-dir")
        .arg(build_dir(GOOD))
        .arg("--summary-dir")
        .arg(&summary)
        .env("LCC_SANITY_SCOPE_ROOT", &scopes)
        .output()
        .expect("run lcc-sanity");
    let stdout = stdout_of(&output);

    assert_eq!(output.status.code(), Some(0), "stdout:\n{stdout}");
    assert!(!stdout.contains("FAIL:"), "stdout:\n{stdout}");
    assert!(stdout.contains("SANITY TEST: Binary Existence and Basic Response"));
    assert!(stdout.contains("PASS: litecoincash-qt exists and is executable"));
    assert!(stdout.contains("PASS: litecoincashd --version: LitecoinCash Core Daemon version"));
    assert!(stdout.contains("PASS: Invalid option correctly rejected"));
    assert!(stdout.contains("PASS: Conflicting network options correctly rejected"));
    assert!(stdout.contains("PASS: Config file parsed successfully"));
    assert!(stdout.contains("PASS: Regtest subdirectory created"));
    assert!(stdout.contains("PASS: debug.log created"));
    assert!(stdout.contains("PASS: PID file created"));
    assert!(stdout.contains("RESULT: All suites PASSED"));

    let leftover: Vec<_> = fs::read_dir(&scopes).expect("read scope root").collect();
    assert!(leftover.is_empty(), "scopes left behind: {leftover:?}");

    let json = fs::read(summary.join("summary.json")).expect("summary.json");
    let value: serde_json::Value = serde_json::from_slice(&json).expect("summary json");
    assert_eq!(value["status"], "pass");
    assert_eq!(value["totals"]["failed"], 0);
    assert_eq!(value["suites"].as_array().map(Vec::len), Some(3));
    assert!(summary.join("summary.md").is_file());
}

/// Missing binaries fail to locate and fail the run.
#[test]
fn empty_build_fails_binary_suite() {
    let output = runner()
        .args(["--suite", "binaries", "--src-dir"])
        .arg(build_dir(EMPTY))
        .output()
        .expect("run lcc-sanity");
    let stdout = stdout_of(&output);

    assert_eq!(output.status.code(), Some(1), "stdout:\n{stdout}");
    assert!(stdout.contains("FAIL: litecoincashd does not exist at"));
    assert!(stdout.contains("SKIP: litecoincashd --version (binary not found)"));
    assert!(stdout.contains("RESULT: Some Binary Existence and Basic Response checks FAILED"));
}

/// Checks that only run a missing daemon skip without failing.
#[test]
fn missing_daemon_skips_config_suite() {
    let output = runner()
        .args(["--suite", "config", "--src-dir"])
        .arg(build_dir(EMPTY))
        .output()
        .expect("run lcc-sanity");
    let stdout = stdout_of(&output);

    assert_eq!(output.status.code(), Some(0), "stdout:\n{stdout}");
    assert_eq!(stdout.matches("SKIP:").count(), 4, "stdout:\n{stdout}");
    assert!(stdout.contains("OVERALL: 1 suites, 4 checks: 0 passed, 0 failed, 4 skipped, 0 info"));
}

/// A daemon that accepts anything fails the rejection checks.
#[test]
fn permissive_daemon_fails_rejection_checks() {
    let output = runner()
        .args(["--suite", "config", "--src-dir"])
        .arg(build_dir(BROKEN))
        .output()
        .expect("run lcc-sanity");
    let stdout = stdout_of(&output);

    assert_eq!(output.status.code(), Some(1), "stdout:\n{stdout}");
    assert!(stdout.contains("FAIL: Invalid option was not rejected"));
    assert!(stdout.contains("FAIL: Conflicting network options were not rejected"));
    assert!(stdout.contains("PASS: -printtoconsole works with -?"));
}

/// A hanging daemon is killed at the deadline and reported as timed out.
#[test]
fn hanging_daemon_times_out() {
    let work = TempDir::new().expect("tempdir");
    let output = runner()
        .arg("--config")
        .arg(fast_config(work.path(), 300))
        .args(["--suite", "config", "--src-dir"])
        .arg(build_dir(HANGING))
        .output()
        .expect("run lcc-sanity");
    let stdout = stdout_of(&output);

    assert_eq!(output.status.code(), Some(1), "stdout:\n{stdout}");
    assert!(stdout.contains("FAIL: Invalid option test timed out"));
    assert!(stdout.contains("FAIL: Config file test timed out"));
}

/// `--list` prints suites and scenarios without running anything.
#[test]
fn list_prints_suites_without_running() {
    let output = runner()
        .args(["--list", "--src-dir"])
        .arg(build_dir(EMPTY))
        .output()
        .expect("run lcc-sanity");
    let stdout = stdout_of(&output);

    assert_eq!(output.status.code(), Some(0));
    for key in ["binaries", "config", "datadir"] {
        assert!(stdout.lines().any(|line| line.starts_with(key)), "stdout:\n{stdout}");
    }
    assert!(stdout.contains("  --help output: litecoincash-tx --help"));
    assert!(stdout.contains("  PID file (optional): PID file test"));
    assert!(!stdout.contains("SKIP:"));
}

/// `--suite` narrows the listing.
#[test]
fn list_honors_suite_selection() {
    let output = runner()
        .args(["--list", "--suite", "config"])
        .output()
        .expect("run lcc-sanity");
    let stdout = stdout_of(&output);

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout.starts_with("config"), "stdout:\n{stdout}");
    assert!(!stdout.contains("binaries"));
}

/// `--version` prints the runner version.
#[test]
fn version_prints_package_version() {
    let output = runner().arg("--version").output().expect("run lcc-sanity");

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_of(&output).trim(), format!("lcc-sanity {}", env!("CARGO_PKG_VERSION")));
}

/// Invalid environment configuration exits 2 before any suite runs.
#[test]
fn invalid_timeout_env_is_a_config_error() {
    let output = runner()
        .env("LCC_SANITY_TIMEOUT_SEC", "0")
        .output()
        .expect("run lcc-sanity");

    assert_eq!(output.status.code(), Some(2));
    assert!(stdout_of(&output).is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("LCC_SANITY_TIMEOUT_SEC"), "stderr:\n{stderr}");
}

/// An invalid settings file exits 2.
#[test]
fn invalid_settings_file_is_a_config_error() {
    let work = TempDir::new().expect("tempdir");
    let path = work.path().join("bad.toml");
    fs::write(&path, "[timing]\nbounded_timeout_ms = 0\n").expect("write settings");

    let output = runner().arg("--config").arg(&path).output().expect("run lcc-sanity");

    assert_eq!(output.status.code(), Some(2));
}

// crates/sanity-cli/src/catalog/datadir.rs
// ============================================================================
// Module: Data Directory Suite
// Description: Files a briefly supervised daemon leaves in its data directory.
// Purpose: Check data directory, debug.log, and pid file creation.
// Dependencies: sanity-harness
// ============================================================================

//! ## Overview
//! Each scenario starts the daemon in regtest mode with networking disabled,
//! watches for its side effects during a short window, and then stops it
//! with SIGTERM (SIGKILL after the grace period). Files that a quick exit may
//! legitimately never produce are reported as INFO when absent.

use std::fs;
use std::path::Path;

use sanity_harness::Evidence;
use sanity_harness::PathKind;
use sanity_harness::Scenario;
use sanity_harness::SetupStep;
use sanity_harness::Verdict;
use sanity_harness::assertions::path_exists;

use super::SubjectBinaries;
use crate::config::Timing;

/// Scope-relative data directory handed to the daemon.
const DATA_DIR: &str = "data";
/// Network subdirectory created for regtest.
const REGTEST_DIR: &str = "data/regtest";
/// Debug log in the network subdirectory.
const REGTEST_DEBUG_LOG: &str = "data/regtest/debug.log";
/// Debug log in the data directory root.
const ROOT_DEBUG_LOG: &str = "data/debug.log";
/// Pid file in the network subdirectory.
const PID_FILE: &str = "data/regtest/litecoincashd.pid";

/// Registers the suite's scenarios.
pub(super) fn scenarios(binaries: &SubjectBinaries, timing: &Timing) -> Vec<Scenario> {
    let daemon = &binaries.daemon;
    vec![
        Scenario::supervised(
            "data directory creation",
            "Datadir creation test",
            daemon.clone(),
            regtest_args(&["-server=0", "-printtoconsole"]),
            timing.datadir_window,
            timing.stop_grace,
            creates_data_dir,
        )
        .with_setup(SetupStep::CreateDir(DATA_DIR.into()))
        .watching(REGTEST_DIR),
        Scenario::supervised(
            "debug.log creation",
            "Debug log test",
            daemon.clone(),
            regtest_args(&["-server=0", "-debug=1"]),
            timing.datadir_window,
            timing.stop_grace,
            creates_debug_log,
        )
        .with_setup(SetupStep::CreateDir(DATA_DIR.into()))
        .watching(REGTEST_DEBUG_LOG)
        .watching(ROOT_DEBUG_LOG),
        Scenario::supervised(
            "PID file (optional)",
            "PID file test",
            daemon.clone(),
            regtest_args(&["-daemon=0", "-server=0"]),
            timing.pid_window,
            timing.stop_grace,
            creates_pid_file,
        )
        .with_setup(SetupStep::CreateDir(DATA_DIR.into()))
        .watching(PID_FILE),
    ]
}

/// Offline regtest arguments followed by `extra`.
fn regtest_args(extra: &[&'static str]) -> Vec<&'static str> {
    let mut args = vec!["-regtest", "-datadir={scope}/data", "-connect=0", "-listen=0"];
    args.extend_from_slice(extra);
    args
}

/// Returns true when something of `kind` exists at `path` now, or when the
/// path was seen during the run and has since been removed.
fn appeared(evidence: &Evidence<'_>, path: &Path, kind: PathKind) -> bool {
    match fs::metadata(path) {
        Ok(meta) => match kind {
            PathKind::Any => true,
            PathKind::File => meta.is_file(),
            PathKind::Directory => meta.is_dir(),
        },
        Err(_) => evidence.observation.saw(path),
    }
}

/// The data directory must exist; the regtest subdirectory is optional.
fn creates_data_dir(evidence: &Evidence<'_>) -> Vec<Verdict> {
    let (Some(data), Some(regtest)) =
        (evidence.scope_path(DATA_DIR), evidence.scope_path(REGTEST_DIR))
    else {
        return vec![Verdict::fail("Datadir creation test ran without a scope")];
    };
    if !path_exists(&data, PathKind::Directory).passed() {
        return vec![Verdict::fail("Data directory was not created")];
    }
    let subdir = if appeared(evidence, &regtest, PathKind::Directory) {
        Verdict::pass("Regtest subdirectory created")
    } else {
        Verdict::info("Regtest subdirectory not found (may be normal for quick exit)")
    };
    vec![Verdict::pass(format!("Data directory created at {}", data.display())), subdir]
}

/// `debug.log` in either location passes; absence is inconclusive.
fn creates_debug_log(evidence: &Evidence<'_>) -> Vec<Verdict> {
    let candidates = [(REGTEST_DEBUG_LOG, ""), (ROOT_DEBUG_LOG, " in root")];
    for (relative, location) in candidates {
        let Some(path) = evidence.scope_path(relative) else {
            continue;
        };
        match fs::metadata(&path) {
            Ok(meta) if meta.is_file() => {
                return vec![Verdict::pass(format!(
                    "debug.log created{location} ({} bytes)",
                    meta.len()
                ))];
            }
            Ok(_) => {}
            Err(_) if evidence.observation.saw(&path) => {
                return vec![Verdict::pass(format!(
                    "debug.log created{location} (removed at shutdown)"
                ))];
            }
            Err(_) => {}
        }
    }
    vec![Verdict::info("debug.log not found (may be normal for quick exit)")]
}

/// The pid file is optional; it may also be removed again at shutdown.
fn creates_pid_file(evidence: &Evidence<'_>) -> Vec<Verdict> {
    match evidence.scope_path(PID_FILE) {
        Some(path) if appeared(evidence, &path, PathKind::File) => {
            vec![Verdict::pass("PID file created")]
        }
        _ => vec![Verdict::info("PID file not found (may be normal for non-daemon mode)")],
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

// crates/sanity-harness/tests/common/mod.rs
// ============================================================================
// Module: Common Test Utilities
// Description: Shell-script stand-ins for subject binaries.
// Purpose: Give integration tests real processes with scripted behavior.
// Dependencies: std, nix
// ============================================================================

//! ## Overview
//! All fixture scripts are written once per test binary, before any test
//! spawns a process. Writing an executable while another thread forks can
//! leave a stray write descriptor in the child and make `exec` fail with
//! `ETXTBSY`; creating everything up front inside a [`OnceLock`] avoids that.

#![allow(
    dead_code,
    clippy::panic,
    clippy::expect_used,
    clippy::unwrap_used,
    reason = "Shared helpers are used by a subset of test binaries; panics are assertions."
)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;
use std::time::Instant;

use nix::errno::Errno;
use nix::sys::signal::kill;
use nix::unistd::Pid;

/// Prints a version line to stdout, a note to stderr, and exits 3.
pub const FAST: &str = "fast";
/// Sleeps far longer than any test deadline.
pub const SLEEPER: &str = "sleeper";
/// Ignores SIGTERM, touches `<dir>/ready`, and keeps running.
pub const STUBBORN: &str = "stubborn";
/// Writes `<dir>/ready.pid`, then removes it and exits 0 on SIGTERM.
pub const POLITE: &str = "polite";
/// Writes well over a pipe buffer of output.
pub const CHATTY: &str = "chatty";
/// Backgrounds a sleeper, records its pid in `<dir>/child.pid`, and exits 0.
pub const FORKER: &str = "forker";
/// Like [`FORKER`] but waits on the sleeper instead of exiting.
pub const FORK_WAITER: &str = "fork_waiter";
/// Ignores SIGTERM, backgrounds a sleeper, touches `<dir>/ready`, and loops.
pub const STUBBORN_FORKER: &str = "stubborn_forker";

/// Background sleeper whose pid lands in `$1/child.pid`.
const SPAWN_SLEEPER: &str = "sleep 30 >/dev/null 2>&1 &\necho $! > \"$1/child.pid\"\n";
/// How long a killed descendant may take to disappear.
const GONE_TIMEOUT: Duration = Duration::from_secs(3);

/// Script bodies keyed by fixture name.
const SCRIPTS: &[(&str, &str)] = &[
    (FAST, "echo 'LitecoinCash Core version v1.2.3'\necho 'note: fast exit' >&2\nexit 3\n"),
    (SLEEPER, "exec sleep 30\n"),
    (STUBBORN, "trap '' TERM\ntouch \"$1/ready\"\nwhile true; do sleep 0.1; done\n"),
    (
        POLITE,
        "trap 'rm -f \"$1/ready.pid\"; exit 0' TERM\necho $$ > \"$1/ready.pid\"\nwhile true; do \
         sleep 0.1; done\n",
    ),
    (
        CHATTY,
        "i=0\nwhile [ $i -lt 4000 ]; do\n  echo \"line $i: the quick brown fox jumps over\"\n  \
         i=$((i+1))\ndone\n",
    ),
];

/// Returns the directory holding every fixture script.
pub fn fixture_dir() -> &'static Path {
    static DIR: OnceLock<PathBuf> = OnceLock::new();
    DIR.get_or_init(|| {
        let dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR"))
            .join(format!("sanity-harness-fixtures-{}", std::process::id()));
        fs::create_dir_all(&dir).expect("create fixture dir");
        for (name, body) in SCRIPTS {
            write_script(&dir, name, body);
        }
        write_script(&dir, FORKER, &format!("{SPAWN_SLEEPER}exit 0\n"));
        write_script(&dir, FORK_WAITER, &format!("{SPAWN_SLEEPER}wait\n"));
        write_script(
            &dir,
            STUBBORN_FORKER,
            &format!(
                "trap '' TERM\n{SPAWN_SLEEPER}touch \"$1/ready\"\nwhile true; do sleep 0.1; done\n"
            ),
        );
        dir
    })
}

/// Reads the descendant pid a forking fixture recorded in `dir`.
pub fn descendant_pid(dir: &Path) -> i32 {
    let raw = fs::read_to_string(dir.join("child.pid")).expect("read child.pid");
    raw.trim().parse().expect("child pid")
}

/// Waits until `pid` no longer runs; zombies awaiting their reaper count as gone.
pub fn wait_until_gone(pid: i32) -> bool {
    let deadline = Instant::now() + GONE_TIMEOUT;
    loop {
        if !is_alive(pid) {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
}

/// True when `pid` exists and is not a zombie.
fn is_alive(pid: i32) -> bool {
    if kill(Pid::from_raw(pid), None) == Err(Errno::ESRCH) {
        return false;
    }
    // Linux exposes the state after the parenthesised command name.
    match fs::read_to_string(format!("/proc/{pid}/stat")) {
        Ok(stat) => stat
            .rsplit_once(')')
            .is_none_or(|(_, rest)| !rest.trim_start().starts_with('Z')),
        Err(_) => true,
    }
}

/// Returns the path of a named fixture script.
pub fn fixture(name: &str) -> PathBuf {
    fixture_dir().join(name)
}

/// Writes an executable `/bin/sh` script.
fn write_script(dir: &Path, name: &str, body: &str) {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}")).expect("write fixture script");
    let mut permissions = fs::metadata(&path).expect("fixture metadata").permissions();
    permissions.set_mode(0o755);
    fs::set_permissions(&path, permissions).expect("chmod fixture script");
}

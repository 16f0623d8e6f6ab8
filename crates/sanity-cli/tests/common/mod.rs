// crates/sanity-cli/tests/common/mod.rs
// ============================================================================
// Module: Fake LitecoinCash Builds
// Description: Script-based stand-ins for the four subject binaries.
// Purpose: Drive `lcc-sanity` end to end without a real LitecoinCash build.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Four build directories are laid out once per test binary:
//! - `good`: every binary behaves like a healthy build.
//! - `broken`: the daemon accepts anything and prints almost nothing.
//! - `hanging`: the daemon never exits.
//! - `empty`: no binaries at all.
//!
//! Scripts are all written inside a [`OnceLock`] before any test spawns a
//! process, so no child inherits a descriptor open for writing on them.

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
use std::process::Command;
use std::process::Output;
use std::sync::OnceLock;

/// Healthy build.
pub const GOOD: &str = "good";
/// Daemon that never rejects anything.
pub const BROKEN: &str = "broken";
/// Daemon that never returns.
pub const HANGING: &str = "hanging";
/// Build directory without binaries.
pub const EMPTY: &str = "empty";

/// Environment variables the runner reads.
const RUNNER_ENV: &[&str] = &[
    "LCC_SANITY_SRC_DIR",
    "LCC_SANITY_QT_DIR",
    "LCC_SANITY_TIMEOUT_SEC",
    "LCC_SANITY_SCOPE_ROOT",
    "LCC_SANITY_SUMMARY_DIR",
    "LCC_SANITY_LOG",
];

/// Daemon that mimics argument handling and regtest startup.
const GOOD_DAEMON: &str = r#"
datadir=""
help=0
regtest=0
testnet=0
for arg in "$@"; do
  case "$arg" in
    --version) echo "LitecoinCash Core Daemon version v0.16.2"; exit 0 ;;
    --help|"-?") help=1 ;;
    -regtest) regtest=1 ;;
    -testnet) testnet=1 ;;
    -datadir=*) datadir="${arg#-datadir=}" ;;
    -conf=*|-printtoconsole|-server=*|-debug=*|-daemon=*|-connect=*|-listen=*) ;;
    *) echo "Error: Invalid parameter $arg" >&2; exit 1 ;;
  esac
done
if [ $regtest = 1 ] && [ $testnet = 1 ]; then
  echo "Error: Invalid combination of -regtest and -testnet." >&2
  exit 1
fi
if [ $help = 1 ]; then
  cat <<'USAGE'
LitecoinCash Core Daemon version v0.16.2

Usage:
  litecoincashd [options]                     Start LitecoinCash Core Daemon

Options:
  -?                     Print this help message and exit
  -conf=<file>           Specify configuration file
  -datadir=<dir>         Specify data directory
USAGE
  exit 0
fi
[ -n "$datadir" ] || exit 1
net="$datadir/regtest"
trap 'rm -f "$net/litecoincashd.pid"; exit 0' TERM
mkdir -p "$net"
echo "LitecoinCash version v0.16.2" >> "$net/debug.log"
echo $$ > "$net/litecoincashd.pid"
while true; do sleep 0.1; done
"#;

/// Companion tool answering `--version` and `--help`.
const GOOD_TOOL: &str = r#"
case "$1" in
  --version) echo "LitecoinCash Core RPC client version v0.16.2" ;;
  *)
    echo "Usage: $(basename "$0") [options] <command> [params]"
    echo "Options:"
    echo "  -?           This help message"
    echo "  -datadir=<dir>  Specify data directory"
    ;;
esac
exit 0
"#;

/// Daemon that accepts every argument silently.
const BROKEN_DAEMON: &str = "echo ok\nexit 0\n";

/// Daemon that never exits.
const HANGING_DAEMON: &str = "exec sleep 30\n";

/// Returns the root of all fake build directories.
pub fn builds_root() -> &'static Path {
    static ROOT: OnceLock<PathBuf> = OnceLock::new();
    ROOT.get_or_init(|| {
        let root = PathBuf::from(env!("CARGO_TARGET_TMPDIR"))
            .join(format!("lcc-sanity-builds-{}", std::process::id()));
        let good = root.join(GOOD);
        write_script(&good, "litecoincashd", GOOD_DAEMON);
        write_script(&good, "litecoincash-cli", GOOD_TOOL);
        write_script(&good, "litecoincash-tx", GOOD_TOOL);
        write_script(&good.join("qt"), "litecoincash-qt", GOOD_TOOL);
        write_script(&root.join(BROKEN), "litecoincashd", BROKEN_DAEMON);
        write_script(&root.join(HANGING), "litecoincashd", HANGING_DAEMON);
        fs::create_dir_all(root.join(EMPTY)).expect("create empty build");
        root
    })
}

/// Returns the source directory of a named fake build.
pub fn build_dir(name: &str) -> PathBuf {
    builds_root().join(name)
}

/// Writes an executable `/bin/sh` script, creating `dir`.
fn write_script(dir: &Path, name: &str, body: &str) {
    fs::create_dir_all(dir).expect("create build dir");
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}")).expect("write fake binary");
    let mut permissions = fs::metadata(&path).expect("fake binary metadata").permissions();
    permissions.set_mode(0o755);
    fs::set_permissions(&path, permissions).expect("chmod fake binary");
}

/// Returns a runner command with a clean `LCC_SANITY_*` environment.
pub fn runner() -> Command {
    builds_root();
    let mut command = Command::new(env!("CARGO_BIN_EXE_lcc-sanity"));
    for name in RUNNER_ENV {
        command.env_remove(name);
    }
    command
}

/// Writes a settings file with short windows and returns its path.
pub fn fast_config(dir: &Path, bounded_timeout_ms: u64) -> PathBuf {
    let path = dir.join("sanity.toml");
    let body = format!(
        "[timing]\nbounded_timeout_ms = {bounded_timeout_ms}\nstop_grace_ms = 2000\n\
         datadir_window_ms = 800\npid_window_ms = 800\npoll_interval_ms = 25\n"
    );
    fs::write(&path, body).expect("write settings");
    path
}

/// Returns stdout as text.
pub fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

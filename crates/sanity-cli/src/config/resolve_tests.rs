// crates/sanity-cli/src/config/resolve_tests.rs
// ============================================================================
// Module: Sanity Config Resolution Unit Tests
// Description: Layer precedence and defaults.
// ============================================================================

#![allow(clippy::expect_used, reason = "Unit tests use expect for setup clarity.")]

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use sanity_harness::suite::DEFAULT_POLL_INTERVAL;
use sanity_harness::suite::DEFAULT_SCOPE_PREFIX;

use super::CliOverrides;
use super::EnvConfig;
use super::FileConfig;
use super::SanityConfig;
use super::Timing;

const EXE_DIR: &str = "/work/litecoincash/target/release";

fn file(toml: &str) -> FileConfig {
    FileConfig::parse(toml).expect("parse file config")
}

#[test]
fn defaults_resolve_relative_to_the_runner() {
    let config = SanityConfig::resolve(
        &CliOverrides::default(),
        &EnvConfig::default(),
        FileConfig::default(),
        Path::new(EXE_DIR),
    );
    let src = Path::new(EXE_DIR).join("..").join("..").join("src");
    assert_eq!(config.src_dir, src);
    assert_eq!(config.qt_dir, src.join("qt"));
    assert_eq!(config.timing, Timing::default());
    assert_eq!(config.timing.bounded_timeout, Duration::from_secs(10));
    assert_eq!(config.scope_prefix, "lcc_test_");
    assert_eq!(config.scope_prefix, DEFAULT_SCOPE_PREFIX);
    assert_eq!(config.timing.poll_interval, DEFAULT_POLL_INTERVAL);
    assert_eq!(config.scope_root, None);
    assert_eq!(config.summary_dir, None);
}

#[test]
fn cli_beats_env_beats_file() {
    let cli = CliOverrides {
        src_dir: Some(PathBuf::from("/cli/src")),
        ..CliOverrides::default()
    };
    let env = EnvConfig {
        src_dir: Some(PathBuf::from("/env/src")),
        qt_dir: Some(PathBuf::from("/env/qt")),
        summary_dir: Some(PathBuf::from("/env/summary")),
        ..EnvConfig::default()
    };
    let file = file(
        "[binaries]\nsrc_dir = \"/file/src\"\nqt_dir = \"/file/qt\"\n[summary]\ndir = \"/file/s\"\n",
    );
    let config = SanityConfig::resolve(&cli, &env, file, Path::new(EXE_DIR));
    assert_eq!(config.src_dir, PathBuf::from("/cli/src"));
    assert_eq!(config.qt_dir, PathBuf::from("/env/qt"));
    assert_eq!(config.summary_dir, Some(PathBuf::from("/env/summary")));
}

#[test]
fn qt_dir_follows_an_overridden_src_dir() {
    let cli = CliOverrides {
        src_dir: Some(PathBuf::from("/opt/lcc/src")),
        ..CliOverrides::default()
    };
    let config = SanityConfig::resolve(
        &cli,
        &EnvConfig::default(),
        FileConfig::default(),
        Path::new(EXE_DIR),
    );
    assert_eq!(config.qt_dir, PathBuf::from("/opt/lcc/src/qt"));
}

#[test]
fn env_timeout_is_a_floor_for_bounded_runs() {
    let short = file("[timing]\nbounded_timeout_ms = 2000\nstop_grace_ms = 750\n");
    let env = EnvConfig {
        timeout: Some(Duration::from_secs(30)),
        ..EnvConfig::default()
    };
    let config =
        SanityConfig::resolve(&CliOverrides::default(), &env, short.clone(), Path::new(EXE_DIR));
    assert_eq!(config.timing.bounded_timeout, Duration::from_secs(30));
    assert_eq!(config.timing.stop_grace, Duration::from_millis(750));

    let env = EnvConfig {
        timeout: Some(Duration::from_secs(1)),
        ..EnvConfig::default()
    };
    let config = SanityConfig::resolve(&CliOverrides::default(), &env, short, Path::new(EXE_DIR));
    assert_eq!(config.timing.bounded_timeout, Duration::from_secs(2));
}

#[test]
fn scope_settings_reach_the_harness() {
    let env = EnvConfig {
        scope_root: Some(PathBuf::from("/scratch")),
        ..EnvConfig::default()
    };
    let config = SanityConfig::resolve(
        &CliOverrides::default(),
        &env,
        file("[scope]\nroot = \"/ignored\"\nprefix = \"ci_\"\n"),
        Path::new(EXE_DIR),
    );
    assert_eq!(config.scope_root, Some(PathBuf::from("/scratch")));
    assert_eq!(config.scope_prefix, "ci_");
    assert_eq!(config.harness().scope_parent(), Some(Path::new("/scratch")));
}

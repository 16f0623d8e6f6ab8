// crates/sanity-harness/src/probe.rs
// ============================================================================
// Module: Side-Effect Probe
// Description: Bounded polling for files a supervised process creates.
// Purpose: Replace fixed sleeps with poll-until-present inside the same budget.
// Dependencies: tokio
// ============================================================================

//! ## Overview
//! [`observe`] watches a set of paths while a supervised process runs. It
//! returns as soon as every watched path has been seen, the process exits, or
//! the observation window closes, whichever comes first. Paths that appear
//! and vanish again (pid files removed at shutdown) are still recorded.

use std::path::PathBuf;
use std::time::Duration;
use std::time::Instant;

use crate::runner::SupervisedProcess;

/// What was seen during an observation window.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Observation {
    /// Watched paths seen at least once, in first-seen order.
    pub seen: Vec<PathBuf>,
    /// Time actually spent observing.
    pub waited: Duration,
    /// True when the process exited before the window closed.
    pub exited_early: bool,
}

impl Observation {
    /// Returns true when `path` was seen during the window.
    #[must_use]
    pub fn saw(&self, path: &std::path::Path) -> bool {
        self.seen.iter().any(|seen| seen == path)
    }
}

/// Polls `watch` every `interval` until all are seen, the process exits, or
/// `window` elapses.
pub async fn observe(
    process: &mut SupervisedProcess,
    watch: &[PathBuf],
    window: Duration,
    interval: Duration,
) -> Observation {
    let started = Instant::now();
    let mut observation = Observation::default();
    loop {
        for path in watch {
            if !observation.saw(path) && path.exists() {
                tracing::debug!(path = %path.display(), "observed side effect");
                observation.seen.push(path.clone());
            }
        }
        if !watch.is_empty() && observation.seen.len() == watch.len() {
            break;
        }
        if !process.is_running() {
            observation.exited_early = true;
            break;
        }
        let elapsed = started.elapsed();
        if elapsed >= window {
            break;
        }
        tokio::time::sleep(interval.min(window.saturating_sub(elapsed))).await;
    }
    observation.waited = started.elapsed();
    observation
}

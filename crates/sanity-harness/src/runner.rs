// crates/sanity-harness/src/runner.rs
// ============================================================================
// Module: Process Runner
// Description: Bounded and supervised execution of subject binaries.
// Purpose: Spawn, time-box, capture, and terminate subject processes.
// Dependencies: tokio, nix (unix), thiserror, tracing
// ============================================================================

//! ## Overview
//! [`ProcessRunner::run_bounded`] waits for a process up to a deadline and
//! force-kills it when the deadline passes. [`ProcessRunner::run_supervised`]
//! starts a long-running process whose side effects are observed out of band;
//! [`SupervisedProcess::stop`] then requests a cooperative exit and escalates
//! to a forceful kill after a grace period.
//!
//! Invariants:
//! - Every spawned child gets a null stdin and piped stdout/stderr.
//! - On Unix each child leads its own process group; termination signals are
//!   sent to the whole group so helpers it forks do not outlive it. Once the
//!   leader has been reaped, for any reason, the rest of its group is killed.
//! - Children are killed on drop, so early returns never leak a process.
//! - Captured output is only released after the child has been reaped.
//!   Pipes are drained in background tasks so a chatty child never blocks on
//!   a full pipe.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod capture;
mod signal;
mod supervised;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::borrow::Cow;
use std::io;
use std::path::Path;
use std::process::ExitStatus;
use std::process::Stdio;
use std::time::Duration;
use std::time::Instant;

use thiserror::Error;
use tokio::process::Child;

use self::capture::OutputCapture;
pub use self::supervised::SupervisedProcess;

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// How long to keep draining pipes after the child has been reaped.
pub const DEFAULT_DRAIN_GRACE: Duration = Duration::from_millis(500);
/// Upper bound for reaping a child after SIGKILL.
pub const DEFAULT_REAP_TIMEOUT: Duration = Duration::from_secs(2);

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while running a subject process.
#[derive(Debug, Error)]
pub enum RunError {
    /// The operating system refused to start the process.
    #[error("failed to spawn {path} {args}: {source}")]
    Spawn {
        /// Resolved binary path.
        path: String,
        /// Space-joined argument list.
        args: String,
        /// Underlying OS error.
        source: io::Error,
    },
    /// Waiting on the running process failed.
    #[error("failed to wait for {path}: {source}")]
    Wait {
        /// Resolved binary path.
        path: String,
        /// Underlying OS error.
        source: io::Error,
    },
}

// ============================================================================
// SECTION: Run Result
// ============================================================================

/// Output stream selector for captured evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    /// Standard output only.
    Stdout,
    /// Standard error only.
    Stderr,
    /// Standard output followed by standard error.
    Combined,
}

impl Stream {
    /// Returns a short label for messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
            Self::Combined => "output",
        }
    }
}

/// Evidence captured from one invocation of a subject binary.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunResult {
    /// Exit code; `None` when the process was killed or timed out.
    pub exit_code: Option<i32>,
    /// Terminating signal number (Unix only).
    pub signal: Option<i32>,
    /// Captured standard output (lossy UTF-8).
    pub stdout: String,
    /// Captured standard error (lossy UTF-8).
    pub stderr: String,
    /// Wall-clock time from spawn until the process was reaped.
    pub elapsed: Duration,
    /// True when a bounded run hit its deadline and was killed.
    pub timed_out: bool,
    /// True when a supervised stop had to escalate to a forceful kill.
    pub escalated: bool,
}

impl RunResult {
    /// Returns the text for a stream selection.
    #[must_use]
    pub fn text(&self, stream: Stream) -> Cow<'_, str> {
        match stream {
            Stream::Stdout => Cow::Borrowed(&self.stdout),
            Stream::Stderr => Cow::Borrowed(&self.stderr),
            Stream::Combined => Cow::Owned(format!("{}{}", self.stdout, self.stderr)),
        }
    }

    /// Returns the first line of the combined output.
    #[must_use]
    pub fn first_line(&self) -> String {
        self.text(Stream::Combined).lines().next().unwrap_or_default().trim_end().to_string()
    }

    /// Returns true when the process exited on its own with code zero.
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

// ============================================================================
// SECTION: Runner
// ============================================================================

/// Spawns subject binaries in bounded or supervised mode.
///
/// All methods must be called from within a Tokio runtime.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    /// Bound on pipe draining after the child is reaped.
    drain_grace: Duration,
    /// Bound on reaping a child after a forceful kill.
    reap_timeout: Duration,
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessRunner {
    /// Creates a runner with default drain and reap bounds.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            drain_grace: DEFAULT_DRAIN_GRACE,
            reap_timeout: DEFAULT_REAP_TIMEOUT,
        }
    }

    /// Runs a process to completion or until `timeout` elapses.
    ///
    /// On timeout the process group is killed and the result carries
    /// `timed_out = true` with no exit code.
    ///
    /// # Errors
    ///
    /// Returns [`RunError`] when the process cannot be spawned or waited on.
    pub async fn run_bounded(
        &self,
        path: &Path,
        args: &[String],
        timeout: Duration,
    ) -> Result<RunResult, RunError> {
        let mut process = self.spawn(path, args)?;
        match tokio::time::timeout(timeout, process.child.wait()).await {
            Ok(status) => {
                let status = status.map_err(|source| process.wait_error(source))?;
                Ok(process.finish(Some(status), Completion::Exited, self.drain_grace).await)
            }
            Err(_) => {
                tracing::warn!(
                    path = %path.display(),
                    timeout_ms = timeout.as_millis(),
                    "deadline elapsed, killing subject process"
                );
                let status = process.kill_and_reap(self.reap_timeout).await;
                Ok(process.finish(status, Completion::TimedOut, self.drain_grace).await)
            }
        }
    }

    /// Starts a process without waiting for it to exit.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::Spawn`] when the process cannot be started.
    pub fn run_supervised(
        &self,
        path: &Path,
        args: &[String],
    ) -> Result<SupervisedProcess, RunError> {
        let process = self.spawn(path, args)?;
        Ok(SupervisedProcess::new(process, self.drain_grace, self.reap_timeout))
    }

    /// Spawns the child with piped output and a fresh process group.
    fn spawn(&self, path: &Path, args: &[String]) -> Result<ChildProcess, RunError> {
        let mut command = std::process::Command::new(path);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }
        let mut command = tokio::process::Command::from(command);
        command.kill_on_drop(true);

        let started = Instant::now();
        let mut child = command.spawn().map_err(|source| RunError::Spawn {
            path: path.display().to_string(),
            args: args.join(" "),
            source,
        })?;
        let pid = child.id();
        let capture = OutputCapture::attach(&mut child);
        tracing::debug!(path = %path.display(), args = %args.join(" "), pid, "spawned subject");
        Ok(ChildProcess {
            path: path.display().to_string(),
            child,
            pid,
            capture,
            started,
        })
    }
}

// ============================================================================
// SECTION: Child Process
// ============================================================================

/// How a child process came to an end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Completion {
    /// Exited on its own or after a cooperative stop request.
    Exited,
    /// Killed by the harness because its deadline elapsed.
    TimedOut,
    /// Killed by the harness after the stop grace period elapsed.
    Escalated,
}

/// A spawned child with its capture tasks.
#[derive(Debug)]
struct ChildProcess {
    /// Display form of the binary path for logs and errors.
    path: String,
    /// Tokio child handle.
    child: Child,
    /// OS process id captured at spawn time.
    pid: Option<u32>,
    /// Background pipe readers.
    capture: OutputCapture,
    /// Spawn instant for elapsed-time accounting.
    started: Instant,
}

impl ChildProcess {
    /// Wraps an IO error from waiting on this child.
    fn wait_error(&self, source: io::Error) -> RunError {
        RunError::Wait {
            path: self.path.clone(),
            source,
        }
    }

    /// Kills the process group and reaps the child within `reap_timeout`.
    async fn kill_and_reap(&mut self, reap_timeout: Duration) -> Option<ExitStatus> {
        if let Err(err) = signal::force_kill(&mut self.child, self.pid) {
            tracing::warn!(path = %self.path, error = %err, "forceful kill failed");
        }
        match tokio::time::timeout(reap_timeout, self.child.wait()).await {
            Ok(Ok(status)) => Some(status),
            Ok(Err(err)) => {
                tracing::warn!(path = %self.path, error = %err, "reaping killed subject failed");
                None
            }
            Err(_) => {
                tracing::warn!(path = %self.path, "killed subject was not reaped in time");
                None
            }
        }
    }

    /// Converts the reaped child into a [`RunResult`].
    async fn finish(
        self,
        status: Option<ExitStatus>,
        completion: Completion,
        drain_grace: Duration,
    ) -> RunResult {
        let elapsed = self.started.elapsed();
        // Descendants must not outlive the scenario.
        if let Err(err) = signal::kill_group_remnants(self.pid) {
            tracing::warn!(path = %self.path, error = %err, "killing leftover descendants failed");
        }
        let (stdout, stderr) = self.capture.finish(drain_grace).await;
        let exit_code = match completion {
            Completion::TimedOut => None,
            Completion::Exited | Completion::Escalated => status.and_then(|status| status.code()),
        };
        tracing::debug!(
            path = %self.path,
            exit_code,
            elapsed_ms = elapsed.as_millis(),
            "subject finished"
        );
        RunResult {
            exit_code,
            signal: status.and_then(exit_signal),
            stdout,
            stderr,
            elapsed,
            timed_out: completion == Completion::TimedOut,
            escalated: completion == Completion::Escalated,
        }
    }
}

/// Extracts the terminating signal from an exit status.
#[cfg(unix)]
fn exit_signal(status: ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

/// Signals do not exist on this platform.
#[cfg(not(unix))]
const fn exit_signal(_status: ExitStatus) -> Option<i32> {
    None
}

// crates/sanity-harness/src/runner/supervised.rs
// ============================================================================
// Module: Supervised Process
// Description: Handle for a long-running subject process.
// Purpose: Observe side effects mid-flight, then stop with escalation.
// Dependencies: tokio, tracing
// ============================================================================

use std::time::Duration;

use super::ChildProcess;
use super::Completion;
use super::RunError;
use super::RunResult;
use super::signal;

/// A running subject process started by [`super::ProcessRunner::run_supervised`].
///
/// Dropping the handle kills the process; call [`SupervisedProcess::stop`] to
/// get a cooperative shutdown and the captured output.
#[derive(Debug)]
pub struct SupervisedProcess {
    /// Spawned child and its capture tasks.
    process: ChildProcess,
    /// Bound on pipe draining after the child is reaped.
    drain_grace: Duration,
    /// Bound on reaping a child after a forceful kill.
    reap_timeout: Duration,
}

impl SupervisedProcess {
    /// Wraps a freshly spawned child.
    pub(super) const fn new(
        process: ChildProcess,
        drain_grace: Duration,
        reap_timeout: Duration,
    ) -> Self {
        Self {
            process,
            drain_grace,
            reap_timeout,
        }
    }

    /// Returns the OS process id, if the platform reported one.
    #[must_use]
    pub const fn pid(&self) -> Option<u32> {
        self.process.pid
    }

    /// Returns true while the process has not exited.
    pub fn is_running(&mut self) -> bool {
        matches!(self.process.child.try_wait(), Ok(None))
    }

    /// Requests a cooperative exit, waits up to `grace`, then kills.
    ///
    /// A process that already exited on its own is reaped as-is. If the
    /// cooperative signal cannot be delivered the stop escalates at once.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::Wait`] when the child cannot be waited on.
    pub async fn stop(mut self, grace: Duration) -> Result<RunResult, RunError> {
        let exited =
            self.process.child.try_wait().map_err(|source| self.process.wait_error(source))?;
        if let Some(status) = exited {
            tracing::debug!(path = %self.process.path, "subject exited before stop");
            return Ok(self.process.finish(Some(status), Completion::Exited, self.drain_grace).await);
        }

        match signal::request_stop(&mut self.process.child, self.process.pid) {
            Ok(()) => {
                match tokio::time::timeout(grace, self.process.child.wait()).await {
                    Ok(status) => {
                        let status = status.map_err(|source| self.process.wait_error(source))?;
                        return Ok(self
                            .process
                            .finish(Some(status), Completion::Exited, self.drain_grace)
                            .await);
                    }
                    Err(_) => tracing::warn!(
                        path = %self.process.path,
                        grace_ms = grace.as_millis(),
                        "subject ignored stop request, escalating to kill"
                    ),
                }
            }
            Err(err) => tracing::warn!(
                path = %self.process.path,
                error = %err,
                "stop request failed, escalating to kill"
            ),
        }

        let status = self.process.kill_and_reap(self.reap_timeout).await;
        Ok(self.process.finish(status, Completion::Escalated, self.drain_grace).await)
    }
}

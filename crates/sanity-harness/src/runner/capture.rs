// crates/sanity-harness/src/runner/capture.rs
// ============================================================================
// Module: Output Capture
// Description: Background draining of child stdout/stderr pipes.
// Purpose: Keep pipes flowing while the child runs; release text only after exit.
// Dependencies: tokio, tracing
// ============================================================================

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;
use std::time::Duration;

use tokio::io::AsyncRead;
use tokio::io::AsyncReadExt;
use tokio::process::Child;
use tokio::task::JoinHandle;

/// Read chunk size for pipe draining.
const CHUNK_BYTES: usize = 8 * 1024;

/// Shared byte buffer filled by a pipe reader task.
type SharedBuffer = Arc<Mutex<Vec<u8>>>;

/// One drained pipe.
#[derive(Debug)]
struct PipeReader {
    /// Bytes read so far.
    buffer: SharedBuffer,
    /// Reader task; `None` when the pipe was not available.
    task: Option<JoinHandle<()>>,
}

impl PipeReader {
    /// Starts draining `pipe` into a fresh buffer.
    fn start<R>(pipe: Option<R>) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let buffer = SharedBuffer::default();
        let task = pipe.map(|pipe| tokio::spawn(pump(pipe, Arc::clone(&buffer))));
        Self {
            buffer,
            task,
        }
    }

    /// Waits for EOF until `deadline`, then returns whatever was read.
    async fn collect(mut self, deadline: tokio::time::Instant) -> String {
        if let Some(task) = self.task.as_mut()
            && tokio::time::timeout_at(deadline, &mut *task).await.is_err()
        {
            // A descendant still holds the pipe open; keep what we have.
            task.abort();
            tracing::debug!("output pipe still open after drain grace");
        }
        String::from_utf8_lossy(&lock(&self.buffer)).into_owned()
    }
}

/// Background readers for a child's stdout and stderr.
#[derive(Debug)]
pub(super) struct OutputCapture {
    /// Standard output reader.
    stdout: PipeReader,
    /// Standard error reader.
    stderr: PipeReader,
}

impl OutputCapture {
    /// Takes the child's pipes and starts draining them.
    pub(super) fn attach(child: &mut Child) -> Self {
        Self {
            stdout: PipeReader::start(child.stdout.take()),
            stderr: PipeReader::start(child.stderr.take()),
        }
    }

    /// Finishes both readers within a shared `grace` budget.
    pub(super) async fn finish(self, grace: Duration) -> (String, String) {
        let deadline = tokio::time::Instant::now() + grace;
        let stdout = self.stdout.collect(deadline).await;
        let stderr = self.stderr.collect(deadline).await;
        (stdout, stderr)
    }
}

/// Copies a pipe into the shared buffer until EOF or a read error.
async fn pump<R>(mut pipe: R, buffer: SharedBuffer)
where
    R: AsyncRead + Unpin,
{
    let mut chunk = vec![0_u8; CHUNK_BYTES];
    loop {
        match pipe.read(&mut chunk).await {
            Ok(0) => break,
            Ok(read) => lock(&buffer).extend_from_slice(&chunk[..read]),
            Err(err) => {
                tracing::debug!(error = %err, "output pipe read failed");
                break;
            }
        }
    }
}

/// Locks a buffer, recovering the data from a poisoned mutex.
fn lock(buffer: &Mutex<Vec<u8>>) -> MutexGuard<'_, Vec<u8>> {
    buffer.lock().unwrap_or_else(PoisonError::into_inner)
}

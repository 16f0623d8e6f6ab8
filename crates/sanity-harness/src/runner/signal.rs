// crates/sanity-harness/src/runner/signal.rs
// ============================================================================
// Module: Termination Signals
// Description: Cooperative and forceful termination of subject processes.
// Dependencies: nix (unix), tokio
// ============================================================================

use std::io;

use tokio::process::Child;

/// Asks the process group to exit (SIGTERM on Unix).
#[cfg(unix)]
pub(super) fn request_stop(_child: &mut Child, pid: Option<u32>) -> io::Result<()> {
    match pid {
        Some(pid) => signal_group(pid, nix::sys::signal::Signal::SIGTERM),
        None => Ok(()),
    }
}

/// Without cooperative signals the only available stop is a kill.
#[cfg(not(unix))]
pub(super) fn request_stop(child: &mut Child, _pid: Option<u32>) -> io::Result<()> {
    child.start_kill()
}

/// Kills the process group (SIGKILL on Unix) and the child handle itself.
pub(super) fn force_kill(child: &mut Child, pid: Option<u32>) -> io::Result<()> {
    #[cfg(unix)]
    {
        if let Some(pid) = pid {
            signal_group(pid, nix::sys::signal::Signal::SIGKILL)?;
        }
    }
    #[cfg(not(unix))]
    let _ = pid;
    match child.start_kill() {
        Ok(()) => Ok(()),
        // Already reaped by the group kill above.
        Err(err) if err.kind() == io::ErrorKind::InvalidInput => Ok(()),
        Err(err) => Err(err),
    }
}

/// Kills whatever is left in the process group of an already reaped leader.
///
/// A group id stays reserved while any member is alive, so this never hits
/// an unrelated process.
#[cfg(unix)]
pub(super) fn kill_group_remnants(pid: Option<u32>) -> io::Result<()> {
    match pid {
        Some(pid) => signal_group(pid, nix::sys::signal::Signal::SIGKILL),
        None => Ok(()),
    }
}

/// Descendants cannot be addressed as a group here.
#[cfg(not(unix))]
pub(super) const fn kill_group_remnants(_pid: Option<u32>) -> io::Result<()> {
    Ok(())
}

/// Sends `signal` to the process group led by `pid`; a vanished group is fine.
#[cfg(unix)]
fn signal_group(pid: u32, signal: nix::sys::signal::Signal) -> io::Result<()> {
    use nix::errno::Errno;
    use nix::sys::signal::killpg;
    use nix::unistd::Pid;

    let raw = i32::try_from(pid).map_err(|_| {
        io::Error::new(io::ErrorKind::InvalidInput, format!("pid {pid} out of range"))
    })?;
    tracing::debug!(pid, signal = signal.as_str(), "signalling process group");
    match killpg(Pid::from_raw(raw), signal) {
        Ok(()) | Err(Errno::ESRCH) => Ok(()),
        Err(errno) => Err(io::Error::from(errno)),
    }
}

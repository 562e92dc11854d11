//! Signal a detached gateway by PID (no `Child` handle survives the CLI run).

use std::io;
use std::path::Path;

#[cfg(unix)]
use std::time::Duration;
#[cfg(unix)]
use tokio::time::sleep;

#[cfg(unix)]
use nix::errno::Errno;
#[cfg(unix)]
use nix::sys::signal::{self, Signal};
#[cfg(unix)]
use nix::unistd::Pid;

use sysinfo::{ProcessesToUpdate, System};

/// Kill a process by PID with SIGTERM → SIGKILL escalation.
///
/// # Strategy
/// 1. Send SIGTERM
/// 2. Poll for up to 2 seconds to verify exit
/// 3. If still alive, send SIGKILL
/// 4. Poll again for up to 2 seconds
///
/// # Returns
/// - `Ok(())` if the process was killed or already gone
/// - `Err` if signalling fails (excluding ESRCH)
pub async fn kill_pid(pid: u32) -> io::Result<()> {
    #[cfg(unix)]
    {
        kill_pid_unix(pid).await
    }

    #[cfg(not(unix))]
    {
        let _ = pid;
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "gateway termination is only implemented on Unix",
        ))
    }
}

#[cfg(unix)]
fn to_nix_pid(pid: u32) -> io::Result<Pid> {
    i32::try_from(pid)
        .map(Pid::from_raw)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, format!("pid {pid} out of range")))
}

#[cfg(unix)]
async fn kill_pid_unix(pid: u32) -> io::Result<()> {
    let nix_pid = to_nix_pid(pid)?;

    for sig in [Signal::SIGTERM, Signal::SIGKILL] {
        match signal::kill(nix_pid, sig) {
            Ok(()) => {}
            Err(Errno::ESRCH) => return Ok(()),
            Err(e) => return Err(io::Error::other(e)),
        }

        for _ in 0..20 {
            sleep(Duration::from_millis(100)).await;
            // Null signal: existence check only.
            if signal::kill(nix_pid, None) == Err(Errno::ESRCH) {
                return Ok(());
            }
        }
    }

    Err(io::Error::new(
        io::ErrorKind::TimedOut,
        format!("process {pid} did not exit after SIGKILL"),
    ))
}

/// Check if a PID exists (without verifying what it is).
#[cfg(unix)]
pub fn pid_exists(pid: u32) -> bool {
    let Ok(nix_pid) = to_nix_pid(pid) else {
        return false;
    };
    match signal::kill(nix_pid, None) {
        Ok(()) => true,
        Err(Errno::ESRCH) => false,
        // Exists but we lack permission.
        Err(_) => true,
    }
}

#[cfg(not(unix))]
pub fn pid_exists(pid: u32) -> bool {
    let mut sys = System::new();
    let sys_pid = sysinfo::Pid::from_u32(pid);
    sys.refresh_processes(ProcessesToUpdate::Some(&[sys_pid]), true);
    sys.process(sys_pid).is_some()
}

/// Whether `pid` is running `program`, judged by process name or command line.
///
/// Returns `false` if the process cannot be inspected. Protects against
/// signalling an unrelated process that inherited a recycled PID.
pub fn process_matches(pid: u32, program: &str) -> bool {
    let wanted = Path::new(program)
        .file_name()
        .map_or_else(|| program.to_string(), |n| n.to_string_lossy().into_owned());

    let mut sys = System::new();
    let sys_pid = sysinfo::Pid::from_u32(pid);
    sys.refresh_processes(ProcessesToUpdate::Some(&[sys_pid]), true);
    let Some(process) = sys.process(sys_pid) else {
        return false;
    };

    if process.name().to_string_lossy() == wanted.as_str() {
        return true;
    }
    process.cmd().iter().any(|arg| {
        Path::new(arg)
            .file_name()
            .is_some_and(|name| name.to_string_lossy() == wanted.as_str())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::process::Command;

    #[test]
    #[cfg(unix)]
    fn pid_exists_for_self() {
        assert!(pid_exists(std::process::id()));
    }

    #[test]
    #[cfg(unix)]
    fn pid_exists_false_for_impossible_pid() {
        assert!(!pid_exists(999_999));
    }

    #[tokio::test]
    #[cfg(unix)]
    async fn kill_pid_handles_already_gone() {
        assert!(kill_pid(999_999).await.is_ok());
    }

    #[tokio::test]
    #[cfg(unix)]
    async fn kill_pid_terminates_process() {
        let mut child = Command::new("sleep").arg("60").spawn().expect("failed to spawn sleep");
        let pid = child.id().expect("no PID");

        assert!(process_matches(pid, "sleep"));
        assert!(!process_matches(pid, "chatrig-gateway"));

        // Unreaped, the child lingers as a zombie, so kill_pid may time out here.
        if let Err(e) = kill_pid(pid).await {
            eprintln!("kill_pid failed: {e}");
        }
        let _ = child.wait().await;
        assert!(!pid_exists(pid));
    }
}

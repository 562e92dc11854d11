//! Subprocess helpers shared by the docker and gateway adapters.

use std::process::{Output, Stdio};

use chatrig_core::RuntimeError;
use tokio::process::Command;
use tracing::debug;

/// `program arg1 arg2 ...` for logs and errors.
pub fn command_line(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run to completion with captured output. A non-zero exit is not an error here.
pub async fn output(program: &str, args: &[String]) -> Result<Output, RuntimeError> {
    debug!(command = %command_line(program, args), "Running command");
    Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| RuntimeError::Spawn {
            command: command_line(program, args),
            reason: e.to_string(),
        })
}

/// Run to completion; a non-zero exit becomes [`RuntimeError::Exited`].
pub async fn run_checked(program: &str, args: &[String]) -> Result<Output, RuntimeError> {
    let out = output(program, args).await?;
    if out.status.success() {
        Ok(out)
    } else {
        Err(RuntimeError::Exited {
            command: command_line(program, args),
            status: out.status.to_string(),
            stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
        })
    }
}

/// Run with inherited stdio until the process exits.
pub async fn run_inherited(program: &str, args: &[String]) -> Result<(), RuntimeError> {
    let status = Command::new(program)
        .args(args)
        .status()
        .await
        .map_err(|e| RuntimeError::Spawn {
            command: command_line(program, args),
            reason: e.to_string(),
        })?;
    if status.success() {
        Ok(())
    } else {
        Err(RuntimeError::Exited {
            command: command_line(program, args),
            status: status.to_string(),
            stderr: String::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[cfg(unix)]
    async fn non_zero_exit_is_reported_with_stderr() {
        let args = vec!["-c".to_string(), "echo boom >&2; exit 3".to_string()];
        let err = run_checked("sh", &args).await.unwrap_err();
        match err {
            RuntimeError::Exited { command, stderr, .. } => {
                assert!(command.starts_with("sh -c"));
                assert_eq!(stderr, "boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_program_is_a_spawn_error() {
        let err = output("chatrig-definitely-not-installed", &[]).await.unwrap_err();
        assert!(matches!(err, RuntimeError::Spawn { .. }));
    }
}

//! Launches the routing gateway as a detached background process or in the
//! foreground.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use chatrig_core::{GatewayLauncher, GatewaySpec, RuntimeError};
use tokio::process::Command;
use tracing::{debug, info};

use super::pid::{kill_pid, pid_exists, process_matches};

#[derive(Debug, Clone)]
pub struct ProcessGatewayLauncher {
    /// Program name a tracked PID must still be running to count as alive.
    program: String,
    /// Background output goes here; discarded when `None`.
    log_file: Option<PathBuf>,
}

impl ProcessGatewayLauncher {
    pub fn new(program: impl Into<String>, log_file: Option<PathBuf>) -> Self {
        Self {
            program: program.into(),
            log_file,
        }
    }

    fn output_stdio(&self, command: &str) -> Result<(Stdio, Stdio), RuntimeError> {
        let Some(path) = &self.log_file else {
            return Ok((Stdio::null(), Stdio::null()));
        };
        let spawn_err = |e: std::io::Error| RuntimeError::Spawn {
            command: command.to_string(),
            reason: format!("cannot open log file {}: {e}", path.display()),
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(spawn_err)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(spawn_err)?;
        let err = file.try_clone().map_err(spawn_err)?;
        Ok((Stdio::from(file), Stdio::from(err)))
    }
}

#[async_trait]
impl GatewayLauncher for ProcessGatewayLauncher {
    async fn spawn(&self, spec: &GatewaySpec) -> Result<u32, RuntimeError> {
        let command = spec.command_line();
        let (stdout, stderr) = self.output_stdio(&command)?;

        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args)
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(stderr);
        // Own process group: a Ctrl-C in the launching terminal must not reach it.
        #[cfg(unix)]
        cmd.process_group(0);

        let child = cmd.spawn().map_err(|e| RuntimeError::Spawn {
            command: command.clone(),
            reason: e.to_string(),
        })?;
        let pid = child.id().ok_or_else(|| RuntimeError::Spawn {
            command: command.clone(),
            reason: "process exited immediately".to_string(),
        })?;

        info!(pid, %command, "Spawned gateway");
        Ok(pid)
    }

    async fn run_foreground(
        &self,
        spec: &GatewaySpec,
        started: &(dyn Fn(u32) + Send + Sync),
    ) -> Result<(), RuntimeError> {
        let command = spec.command_line();
        let spawn_err = |e: std::io::Error| RuntimeError::Spawn {
            command: command.clone(),
            reason: e.to_string(),
        };

        let mut child = Command::new(&spec.program)
            .args(&spec.args)
            .spawn()
            .map_err(spawn_err)?;
        if let Some(pid) = child.id() {
            info!(pid, %command, "Gateway running in the foreground");
            started(pid);
        }

        let status = child.wait().await.map_err(spawn_err)?;
        if status.success() {
            Ok(())
        } else {
            Err(RuntimeError::Exited {
                command,
                status: status.to_string(),
                stderr: String::new(),
            })
        }
    }

    async fn terminate(&self, pid: u32) -> Result<(), RuntimeError> {
        kill_pid(pid).await.map_err(|e| RuntimeError::Signal {
            pid,
            reason: e.to_string(),
        })
    }

    fn is_alive(&self, pid: u32) -> bool {
        if !pid_exists(pid) {
            return false;
        }
        let matches = process_matches(pid, &self.program);
        if !matches {
            debug!(pid, program = %self.program, "PID belongs to another process");
        }
        matches
    }
}

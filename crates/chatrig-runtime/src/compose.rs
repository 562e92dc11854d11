//! `ServiceRuntime` over the docker CLI.
//!
//! Stacks go through `docker compose`; single containers through
//! `docker inspect`, `docker restart` and `docker exec`. No retries.

use async_trait::async_trait;
use chatrig_core::{ExecOutput, RuntimeError, ServiceRuntime, StackSpec};
use tracing::{debug, info};

use crate::command::{output, run_checked, run_inherited};

/// Default container CLI.
pub const DEFAULT_DOCKER_BINARY: &str = "docker";

#[derive(Debug, Clone)]
pub struct DockerComposeRuntime {
    docker: String,
}

impl Default for DockerComposeRuntime {
    fn default() -> Self {
        Self::new(DEFAULT_DOCKER_BINARY)
    }
}

impl DockerComposeRuntime {
    pub fn new(docker: impl Into<String>) -> Self {
        Self {
            docker: docker.into(),
        }
    }

    /// `compose -f <file>... [--profile <p>]... <action>...`
    pub fn compose_args(stack: &StackSpec, action: &[&str]) -> Vec<String> {
        let mut args = vec!["compose".to_string()];
        for file in &stack.compose_files {
            args.push("-f".to_string());
            args.push(file.display().to_string());
        }
        for profile in &stack.profiles {
            args.push("--profile".to_string());
            args.push(profile.clone());
        }
        args.extend(action.iter().map(|a| (*a).to_string()));
        args
    }

    fn ensure_files_exist(stack: &StackSpec) -> Result<(), RuntimeError> {
        match stack.compose_files.iter().find(|f| !f.is_file()) {
            Some(missing) => Err(RuntimeError::ComposeFileMissing(missing.display().to_string())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ServiceRuntime for DockerComposeRuntime {
    async fn start(&self, stack: &StackSpec) -> Result<(), RuntimeError> {
        Self::ensure_files_exist(stack)?;
        run_checked(&self.docker, &Self::compose_args(stack, &["up", "-d"])).await?;
        info!(file = %stack.primary_file(), "Compose stack up");
        Ok(())
    }

    async fn stop(&self, stack: &StackSpec) -> Result<(), RuntimeError> {
        Self::ensure_files_exist(stack)?;
        run_checked(
            &self.docker,
            &Self::compose_args(stack, &["down", "--remove-orphans"]),
        )
        .await?;
        info!(file = %stack.primary_file(), "Compose stack down");
        Ok(())
    }

    async fn is_running(&self, container: &str) -> Result<bool, RuntimeError> {
        let args = vec![
            "inspect".to_string(),
            "-f".to_string(),
            "{{.State.Running}}".to_string(),
            container.to_string(),
        ];
        let out = output(&self.docker, &args).await?;
        // inspect fails for unknown containers; that just means "not running".
        if !out.status.success() {
            debug!(container, "Container not found");
            return Ok(false);
        }
        Ok(String::from_utf8_lossy(&out.stdout).trim() == "true")
    }

    async fn restart(&self, container: &str) -> Result<(), RuntimeError> {
        run_checked(&self.docker, &["restart".to_string(), container.to_string()]).await?;
        Ok(())
    }

    async fn exec(&self, container: &str, command: &[String]) -> Result<ExecOutput, RuntimeError> {
        let mut args = vec!["exec".to_string(), container.to_string()];
        args.extend(command.iter().cloned());
        let out = output(&self.docker, &args).await?;
        Ok(ExecOutput {
            success: out.status.success(),
            stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
        })
    }

    async fn logs(&self, stack: &StackSpec) -> Result<(), RuntimeError> {
        Self::ensure_files_exist(stack)?;
        run_inherited(
            &self.docker,
            &Self::compose_args(stack, &["logs", "-f", "--tail", "200"]),
        )
        .await
    }
}

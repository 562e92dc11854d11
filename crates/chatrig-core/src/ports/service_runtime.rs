//! Container runtime port.
//!
//! Treats the runtime as a start/stop/inspect/exec capability over a compose
//! stack and individually named containers.

use std::path::PathBuf;

use async_trait::async_trait;

use super::RuntimeError;

/// The compose invocation for one operating mode.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StackSpec {
    /// Primary compose file first, overlays after it.
    pub compose_files: Vec<PathBuf>,
    /// Compose profiles to activate.
    pub profiles: Vec<String>,
}

impl StackSpec {
    pub fn new(compose_files: Vec<PathBuf>) -> Self {
        Self {
            compose_files,
            profiles: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profiles.push(profile.into());
        self
    }

    /// The primary compose file, used in error messages.
    pub fn primary_file(&self) -> String {
        self.compose_files
            .first()
            .map_or_else(|| "(no compose file)".to_string(), |p| p.display().to_string())
    }

    pub fn has_profile(&self, profile: &str) -> bool {
        self.profiles.iter().any(|p| p == profile)
    }
}

/// Captured output of a command run inside a container.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExecOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

#[async_trait]
pub trait ServiceRuntime: Send + Sync {
    /// Bring the stack up detached.
    async fn start(&self, stack: &StackSpec) -> Result<(), RuntimeError>;

    /// Tear the stack down.
    async fn stop(&self, stack: &StackSpec) -> Result<(), RuntimeError>;

    /// Whether a container with this name is running. A missing container is `false`.
    async fn is_running(&self, container: &str) -> Result<bool, RuntimeError>;

    async fn restart(&self, container: &str) -> Result<(), RuntimeError>;

    /// Run an ephemeral command inside a running container.
    async fn exec(&self, container: &str, command: &[String]) -> Result<ExecOutput, RuntimeError>;

    /// Follow the stack's logs until interrupted.
    async fn logs(&self, stack: &StackSpec) -> Result<(), RuntimeError>;
}

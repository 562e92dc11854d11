//! Gateway process port.

use async_trait::async_trait;

use super::RuntimeError;

/// How to launch the routing gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewaySpec {
    pub program: String,
    pub args: Vec<String>,
    /// Port the gateway listens on once ready.
    pub port: u16,
}

impl GatewaySpec {
    /// The full command line, for logs and error messages.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[async_trait]
pub trait GatewayLauncher: Send + Sync {
    /// Spawn in the background and return the PID.
    async fn spawn(&self, spec: &GatewaySpec) -> Result<u32, RuntimeError>;

    /// Run in the foreground until the process exits.
    ///
    /// `started` receives the PID once the process is running, before the wait.
    async fn run_foreground(
        &self,
        spec: &GatewaySpec,
        started: &(dyn Fn(u32) + Send + Sync),
    ) -> Result<(), RuntimeError>;

    /// Graceful termination with a forced fallback.
    async fn terminate(&self, pid: u32) -> Result<(), RuntimeError>;

    /// Whether a process with this PID still exists.
    fn is_alive(&self, pid: u32) -> bool;
}

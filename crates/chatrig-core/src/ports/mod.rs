//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces the controller expects from infrastructure.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No subprocess or socket types in any signature
//! - Intent-based methods (`start` a stack, `is_running` a container)
//! - Implementations live in `chatrig-runtime`; tests use in-memory fakes

pub mod config_store;
pub mod gateway_launcher;
pub mod port_probe;
pub mod service_runtime;

use std::sync::Arc;
use thiserror::Error;

pub use config_store::{ConfigStoreError, FrontendConfigStore, StoreSnapshot};
pub use gateway_launcher::{GatewayLauncher, GatewaySpec};
#[cfg(test)]
pub use port_probe::MockPortProbe;
pub use port_probe::PortProbe;
pub use service_runtime::{ExecOutput, ServiceRuntime, StackSpec};

/// Container for every port the controller drives.
///
/// Lives in core so the controller can accept it without depending on the
/// runtime crate. The CLI bootstrap fills it with real adapters.
#[derive(Clone)]
pub struct Ports {
    /// Container runtime (compose up/down, inspect, exec).
    pub runtime: Arc<dyn ServiceRuntime>,
    /// Gateway process launcher.
    pub gateway: Arc<dyn GatewayLauncher>,
    /// TCP/HTTP readiness probes.
    pub probe: Arc<dyn PortProbe>,
    /// The front-end's persisted configuration.
    pub config_store: Arc<dyn FrontendConfigStore>,
}

impl Ports {
    pub fn new(
        runtime: Arc<dyn ServiceRuntime>,
        gateway: Arc<dyn GatewayLauncher>,
        probe: Arc<dyn PortProbe>,
        config_store: Arc<dyn FrontendConfigStore>,
    ) -> Self {
        Self {
            runtime,
            gateway,
            probe,
            config_store,
        }
    }
}

/// Errors from the container runtime and the gateway launcher.
///
/// Every variant names the command or file involved so a hard failure can be
/// reported without further context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// The command could not be spawned at all.
    #[error("failed to run '{command}': {reason}")]
    Spawn { command: String, reason: String },

    /// The command ran and exited unsuccessfully.
    #[error("'{command}' failed ({status}): {stderr}")]
    Exited {
        command: String,
        status: String,
        stderr: String,
    },

    /// A compose file named by the stack does not exist.
    #[error("compose file not found: {0}")]
    ComposeFileMissing(String),

    /// Signalling a process failed.
    #[error("failed to signal pid {pid}: {reason}")]
    Signal { pid: u32, reason: String },
}

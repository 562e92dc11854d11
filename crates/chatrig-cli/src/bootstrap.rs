//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the CLI adapter:
//! - Docker compose runtime and the container-backed config store
//! - Gateway process launcher and network probe (via chatrig-runtime)
//! - The stack controller (via chatrig-core)
//!
//! Command handlers receive the composed [`CliContext`] and delegate to it.

use std::path::PathBuf;
use std::sync::Arc;

use chatrig_core::{Ports, ServiceRuntime, StackController, StackPaths, StackSettings};
use chatrig_runtime::{
    ContainerConfigStore, DockerComposeRuntime, NetworkProbe, ProcessGatewayLauncher,
};
use tracing::debug;

use crate::error::CliError;

/// Gateway output file, kept next to the PID file.
const GATEWAY_LOG: &str = "gateway.log";

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// `--secrets` override; beats `CHATRIG_SECRETS_FILE` only when set.
    pub secrets: Option<PathBuf>,
}

/// Fully composed application context for CLI commands.
pub struct CliContext {
    pub controller: StackController,
}

impl CliContext {
    pub const fn paths(&self) -> &StackPaths {
        self.controller.paths()
    }

    pub const fn settings(&self) -> &StackSettings {
        self.controller.settings()
    }
}

/// Resolve paths and settings, then build every adapter.
pub fn bootstrap(config: CliConfig) -> Result<CliContext, CliError> {
    let paths = StackPaths::resolve()?;
    let mut settings = StackSettings::from_env()?;
    if config.secrets.is_some() {
        settings.secrets_file = config.secrets;
    }

    let gateway_spec = settings.gateway_spec();
    let gateway_log = paths.gateway_state.with_file_name(GATEWAY_LOG);
    debug!(
        root = %paths.config_root.display(),
        gateway = %gateway_spec.command_line(),
        "Bootstrapping chatrig"
    );

    let runtime: Arc<dyn ServiceRuntime> = Arc::new(DockerComposeRuntime::default());
    let config_store = ContainerConfigStore::new(Arc::clone(&runtime));
    let ports = Ports::new(
        Arc::clone(&runtime),
        Arc::new(ProcessGatewayLauncher::new(
            gateway_spec.program,
            Some(gateway_log),
        )),
        Arc::new(NetworkProbe::default()),
        Arc::new(config_store),
    );

    Ok(CliContext {
        controller: StackController::new(ports, paths, settings),
    })
}

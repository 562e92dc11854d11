//! Stack controller - orchestrates start/stop/status/restart for a mode.
//!
//! Configuration synthesis always runs on `start`, whatever the mode. The
//! runtime calls that follow split into hard steps (stack up/down, gateway
//! launch) that abort with a [`ControllerError`], and best-effort steps
//! (label sync, state bookkeeping) that are logged and reported.

use std::sync::OnceLock;

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

use crate::credentials::CredentialLoader;
use crate::domain::{
    FrontendStatus, GatewayStatus, Mode, ModelSource, ProxyStatus, ReconcileOutcome, ServiceKind,
    ServiceState, StatusReport, StepOutcome,
};
use crate::paths::{PathError, StackPaths};
use crate::ports::{Ports, RuntimeError, StackSpec};
use crate::settings::StackSettings;
use crate::state::{
    GatewayState, StateFileError, clear_status_cache, delete_gateway_state, read_gateway_state,
    write_gateway_state, write_status_cache,
};

use super::label_reconciler::LabelReconciler;
use super::proxy_config::proxy_enabled;
use super::synthesis::{Synthesis, synthesize};

/// Front-end container name.
pub const FRONTEND_CONTAINER: &str = "open-webui";

/// Container name used by older stack definitions.
pub const LEGACY_FRONTEND_CONTAINER: &str = "openwebui";

/// Proxy container name.
pub const PROXY_CONTAINER: &str = "litellm";

/// Compose profile gating the proxy service.
pub const PROXY_PROFILE: &str = "litellm";

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("failed to write generated configuration: {0}")]
    Config(#[from] PathError),

    #[error("failed to start the front-end stack ({file}): {source}")]
    StackStart {
        file: String,
        #[source]
        source: RuntimeError,
    },

    #[error("failed to stop the front-end stack ({file}): {source}")]
    StackStop {
        file: String,
        #[source]
        source: RuntimeError,
    },

    #[error("failed to run gateway '{command}': {source}")]
    Gateway {
        command: String,
        #[source]
        source: RuntimeError,
    },

    #[error(transparent)]
    State(#[from] StateFileError),
}

/// What `start` did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StartReport {
    pub mode: Mode,
    pub launched: Vec<ServiceKind>,
    pub proxy_enabled: bool,
    pub endpoint_count: usize,
    pub gateway_pid: Option<u32>,
    /// `None` unless a background gateway was launched.
    pub gateway_ready: Option<bool>,
    /// `None` when the mode launches no front-end.
    pub labels: Option<StepOutcome>,
    pub label_outcome: Option<ReconcileOutcome>,
    pub frontend_restarted: bool,
}

impl StartReport {
    fn new(mode: Mode, synthesis: &Synthesis) -> Self {
        Self {
            mode,
            launched: Vec::new(),
            proxy_enabled: synthesis.proxy_enabled,
            endpoint_count: synthesis.endpoints.len(),
            gateway_pid: None,
            gateway_ready: None,
            labels: None,
            label_outcome: None,
            frontend_restarted: false,
        }
    }
}

/// What `stop` did besides tearing the stack down.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StopReport {
    /// Tracked gateway PID that was signalled.
    pub terminated_gateway: Option<u32>,
    /// Tracked gateway PID that no longer existed.
    pub stale_gateway: Option<u32>,
    /// Best-effort failures, already logged.
    pub warnings: Vec<String>,
}

struct LabelSync {
    outcome: StepOutcome,
    reconcile: Option<ReconcileOutcome>,
    restarted: bool,
}

/// Drives the stack through its ports.
pub struct StackController {
    ports: Ports,
    paths: StackPaths,
    settings: StackSettings,
}

impl StackController {
    pub fn new(ports: Ports, paths: StackPaths, settings: StackSettings) -> Self {
        Self {
            ports,
            paths,
            settings,
        }
    }

    pub const fn paths(&self) -> &StackPaths {
        &self.paths
    }

    pub const fn settings(&self) -> &StackSettings {
        &self.settings
    }

    /// The compose invocation for `mode`.
    pub fn stack_spec(&self, mode: Mode, proxy: bool) -> StackSpec {
        let spec = StackSpec::new(self.settings.compose_files(mode, &self.paths.stack_dir));
        if proxy { spec.with_profile(PROXY_PROFILE) } else { spec }
    }

    pub async fn start(&self, mode: Mode) -> Result<StartReport, ControllerError> {
        info!(%mode, "Starting stack");
        let synthesis = synthesize(&self.paths, self.settings.secrets_file.as_deref())?;
        let mut report = StartReport::new(mode, &synthesis);

        match mode {
            Mode::Full => {
                self.launch_gateway(&mut report).await?;
                self.launch_frontend(mode, &synthesis, &mut report).await?;
            }
            Mode::Simple => {
                self.launch_frontend(mode, &synthesis, &mut report).await?;
            }
            Mode::Gateway => {
                // Foreground run blocks until the gateway exits.
                self.clear_cache();
                self.run_gateway_foreground(&mut report).await?;
                return Ok(report);
            }
        }

        self.clear_cache();
        Ok(report)
    }

    async fn launch_gateway(&self, report: &mut StartReport) -> Result<(), ControllerError> {
        let spec = self.settings.gateway_spec();
        let pid = self
            .ports
            .gateway
            .spawn(&spec)
            .await
            .map_err(|source| ControllerError::Gateway {
                command: spec.command_line(),
                source,
            })?;
        info!(pid, command = %spec.command_line(), "Gateway launched");
        report.gateway_pid = Some(pid);
        report.launched.push(ServiceKind::Gateway);
        self.record_gateway(pid);

        let ready = self
            .ports
            .probe
            .wait_ready(spec.port, self.settings.timings.gateway_ready)
            .await;
        if !ready {
            warn!(port = spec.port, "Gateway not ready in time; continuing");
        }
        report.gateway_ready = Some(ready);
        Ok(())
    }

    /// The state file exists exactly while the foreground gateway runs.
    async fn run_gateway_foreground(&self, report: &mut StartReport) -> Result<(), ControllerError> {
        let spec = self.settings.gateway_spec();
        info!(command = %spec.command_line(), "Running gateway in the foreground");
        report.launched.push(ServiceKind::Gateway);

        let started_pid = OnceLock::new();
        let on_started = |pid: u32| {
            let _ = started_pid.set(pid);
            self.record_gateway(pid);
        };
        let result = self.ports.gateway.run_foreground(&spec, &on_started).await;
        report.gateway_pid = started_pid.get().copied();

        if let Err(e) = delete_gateway_state(&self.paths.gateway_state) {
            warn!(error = %e, "Failed to remove gateway state");
        }
        result.map_err(|source| ControllerError::Gateway {
            command: spec.command_line(),
            source,
        })
    }

    fn record_gateway(&self, pid: u32) {
        let state = GatewayState {
            pid,
            started_at: Utc::now(),
        };
        if let Err(e) = write_gateway_state(&self.paths.gateway_state, &state) {
            warn!(pid, error = %e, "Failed to record gateway state");
        }
    }

    async fn launch_frontend(
        &self,
        mode: Mode,
        synthesis: &Synthesis,
        report: &mut StartReport,
    ) -> Result<(), ControllerError> {
        let stack = self.stack_spec(mode, synthesis.proxy_enabled);
        info!(file = %stack.primary_file(), profiles = ?stack.profiles, "Launching front-end stack");
        self.ports
            .runtime
            .start(&stack)
            .await
            .map_err(|source| ControllerError::StackStart {
                file: stack.primary_file(),
                source,
            })?;

        report.launched.push(ServiceKind::Frontend);
        if synthesis.proxy_enabled {
            report.launched.push(ServiceKind::Proxy);
        }

        let sync = self.sync_labels(synthesis).await;
        report.labels = Some(sync.outcome);
        report.label_outcome = sync.reconcile;
        report.frontend_restarted = sync.restarted;
        Ok(())
    }

    async fn sync_labels(&self, synthesis: &Synthesis) -> LabelSync {
        let mut sync = LabelSync {
            outcome: StepOutcome::Ok,
            reconcile: None,
            restarted: false,
        };

        let Some(container) = self.wait_for_frontend().await else {
            warn!("Front-end did not come up; skipping label sync");
            sync.outcome = StepOutcome::Degraded("front-end container is not running".into());
            return sync;
        };

        let reconciler = LabelReconciler::new(self.ports.config_store.clone());
        match reconciler.reconcile(&container, &synthesis.desired_labels()).await {
            Ok(ReconcileOutcome::Unchanged) => {
                sync.reconcile = Some(ReconcileOutcome::Unchanged);
            }
            Ok(ReconcileOutcome::Updated) => {
                sync.reconcile = Some(ReconcileOutcome::Updated);
                match self.ports.runtime.restart(&container).await {
                    Ok(()) => {
                        info!(%container, "Restarted front-end to apply labels");
                        sync.restarted = true;
                    }
                    Err(e) => {
                        warn!(%container, error = %e, "Labels written but restart failed");
                        sync.outcome =
                            StepOutcome::Degraded(format!("labels written but restart failed: {e}"));
                    }
                }
            }
            Ok(ReconcileOutcome::MissingStore) => {
                warn!("Front-end config store not initialised yet; labels not applied");
                sync.reconcile = Some(ReconcileOutcome::MissingStore);
                sync.outcome = StepOutcome::Degraded("front-end config store not initialised".into());
            }
            Err(e) => {
                warn!(error = %e, "Label sync failed");
                sync.outcome = StepOutcome::Failed(e.to_string());
            }
        }
        sync
    }

    /// Poll until a front-end container runs or the readiness window closes.
    async fn wait_for_frontend(&self) -> Option<String> {
        let deadline = Instant::now() + self.settings.timings.frontend_ready;
        loop {
            if let Some(name) = self.running_frontend().await {
                return Some(name);
            }
            if Instant::now() >= deadline {
                return None;
            }
            sleep(self.settings.timings.frontend_poll).await;
        }
    }

    async fn running_frontend(&self) -> Option<String> {
        for name in [FRONTEND_CONTAINER, LEGACY_FRONTEND_CONTAINER] {
            if self.container_running(name).await {
                return Some(name.to_string());
            }
        }
        None
    }

    async fn container_running(&self, name: &str) -> bool {
        match self.ports.runtime.is_running(name).await {
            Ok(running) => running,
            Err(e) => {
                debug!(container = name, error = %e, "Container probe failed");
                false
            }
        }
    }

    /// Tear everything down. State files are removed even when teardown fails.
    pub async fn stop(&self) -> Result<StopReport, ControllerError> {
        let mut report = StopReport::default();

        let gateway = match read_gateway_state(&self.paths.gateway_state) {
            Ok(state) => state,
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable gateway state");
                report.warnings.push(e.to_string());
                None
            }
        };

        // A recorded gateway means the last start was `full`.
        let mode = if gateway.is_some() { Mode::Full } else { Mode::Simple };
        let stack = self.stack_spec(mode, true);
        info!(file = %stack.primary_file(), "Stopping front-end stack");
        let teardown = self.ports.runtime.stop(&stack).await;

        if let Some(state) = gateway {
            if self.ports.gateway.is_alive(state.pid) {
                match self.ports.gateway.terminate(state.pid).await {
                    Ok(()) => {
                        info!(pid = state.pid, "Gateway terminated");
                        report.terminated_gateway = Some(state.pid);
                    }
                    Err(e) => {
                        warn!(pid = state.pid, error = %e, "Failed to terminate gateway");
                        report.warnings.push(e.to_string());
                    }
                }
            } else {
                debug!(pid = state.pid, "Tracked gateway already gone");
                report.stale_gateway = Some(state.pid);
            }
        }

        if let Err(e) = delete_gateway_state(&self.paths.gateway_state) {
            warn!(error = %e, "Failed to remove gateway state");
            report.warnings.push(e.to_string());
        }
        if let Err(e) = clear_status_cache(&self.paths.status_cache) {
            warn!(error = %e, "Failed to clear status cache");
            report.warnings.push(e.to_string());
        }

        teardown.map_err(|source| ControllerError::StackStop {
            file: stack.primary_file(),
            source,
        })?;
        Ok(report)
    }

    /// Probe every service independently. Never fails.
    pub async fn status(&self) -> StatusReport {
        let frontend_container = self.running_frontend().await;

        let proxy = if self.container_running(PROXY_CONTAINER).await {
            ProxyStatus::Running
        } else if proxy_enabled(&self.load_credentials()) {
            ProxyStatus::Stopped
        } else {
            ProxyStatus::NotApplicable
        };

        let probe = &self.ports.probe;
        let gateway_port = self.settings.gateway_port;
        let gateway_running = probe.is_listening(gateway_port).await;
        let gateway_pid = read_gateway_state(&self.paths.gateway_state)
            .ok()
            .flatten()
            .map(|s| s.pid);

        let model_source = if probe.is_listening(self.settings.model_port).await {
            ModelSource::Local {
                port: self.settings.model_port,
            }
        } else {
            match self.settings.tunnel_port {
                Some(port) if probe.is_listening(port).await => {
                    ModelSource::Remote { tunnel_port: port }
                }
                _ => ModelSource::None,
            }
        };

        let report = StatusReport {
            frontend: FrontendStatus {
                state: ServiceState::from_running(frontend_container.is_some()),
                container: frontend_container,
                url: self.settings.webui_url.clone(),
            },
            proxy,
            gateway: GatewayStatus {
                state: ServiceState::from_running(gateway_running),
                port: gateway_port,
                pid: gateway_pid,
            },
            model_source,
            checked_at: Utc::now(),
        };

        if let Err(e) = write_status_cache(&self.paths.status_cache, &report) {
            warn!(error = %e, "Failed to write status cache");
        }
        report
    }

    /// `stop`, pause, `start`. A failed stop aborts before anything is started.
    pub async fn restart(&self, mode: Mode) -> Result<StartReport, ControllerError> {
        self.stop().await?;
        sleep(self.settings.timings.restart_pause).await;
        self.start(mode).await
    }

    /// Follow the stack logs.
    pub async fn logs(&self) -> Result<(), RuntimeError> {
        let proxy = proxy_enabled(&self.load_credentials());
        let mode = match read_gateway_state(&self.paths.gateway_state) {
            Ok(Some(_)) => Mode::Full,
            _ => Mode::Simple,
        };
        self.ports.runtime.logs(&self.stack_spec(mode, proxy)).await
    }

    fn load_credentials(&self) -> crate::credentials::CredentialMap {
        CredentialLoader::for_stack(&self.paths, self.settings.secrets_file.as_deref()).load()
    }

    fn clear_cache(&self) {
        if let Err(e) = clear_status_cache(&self.paths.status_cache) {
            warn!(error = %e, "Failed to clear status cache");
        }
    }
}

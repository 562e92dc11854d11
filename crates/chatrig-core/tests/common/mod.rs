//! In-memory fakes of every port plus a harness wiring them to a controller.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chatrig_core::services::{
    FRONTEND_CONTAINER, LEGACY_FRONTEND_CONTAINER, PROXY_CONTAINER, PROXY_PROFILE,
};
use chatrig_core::{
    ConfigStoreError, ExecOutput, FrontendConfigStore, GatewayLauncher, GatewaySpec, PortProbe,
    Ports, RuntimeError, ServiceRuntime, StackController, StackPaths, StackSettings, StackSpec,
    StackTimings, StoreSnapshot,
};
use serde_json::Value;
use tempfile::TempDir;

/// Container runtime that tracks running containers in a set.
#[derive(Default)]
pub struct FakeRuntime {
    pub running: Mutex<HashSet<String>>,
    pub started: Mutex<Vec<StackSpec>>,
    pub stopped: Mutex<Vec<StackSpec>>,
    pub restarts: Mutex<Vec<String>>,
    pub followed: Mutex<Vec<StackSpec>>,
    /// When set, `start` succeeds without bringing the front-end up.
    pub frontend_stays_down: Mutex<bool>,
    /// When set, the stack brings the front-end up under its legacy name.
    pub legacy_frontend: Mutex<bool>,
    pub fail_start: Mutex<bool>,
    pub fail_stop: Mutex<bool>,
}

impl FakeRuntime {
    pub fn is_up(&self, container: &str) -> bool {
        self.running.lock().unwrap().contains(container)
    }

    pub fn restart_count(&self) -> usize {
        self.restarts.lock().unwrap().len()
    }

    fn failure(command: &str) -> RuntimeError {
        RuntimeError::Exited {
            command: command.to_string(),
            status: "exit status: 1".to_string(),
            stderr: "simulated failure".to_string(),
        }
    }
}

#[async_trait]
impl ServiceRuntime for FakeRuntime {
    async fn start(&self, stack: &StackSpec) -> Result<(), RuntimeError> {
        if *self.fail_start.lock().unwrap() {
            return Err(Self::failure("docker compose up"));
        }
        self.started.lock().unwrap().push(stack.clone());
        let mut running = self.running.lock().unwrap();
        if !*self.frontend_stays_down.lock().unwrap() {
            let name = if *self.legacy_frontend.lock().unwrap() {
                LEGACY_FRONTEND_CONTAINER
            } else {
                FRONTEND_CONTAINER
            };
            running.insert(name.to_string());
        }
        if stack.has_profile(PROXY_PROFILE) {
            running.insert(PROXY_CONTAINER.to_string());
        }
        Ok(())
    }

    async fn stop(&self, stack: &StackSpec) -> Result<(), RuntimeError> {
        self.stopped.lock().unwrap().push(stack.clone());
        if *self.fail_stop.lock().unwrap() {
            return Err(Self::failure("docker compose down"));
        }
        self.running.lock().unwrap().clear();
        Ok(())
    }

    async fn is_running(&self, container: &str) -> Result<bool, RuntimeError> {
        Ok(self.is_up(container))
    }

    async fn restart(&self, container: &str) -> Result<(), RuntimeError> {
        self.restarts.lock().unwrap().push(container.to_string());
        Ok(())
    }

    async fn exec(&self, _container: &str, _command: &[String]) -> Result<ExecOutput, RuntimeError> {
        Ok(ExecOutput {
            success: true,
            ..ExecOutput::default()
        })
    }

    async fn logs(&self, stack: &StackSpec) -> Result<(), RuntimeError> {
        self.followed.lock().unwrap().push(stack.clone());
        Ok(())
    }
}

/// Gateway launcher handing out sequential PIDs.
pub struct FakeGateway {
    next_pid: AtomicU32,
    pub alive: Mutex<HashSet<u32>>,
    pub terminated: Mutex<Vec<u32>>,
    pub foreground_runs: Mutex<Vec<GatewaySpec>>,
    /// Contents of the state file while each foreground run was in progress.
    pub state_during_foreground: Mutex<Vec<Option<String>>>,
    pub fail_foreground: Mutex<bool>,
    ports: Mutex<HashMap<u32, u16>>,
    state_file: PathBuf,
    /// Probe shared with the harness; a spawned gateway starts listening.
    probe: Arc<FakeProbe>,
}

impl FakeGateway {
    fn new(probe: Arc<FakeProbe>, state_file: PathBuf) -> Self {
        Self {
            next_pid: AtomicU32::new(4000),
            alive: Mutex::new(HashSet::new()),
            terminated: Mutex::new(Vec::new()),
            foreground_runs: Mutex::new(Vec::new()),
            state_during_foreground: Mutex::new(Vec::new()),
            fail_foreground: Mutex::new(false),
            ports: Mutex::new(HashMap::new()),
            state_file,
            probe,
        }
    }

    fn next_pid(&self) -> u32 {
        self.next_pid.fetch_add(1, Ordering::SeqCst)
    }
}

#[async_trait]
impl GatewayLauncher for FakeGateway {
    async fn spawn(&self, spec: &GatewaySpec) -> Result<u32, RuntimeError> {
        let pid = self.next_pid();
        self.alive.lock().unwrap().insert(pid);
        self.ports.lock().unwrap().insert(pid, spec.port);
        self.probe.listen(spec.port);
        Ok(pid)
    }

    async fn run_foreground(
        &self,
        spec: &GatewaySpec,
        started: &(dyn Fn(u32) + Send + Sync),
    ) -> Result<(), RuntimeError> {
        self.foreground_runs.lock().unwrap().push(spec.clone());
        started(self.next_pid());
        self.state_during_foreground
            .lock()
            .unwrap()
            .push(std::fs::read_to_string(&self.state_file).ok());

        if *self.fail_foreground.lock().unwrap() {
            return Err(RuntimeError::Exited {
                command: spec.command_line(),
                status: "exit status: 2".to_string(),
                stderr: String::new(),
            });
        }
        Ok(())
    }

    async fn terminate(&self, pid: u32) -> Result<(), RuntimeError> {
        self.alive.lock().unwrap().remove(&pid);
        if let Some(port) = self.ports.lock().unwrap().remove(&pid) {
            self.probe.unlisten(port);
        }
        self.terminated.lock().unwrap().push(pid);
        Ok(())
    }

    fn is_alive(&self, pid: u32) -> bool {
        self.alive.lock().unwrap().contains(&pid)
    }
}

/// Ports that "listen" only when told to.
#[derive(Default)]
pub struct FakeProbe {
    listening: Mutex<HashSet<u16>>,
}

impl FakeProbe {
    pub fn listen(&self, port: u16) {
        self.listening.lock().unwrap().insert(port);
    }

    pub fn unlisten(&self, port: u16) {
        self.listening.lock().unwrap().remove(&port);
    }
}

#[async_trait]
impl PortProbe for FakeProbe {
    async fn is_listening(&self, port: u16) -> bool {
        self.listening.lock().unwrap().contains(&port)
    }

    async fn wait_ready(&self, port: u16, _timeout: Duration) -> bool {
        self.is_listening(port).await
    }
}

/// Front-end config store backed by a single JSON row.
pub struct FakeStore {
    pub snapshot: Mutex<StoreSnapshot>,
    pub saves: Mutex<Vec<(Option<i64>, Value)>>,
    /// Container named by every load and save, in call order.
    pub containers: Mutex<Vec<String>>,
}

impl FakeStore {
    pub fn with(snapshot: StoreSnapshot) -> Self {
        Self {
            snapshot: Mutex::new(snapshot),
            saves: Mutex::new(Vec::new()),
            containers: Mutex::new(Vec::new()),
        }
    }

    pub fn save_count(&self) -> usize {
        self.saves.lock().unwrap().len()
    }

    pub fn data(&self) -> Value {
        match &*self.snapshot.lock().unwrap() {
            StoreSnapshot::Missing => Value::Null,
            StoreSnapshot::Row { data, .. } => data.clone(),
        }
    }

    pub fn replace_data(&self, data: Value) {
        *self.snapshot.lock().unwrap() = StoreSnapshot::Row { id: Some(1), data };
    }
}

#[async_trait]
impl FrontendConfigStore for FakeStore {
    async fn load(&self, container: &str) -> Result<StoreSnapshot, ConfigStoreError> {
        self.containers.lock().unwrap().push(container.to_string());
        Ok(self.snapshot.lock().unwrap().clone())
    }

    async fn save(
        &self,
        container: &str,
        id: Option<i64>,
        data: &Value,
    ) -> Result<(), ConfigStoreError> {
        self.containers.lock().unwrap().push(container.to_string());
        self.saves.lock().unwrap().push((id, data.clone()));
        *self.snapshot.lock().unwrap() = StoreSnapshot::Row {
            id: Some(id.unwrap_or(1)),
            data: data.clone(),
        };
        Ok(())
    }
}

/// A controller over fakes, rooted in a temp directory.
pub struct Harness {
    pub dir: TempDir,
    pub runtime: Arc<FakeRuntime>,
    pub gateway: Arc<FakeGateway>,
    pub probe: Arc<FakeProbe>,
    pub store: Arc<FakeStore>,
    pub controller: StackController,
}

impl Harness {
    /// Harness whose user secrets file holds `secrets`.
    pub fn new(secrets: &str) -> Self {
        Self::with_settings(secrets, StackSettings::default())
    }

    pub fn with_settings(secrets: &str, settings: StackSettings) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let paths = StackPaths::under(dir.path(), None);
        std::fs::write(&paths.user_secrets, secrets).unwrap();

        let runtime = Arc::new(FakeRuntime::default());
        let probe = Arc::new(FakeProbe::default());
        let gateway = Arc::new(FakeGateway::new(probe.clone(), paths.gateway_state.clone()));
        let store = Arc::new(FakeStore::with(StoreSnapshot::Row {
            id: Some(1),
            data: serde_json::json!({}),
        }));

        let ports = Ports::new(runtime.clone(), gateway.clone(), probe.clone(), store.clone());
        let controller = StackController::new(
            ports,
            paths,
            settings.with_timings(StackTimings::zero()),
        );

        Self {
            dir,
            runtime,
            gateway,
            probe,
            store,
            controller,
        }
    }

    pub fn paths(&self) -> &StackPaths {
        self.controller.paths()
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn read(&self, path: &Path) -> String {
        std::fs::read_to_string(path).unwrap()
    }

    pub fn write_secrets(&self, contents: &str) {
        std::fs::write(&self.paths().user_secrets, contents).unwrap();
    }

    pub fn file(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }
}

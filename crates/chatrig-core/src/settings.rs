//! Stack settings collected from the environment.
//!
//! Every tunable has a default; only malformed values are errors. Services
//! receive a `StackSettings` value and never read the environment themselves.

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::domain::Mode;
use crate::ports::GatewaySpec;

/// Default port of the routing gateway.
pub const DEFAULT_GATEWAY_PORT: u16 = 8000;

/// Default port of a locally running model server.
pub const DEFAULT_MODEL_PORT: u16 = 11434;

/// Front-end URL shown by `status` and opened by `open`.
pub const DEFAULT_WEBUI_URL: &str = "http://localhost:3000";

/// Gateway program when `CHATRIG_GATEWAY_CMD` is unset.
pub const DEFAULT_GATEWAY_PROGRAM: &str = "chatrig-gateway";

pub const SECRETS_FILE_ENV: &str = "CHATRIG_SECRETS_FILE";
pub const COMPOSE_FILE_ENV: &str = "CHATRIG_COMPOSE_FILE";
pub const COMPOSE_OVERLAYS_ENV: &str = "CHATRIG_COMPOSE_OVERLAYS";
pub const WEBUI_URL_ENV: &str = "CHATRIG_WEBUI_URL";
pub const GATEWAY_CMD_ENV: &str = "CHATRIG_GATEWAY_CMD";
pub const GATEWAY_PORT_ENV: &str = "CHATRIG_GATEWAY_PORT";
pub const MODEL_PORT_ENV: &str = "CHATRIG_MODEL_PORT";
pub const TUNNEL_PORT_ENV: &str = "CHATRIG_TUNNEL_PORT";

const SIMPLE_COMPOSE_FILE: &str = "docker-compose.yml";
const FULL_COMPOSE_FILE: &str = "docker-compose.full.yml";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("{var} must be a port number between 1 and 65535, got '{value}'")]
    InvalidPort { var: &'static str, value: String },

    #[error("{GATEWAY_CMD_ENV} is set but empty")]
    EmptyGatewayCommand,
}

/// Bounded waits and pauses used by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackTimings {
    /// Gateway readiness wait in `full` mode.
    pub gateway_ready: Duration,
    /// How long to wait for the front-end container before syncing labels.
    pub frontend_ready: Duration,
    /// Interval between front-end readiness polls.
    pub frontend_poll: Duration,
    /// Pause between stop and start on restart.
    pub restart_pause: Duration,
}

impl Default for StackTimings {
    fn default() -> Self {
        Self {
            gateway_ready: Duration::from_secs(30),
            frontend_ready: Duration::from_secs(60),
            frontend_poll: Duration::from_secs(2),
            restart_pause: Duration::from_secs(2),
        }
    }
}

impl StackTimings {
    /// No waiting at all.
    pub const fn zero() -> Self {
        Self {
            gateway_ready: Duration::ZERO,
            frontend_ready: Duration::ZERO,
            frontend_poll: Duration::ZERO,
            restart_pause: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackSettings {
    /// Highest-priority credential source.
    pub secrets_file: Option<PathBuf>,
    /// Replaces the mode's default compose file.
    pub compose_file: Option<PathBuf>,
    /// Extra compose files layered after the primary one.
    pub compose_overlays: Vec<PathBuf>,
    pub webui_url: String,
    /// Custom gateway command line, already split.
    pub gateway_command: Option<Vec<String>>,
    pub gateway_port: u16,
    pub model_port: u16,
    /// Local end of the tunnel to a remote model server.
    pub tunnel_port: Option<u16>,
    pub timings: StackTimings,
}

impl Default for StackSettings {
    fn default() -> Self {
        Self {
            secrets_file: None,
            compose_file: None,
            compose_overlays: Vec::new(),
            webui_url: DEFAULT_WEBUI_URL.to_string(),
            gateway_command: None,
            gateway_port: DEFAULT_GATEWAY_PORT,
            model_port: DEFAULT_MODEL_PORT,
            tunnel_port: None,
            timings: StackTimings::default(),
        }
    }
}

impl StackSettings {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read settings through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SettingsError> {
        let get = |var: &str| lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let gateway_command = match lookup(GATEWAY_CMD_ENV) {
            None => None,
            Some(raw) => {
                let parts: Vec<String> = raw.split_whitespace().map(str::to_string).collect();
                if parts.is_empty() {
                    return Err(SettingsError::EmptyGatewayCommand);
                }
                Some(parts)
            }
        };

        Ok(Self {
            secrets_file: get(SECRETS_FILE_ENV).map(PathBuf::from),
            compose_file: get(COMPOSE_FILE_ENV).map(PathBuf::from),
            compose_overlays: get(COMPOSE_OVERLAYS_ENV)
                .map(|raw| {
                    raw.split(':')
                        .map(str::trim)
                        .filter(|p| !p.is_empty())
                        .map(PathBuf::from)
                        .collect()
                })
                .unwrap_or_default(),
            webui_url: get(WEBUI_URL_ENV).unwrap_or_else(|| DEFAULT_WEBUI_URL.to_string()),
            gateway_command,
            gateway_port: parse_port(GATEWAY_PORT_ENV, get(GATEWAY_PORT_ENV))?
                .unwrap_or(DEFAULT_GATEWAY_PORT),
            model_port: parse_port(MODEL_PORT_ENV, get(MODEL_PORT_ENV))?
                .unwrap_or(DEFAULT_MODEL_PORT),
            tunnel_port: parse_port(TUNNEL_PORT_ENV, get(TUNNEL_PORT_ENV))?,
            timings: StackTimings::default(),
        })
    }

    #[must_use]
    pub const fn with_timings(mut self, timings: StackTimings) -> Self {
        self.timings = timings;
        self
    }

    /// Compose files for `mode`: the primary file, then the overlays.
    pub fn compose_files(&self, mode: Mode, stack_dir: &Path) -> Vec<PathBuf> {
        let primary = self.compose_file.clone().unwrap_or_else(|| {
            stack_dir.join(match mode {
                Mode::Full => FULL_COMPOSE_FILE,
                Mode::Simple | Mode::Gateway => SIMPLE_COMPOSE_FILE,
            })
        });
        std::iter::once(primary)
            .chain(self.compose_overlays.iter().cloned())
            .collect()
    }

    pub fn gateway_spec(&self) -> GatewaySpec {
        match &self.gateway_command {
            Some(parts) => GatewaySpec {
                program: parts[0].clone(),
                args: parts[1..].to_vec(),
                port: self.gateway_port,
            },
            None => GatewaySpec {
                program: DEFAULT_GATEWAY_PROGRAM.to_string(),
                args: vec!["--port".to_string(), self.gateway_port.to_string()],
                port: self.gateway_port,
            },
        }
    }
}

fn parse_port(var: &'static str, value: Option<String>) -> Result<Option<u16>, SettingsError> {
    value
        .map(|raw| match raw.parse::<u16>() {
            Ok(port) if port > 0 => Ok(port),
            _ => Err(SettingsError::InvalidPort { var, value: raw }),
        })
        .transpose()
}

//! The probe record behind `status`, rendered either as JSON or as text.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::service::ServiceState;

/// Proxy state relative to the credentials that would enable it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProxyStatus {
    Running,
    Stopped,
    /// Not running and not enabled by the current credentials.
    NotApplicable,
}

impl std::fmt::Display for ProxyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Running => "running",
            Self::Stopped => "stopped",
            Self::NotApplicable => "not applicable",
        })
    }
}

/// Where models are served from, if anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ModelSource {
    None,
    Local { port: u16 },
    Remote { tunnel_port: u16 },
}

impl std::fmt::Display for ModelSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::Local { port } => write!(f, "local (port {port})"),
            Self::Remote { tunnel_port } => write!(f, "remote (tunnel port {tunnel_port})"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrontendStatus {
    pub state: ServiceState,
    /// Container name that answered the probe.
    pub container: Option<String>,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GatewayStatus {
    pub state: ServiceState,
    pub port: u16,
    /// PID from the state file, when one was recorded.
    pub pid: Option<u32>,
}

/// One independent probe of every service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub frontend: FrontendStatus,
    pub proxy: ProxyStatus,
    pub gateway: GatewayStatus,
    pub model_source: ModelSource,
    pub checked_at: DateTime<Utc>,
}

impl StatusReport {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// Three-line human report built from the same record as the JSON form.
    pub fn render_text(&self) -> String {
        let frontend = match (&self.frontend.state, &self.frontend.container) {
            (ServiceState::Running, Some(name)) => {
                format!("running ({name}, {})", self.frontend.url)
            }
            (ServiceState::Running, None) => format!("running ({})", self.frontend.url),
            (ServiceState::Stopped, _) => "stopped".to_string(),
        };
        let gateway = match (self.gateway.state, self.gateway.pid) {
            (ServiceState::Running, Some(pid)) => {
                format!("running (port {}, pid {pid})", self.gateway.port)
            }
            (ServiceState::Running, None) => format!("running (port {})", self.gateway.port),
            (ServiceState::Stopped, _) => format!("stopped (port {})", self.gateway.port),
        };

        format!(
            "front-end:    {frontend}; proxy {}\ngateway:      {gateway}\nmodel source: {}",
            self.proxy, self.model_source
        )
    }
}

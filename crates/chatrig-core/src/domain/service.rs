//! Operating modes and the services they manage.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which set of services `start` brings up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Front-end stack only.
    #[default]
    Simple,
    /// Background gateway, then the front-end stack.
    Full,
    /// Gateway only, in the foreground.
    Gateway,
}

impl Mode {
    pub const ALL: [Self; 3] = [Self::Simple, Self::Full, Self::Gateway];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Full => "full",
            Self::Gateway => "gateway",
        }
    }

    /// Whether this mode launches the compose stack.
    pub const fn launches_frontend(self) -> bool {
        matches!(self, Self::Simple | Self::Full)
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown mode '{0}' (expected simple, full or gateway)")]
pub struct ParseModeError(pub String);

impl FromStr for Mode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseModeError(s.to_string()))
    }
}

/// The services `start` can launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceKind {
    Frontend,
    Proxy,
    Gateway,
}

impl std::fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Frontend => "front-end",
            Self::Proxy => "proxy",
            Self::Gateway => "gateway",
        })
    }
}

/// Probe-derived state. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceState {
    Stopped,
    Running,
}

impl ServiceState {
    pub const fn from_running(running: bool) -> Self {
        if running { Self::Running } else { Self::Stopped }
    }

    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_parses_case_insensitively() {
        assert_eq!("FULL".parse::<Mode>().unwrap(), Mode::Full);
        assert_eq!(" simple ".parse::<Mode>().unwrap(), Mode::Simple);
        assert!("turbo".parse::<Mode>().is_err());
    }

    #[test]
    fn default_mode_is_simple() {
        assert_eq!(Mode::default(), Mode::Simple);
        assert!(!Mode::Gateway.launches_frontend());
    }

    #[test]
    fn every_service_kind_is_something_start_launches() {
        let labels: Vec<String> = [ServiceKind::Frontend, ServiceKind::Proxy, ServiceKind::Gateway]
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(labels, ["front-end", "proxy", "gateway"]);
    }
}

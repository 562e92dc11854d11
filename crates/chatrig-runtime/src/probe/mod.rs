//! TCP and HTTP readiness probes.

mod http;
mod tcp;

use std::time::Duration;

use async_trait::async_trait;
use chatrig_core::PortProbe;
use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

pub use http::{HealthCheck, check_http_health};
pub use tcp::is_listening;

/// Probes services on localhost.
#[derive(Debug, Clone)]
pub struct NetworkProbe {
    host: String,
    connect_timeout: Duration,
    poll_interval: Duration,
}

impl Default for NetworkProbe {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            connect_timeout: Duration::from_secs(2),
            poll_interval: Duration::from_secs(1),
        }
    }
}

impl NetworkProbe {
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

#[async_trait]
impl PortProbe for NetworkProbe {
    async fn is_listening(&self, port: u16) -> bool {
        is_listening(&self.host, port, self.connect_timeout).await
    }

    /// Poll `/health` until it answers; any HTTP response counts as ready.
    /// When the window closes, fall back to a plain TCP connect.
    async fn wait_ready(&self, port: u16, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        info!(port, timeout_secs = timeout.as_secs(), "Waiting for service to become ready");

        loop {
            match check_http_health(&self.host, port, self.connect_timeout).await {
                HealthCheck::Healthy => {
                    info!(port, "Service is ready");
                    return true;
                }
                HealthCheck::Responding(status) => {
                    debug!(port, status, "No /health route; service answers HTTP");
                    return true;
                }
                HealthCheck::Unreachable => {}
            }

            if Instant::now() >= deadline {
                break;
            }
            sleep(self.poll_interval).await;
        }

        let listening = self.is_listening(port).await;
        if listening {
            debug!(port, "Port accepts connections but never answered HTTP");
        } else {
            warn!(port, "Service did not become ready in time");
        }
        listening
    }
}

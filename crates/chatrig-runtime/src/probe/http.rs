//! HTTP health checks.

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

/// Outcome of one `/health` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthCheck {
    /// 2xx from `/health`.
    Healthy,
    /// Some other HTTP status: the server is up but has no health route.
    Responding(u16),
    /// No HTTP answer at all.
    Unreachable,
}

/// Make a single request to `http://host:port/health`.
pub async fn check_http_health(host: &str, port: u16, timeout: Duration) -> HealthCheck {
    let url = format!("http://{host}:{port}/health");
    let client = match Client::builder().timeout(timeout).build() {
        Ok(client) => client,
        Err(e) => {
            debug!(error = %e, "Failed to build HTTP client");
            return HealthCheck::Unreachable;
        }
    };

    match client.get(&url).send().await {
        Ok(response) if response.status().is_success() => HealthCheck::Healthy,
        Ok(response) => HealthCheck::Responding(response.status().as_u16()),
        Err(e) => {
            debug!(%url, error = %e, "Health check failed");
            HealthCheck::Unreachable
        }
    }
}

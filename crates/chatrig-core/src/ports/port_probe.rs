//! Readiness probes by port.

use std::time::Duration;

use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PortProbe: Send + Sync {
    /// Whether something accepts TCP connections on localhost:`port`.
    async fn is_listening(&self, port: u16) -> bool;

    /// Poll until the service on `port` is ready or `timeout` elapses.
    async fn wait_ready(&self, port: u16, timeout: Duration) -> bool;
}

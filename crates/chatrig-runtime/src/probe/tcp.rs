use std::time::Duration;

use tokio::net::TcpStream;

/// Whether `host:port` accepts a TCP connection within `timeout`.
pub async fn is_listening(host: &str, port: u16, timeout: Duration) -> bool {
    matches!(
        tokio::time::timeout(timeout, TcpStream::connect((host, port))).await,
        Ok(Ok(_))
    )
}

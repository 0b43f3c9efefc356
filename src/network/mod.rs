//! Network module - Handles the single TCP link between the two peers
//!
//! Provides:
//! - Host side: listen and accept exactly one opponent
//! - Joiner side: dial the host
//! - Connection halves for the receive task and the session

mod client;
mod connection;
mod server;

pub use client::*;
pub use connection::*;
pub use server::*;

use std::net::SocketAddr;

use crate::protocol::{DEFAULT_MAX_FRAME_SIZE, DEFAULT_PORT};

/// Configuration for network operations
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Port to listen on or connect to
    pub port: u16,
    /// Interface the host binds to
    pub bind_address: String,
    /// Optional connect timeout in milliseconds (no timeout when unset)
    pub connect_timeout_ms: Option<u64>,
    /// Maximum bytes accepted in a single inbound frame
    pub max_frame_size: usize,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind_address: "0.0.0.0".to_string(),
            connect_timeout_ms: None,
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
        }
    }
}

impl NetworkConfig {
    pub fn new(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    pub fn with_bind_address(mut self, bind_address: impl Into<String>) -> Self {
        self.bind_address = bind_address.into();
        self
    }

    pub fn with_connect_timeout(mut self, timeout_ms: u64) -> Self {
        self.connect_timeout_ms = Some(timeout_ms);
        self
    }
}

impl From<&crate::config::NetworkConfig> for NetworkConfig {
    fn from(settings: &crate::config::NetworkConfig) -> Self {
        Self {
            port: settings.port,
            bind_address: settings.bind_address.clone(),
            connect_timeout_ms: settings.connect_timeout_ms,
            max_frame_size: settings.max_frame_size,
        }
    }
}

/// Resolve a hostname to a socket address
pub async fn resolve_host(host: &str, port: u16) -> std::io::Result<SocketAddr> {
    use tokio::net::lookup_host;

    let addr_string = format!("{}:{}", host, port);
    let mut addrs = lookup_host(&addr_string).await?;

    addrs.next().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Could not resolve host: {}", host),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builders() {
        let config = NetworkConfig::new(9000)
            .with_bind_address("127.0.0.1")
            .with_connect_timeout(250);
        assert_eq!(config.port, 9000);
        assert_eq!(config.bind_address, "127.0.0.1");
        assert_eq!(config.connect_timeout_ms, Some(250));
        assert_eq!(config.max_frame_size, DEFAULT_MAX_FRAME_SIZE);
    }

    #[test]
    fn test_default_has_no_timeout() {
        assert_eq!(NetworkConfig::default().connect_timeout_ms, None);
    }

    #[tokio::test]
    async fn test_resolve_localhost() {
        let addr = resolve_host("127.0.0.1", 4242).await.unwrap();
        assert_eq!(addr.port(), 4242);
        assert!(addr.ip().is_loopback());
    }
}

//! Host side of the link
//!
//! The host binds a port and accepts exactly one opponent. Once that
//! connection is established the listener is dropped; no further peers are
//! admitted.

use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::TcpListener;

use super::connection::Connection;
use super::NetworkConfig;

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Bind failed: {0}")]
    BindFailed(String),

    #[error("Failed to accept a connection: {0}")]
    AcceptFailed(std::io::Error),
}

pub type ServerResult<T> = Result<T, ServerError>;

/// A bound listener waiting for its single opponent
pub struct HostListener {
    listener: TcpListener,
    max_frame_size: usize,
}

impl HostListener {
    /// Bind to the configured address and port
    pub async fn bind(config: &NetworkConfig) -> ServerResult<Self> {
        let bind_addr = format!("{}:{}", config.bind_address, config.port);
        let listener = TcpListener::bind(&bind_addr).await.map_err(|e| {
            ServerError::BindFailed(format!("Failed to listen on {}: {}", bind_addr, e))
        })?;

        tracing::info!("Listening on {}", listener.local_addr()?);

        Ok(Self {
            listener,
            max_frame_size: config.max_frame_size,
        })
    }

    /// The address actually bound (useful when binding port 0)
    pub fn local_addr(&self) -> ServerResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Block until one opponent connects, then stop listening
    pub async fn accept(self) -> ServerResult<Connection> {
        let (stream, addr) = self
            .listener
            .accept()
            .await
            .map_err(ServerError::AcceptFailed)?;

        tracing::info!("Opponent connected from {}", addr);

        Ok(Connection::new(stream, addr, self.max_frame_size))
    }
}

/// Bind and wait for exactly one inbound connection
pub async fn host_listen(config: &NetworkConfig) -> ServerResult<Connection> {
    HostListener::bind(config).await?.accept().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpStream;

    fn loopback() -> NetworkConfig {
        NetworkConfig::new(0).with_bind_address("127.0.0.1")
    }

    #[tokio::test]
    async fn test_accepts_one_connection() {
        let listener = HostListener::bind(&loopback()).await.unwrap();
        let addr = listener.local_addr().unwrap();
        assert_ne!(addr.port(), 0);

        let dial = tokio::spawn(async move { TcpStream::connect(addr).await });
        let conn = listener.accept().await.unwrap();
        let dialed = dial.await.unwrap().unwrap();

        assert_eq!(conn.remote_addr(), dialed.local_addr().unwrap());
    }

    #[tokio::test]
    async fn test_listener_closed_after_accept() {
        let listener = HostListener::bind(&loopback()).await.unwrap();
        let addr = listener.local_addr().unwrap();

        let dial = tokio::spawn(async move { TcpStream::connect(addr).await });
        let _conn = listener.accept().await.unwrap();
        dial.await.unwrap().unwrap();

        let second = TcpStream::connect(addr).await;
        tokio_test::assert_err!(second);
    }

    #[tokio::test]
    async fn test_bind_conflict() {
        let first = HostListener::bind(&loopback()).await.unwrap();
        let port = first.local_addr().unwrap().port();

        let config = NetworkConfig::new(port).with_bind_address("127.0.0.1");
        let result = HostListener::bind(&config).await;
        assert!(matches!(result, Err(ServerError::BindFailed(_))));
    }
}

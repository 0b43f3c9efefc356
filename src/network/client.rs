//! Joiner side of the link
//!
//! Dials the host and returns the established connection.

use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpStream;

use super::connection::Connection;
use super::NetworkConfig;

/// Client errors
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Could not resolve {host}: {source}")]
    Resolve {
        host: String,
        source: std::io::Error,
    },

    #[error("Failed to connect to {addr}: {source}")]
    ConnectFailed {
        addr: SocketAddr,
        source: std::io::Error,
    },

    #[error("Connection to {0} timed out")]
    Timeout(SocketAddr),
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Dial `address:port`, blocking until the connection completes or fails
pub async fn join_dial(address: &str, port: u16, config: &NetworkConfig) -> ClientResult<Connection> {
    let addr = super::resolve_host(address, port)
        .await
        .map_err(|source| ClientError::Resolve {
            host: address.to_string(),
            source,
        })?;

    tracing::info!("Connecting to {}", addr);

    let connect = TcpStream::connect(addr);
    let result = match config.connect_timeout_ms {
        Some(ms) => tokio::time::timeout(Duration::from_millis(ms), connect)
            .await
            .map_err(|_| ClientError::Timeout(addr))?,
        None => connect.await,
    };

    let stream = result.map_err(|source| ClientError::ConnectFailed { addr, source })?;

    tracing::info!("Connected to host at {}", addr);

    Ok(Connection::new(stream, addr, config.max_frame_size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_dial_listener() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let accept = tokio::spawn(async move { listener.accept().await });

        let conn = join_dial("127.0.0.1", port, &NetworkConfig::default()).await.unwrap();
        assert_eq!(conn.remote_addr().port(), port);
        accept.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_dial_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let result = join_dial("127.0.0.1", port, &NetworkConfig::default()).await;
        assert!(matches!(result, Err(ClientError::ConnectFailed { .. })));
    }
}

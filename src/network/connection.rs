//! Connection handling
//!
//! Wraps the TCP stream shared by the two peers, including:
//! - Splitting into a read half (receive task) and a write half (session)
//! - One-read-per-frame receiving
//! - Traffic statistics

use bytes::{Bytes, BytesMut};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;

/// Connection errors
#[derive(Error, Debug)]
pub enum ConnectionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Connection closed")]
    Closed,
}

pub type ConnectionResult<T> = Result<T, ConnectionError>;

/// Connection statistics, shared between the two halves
#[derive(Debug, Default)]
pub struct ConnectionStats {
    frames_sent: AtomicU64,
    frames_received: AtomicU64,
    bytes_sent: AtomicU64,
    bytes_received: AtomicU64,
}

impl ConnectionStats {
    pub fn frames_sent(&self) -> u64 {
        self.frames_sent.load(Ordering::Relaxed)
    }

    pub fn frames_received(&self) -> u64 {
        self.frames_received.load(Ordering::Relaxed)
    }

    pub fn bytes_sent(&self) -> u64 {
        self.bytes_sent.load(Ordering::Relaxed)
    }

    pub fn bytes_received(&self) -> u64 {
        self.bytes_received.load(Ordering::Relaxed)
    }
}

/// An established connection to the opponent
pub struct Connection {
    /// Remote peer address
    remote_addr: SocketAddr,
    /// The TCP stream
    stream: TcpStream,
    /// Upper bound for one inbound frame
    max_frame_size: usize,
    stats: Arc<ConnectionStats>,
}

impl Connection {
    /// Wrap an established TCP stream
    pub fn new(stream: TcpStream, remote_addr: SocketAddr, max_frame_size: usize) -> Self {
        if let Err(e) = stream.set_nodelay(true) {
            tracing::warn!("Failed to disable Nagle on {}: {}", remote_addr, e);
        }

        Self {
            remote_addr,
            stream,
            max_frame_size,
            stats: Arc::new(ConnectionStats::default()),
        }
    }

    /// Get the remote address
    pub fn remote_addr(&self) -> SocketAddr {
        self.remote_addr
    }

    /// Largest inbound frame this connection accepts
    pub fn max_frame_size(&self) -> usize {
        self.max_frame_size
    }

    /// Split into independently owned read and write halves
    pub fn into_split(self) -> (PeerReader, PeerWriter) {
        let (read, write) = self.stream.into_split();
        let reader = PeerReader {
            remote_addr: self.remote_addr,
            read,
            read_buf: BytesMut::with_capacity(self.max_frame_size),
            max_frame_size: self.max_frame_size,
            stats: self.stats.clone(),
        };
        let writer = PeerWriter {
            remote_addr: self.remote_addr,
            write,
            stats: self.stats,
        };
        (reader, writer)
    }
}

/// Receiving half of a connection
pub struct PeerReader {
    remote_addr: SocketAddr,
    read: OwnedReadHalf,
    read_buf: BytesMut,
    max_frame_size: usize,
    stats: Arc<ConnectionStats>,
}

impl PeerReader {
    /// Block until one frame arrives.
    ///
    /// A frame is whatever a single read returns, up to `max_frame_size` bytes.
    /// Returns `Ok(None)` when the peer closes the connection cleanly.
    pub async fn recv(&mut self) -> ConnectionResult<Option<Bytes>> {
        self.read_buf.clear();
        self.read_buf.reserve(self.max_frame_size);

        let n = (&mut self.read)
            .take(self.max_frame_size as u64)
            .read_buf(&mut self.read_buf)
            .await?;

        if n == 0 {
            return Ok(None);
        }

        self.stats.frames_received.fetch_add(1, Ordering::Relaxed);
        self.stats.bytes_received.fetch_add(n as u64, Ordering::Relaxed);
        tracing::trace!("Read {} bytes from {}", n, self.remote_addr);

        Ok(Some(self.read_buf.split().freeze()))
    }
}

/// Sending half of a connection
pub struct PeerWriter {
    remote_addr: SocketAddr,
    write: OwnedWriteHalf,
    stats: Arc<ConnectionStats>,
}

impl PeerWriter {
    pub fn remote_addr(&self) -> SocketAddr {
        self.remote_addr
    }

    /// Write one whole message
    pub async fn send(&mut self, message: &str) -> ConnectionResult<()> {
        self.write.write_all(message.as_bytes()).await?;
        self.write.flush().await?;

        self.stats.frames_sent.fetch_add(1, Ordering::Relaxed);
        self.stats
            .bytes_sent
            .fetch_add(message.len() as u64, Ordering::Relaxed);

        Ok(())
    }

    /// Shut down the write side; the peer's pending read returns end-of-stream
    pub async fn close(&mut self) -> ConnectionResult<()> {
        self.write.shutdown().await?;
        Ok(())
    }

    pub fn stats(&self) -> &ConnectionStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    async fn pair(max_frame_size: usize) -> (Connection, Connection) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let dial = tokio::spawn(async move { TcpStream::connect(addr).await.unwrap() });
        let (accepted, peer_addr) = listener.accept().await.unwrap();
        let dialed = dial.await.unwrap();
        (
            Connection::new(accepted, peer_addr, max_frame_size),
            Connection::new(dialed, addr, max_frame_size),
        )
    }

    #[tokio::test]
    async fn test_send_and_recv_one_frame() {
        let (host, joiner) = pair(1024).await;
        let (_host_reader, mut host_writer) = host.into_split();
        let (mut joiner_reader, _joiner_writer) = joiner.into_split();

        host_writer.send("move,1,0,0").await.unwrap();
        let frame = joiner_reader.recv().await.unwrap().unwrap();

        assert_eq!(&frame[..], b"move,1,0,0");
        assert_eq!(host_writer.stats().frames_sent(), 1);
        assert_eq!(host_writer.stats().bytes_sent(), 10);
    }

    #[tokio::test]
    async fn test_close_yields_clean_end() {
        let (host, joiner) = pair(1024).await;
        let (_host_reader, mut host_writer) = host.into_split();
        let (mut joiner_reader, _joiner_writer) = joiner.into_split();

        host_writer.close().await.unwrap();
        let frame = tokio_test::assert_ok!(joiner_reader.recv().await);
        assert!(frame.is_none());
    }

    #[tokio::test]
    async fn test_frame_capped_at_max_size() {
        let (host, joiner) = pair(8).await;
        let (_host_reader, mut host_writer) = host.into_split();
        let (mut joiner_reader, _joiner_writer) = joiner.into_split();

        host_writer.send("move,-1,2,2").await.unwrap();
        let first = joiner_reader.recv().await.unwrap().unwrap();
        assert!(first.len() <= 8);
    }
}

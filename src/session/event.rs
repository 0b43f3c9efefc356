//! Session events and the receive task
//!
//! Everything that can change a session arrives as a `SessionEvent` on one
//! bounded channel. The receive task only forwards frames; it never touches
//! game state.

use bytes::Bytes;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::network::PeerReader;

/// Capacity of the session's event channel
pub const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Input to the session's state-transition function
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The local player chose a cell
    Local { row: usize, col: usize },
    /// One raw frame from the opponent
    Remote(Bytes),
    /// The connection failed or the opponent hung up
    TransportClosed(String),
    /// The local player asked to leave
    Quit,
    /// Text for the local player that changes no game state
    Notice(String),
}

/// Spawn the task that blocks on the connection and forwards frames
pub fn spawn_receiver(mut reader: PeerReader, events: mpsc::Sender<SessionEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let event = match reader.recv().await {
                Ok(Some(frame)) => SessionEvent::Remote(frame),
                Ok(None) => SessionEvent::TransportClosed("Opponent closed the connection".to_string()),
                Err(e) => SessionEvent::TransportClosed(format!("Read error: {}", e)),
            };

            let closed = matches!(event, SessionEvent::TransportClosed(_));

            if events.send(event).await.is_err() {
                tracing::debug!("Session dropped, stopping receiver");
                break;
            }

            if closed {
                break;
            }
        }
    })
}

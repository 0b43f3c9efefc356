//! Session module - Keeps two peers' games in lockstep
//!
//! A `Session` owns the rules engine state for one game and is the only thing
//! that mutates it. Local input and frames from the opponent both arrive as
//! `SessionEvent`s on one bounded channel and are applied strictly in the
//! order they are consumed.
//!
//! Lifecycle: `AwaitingConnection -> Playing -> Ended`.

mod event;
mod view;

pub use event::*;
pub use view::*;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::game::{GameResult, GameState, MoveOutcome};
use crate::network::{
    host_listen, join_dial, ClientError, Connection, ConnectionError, ConnectionResult,
    NetworkConfig, PeerWriter, ServerError,
};
use crate::protocol::{self, Move, DEFAULT_MAX_FRAME_SIZE};

/// Session errors
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Host error: {0}")]
    Server(#[from] ServerError),

    #[error("Join error: {0}")]
    Client(#[from] ClientError),

    #[error("Session already has a connection")]
    AlreadyConnected,
}

pub type SessionResult<T> = Result<T, SessionError>;

/// One networked game between this process and a single opponent
pub struct Session {
    role: Role,
    state: GameState,
    phase: SessionPhase,
    last_advisory: Option<String>,
    last_move: Option<Move>,
    max_frame_size: usize,
    writer: Option<PeerWriter>,
    receiver: Option<JoinHandle<()>>,
    event_tx: mpsc::Sender<SessionEvent>,
    event_rx: mpsc::Receiver<SessionEvent>,
}

impl Session {
    /// Create a session waiting for its connection
    pub fn new(role: Role) -> Self {
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        Self {
            role,
            state: GameState::new(),
            phase: SessionPhase::AwaitingConnection,
            last_advisory: None,
            last_move: None,
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
            writer: None,
            receiver: None,
            event_tx,
            event_rx,
        }
    }

    /// Listen on the configured port and play X against the first peer to connect
    pub async fn start_as_host(config: &NetworkConfig) -> SessionResult<Self> {
        let mut session = Self::new(Role::Host);
        tracing::info!("Waiting for an opponent on port {}", config.port);

        let conn = host_listen(config).await?;
        session.attach(conn)?;
        Ok(session)
    }

    /// Dial a host and play O
    pub async fn start_as_joiner(address: &str, config: &NetworkConfig) -> SessionResult<Self> {
        let mut session = Self::new(Role::Joiner);
        tracing::info!("Joining game at {}:{}", address, config.port);

        let conn = join_dial(address, config.port, config).await?;
        session.attach(conn)?;
        Ok(session)
    }

    /// Take ownership of an established connection and start playing
    pub fn attach(&mut self, conn: Connection) -> SessionResult<()> {
        if self.phase != SessionPhase::AwaitingConnection {
            return Err(SessionError::AlreadyConnected);
        }

        let remote_addr = conn.remote_addr();
        self.max_frame_size = conn.max_frame_size();
        let (reader, writer) = conn.into_split();

        self.receiver = Some(spawn_receiver(reader, self.event_tx.clone()));
        self.writer = Some(writer);
        self.phase = SessionPhase::Playing;

        tracing::info!(
            "Playing as {} ({}) against {}",
            self.role.player(),
            self.role,
            remote_addr
        );

        Ok(())
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn is_ended(&self) -> bool {
        matches!(self.phase, SessionPhase::Ended(_))
    }

    /// Sender for feeding local input into the session
    pub fn event_sender(&self) -> mpsc::Sender<SessionEvent> {
        self.event_tx.clone()
    }

    /// Wait for the next event from any source
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        self.event_rx.recv().await
    }

    /// Apply one event
    pub async fn handle_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Local { row, col } => {
                self.submit_local_move(row, col).await;
            }
            SessionEvent::Remote(frame) => self.handle_remote_frame(&frame).await,
            SessionEvent::TransportClosed(reason) => {
                if self.phase == SessionPhase::Playing {
                    tracing::error!("Connection lost: {}", reason);
                    self.finish(EndReason::ConnectionLost(reason)).await;
                } else {
                    tracing::debug!("Transport closed after session end: {}", reason);
                }
            }
            SessionEvent::Quit => self.quit().await,
            SessionEvent::Notice(message) => self.advise(message),
        }
    }

    /// Try to place the local player's mark and send it to the opponent
    pub async fn submit_local_move(&mut self, row: usize, col: usize) -> MoveOutcome {
        if self.phase != SessionPhase::Playing {
            self.advise("The game is not in progress".to_string());
            return MoveOutcome::RejectedGameOver;
        }

        let player = self.role.player();
        let (next, outcome) = self.state.apply_move(player, row, col);

        match outcome {
            MoveOutcome::Applied => {}
            MoveOutcome::RejectedWrongTurn => {
                self.advise(format!(
                    "It's {}'s turn, wait for your opponent",
                    self.state.turn()
                ));
                return outcome;
            }
            MoveOutcome::RejectedOccupied => {
                self.advise(format!("Cell [{}, {}] is already marked", row, col));
                return outcome;
            }
            MoveOutcome::RejectedOutOfBounds => {
                self.advise(format!("Cell [{}, {}] is off the board", row, col));
                return outcome;
            }
            MoveOutcome::RejectedGameOver => {
                self.advise("The game is over".to_string());
                return outcome;
            }
        }

        let mv = Move::new(player, row, col);
        self.commit(next, mv);

        if let Err(e) = self.send(&protocol::encode(&mv)).await {
            tracing::error!("Failed to send move {}: {}", mv, e);
            self.finish(EndReason::ConnectionLost(format!("Write error: {}", e)))
                .await;
            return outcome;
        }

        self.evaluate().await;
        outcome
    }

    /// Decode and apply one frame from the opponent.
    ///
    /// Malformed or illegal frames are discarded with an advisory; they never
    /// end the session.
    pub async fn handle_remote_frame(&mut self, frame: &[u8]) {
        if self.phase != SessionPhase::Playing {
            tracing::debug!("Ignoring frame received outside of play");
            return;
        }

        let mv = match protocol::decode_with_limit(frame, self.max_frame_size) {
            Ok(mv) => mv,
            Err(e) => {
                tracing::warn!(
                    "Discarding malformed frame {:?}: {}",
                    String::from_utf8_lossy(frame),
                    e
                );
                self.advise(format!("Discarded malformed message: {}", e));
                return;
            }
        };

        let opponent = self.role.player().opponent();
        if mv.actor != opponent {
            tracing::warn!("Opponent sent a move for {}", mv.actor);
            self.advise(format!(
                "Ignoring move for {}: opponent plays {}",
                mv.actor, opponent
            ));
            return;
        }

        let (next, outcome) = self.state.apply_move(mv.actor, mv.row, mv.col);

        let advisory = match outcome {
            MoveOutcome::Applied => {
                self.commit(next, mv);
                self.evaluate().await;
                return;
            }
            MoveOutcome::RejectedWrongTurn => format!(
                "Ignoring {}'s move as it's {}'s turn",
                mv.actor,
                self.state.turn()
            ),
            MoveOutcome::RejectedOccupied => format!(
                "Ignoring {}'s move as cell [{}, {}] is not empty",
                mv.actor, mv.row, mv.col
            ),
            MoveOutcome::RejectedOutOfBounds => format!(
                "Ignoring {}'s move to [{}, {}]: off the board",
                mv.actor, mv.row, mv.col
            ),
            MoveOutcome::RejectedGameOver => {
                format!("Ignoring {}'s move: the game is over", mv.actor)
            }
        };

        tracing::warn!("Rejected remote move {}: {:?}", mv, outcome);
        self.advise(advisory);
    }

    /// Leave the game and close the connection
    pub async fn quit(&mut self) {
        if !self.is_ended() {
            tracing::info!("Leaving the game");
            self.finish(EndReason::Quit).await;
        }
    }

    /// Snapshot for rendering
    pub fn current_view(&self) -> SessionView {
        SessionView {
            board: *self.state.board(),
            whose_turn: self.state.turn(),
            local_role: self.role,
            last_advisory: self.last_advisory.clone(),
            last_move: self.last_move,
            result: self.state.result(),
            phase: self.phase.clone(),
        }
    }

    fn advise(&mut self, message: String) {
        tracing::debug!("Advisory: {}", message);
        self.last_advisory = Some(message);
    }

    fn commit(&mut self, next: GameState, mv: Move) {
        tracing::info!("{} marked cell [{}, {}]", mv.actor, mv.row, mv.col);
        self.state = next;
        self.last_move = Some(mv);
        self.last_advisory = None;
    }

    async fn send(&mut self, message: &str) -> ConnectionResult<()> {
        match self.writer.as_mut() {
            Some(writer) => writer.send(message).await,
            None => Err(ConnectionError::Closed),
        }
    }

    async fn evaluate(&mut self) {
        let reason = match self.state.result() {
            GameResult::InProgress => return,
            GameResult::Won(winner) if winner == self.role.player() => EndReason::Victory(winner),
            GameResult::Won(winner) => EndReason::Defeat(winner),
            GameResult::Draw => EndReason::Draw,
        };

        self.finish(reason).await;
    }

    async fn finish(&mut self, reason: EndReason) {
        if self.is_ended() {
            return;
        }

        tracing::info!("Session ended: {}", reason);
        self.phase = SessionPhase::Ended(reason);

        if let Some(receiver) = &self.receiver {
            receiver.abort();
        }

        // Keep the writer alive after shutdown so the socket is not reset
        // before the opponent has read our last move.
        if let Some(writer) = self.writer.as_mut() {
            if let Err(e) = writer.close().await {
                tracing::debug!("Error closing connection: {}", e);
            }

            let stats = writer.stats();
            tracing::debug!(
                "Connection to {}: sent {} frames ({} bytes), received {} frames ({} bytes)",
                writer.remote_addr(),
                stats.frames_sent(),
                stats.bytes_sent(),
                stats.frames_received(),
                stats.bytes_received()
            );
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Some(receiver) = self.receiver.take() {
            receiver.abort();
        }
    }
}

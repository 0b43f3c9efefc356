//! Read-only snapshot of a session for the presentation layer

use std::fmt;

use crate::game::{Board, GameResult, Player};
use crate::protocol::Move;

/// Which side of the link this peer is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Accepted the inbound connection; plays X
    Host,
    /// Dialed out; plays O
    Joiner,
}

impl Role {
    /// The mark this role always plays
    pub fn player(self) -> Player {
        match self {
            Role::Host => Player::X,
            Role::Joiner => Player::O,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Host => write!(f, "host"),
            Role::Joiner => write!(f, "joiner"),
        }
    }
}

/// Why a session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndReason {
    /// The local player completed a line
    Victory(Player),
    /// The opponent completed a line
    Defeat(Player),
    Draw,
    /// Fatal transport failure
    ConnectionLost(String),
    /// The local player left
    Quit,
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndReason::Victory(player) => write!(f, "Player {} wins! You win!", player),
            EndReason::Defeat(player) => write!(f, "Player {} wins! You lose.", player),
            EndReason::Draw => write!(f, "It's a draw!"),
            EndReason::ConnectionLost(reason) => write!(f, "Connection lost: {}", reason),
            EndReason::Quit => write!(f, "You left the game."),
        }
    }
}

/// Lifecycle of a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPhase {
    AwaitingConnection,
    Playing,
    Ended(EndReason),
}

/// Everything the presentation layer needs to draw one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub board: Board,
    pub whose_turn: Player,
    pub local_role: Role,
    pub last_advisory: Option<String>,
    pub last_move: Option<Move>,
    pub result: GameResult,
    pub phase: SessionPhase,
}

impl SessionView {
    pub fn local_player(&self) -> Player {
        self.local_role.player()
    }

    pub fn is_local_turn(&self) -> bool {
        self.phase == SessionPhase::Playing && self.whose_turn == self.local_player()
    }

    pub fn end_reason(&self) -> Option<&EndReason> {
        match &self.phase {
            SessionPhase::Ended(reason) => Some(reason),
            _ => None,
        }
    }
}

//! Keyboard input
//!
//! Commands are typed one per line:
//! - `row col` or `row,col` (zero-based)
//! - a single digit `1`-`9`, numbered left to right, top to bottom
//! - `q` or `quit`

use std::io::BufRead;
use std::thread;
use tokio::sync::mpsc;

use crate::game::BOARD_SIZE;
use crate::session::SessionEvent;

/// A parsed line of user input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Place { row: usize, col: usize },
    Quit,
}

impl From<Command> for SessionEvent {
    fn from(command: Command) -> Self {
        match command {
            Command::Place { row, col } => SessionEvent::Local { row, col },
            Command::Quit => SessionEvent::Quit,
        }
    }
}

/// Parse one line of input. Coordinates are not range-checked here; the
/// session rejects cells that are off the board.
pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();

    if line.eq_ignore_ascii_case("q") || line.eq_ignore_ascii_case("quit") {
        return Some(Command::Quit);
    }

    let parts: Vec<&str> = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .collect();

    match parts.as_slice() {
        [digit] => {
            let n: usize = digit.parse().ok()?;
            if !(1..=BOARD_SIZE * BOARD_SIZE).contains(&n) {
                return None;
            }
            Some(Command::Place {
                row: (n - 1) / BOARD_SIZE,
                col: (n - 1) % BOARD_SIZE,
            })
        }
        [row, col] => Some(Command::Place {
            row: row.parse().ok()?,
            col: col.parse().ok()?,
        }),
        _ => None,
    }
}

/// Turn one line of input into the event it should produce.
///
/// Blank lines produce nothing; unrecognised text becomes a notice so the
/// hint is drawn with the board.
pub fn event_for_line(line: &str) -> Option<SessionEvent> {
    match parse_command(line) {
        Some(command) => Some(command.into()),
        None if line.trim().is_empty() => None,
        None => Some(SessionEvent::Notice(format!(
            "Unrecognised input {:?}. {}",
            line.trim(),
            HELP
        ))),
    }
}

/// Read stdin on a dedicated thread and forward commands to the session.
///
/// End of input is treated as quitting.
pub fn spawn_stdin_reader(events: mpsc::Sender<SessionEvent>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    tracing::warn!("Failed to read input: {}", e);
                    break;
                }
            };

            if let Some(event) = event_for_line(&line) {
                if events.blocking_send(event).is_err() {
                    return;
                }
            }
        }

        let _ = events.blocking_send(SessionEvent::Quit);
    })
}

/// One-line usage hint
pub const HELP: &str = "Enter \"row col\" (0-2) or a cell number 1-9; q to quit.";

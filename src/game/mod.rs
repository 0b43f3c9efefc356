//! Game module - Tic-tac-toe rules engine
//!
//! Pure board logic with no I/O:
//! - Board and cell representation
//! - Move legality and turn alternation
//! - Win and draw detection

mod board;
mod state;

pub use board::*;
pub use state::*;

/// Side length of the square board
pub const BOARD_SIZE: usize = 3;

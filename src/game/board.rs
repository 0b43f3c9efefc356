//! Board representation
//!
//! A fixed 3x3 grid of cells, addressed by (row, col) in row-major order.

use std::fmt;

use super::BOARD_SIZE;

/// One of the two players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    X,
    O,
}

impl Player {
    /// Numeric sign used on the wire and for line arithmetic
    pub fn sign(self) -> i64 {
        match self {
            Player::X => 1,
            Player::O => -1,
        }
    }

    /// Map a sign back to a player
    pub fn from_sign(sign: i64) -> Option<Self> {
        match sign {
            1 => Some(Player::X),
            -1 => Some(Player::O),
            _ => None,
        }
    }

    pub fn opponent(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    pub fn mark(self) -> char {
        match self {
            Player::X => 'X',
            Player::O => 'O',
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mark())
    }
}

/// Content of a single board cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Cell {
    #[default]
    Empty,
    Marked(Player),
}

impl Cell {
    pub fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }
}

/// The eight winning lines: three rows, three columns, two diagonals
pub const WINNING_LINES: [[(usize, usize); 3]; 8] = [
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
    [(0, 0), (1, 1), (2, 2)],
    [(0, 2), (1, 1), (2, 0)],
];

/// A 3x3 tic-tac-toe board
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [[Cell; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a cell, or `None` if the coordinates are off the board
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Row-major snapshot of all cells
    pub fn rows(&self) -> [[Cell; BOARD_SIZE]; BOARD_SIZE] {
        self.cells
    }

    /// Number of non-empty cells
    pub fn marked_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| !cell.is_empty())
            .count()
    }

    pub fn is_full(&self) -> bool {
        self.marked_count() == BOARD_SIZE * BOARD_SIZE
    }

    /// Owner of the first completed line, if any
    pub fn completed_line(&self) -> Option<Player> {
        WINNING_LINES.iter().find_map(|line| {
            let [a, b, c] = line.map(|(row, col)| self.cells[row][col]);
            match a {
                Cell::Marked(player) if a == b && b == c => Some(player),
                _ => None,
            }
        })
    }

    /// Write a mark. Callers must have checked bounds and emptiness.
    pub(super) fn place(&mut self, row: usize, col: usize, player: Player) {
        debug_assert!(self.cells[row][col].is_empty());
        self.cells[row][col] = Cell::Marked(player);
    }
}

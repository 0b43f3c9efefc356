//! Protocol message definitions

use std::fmt;

use crate::game::Player;

/// A single mark placement by one player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    /// Player placing the mark
    pub actor: Player,
    pub row: usize,
    pub col: usize,
}

impl Move {
    pub fn new(actor: Player, row: usize, col: usize) -> Self {
        Self { actor, row, col }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> [{}, {}]", self.actor, self.row, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_display() {
        let mv = Move::new(Player::O, 2, 1);
        assert_eq!(mv.to_string(), "O -> [2, 1]");
    }
}

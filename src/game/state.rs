//! Game state and move application
//!
//! `GameState` is a small `Copy` value; applying a move returns a new state
//! together with an outcome instead of mutating in place or failing.

use super::board::{Board, Cell, Player};

/// Result of attempting to apply a move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Applied,
    RejectedWrongTurn,
    RejectedOccupied,
    RejectedOutOfBounds,
    RejectedGameOver,
}

impl MoveOutcome {
    pub fn is_applied(self) -> bool {
        matches!(self, MoveOutcome::Applied)
    }
}

/// Overall result of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    InProgress,
    Won(Player),
    Draw,
}

impl GameResult {
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameResult::InProgress)
    }
}

/// Board plus whose turn it is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    turn: Player,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            board: Board::new(),
            turn: Player::X,
        }
    }
}

impl GameState {
    /// Empty board, X to move
    pub fn new() -> Self {
        Self::default()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Player {
        self.turn
    }

    /// Attempt to place `player`'s mark at (row, col).
    ///
    /// Rejections leave the returned state identical to `self`. On success the
    /// turn passes to the other player.
    pub fn apply_move(&self, player: Player, row: usize, col: usize) -> (GameState, MoveOutcome) {
        if self.result().is_terminal() {
            return (*self, MoveOutcome::RejectedGameOver);
        }

        let cell = match self.board.get(row, col) {
            Some(cell) => cell,
            None => return (*self, MoveOutcome::RejectedOutOfBounds),
        };

        if player != self.turn {
            return (*self, MoveOutcome::RejectedWrongTurn);
        }

        if cell != Cell::Empty {
            return (*self, MoveOutcome::RejectedOccupied);
        }

        let mut next = *self;
        next.board.place(row, col, player);
        next.turn = player.opponent();
        (next, MoveOutcome::Applied)
    }

    /// Winner of the first completed line found, if any
    pub fn check_winner(&self) -> Option<Player> {
        self.board.completed_line()
    }

    /// True when no empty cell remains and nobody has won
    pub fn is_draw(&self) -> bool {
        self.board.is_full() && self.check_winner().is_none()
    }

    pub fn result(&self) -> GameResult {
        if let Some(winner) = self.check_winner() {
            GameResult::Won(winner)
        } else if self.is_draw() {
            GameResult::Draw
        } else {
            GameResult::InProgress
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(moves: &[(usize, usize)]) -> GameState {
        moves.iter().fold(GameState::new(), |state, &(row, col)| {
            let (next, outcome) = state.apply_move(state.turn(), row, col);
            assert_eq!(outcome, MoveOutcome::Applied, "move ({}, {})", row, col);
            next
        })
    }

    #[test]
    fn test_initial_state() {
        let state = GameState::new();
        assert_eq!(state.turn(), Player::X);
        assert_eq!(state.board().marked_count(), 0);
        assert_eq!(state.result(), GameResult::InProgress);
    }

    #[test]
    fn test_turn_alternates() {
        let mut state = GameState::new();
        let mut expected = Player::X;
        for (row, col) in [(0, 0), (1, 1), (2, 2), (0, 1)] {
            assert_eq!(state.turn(), expected);
            let (next, outcome) = state.apply_move(expected, row, col);
            assert!(outcome.is_applied());
            state = next;
            expected = expected.opponent();
        }
        assert_eq!(state.turn(), Player::X);
    }

    #[test]
    fn test_wrong_turn_rejected_without_change() {
        let state = GameState::new();
        let (next, outcome) = state.apply_move(Player::O, 0, 0);
        assert_eq!(outcome, MoveOutcome::RejectedWrongTurn);
        assert_eq!(next, state);
    }

    #[test]
    fn test_occupied_rejected_without_change() {
        let state = play(&[(1, 1)]);
        let (next, outcome) = state.apply_move(Player::O, 1, 1);
        assert_eq!(outcome, MoveOutcome::RejectedOccupied);
        assert_eq!(next, state);
        assert_eq!(next.board().get(1, 1), Some(Cell::Marked(Player::X)));
        assert_eq!(next.turn(), Player::O);
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let state = GameState::new();
        for (row, col) in [(3, 0), (0, 3), (usize::MAX, usize::MAX)] {
            let (next, outcome) = state.apply_move(Player::X, row, col);
            assert_eq!(outcome, MoveOutcome::RejectedOutOfBounds);
            assert_eq!(next, state);
        }
    }

    #[test]
    fn test_top_row_win() {
        let state = play(&[(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)]);
        assert_eq!(state.check_winner(), Some(Player::X));
        assert_eq!(state.result(), GameResult::Won(Player::X));
        assert!(!state.is_draw());
    }

    #[test]
    fn test_no_moves_after_win() {
        let state = play(&[(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)]);
        let (next, outcome) = state.apply_move(Player::O, 2, 2);
        assert_eq!(outcome, MoveOutcome::RejectedGameOver);
        assert_eq!(next, state);
    }

    #[test]
    fn test_full_board_draw() {
        let state = play(&[
            (0, 0),
            (0, 1),
            (0, 2),
            (1, 1),
            (1, 0),
            (1, 2),
            (2, 1),
            (2, 0),
            (2, 2),
        ]);
        assert!(state.board().is_full());
        assert_eq!(state.check_winner(), None);
        assert!(state.is_draw());
        assert_eq!(state.result(), GameResult::Draw);
    }

    #[test]
    fn test_win_on_last_cell_is_not_draw() {
        // X completes the main diagonal with the ninth mark
        let state = play(&[
            (0, 0),
            (0, 1),
            (1, 1),
            (0, 2),
            (1, 2),
            (1, 0),
            (2, 0),
            (2, 1),
            (2, 2),
        ]);
        assert!(state.board().is_full());
        assert_eq!(state.check_winner(), Some(Player::X));
        assert!(!state.is_draw());
    }
}

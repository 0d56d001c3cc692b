//! Per-turn selection state.

use chess_core::{Color, Coord};

use crate::Board;

/// Tracks the square the mover selected and whose turn it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnTracker {
    move_from: Option<Coord>,
    color: Color,
}

impl TurnTracker {
    /// Creates a tracker for `color` with nothing selected.
    pub const fn new(color: Color) -> Self {
        TurnTracker {
            move_from: None,
            color,
        }
    }

    /// Creates a tracker in sync with the board's side to move.
    pub fn for_board(board: &Board) -> Self {
        Self::new(board.side_to_move())
    }

    /// The selected origin square, if any.
    #[inline]
    pub fn move_from(&self) -> Option<Coord> {
        self.move_from
    }

    /// The color to move.
    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Selects the square to move from, replacing any earlier selection.
    pub fn select(&mut self, origin: Coord) {
        self.move_from = Some(origin);
    }

    /// Drops the current selection.
    pub fn clear(&mut self) {
        self.move_from = None;
    }

    /// Ends the turn: clears the selection and passes the move.
    pub fn advance(&mut self) {
        self.move_from = None;
        self.color = self.color.opposite();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_and_advance() {
        let mut turn = TurnTracker::new(Color::White);
        assert_eq!(turn.move_from(), None);

        turn.select(Coord::new(4, 1));
        assert_eq!(turn.move_from(), Some(Coord::new(4, 1)));
        turn.select(Coord::new(3, 1));
        assert_eq!(turn.move_from(), Some(Coord::new(3, 1)));

        turn.advance();
        assert_eq!(turn.move_from(), None);
        assert_eq!(turn.color(), Color::Black);
    }

    #[test]
    fn clear_keeps_color() {
        let mut turn = TurnTracker::new(Color::Black);
        turn.select(Coord::ORIGIN);
        turn.clear();
        assert_eq!(turn, TurnTracker::new(Color::Black));
    }

    #[test]
    fn for_board_follows_side_to_move() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/4K3 b").unwrap();
        assert_eq!(TurnTracker::for_board(&board).color(), Color::Black);
    }
}

//! Single-writer game state: a board and its turn tracker.
//!
//! [`Game`] is the move-application layer over [`RuleBook`]: it only commits
//! a move after checking it against the legal move set, then updates the en
//! passant target and passes the turn. A server running several games keeps
//! one `Game` per match behind its own lock.

use std::collections::HashSet;

use chess_core::{Color, Coord, FenError, Piece};
use thiserror::Error;
use tracing::debug;

use crate::{Board, RuleBook, RuleConfig, RuleError, TurnTracker};

/// Error type for game operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    /// `play` was called before a piece was selected.
    #[error("no piece selected")]
    NothingSelected,
    /// The destination is not in the selected piece's legal move set.
    #[error("illegal move: {from} to {to}")]
    IllegalMove { from: Coord, to: Coord },
    /// Rule evaluation hit an invariant violation.
    #[error(transparent)]
    Rules(#[from] RuleError),
}

/// A game in progress.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    turn: TurnTracker,
    config: RuleConfig,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Creates a game from the standard starting position.
    pub fn new() -> Self {
        Self::from_board(Board::startpos(), RuleConfig::default())
    }

    /// Creates a game from an existing board.
    pub fn from_board(board: Board, config: RuleConfig) -> Self {
        let turn = TurnTracker::for_board(&board);
        Game {
            board,
            turn,
            config,
        }
    }

    /// Creates a game from a FEN string with the default configuration.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        Ok(Self::from_board(Board::from_fen(fen)?, RuleConfig::default()))
    }

    /// Returns a reference to the current board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the turn tracker.
    pub fn turn(&self) -> &TurnTracker {
        &self.turn
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    /// The color to move.
    pub fn side_to_move(&self) -> Color {
        self.board.side_to_move()
    }

    /// A rule book over the current board.
    pub fn rule_book(&self) -> RuleBook<'_> {
        RuleBook::with_config(&self.board, &self.config)
    }

    /// Selects the piece to move and returns its legal destinations.
    pub fn select(&mut self, origin: Coord) -> Result<HashSet<Coord>, GameError> {
        self.turn.select(origin);
        self.legal_moves()
    }

    /// Legal destinations for the current selection.
    pub fn legal_moves(&self) -> Result<HashSet<Coord>, GameError> {
        Ok(self.rule_book().selected_moves(&self.turn)?)
    }

    /// Moves the selected piece to `to`, returning any captured piece.
    ///
    /// # Errors
    ///
    /// [`GameError::NothingSelected`] without a selection, and
    /// [`GameError::IllegalMove`] if `to` is not a legal destination. The
    /// board is left untouched on error.
    pub fn play(&mut self, to: Coord) -> Result<Option<(Piece, Color)>, GameError> {
        let from = self.turn.move_from().ok_or(GameError::NothingSelected)?;
        if !self.legal_moves()?.contains(&to) {
            return Err(GameError::IllegalMove { from, to });
        }

        let captured = self.board.apply_move(from, to);
        self.turn.advance();
        debug!(%from, %to, ?captured, "move applied");
        Ok(captured)
    }
}

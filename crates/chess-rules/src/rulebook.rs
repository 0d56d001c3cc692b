//! Legal destination generation for a selected piece.

use std::collections::HashSet;

use chess_core::{Color, Coord, Piece};
use tracing::{debug, trace};

use crate::{AttackTracker, Board, KingSafety, RuleConfig, RuleError, TurnTracker};

/// Computes the squares a selected piece may move to.
///
/// A `RuleBook` borrows the board for its whole lifetime, so the position
/// cannot change between the ray walks of a single query.
///
/// # Example
///
/// ```
/// use chess_core::Coord;
/// use chess_rules::{Board, RuleBook};
///
/// let board = Board::startpos();
/// let moves = RuleBook::new(&board).legal_move_set(Coord::new(4, 1)).unwrap();
/// assert!(moves.contains(&Coord::new(4, 2)));
/// assert!(moves.contains(&Coord::new(4, 3)));
/// assert_eq!(moves.len(), 2);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RuleBook<'a> {
    board: &'a Board,
    attacks: AttackTracker<'a>,
    king_safety: KingSafety,
}

impl<'a> RuleBook<'a> {
    /// Creates a rule book with the default configuration.
    pub fn new(board: &'a Board) -> Self {
        Self::with_config(board, &RuleConfig::default())
    }

    /// Creates a rule book using the king-safety mode from `config`.
    pub fn with_config(board: &'a Board, config: &RuleConfig) -> Self {
        RuleBook {
            board,
            attacks: AttackTracker::new(board),
            king_safety: config.king_safety,
        }
    }

    /// The board being evaluated.
    #[inline]
    pub fn board(&self) -> &'a Board {
        self.board
    }

    /// The attack tracker over the same board.
    #[inline]
    pub fn attack_tracker(&self) -> &AttackTracker<'a> {
        &self.attacks
    }

    /// Returns true if the opponent of the side to move attacks `coord`.
    #[inline]
    pub fn is_attacked(&self, coord: Coord) -> bool {
        self.attacks.is_attacked(coord)
    }

    /// Returns true if the king of the side to move is attacked.
    pub fn is_in_check(&self) -> Result<bool, RuleError> {
        let king = self.attacks.allied_king_coord()?;
        Ok(self.attacks.is_attacked(king))
    }

    /// Legal destinations for the piece on `origin`.
    ///
    /// An empty square, an enemy piece or an off-board origin yields an empty
    /// set; that is "nothing to move", not an error.
    ///
    /// # Errors
    ///
    /// Invariant violations only: a pawn without a forward direction, or,
    /// under [`KingSafety::Strict`], no king for the side to move.
    pub fn legal_move_set(&self, origin: Coord) -> Result<HashSet<Coord>, RuleError> {
        let us = self.board.side_to_move();
        let Some((piece, color)) = self.board.piece_at(origin) else {
            return Ok(HashSet::new());
        };
        if color != us {
            return Ok(HashSet::new());
        }

        let mut moves = match piece {
            Piece::Pawn => self.pawn_legal_move_set(origin, color)?,
            _ => self.line_move_set(origin, piece, color),
        };

        if self.king_safety == KingSafety::Strict {
            self.retain_king_safe(origin, piece, &mut moves)?;
        }

        debug!(%origin, %piece, %color, count = moves.len(), "legal move set");
        Ok(moves)
    }

    /// Legal destinations for the square selected in `turn`.
    ///
    /// # Errors
    ///
    /// [`RuleError::TurnMismatch`] if the tracker and the board disagree on
    /// the side to move, plus anything [`legal_move_set`](Self::legal_move_set)
    /// reports.
    pub fn selected_moves(&self, turn: &TurnTracker) -> Result<HashSet<Coord>, RuleError> {
        let found = self.board.side_to_move();
        if turn.color() != found {
            return Err(RuleError::TurnMismatch {
                expected: turn.color(),
                found,
            });
        }
        match turn.move_from() {
            Some(origin) => self.legal_move_set(origin),
            None => Ok(HashSet::new()),
        }
    }

    /// Walks every direction of a non-pawn piece.
    fn line_move_set(&self, origin: Coord, piece: Piece, color: Color) -> HashSet<Coord> {
        let mut moves = HashSet::new();

        for &direction in piece.move_directions(color) {
            let mut i = 1;
            loop {
                let candidate = origin + direction * i;

                if !self.board.coord_in_board(candidate) || self.board.is_allied_piece(candidate) {
                    break;
                }

                if piece != Piece::King || !self.attacks.is_attacked(candidate) {
                    moves.insert(candidate);
                } else {
                    trace!(%candidate, "king destination is attacked");
                }

                // Captures end the ray.
                if self.board.has_piece_at(candidate) || !piece.can_move_in_line() {
                    break;
                }
                i += 1;
            }
        }

        moves
    }

    /// Pushes, the home-rank double step, and diagonal captures.
    ///
    /// Pawn destinations are not filtered for king safety in the default mode.
    fn pawn_legal_move_set(&self, origin: Coord, color: Color) -> Result<HashSet<Coord>, RuleError> {
        let forward = Piece::Pawn
            .move_directions(color)
            .first()
            .copied()
            .ok_or(RuleError::MissingPawnDirection)?;
        let board = self.board;
        let mut moves = HashSet::new();

        let one = origin + forward;
        let one_free = board.coord_in_board(one) && !board.has_piece_at(one);
        if one_free {
            moves.insert(one);
        }

        // A pawn still on its home rank would fall off the board stepping
        // back twice.
        let two = origin + forward * 2;
        let on_home_rank = !board.coord_in_board(origin - forward * 2);
        if on_home_rank && one_free && board.coord_in_board(two) && !board.has_piece_at(two) {
            moves.insert(two);
        }

        let en_passant = board.en_passant_square();
        for side in [Coord::new(1, 0), Coord::new(-1, 0)] {
            let target = one + side;
            if !board.coord_in_board(target) || board.is_allied_piece(target) {
                continue;
            }
            let en_passant_capture = en_passant == Some(target) && !board.has_piece_at(target);
            if board.is_enemy_piece(target) || en_passant_capture {
                moves.insert(target);
            }
        }

        Ok(moves)
    }

    /// Drops candidates that leave the mover's own king attacked.
    fn retain_king_safe(
        &self,
        origin: Coord,
        piece: Piece,
        moves: &mut HashSet<Coord>,
    ) -> Result<(), RuleError> {
        let king = self.attacks.allied_king_coord()?;
        moves.retain(|&to| {
            let scratch = self.board.with_move_simulated(origin, to);
            let king_after = if piece == Piece::King { to } else { king };
            let safe = !AttackTracker::new(&scratch).is_attacked(king_after);
            if !safe {
                trace!(%origin, %to, "move exposes own king");
            }
            safe
        });
        Ok(())
    }
}

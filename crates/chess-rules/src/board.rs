//! Board state: piece placement, side to move, and en passant target.

use std::collections::HashMap;

use chess_core::{Color, Coord, FenError, FenParser, Piece, MAX_EXTENT};
use tracing::warn;

use crate::RuleConfig;

/// A position the rule engine reads from.
///
/// Only occupied squares have entries; every in-bounds coordinate without an
/// entry is empty. Bounds come from the declared extent rather than from
/// sentinel pieces along the edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    squares: HashMap<Coord, (Piece, Color)>,
    width: i32,
    height: i32,
    side_to_move: Color,
    en_passant: Option<Coord>,
}

impl Board {
    /// Creates an empty board of the given extent with White to move.
    ///
    /// Each axis is clamped to `1..=MAX_EXTENT`.
    pub fn empty(width: i32, height: i32) -> Self {
        let extent = 1..=MAX_EXTENT;
        if !extent.contains(&width) || !extent.contains(&height) {
            warn!(width, height, "board extent out of range, clamping");
        }
        let width = width.clamp(1, MAX_EXTENT);
        let height = height.clamp(1, MAX_EXTENT);
        Board {
            squares: HashMap::new(),
            width,
            height,
            side_to_move: Color::White,
            en_passant: None,
        }
    }

    /// Creates an empty board sized by the configuration.
    pub fn from_config(config: &RuleConfig) -> Self {
        Self::empty(config.width, config.height)
    }

    /// Creates the standard starting position.
    pub fn startpos() -> Self {
        Self::from_fen(FenParser::STARTPOS).expect("STARTPOS is valid")
    }

    /// Creates a board from a FEN string. The extent follows the placement.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let parsed = FenParser::parse(fen)?;
        let mut board = Board::empty(parsed.width, parsed.height);
        for (coord, piece, color) in parsed.pieces {
            board.set_piece(coord, piece, color);
        }
        board.side_to_move = parsed.side_to_move;
        board.en_passant = parsed.en_passant;
        Ok(board)
    }

    /// Converts the board to a FEN string.
    ///
    /// Castling rights and clocks are not tracked and are written as `- 0 1`.
    pub fn to_fen(&self) -> String {
        let mut fen = String::new();

        for y in (0..self.height).rev() {
            let mut empty_count = 0;
            for x in 0..self.width {
                match self.piece_at(Coord::new(x, y)) {
                    Some((piece, color)) => {
                        if empty_count > 0 {
                            fen.push_str(&empty_count.to_string());
                            empty_count = 0;
                        }
                        fen.push(piece.to_fen_char(color));
                    }
                    None => empty_count += 1,
                }
            }
            if empty_count > 0 {
                fen.push_str(&empty_count.to_string());
            }
            if y > 0 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(self.side_to_move.to_fen_char());
        fen.push_str(" - ");
        match self.en_passant.and_then(Coord::to_algebraic) {
            Some(name) => fen.push_str(&name),
            None => fen.push('-'),
        }
        fen.push_str(" 0 1");

        fen
    }

    /// Number of files.
    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Number of ranks.
    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// The color to move.
    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Sets the color to move.
    pub fn set_side_to_move(&mut self, color: Color) {
        self.side_to_move = color;
    }

    /// The square currently eligible for en passant capture, if any.
    #[inline]
    pub fn en_passant_square(&self) -> Option<Coord> {
        self.en_passant
    }

    /// Sets or clears the en passant target.
    pub fn set_en_passant(&mut self, target: Option<Coord>) {
        self.en_passant = target;
    }

    /// Returns true if `coord` is a real square of this board.
    #[inline]
    pub fn coord_in_board(&self, coord: Coord) -> bool {
        (0..self.width).contains(&coord.x) && (0..self.height).contains(&coord.y)
    }

    /// Returns the piece and color at the given square, if any.
    #[inline]
    pub fn piece_at(&self, coord: Coord) -> Option<(Piece, Color)> {
        self.squares.get(&coord).copied()
    }

    /// Returns true if a piece occupies `coord`.
    #[inline]
    pub fn has_piece_at(&self, coord: Coord) -> bool {
        self.squares.contains_key(&coord)
    }

    /// Returns true if the piece at `coord` belongs to the side to move.
    #[inline]
    pub fn is_allied_piece(&self, coord: Coord) -> bool {
        matches!(self.piece_at(coord), Some((_, color)) if color == self.side_to_move)
    }

    /// Returns true if the piece at `coord` belongs to the side not to move.
    #[inline]
    pub fn is_enemy_piece(&self, coord: Coord) -> bool {
        matches!(self.piece_at(coord), Some((_, color)) if color != self.side_to_move)
    }

    /// Places a piece, returning whatever stood there before.
    ///
    /// Out-of-bounds coordinates are ignored.
    pub fn set_piece(&mut self, coord: Coord, piece: Piece, color: Color) -> Option<(Piece, Color)> {
        if !self.coord_in_board(coord) {
            warn!(%coord, "ignoring piece placed outside the board");
            return None;
        }
        self.squares.insert(coord, (piece, color))
    }

    /// Removes and returns the piece at `coord`.
    pub fn remove_piece(&mut self, coord: Coord) -> Option<(Piece, Color)> {
        self.squares.remove(&coord)
    }

    /// Iterates over every occupied square.
    pub fn pieces(&self) -> impl Iterator<Item = (Coord, Piece, Color)> + '_ {
        self.squares
            .iter()
            .map(|(&coord, &(piece, color))| (coord, piece, color))
    }

    /// Finds the king of the given color.
    pub fn king_coord(&self, color: Color) -> Option<Coord> {
        self.pieces()
            .find(|&(_, piece, c)| piece == Piece::King && c == color)
            .map(|(coord, _, _)| coord)
    }

    /// Applies a move, returning the captured piece.
    ///
    /// The caller is expected to have checked the move against the legal
    /// move set. Handles en passant captures, records a new en passant
    /// target after a double pawn step, and passes the turn.
    pub fn apply_move(&mut self, from: Coord, to: Coord) -> Option<(Piece, Color)> {
        let Some((piece, color)) = self.piece_at(from) else {
            warn!(%from, %to, "apply_move from an empty square");
            return None;
        };

        let captured = self.relocate(from, to);

        self.en_passant = None;
        if piece == Piece::Pawn {
            let forward = Coord::new(0, color.pawn_direction());
            if to - from == forward * 2 {
                self.en_passant = Some(from + forward);
            }
        }
        self.side_to_move = self.side_to_move.opposite();

        captured
    }

    /// Returns a scratch copy with the piece moved but the turn unchanged.
    pub fn with_move_simulated(&self, from: Coord, to: Coord) -> Board {
        let mut scratch = self.clone();
        scratch.relocate(from, to);
        scratch
    }

    /// Moves the piece at `from` to `to`, removing any captured piece,
    /// including a pawn taken en passant.
    fn relocate(&mut self, from: Coord, to: Coord) -> Option<(Piece, Color)> {
        let (piece, color) = self.squares.remove(&from)?;
        let mut captured = self.squares.insert(to, (piece, color));

        if piece == Piece::Pawn && captured.is_none() && Some(to) == self.en_passant {
            let behind = to - Coord::new(0, color.pawn_direction());
            captured = self.squares.remove(&behind);
        }

        captured
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::startpos()
    }
}

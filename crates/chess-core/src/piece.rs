//! Chess piece representation and movement capabilities.

use crate::{Color, Coord};

/// The six kinds of chess pieces.
///
/// A piece on the board is the pair `(Piece, Color)`; movement capabilities
/// are looked up per variant rather than stored on each piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Piece {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

const ORTHOGONAL: [Coord; 4] = [
    Coord::new(1, 0),
    Coord::new(-1, 0),
    Coord::new(0, 1),
    Coord::new(0, -1),
];

const DIAGONAL: [Coord; 4] = [
    Coord::new(1, 1),
    Coord::new(1, -1),
    Coord::new(-1, 1),
    Coord::new(-1, -1),
];

const ALL_DIRECTIONS: [Coord; 8] = [
    Coord::new(1, 0),
    Coord::new(-1, 0),
    Coord::new(0, 1),
    Coord::new(0, -1),
    Coord::new(1, 1),
    Coord::new(1, -1),
    Coord::new(-1, 1),
    Coord::new(-1, -1),
];

const KNIGHT_OFFSETS: [Coord; 8] = [
    Coord::new(1, 2),
    Coord::new(2, 1),
    Coord::new(2, -1),
    Coord::new(1, -2),
    Coord::new(-1, -2),
    Coord::new(-2, -1),
    Coord::new(-2, 1),
    Coord::new(-1, 2),
];

const WHITE_PAWN_FORWARD: [Coord; 1] = [Coord::new(0, 1)];
const BLACK_PAWN_FORWARD: [Coord; 1] = [Coord::new(0, -1)];

impl Piece {
    /// All piece types in order.
    pub const ALL: [Piece; 6] = [
        Piece::Pawn,
        Piece::Knight,
        Piece::Bishop,
        Piece::Rook,
        Piece::Queen,
        Piece::King,
    ];

    /// Returns the unit direction set for this piece.
    ///
    /// For a pawn this is a single forward vector whose sign depends on
    /// `color`; captures are derived from it by the rule engine. Other
    /// pieces ignore `color`.
    pub const fn move_directions(self, color: Color) -> &'static [Coord] {
        match self {
            Piece::Pawn => match color {
                Color::White => &WHITE_PAWN_FORWARD,
                Color::Black => &BLACK_PAWN_FORWARD,
            },
            Piece::Knight => &KNIGHT_OFFSETS,
            Piece::Bishop => &DIAGONAL,
            Piece::Rook => &ORTHOGONAL,
            Piece::Queen | Piece::King => &ALL_DIRECTIONS,
        }
    }

    /// Returns true if this piece slides along its directions (bishop, rook, or queen).
    #[inline]
    pub const fn can_move_in_line(self) -> bool {
        matches!(self, Piece::Bishop | Piece::Rook | Piece::Queen)
    }

    /// Returns the FEN character for this piece with the given color.
    pub const fn to_fen_char(self, color: Color) -> char {
        let c = match self {
            Piece::Pawn => 'p',
            Piece::Knight => 'n',
            Piece::Bishop => 'b',
            Piece::Rook => 'r',
            Piece::Queen => 'q',
            Piece::King => 'k',
        };
        match color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    /// Parses a FEN character into a piece and color.
    pub const fn from_fen_char(c: char) -> Option<(Piece, Color)> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let piece = match c.to_ascii_lowercase() {
            'p' => Piece::Pawn,
            'n' => Piece::Knight,
            'b' => Piece::Bishop,
            'r' => Piece::Rook,
            'q' => Piece::Queen,
            'k' => Piece::King,
            _ => return None,
        };
        Some((piece, color))
    }
}

impl std::fmt::Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Piece::Pawn => "Pawn",
            Piece::Knight => "Knight",
            Piece::Bishop => "Bishop",
            Piece::Rook => "Rook",
            Piece::Queen => "Queen",
            Piece::King => "King",
        };
        write!(f, "{}", name)
    }
}

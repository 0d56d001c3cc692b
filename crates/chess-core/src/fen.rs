//! FEN (Forsyth-Edwards Notation) parsing.
//!
//! Only the fields the rule engine reads are kept: piece placement, the side
//! to move and the en passant target. Castling rights and the move clocks
//! are validated when present but otherwise ignored. Placements are not
//! restricted to 8x8: every rank must have the same width, and the number of
//! ranks gives the board height.

use crate::{Color, Coord, Piece};
use thiserror::Error;

/// Largest supported extent along either axis; files are named 'a'..='z'.
pub const MAX_EXTENT: i32 = 26;

/// Errors that can occur when parsing FEN strings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("invalid FEN: expected 2 to 6 fields, got {0}")]
    InvalidFieldCount(usize),

    #[error("invalid piece placement: {0}")]
    InvalidPiecePlacement(String),

    #[error("invalid active color: expected 'w' or 'b', got '{0}'")]
    InvalidActiveColor(String),

    #[error("invalid castling rights: {0}")]
    InvalidCastlingRights(String),

    #[error("invalid en passant square: {0}")]
    InvalidEnPassantSquare(String),

    #[error("invalid move clock: {0}")]
    InvalidClock(String),

    #[error("invalid board extent {width}x{height}: at most {MAX_EXTENT} files and ranks")]
    InvalidExtent { width: i32, height: i32 },
}

/// Parsed FEN data, in board coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenParser {
    /// Number of files.
    pub width: i32,
    /// Number of ranks.
    pub height: i32,
    /// Every occupied square, listed from the top rank down, left to right.
    pub pieces: Vec<(Coord, Piece, Color)>,
    /// The side to move.
    pub side_to_move: Color,
    /// En passant target square, if any.
    pub en_passant: Option<Coord>,
}

impl FenParser {
    /// The standard starting position FEN.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Parses a FEN string.
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if !(2..=6).contains(&fields.len()) {
            return Err(FenError::InvalidFieldCount(fields.len()));
        }

        let (width, height, pieces) = Self::parse_placement(fields[0])?;

        let side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::InvalidActiveColor(other.to_string())),
        };

        if let Some(castling) = fields.get(2) {
            Self::validate_castling(castling)?;
        }

        let en_passant = match fields.get(3) {
            None | Some(&"-") => None,
            Some(ep) => Some(Self::parse_en_passant(ep, width, height)?),
        };

        for clock in fields.iter().skip(4) {
            clock
                .parse::<u32>()
                .map_err(|_| FenError::InvalidClock(clock.to_string()))?;
        }

        Ok(FenParser {
            width,
            height,
            pieces,
            side_to_move,
            en_passant,
        })
    }

    #[allow(clippy::type_complexity)]
    fn parse_placement(placement: &str) -> Result<(i32, i32, Vec<(Coord, Piece, Color)>), FenError> {
        let ranks: Vec<&str> = placement.split('/').collect();
        let height = i32::try_from(ranks.len()).unwrap_or(i32::MAX);
        if height > MAX_EXTENT {
            return Err(FenError::InvalidExtent { width: 0, height });
        }
        let mut width = None;
        let mut pieces = Vec::new();

        for (i, rank) in ranks.iter().enumerate() {
            let y = height - 1 - i as i32;
            let mut x = 0i32;
            let mut digits = String::new();

            for c in rank.chars() {
                if c.is_ascii_digit() {
                    digits.push(c);
                    continue;
                }
                x = Self::advance(x, Self::flush_empty(&mut digits)?, height)?;
                match Piece::from_fen_char(c) {
                    Some((piece, color)) => {
                        pieces.push((Coord::new(x, y), piece, color));
                        x = Self::advance(x, 1, height)?;
                    }
                    None => {
                        return Err(FenError::InvalidPiecePlacement(format!(
                            "invalid character '{}' in rank {}",
                            c,
                            y + 1
                        )))
                    }
                }
            }
            x = Self::advance(x, Self::flush_empty(&mut digits)?, height)?;

            match width {
                None => width = Some(x),
                Some(w) if w != x => {
                    return Err(FenError::InvalidPiecePlacement(format!(
                        "rank {} has {} squares, expected {}",
                        y + 1,
                        x,
                        w
                    )))
                }
                Some(_) => {}
            }
        }

        match width {
            Some(w) if w > 0 => Ok((w, height, pieces)),
            _ => Err(FenError::InvalidPiecePlacement(
                "placement is empty".to_string(),
            )),
        }
    }

    /// Moves the file cursor along a rank, rejecting ranks wider than
    /// `MAX_EXTENT`. A piece may sit on the last file, so the cursor itself
    /// may reach `MAX_EXTENT`.
    fn advance(x: i32, step: i32, height: i32) -> Result<i32, FenError> {
        match x.checked_add(step) {
            Some(next) if next <= MAX_EXTENT => Ok(next),
            Some(next) => Err(FenError::InvalidExtent {
                width: next,
                height,
            }),
            None => Err(FenError::InvalidPiecePlacement(
                "rank length overflows".to_string(),
            )),
        }
    }

    /// Consumes a pending run of digits, returning the empty-square count.
    fn flush_empty(digits: &mut String) -> Result<i32, FenError> {
        if digits.is_empty() {
            return Ok(0);
        }
        let run = digits
            .parse::<i32>()
            .map_err(|_| FenError::InvalidPiecePlacement(format!("bad run length '{}'", digits)))?;
        digits.clear();
        Ok(run)
    }

    fn validate_castling(castling: &str) -> Result<(), FenError> {
        if castling == "-" {
            return Ok(());
        }

        match castling.chars().find(|c| !"KQkq".contains(*c)) {
            Some(c) => Err(FenError::InvalidCastlingRights(format!(
                "invalid character '{}'",
                c
            ))),
            None => Ok(()),
        }
    }

    fn parse_en_passant(ep: &str, width: i32, height: i32) -> Result<Coord, FenError> {
        Coord::from_algebraic(ep)
            .filter(|c| c.x < width && c.y < height)
            .ok_or_else(|| FenError::InvalidEnPassantSquare(ep.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_startpos() {
        let fen = FenParser::parse(FenParser::STARTPOS).unwrap();
        assert_eq!((fen.width, fen.height), (8, 8));
        assert_eq!(fen.pieces.len(), 32);
        assert_eq!(fen.side_to_move, Color::White);
        assert_eq!(fen.en_passant, None);
        assert!(fen
            .pieces
            .contains(&(Coord::new(4, 0), Piece::King, Color::White)));
        assert!(fen
            .pieces
            .contains(&(Coord::new(3, 7), Piece::Queen, Color::Black)));
    }

    #[test]
    fn parse_with_en_passant() {
        let fen = FenParser::parse("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1")
            .unwrap();
        assert_eq!(fen.side_to_move, Color::Black);
        assert_eq!(fen.en_passant, Some(Coord::new(4, 2)));
    }

    #[test]
    fn short_fen_is_accepted() {
        let fen = FenParser::parse("4k3/8/8/8/8/8/8/4K3 b").unwrap();
        assert_eq!(fen.side_to_move, Color::Black);
        assert_eq!(fen.pieces.len(), 2);
    }

    #[test]
    fn non_standard_extent() {
        let fen = FenParser::parse("k4/5/10/K4 w").unwrap_err();
        assert!(matches!(fen, FenError::InvalidPiecePlacement(_)));

        let fen = FenParser::parse("k9/10/9K w").unwrap();
        assert_eq!((fen.width, fen.height), (10, 3));
        assert!(fen
            .pieces
            .contains(&(Coord::new(9, 0), Piece::King, Color::White)));
    }

    #[test]
    fn invalid_field_count() {
        assert!(matches!(
            FenParser::parse("8/8/8/8/8/8/8/8"),
            Err(FenError::InvalidFieldCount(1))
        ));
        assert!(matches!(
            FenParser::parse("8/8/8/8/8/8/8/8 w - - 0 1 extra"),
            Err(FenError::InvalidFieldCount(7))
        ));
    }

    #[test]
    fn invalid_active_color() {
        assert!(matches!(
            FenParser::parse("8/8/8/8/8/8/8/8 x KQkq - 0 1"),
            Err(FenError::InvalidActiveColor(_))
        ));
    }

    #[test]
    fn invalid_piece_placement_invalid_char() {
        assert!(matches!(
            FenParser::parse("rnbqkbnr/pppppppp/8/8/8/8/PPPPXPPP/RNBQKBNR w KQkq - 0 1"),
            Err(FenError::InvalidPiecePlacement(_))
        ));
    }

    #[test]
    fn invalid_piece_placement_ragged_ranks() {
        assert!(matches!(
            FenParser::parse("rnbqkbnrr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            Err(FenError::InvalidPiecePlacement(_))
        ));
    }

    #[test]
    fn invalid_castling_rights() {
        assert!(matches!(
            FenParser::parse("8/8/8/8/8/8/8/8 w XYZ - 0 1"),
            Err(FenError::InvalidCastlingRights(_))
        ));
    }

    #[test]
    fn invalid_en_passant() {
        assert!(matches!(
            FenParser::parse("8/8/8/8/8/8/8/8 w - x3 0 1"),
            Err(FenError::InvalidEnPassantSquare(_))
        ));
        assert!(matches!(
            FenParser::parse("8/8/8/8/8/8/8/8 w - e9 0 1"),
            Err(FenError::InvalidEnPassantSquare(_))
        ));
    }

    #[test]
    fn invalid_clock() {
        assert!(matches!(
            FenParser::parse("8/8/8/8/8/8/8/8 w - - abc 1"),
            Err(FenError::InvalidClock(_))
        ));
    }

    #[test]
    fn huge_empty_runs_are_rejected() {
        assert!(matches!(
            FenParser::parse("1000000000k2000000000 w"),
            Err(FenError::InvalidExtent { .. })
        ));
        assert!(matches!(
            FenParser::parse("k2147483647 w"),
            Err(FenError::InvalidPiecePlacement(_))
        ));
        assert!(matches!(
            FenParser::parse("99999999999 w"),
            Err(FenError::InvalidPiecePlacement(_))
        ));
    }

    #[test]
    fn extent_is_capped() {
        let fen = FenParser::parse("25K w").unwrap();
        assert_eq!((fen.width, fen.height), (MAX_EXTENT, 1));
        assert!(fen
            .pieces
            .contains(&(Coord::new(25, 0), Piece::King, Color::White)));

        assert_eq!(
            FenParser::parse("R99 w"),
            Err(FenError::InvalidExtent {
                width: 100,
                height: 1
            })
        );
        let tall = vec!["1"; 27].join("/");
        assert!(matches!(
            FenParser::parse(&format!("{} w", tall)),
            Err(FenError::InvalidExtent { height: 27, .. })
        ));
    }

    #[test]
    fn fen_error_display() {
        let err = FenError::InvalidFieldCount(3);
        assert!(format!("{}", err).contains('3'));

        let err = FenError::InvalidEnPassantSquare("z9".to_string());
        assert!(format!("{}", err).contains("z9"));
    }
}

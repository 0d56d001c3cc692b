//! Core types for chess.
//!
//! This crate provides the fundamental value types shared by the rule engine:
//! - [`Piece`] and [`Color`] for piece representation
//! - [`Coord`] for board coordinates and direction vectors
//! - FEN parsing for position setup

mod color;
mod coord;
mod fen;
mod piece;

pub use color::Color;
pub use coord::Coord;
pub use fen::{FenError, FenParser, MAX_EXTENT};
pub use piece::Piece;

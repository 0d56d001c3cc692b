//! Chess move-rule engine.
//!
//! This crate provides:
//! - [`Board`] - piece placement, side to move, and en passant target
//! - [`TurnTracker`] - the square selected for the current move
//! - [`AttackTracker`] and [`AttackRay`] - squares attacked by the side not to move
//! - [`RuleBook`] - legal destinations for a selected piece
//! - [`Game`] - a board and turn tracker that only accept legal moves
//!
//! # Architecture
//!
//! The board is a sparse map from [`Coord`](chess_core::Coord) to piece with
//! an explicit extent, so any rectangular board up to 26x26 works. Movement
//! is generated by walking each piece's direction vectors until the edge or
//! a piece stops the ray. Sliding pieces keep walking; everything else takes
//! one step.
//!
//! By default only king destinations are checked against the attack
//! tracker. [`KingSafety::Strict`] also rejects moves by other pieces that
//! uncover their own king.
//!
//! # Example
//!
//! ```
//! use chess_core::Coord;
//! use chess_rules::{Game, RuleBook, Board};
//!
//! let board = Board::from_fen("4k3/8/8/8/3R4/8/8/4K3 w").unwrap();
//! let rook_moves = RuleBook::new(&board).legal_move_set(Coord::new(3, 3)).unwrap();
//! assert_eq!(rook_moves.len(), 14);
//!
//! let mut game = Game::new();
//! game.select(Coord::new(4, 1)).unwrap();
//! game.play(Coord::new(4, 3)).unwrap();
//! assert_eq!(game.board().en_passant_square(), Some(Coord::new(4, 2)));
//! ```

mod attacks;
mod board;
mod config;
mod error;
mod game;
mod rulebook;
mod turn;

pub use attacks::{AttackRay, AttackTracker};
pub use board::Board;
pub use config::{ConfigError, KingSafety, RuleConfig, MAX_EXTENT};
pub use error::RuleError;
pub use game::{Game, GameError};
pub use rulebook::RuleBook;
pub use turn::TurnTracker;

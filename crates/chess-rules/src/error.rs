//! Error types for rule evaluation.

use chess_core::Color;
use thiserror::Error;

/// Invariant violations raised while evaluating rules.
///
/// These mean the position is malformed or a caller broke a contract; they
/// abort the current query. An empty move set is never reported as an error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// The side whose king was needed has no king on the board.
    #[error("missing {0} king on the board")]
    MissingKing(Color),

    /// A pawn's direction table did not yield a forward vector.
    #[error("pawn has no primary move direction")]
    MissingPawnDirection,

    /// The turn tracker and the board disagree on whose move it is.
    #[error("turn tracker expects {expected} to move, but the board has {found} to move")]
    TurnMismatch { expected: Color, found: Color },
}

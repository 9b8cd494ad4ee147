//! Error types for board construction and move application.

use crate::board::Color;
use crate::square::Square;

/// Errors raised by the rules engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChessError {
    /// Board notation did not contain exactly 64 entries
    #[error("board notation must have 64 squares, got {len}")]
    InvalidNotation { len: usize },

    /// A notation entry is neither a piece symbol nor an empty marker
    #[error("unrecognized piece symbol {0:?}")]
    UnknownSymbol(char),

    /// Square name or index outside the board
    #[error("invalid square: {0}")]
    InvalidSquare(String),

    #[error("the square {0} is empty")]
    EmptySquare(Square),

    #[error("the piece on {square} belongs to {owner}")]
    WrongColor { square: Square, owner: Color },

    #[error("illegal move from {from} to {to}")]
    IllegalMove { from: Square, to: Square },

    #[error("no move to rewind")]
    NothingToRewind,
}

impl ChessError {
    /// Whether the error is a rejected move attempt that left the game untouched.
    pub fn is_illegal_move(&self) -> bool {
        matches!(
            self,
            ChessError::EmptySquare(_)
                | ChessError::WrongColor { .. }
                | ChessError::IllegalMove { .. }
                | ChessError::NothingToRewind
        )
    }
}

/// Result type alias for rules operations
pub type ChessResult<T> = Result<T, ChessError>;

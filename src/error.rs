//! Error types for the Konane engine.

use thiserror::Error;

use crate::board::{Move, Symbol};

/// Main error type for the crate.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("board string has wrong length: expected {expected} cells ({rows}x{cols}), got {got}")]
    InvalidBoardLength {
        rows: usize,
        cols: usize,
        expected: usize,
        got: usize,
    },

    #[error("invalid character '{character}' at position {position} in board string")]
    InvalidCellCharacter { character: char, position: usize },

    #[error("invalid board dimensions {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },

    #[error("invalid symbol '{0}' (expected 'x' or 'o')")]
    InvalidSymbol(String),

    #[error("illegal move {mv} for player {symbol}")]
    IllegalMove { symbol: Symbol, mv: Move },

    #[error("no legal moves available for player {0}")]
    NoLegalMoves(Symbol),

    #[error("unrecognized player type '{kind}' for player {symbol}")]
    UnrecognizedAgentType { kind: String, symbol: Symbol },

    #[error("failed to start external agent '{program}': {source}")]
    AgentSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("external agent '{program}' did not answer within {millis} ms")]
    AgentTimedOut { program: String, millis: u128 },

    #[error("external agent '{program}' failed: {message}")]
    AgentFailed { program: String, message: String },

    #[error("input closed while waiting for a move")]
    InputClosed,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Errors that cost the offending side its turn rather than aborting the match.
    pub fn is_forfeit(&self) -> bool {
        matches!(
            self,
            Error::AgentSpawn { .. } | Error::AgentTimedOut { .. } | Error::AgentFailed { .. }
        )
    }
}

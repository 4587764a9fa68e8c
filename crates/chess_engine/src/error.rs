//! Error types for chess engine
//!
//! Provides custom error types for the fallible edges of the engine:
//! parsing positions, applying caller-supplied moves, and loading the
//! opening book or engine configuration. The search and evaluator
//! themselves never fail on a well-formed position.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in the chess engine
#[derive(Error, Debug)]
pub enum ChessEngineError {
    /// FEN string could not be parsed or describes an illegal setup
    #[error("Invalid FEN '{fen}': {reason}")]
    InvalidFen { fen: String, reason: String },

    /// Move string is malformed or not legal in the current position
    #[error("Illegal move '{uci}' in position {fen}")]
    IllegalMove { uci: String, fen: String },

    /// Undo requested with no moves on the stack
    #[error("Nothing to undo: no moves have been played")]
    NothingToUndo,

    /// Opening book file could not be read
    #[error("Failed to read opening book {path}: {source}")]
    BookIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Engine configuration file could not be read
    #[error("Failed to read engine config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Engine configuration file is not valid JSON for [`crate::EngineConfig`]
    #[error("Failed to parse engine config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type alias for chess engine operations
pub type ChessEngineResult<T> = Result<T, ChessEngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_input() {
        let err = ChessEngineError::IllegalMove {
            uci: "e2e5".to_string(),
            fen: "startpos".to_string(),
        };
        assert!(err.to_string().contains("e2e5"), "message should echo the move");

        let err = ChessEngineError::InvalidFen {
            fen: "garbage".to_string(),
            reason: "bad board".to_string(),
        };
        assert!(err.to_string().contains("garbage"));
        assert!(err.to_string().contains("bad board"));
    }
}

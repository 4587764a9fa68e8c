//! Thin seam over the rules engine
//!
//! Everything the engine asks of `shakmaty` goes through this module:
//! parsing and serialising positions, converting moves to and from UCI
//! coordinate strings, deriving successors and the game-over predicates
//! the evaluator and search share.

use shakmaty::fen::Fen;
use shakmaty::uci::UciMove;
use shakmaty::{CastlingMode, Chess, EnPassantMode, Move, MoveList, Position};

use crate::constants::SEVENTY_FIVE_MOVE_PLIES;
use crate::error::{ChessEngineError, ChessEngineResult};

/// FEN of the standard starting position
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Parse a FEN string into a legal position
pub fn position_from_fen(fen: &str) -> ChessEngineResult<Chess> {
    let parsed: Fen = fen.trim().parse().map_err(|e| ChessEngineError::InvalidFen {
        fen: fen.to_string(),
        reason: format!("{e}"),
    })?;
    parsed
        .into_position(CastlingMode::Standard)
        .map_err(|e| ChessEngineError::InvalidFen {
            fen: fen.to_string(),
            reason: format!("{e}"),
        })
}

/// Full FEN of a position, move counters included
pub fn fen_of(position: &Chess) -> String {
    Fen::from_position(position.clone(), EnPassantMode::Legal).to_string()
}

/// FEN without the halfmove clock and fullmove number.
///
/// Two positions with the same key are repetitions of each other.
pub fn repetition_key(position: &Chess) -> String {
    repetition_key_from_fen(&fen_of(position))
}

/// Repetition key of an already serialised position
pub fn repetition_key_from_fen(fen: &str) -> String {
    fen.split_whitespace().take(4).collect::<Vec<_>>().join(" ")
}

/// UCI coordinate string for a move (`e1g1` for short castling)
pub fn uci_of(mv: &Move) -> String {
    mv.to_uci(CastlingMode::Standard).to_string()
}

/// All legal moves as UCI strings, in generation order
pub fn legal_uci_moves(position: &Chess) -> Vec<String> {
    position.legal_moves().iter().map(uci_of).collect()
}

/// Look up a legal move by its UCI string
pub fn find_legal_move(position: &Chess, uci: &str) -> Option<Move> {
    let parsed: UciMove = uci.trim().parse().ok()?;
    parsed.to_move(position).ok()
}

/// Position after playing a legal move
pub fn successor(position: &Chess, mv: &Move) -> Chess {
    let mut next = position.clone();
    next.play_unchecked(mv);
    next
}

/// True for a syntactically valid coordinate move such as `e2e4` or `a7a8q`
pub fn is_coordinate_move(token: &str) -> bool {
    let bytes = token.as_bytes();
    let square = |f: u8, r: u8| (b'a'..=b'h').contains(&f) && (b'1'..=b'8').contains(&r);
    match bytes {
        [f1, r1, f2, r2] => square(*f1, *r1) && square(*f2, *r2),
        [f1, r1, f2, r2, promo] => {
            square(*f1, *r1) && square(*f2, *r2) && matches!(promo, b'q' | b'r' | b'b' | b'n')
        }
        _ => false,
    }
}

/// Seventy-five consecutive moves by each side without a capture or pawn move.
///
/// A checkmate delivered on the last of those moves still stands.
pub fn is_seventy_five_moves(position: &Chess) -> bool {
    position.halfmoves() >= SEVENTY_FIVE_MOVE_PLIES && !position.is_checkmate()
}

/// Game over with respect to the position alone: no legal moves,
/// insufficient material or the seventy-five-move rule.
pub fn is_game_over(position: &Chess, legal: &MoveList) -> bool {
    legal.is_empty() || position.is_insufficient_material() || is_seventy_five_moves(position)
}

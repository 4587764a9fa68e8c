//! Material balance evaluation
//!
//! Evaluates positions based on piece values alone, or piece values plus
//! the positional bonus from a piece-square table.

use shakmaty::{Board, Color};

use super::pst::PieceSquareTables;
use crate::constants::piece_value;

/// Sum of piece values, White positive
///
/// This is also the evaluator's fallback when the full evaluation fails.
pub fn material_balance(board: &Board) -> i32 {
    let mut score = 0;
    for square in board.occupied() {
        if let Some(piece) = board.piece_at(square) {
            let value = piece_value(piece.role);
            score += match piece.color {
                Color::White => value,
                Color::Black => -value,
            };
        }
    }
    score
}

/// Piece values plus piece-square bonuses, White positive
pub fn material_and_placement(board: &Board, tables: &PieceSquareTables) -> i32 {
    let mut score = 0;
    for square in board.occupied() {
        if let Some(piece) = board.piece_at(square) {
            let value = piece_value(piece.role) + tables.value(piece.role, piece.color, square);
            score += match piece.color {
                Color::White => value,
                Color::Black => -value,
            };
        }
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::position_from_fen;
    use crate::types::GamePhase;
    use shakmaty::{Chess, Position};

    #[test]
    fn test_start_position_is_balanced() {
        let pos = Chess::default();
        let tables = PieceSquareTables::for_phase(GamePhase::Opening);
        assert_eq!(material_balance(pos.board()), 0);
        assert_eq!(material_and_placement(pos.board(), tables), 0);
    }

    #[test]
    fn test_extra_queen_counts_for_owner() {
        // White queen against a lone black king
        let pos = position_from_fen("4k3/8/8/8/8/8/8/3QK3 w - - 0 1").unwrap();
        assert_eq!(material_balance(pos.board()), 900);

        let pos = position_from_fen("3qk3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(material_balance(pos.board()), -900);
    }
}

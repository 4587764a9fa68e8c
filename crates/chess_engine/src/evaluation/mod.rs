//! Position evaluation with piece-square tables
//!
//! Evaluates chess positions from White's point of view using:
//! - Known results (draws score 0, checkmate scores ±[`MATE_SCORE`])
//! - Material count (piece values)
//! - Positional bonuses (piece-square tables, chosen by game phase)
//! - Heuristic terms (mobility, king safety, pawn structure, tempo,
//!   centre control, pins, check, passed pawns)
//!
//! ## Module Organization
//!
//! - `pst` - Piece-square tables for positional evaluation
//! - `material` - Material balance evaluation
//! - `terms` - Independent heuristic terms
//!
//! ## Failure handling
//!
//! Each heuristic term is fail-soft: a term that returns an error
//! contributes 0 and the rest are still summed. A panic anywhere in the
//! material or heuristic stage is caught once at the top and the
//! evaluator answers with plain material balance instead.

mod material;
mod pst;
mod terms;

use std::panic::{self, AssertUnwindSafe};

use shakmaty::{Chess, Color, Position};
use tracing::{debug, warn};

use crate::constants::{ENDGAME_PIECE_THRESHOLD, MATE_SCORE};
use crate::history::PositionHistory;
use crate::rules;
use crate::types::{Evaluation, GamePhase};

pub use material::{material_and_placement, material_balance};
pub use pst::PieceSquareTables;
pub use terms::{pinned_pieces, TermContext, TermError, TERMS};

/// Evaluate a position with the default evaluator.
///
/// Pure function of the position. Repetition draws need the game's
/// history and are only detected by [`Evaluator::evaluate_with_history`].
pub fn evaluate(position: &Chess) -> Evaluation {
    Evaluator::default().evaluate(position)
}

/// Material count only, White positive
pub fn evaluate_material(position: &Chess) -> Evaluation {
    material_balance(position.board())
}

/// Endgame once at most [`ENDGAME_PIECE_THRESHOLD`] non-king pieces remain
pub fn game_phase(position: &Chess) -> GamePhase {
    let board = position.board();
    let non_king = board.occupied().count() - board.kings().count();
    if non_king <= ENDGAME_PIECE_THRESHOLD {
        GamePhase::Endgame
    } else {
        GamePhase::Opening
    }
}

/// Static evaluator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluator {
    draw_on_threefold: bool,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self {
            draw_on_threefold: true,
        }
    }
}

impl Evaluator {
    /// # Arguments
    ///
    /// * `draw_on_threefold` - Score threefold repetitions as draws.
    ///   Fivefold repetitions are always draws.
    pub fn new(draw_on_threefold: bool) -> Self {
        Self { draw_on_threefold }
    }

    pub fn draw_on_threefold(&self) -> bool {
        self.draw_on_threefold
    }

    /// True when `key` has occurred often enough in `history` to be a draw
    pub fn is_repetition_draw(&self, history: &PositionHistory, key: &str) -> bool {
        let seen = history.count(key);
        seen >= 5 || (self.draw_on_threefold && seen >= 3)
    }

    /// Evaluate a position without repetition context
    pub fn evaluate(&self, position: &Chess) -> Evaluation {
        self.evaluate_inner(position, None)
    }

    /// Evaluate a position that is the last entry of `history`
    pub fn evaluate_with_history(&self, position: &Chess, history: &PositionHistory) -> Evaluation {
        self.evaluate_inner(position, Some(history))
    }

    fn evaluate_inner(&self, position: &Chess, history: Option<&PositionHistory>) -> Evaluation {
        let legal = position.legal_moves();

        // Known draws
        if legal.is_empty() && !position.is_check() {
            return 0;
        }
        if rules::is_seventy_five_moves(position) || position.is_insufficient_material() {
            return 0;
        }
        if let Some(history) = history {
            if self.is_repetition_draw(history, &rules::repetition_key(position)) {
                return 0;
            }
        }

        // Checkmate: the side to move has lost
        if legal.is_empty() {
            return match position.turn() {
                Color::White => -MATE_SCORE,
                Color::Black => MATE_SCORE,
            };
        }

        self.static_score(position, legal.len())
    }

    /// Material, placement and heuristic terms, with the material-only
    /// fallback if anything panics
    pub fn static_score(&self, position: &Chess, legal_moves: usize) -> Evaluation {
        match panic::catch_unwind(AssertUnwindSafe(|| positional_score(position, legal_moves))) {
            Ok(score) => score,
            Err(_) => {
                warn!(
                    "[EVAL] Evaluation failed for {}, using material count",
                    rules::fen_of(position)
                );
                evaluate_material(position)
            }
        }
    }
}

fn positional_score(position: &Chess, legal_moves: usize) -> Evaluation {
    let phase = game_phase(position);
    let tables = PieceSquareTables::for_phase(phase);
    let mut score = material_and_placement(position.board(), tables);

    let ctx = TermContext {
        position,
        phase,
        legal_moves,
    };
    for (name, term) in TERMS {
        match term(&ctx) {
            Ok(value) => score += value,
            Err(e) => debug!("[EVAL] Skipping {} term: {}", name, e),
        }
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::position_from_fen;

    #[test]
    fn test_start_position_scores_tempo_only() {
        //! Everything is symmetric except who is to move
        assert_eq!(evaluate(&Chess::default()), 10);
    }

    #[test]
    fn test_checkmate_scores() {
        let black_mated = position_from_fen("R5k1/5ppp/8/8/8/8/5PPP/6K1 b - - 0 1").unwrap();
        assert_eq!(evaluate(&black_mated), MATE_SCORE);

        let white_mated = position_from_fen("6k1/8/8/8/8/8/5PPP/r5K1 w - - 0 1").unwrap();
        assert_eq!(evaluate(&white_mated), -MATE_SCORE);
    }

    #[test]
    fn test_stalemate_is_zero() {
        let stalemate = position_from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert_eq!(evaluate(&stalemate), 0);
    }

    #[test]
    fn test_insufficient_material_is_zero() {
        let bare_kings = position_from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(evaluate(&bare_kings), 0);
        let knight = position_from_fen("4k3/8/8/8/8/8/8/4KN2 w - - 0 1").unwrap();
        assert_eq!(evaluate(&knight), 0);
    }

    #[test]
    fn test_seventy_five_move_rule_is_zero() {
        let pos = position_from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 150 120").unwrap();
        assert_eq!(evaluate(&pos), 0);
        let pos = position_from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 10 120").unwrap();
        assert!(evaluate(&pos) > 400, "an extra rook should dominate the score");
    }

    #[test]
    fn test_repetition_draws_need_history() {
        let pos = position_from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        let key = rules::repetition_key(&pos);
        let mut history = PositionHistory::new();
        for _ in 0..3 {
            history.push(key.clone());
        }

        assert_eq!(Evaluator::new(true).evaluate_with_history(&pos, &history), 0);
        assert!(Evaluator::new(false).evaluate_with_history(&pos, &history) > 0);

        history.push(key.clone());
        history.push(key);
        assert_eq!(Evaluator::new(false).evaluate_with_history(&pos, &history), 0);
    }

    #[test]
    fn test_colour_mirror_negates_score() {
        //! A position and its colour-flipped mirror score as negatives
        let white = position_from_fen("4k3/8/8/8/3N4/8/1P6/4K3 w - - 0 1").unwrap();
        let black = position_from_fen("4k3/1p6/8/3n4/8/8/8/4K3 b - - 0 1").unwrap();
        assert_eq!(evaluate(&white), -evaluate(&black));
    }

    #[test]
    fn test_game_phase_ignores_kings() {
        assert_eq!(game_phase(&Chess::default()), GamePhase::Opening);
        // Twelve non-king pieces plus both kings is still an endgame
        let twelve = position_from_fen("r3k2r/pppp4/8/8/8/8/PPPP4/R3K2R w - - 0 1").unwrap();
        assert_eq!(game_phase(&twelve), GamePhase::Endgame);
        let thirteen = position_from_fen("r3k2r/ppppp3/8/8/8/8/PPPP4/R3K2R w - - 0 1").unwrap();
        assert_eq!(game_phase(&thirteen), GamePhase::Opening);
    }

    #[test]
    fn test_material_fallback_matches_balance() {
        let pos = position_from_fen("4k3/8/8/8/8/8/8/3QK3 w - - 0 1").unwrap();
        assert_eq!(evaluate_material(&pos), 900);
    }
}

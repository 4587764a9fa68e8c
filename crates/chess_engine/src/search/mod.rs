//! Alpha-beta search with iterative deepening
//!
//! This module implements the move search using:
//! - Minimax with alpha-beta pruning (recursive, White maximizes)
//! - Position-result cache with depth, bound and mate validation
//! - Move ordering for better pruning
//! - Iterative deepening for time-budgeted callers
//!
//! A root search reports every move that attains the best value, so the
//! caller can choose among equally good moves.
//!
//! ## Module Organization
//!
//! - `alphabeta` - Core alpha-beta search algorithm
//! - `ordering` - Move ordering heuristics
//! - `iterative` - Iterative deepening wrapper and depth adjustment

mod alphabeta;
mod iterative;
mod ordering;

pub use iterative::{adaptive_depth, iterative_deepening};
pub use ordering::{mvv_lva_score, ordered_children, Child};

use shakmaty::Chess;

use crate::cache::PositionCache;
use crate::evaluation::Evaluator;
use crate::history::PositionHistory;
use crate::types::{OrderingStrategy, SearchResult};
use alphabeta::SearchContext;

/// Borrowed collaborators for running root searches
pub struct Searcher<'a> {
    cache: &'a mut PositionCache,
    evaluator: &'a Evaluator,
    ordering: OrderingStrategy,
}

impl<'a> Searcher<'a> {
    pub fn new(cache: &'a mut PositionCache, evaluator: &'a Evaluator) -> Self {
        Self {
            cache,
            evaluator,
            ordering: OrderingStrategy::default(),
        }
    }

    pub fn with_ordering(mut self, ordering: OrderingStrategy) -> Self {
        self.ordering = ordering;
        self
    }

    /// Search `position` to `depth` plies.
    ///
    /// # Arguments
    ///
    /// * `position` - Root position, not modified
    /// * `depth` - Plies to search, raised to 1 if lower
    /// * `maximizing` - True when the side to move wants the highest score (White)
    /// * `history` - Repetition history ending with `position`
    ///
    /// # Returns
    ///
    /// The root value and every root move tied for it. `root_moves` is
    /// empty when the root has no legal moves.
    pub fn search(
        &mut self,
        position: &Chess,
        depth: u32,
        maximizing: bool,
        history: &PositionHistory,
    ) -> SearchResult {
        SearchContext::new(self.cache, self.evaluator, self.ordering, history.clone())
            .search_root(position, depth, maximizing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MATE_SCORE;
    use crate::rules::{self, position_from_fen};
    use shakmaty::Position;

    fn search_fen(fen: &str, depth: u32, ordering: OrderingStrategy) -> SearchResult {
        let position = position_from_fen(fen).unwrap();
        let mut cache = PositionCache::new(50_000);
        let evaluator = Evaluator::default();
        Searcher::new(&mut cache, &evaluator)
            .with_ordering(ordering)
            .search(
                &position,
                depth,
                position.turn().is_white(),
                &PositionHistory::starting_at(&position),
            )
    }

    #[test]
    fn test_finds_mate_in_one_for_white() {
        //! The immediate mate must stay the only best move at every depth,
        //! scored with the plies that were left when it was found
        for depth in 1..=4 {
            let result = search_fen(
                "6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1",
                depth,
                OrderingStrategy::StaticEval,
            );
            let expected = MATE_SCORE + (depth - 1) as i32;
            assert_eq!(result.best_evaluation, expected, "depth {depth}");
            assert_eq!(result.root_moves, vec!["a1a8".to_string()], "depth {depth}");
        }
    }

    #[test]
    fn test_finds_mate_in_one_for_black() {
        for depth in 1..=4 {
            let result = search_fen(
                "r5k1/5ppp/8/8/8/8/5PPP/6K1 b - - 0 1",
                depth,
                OrderingStrategy::StaticEval,
            );
            let expected = -(MATE_SCORE + (depth - 1) as i32);
            assert_eq!(result.best_evaluation, expected, "depth {depth}");
            assert_eq!(result.root_moves, vec!["a8a1".to_string()], "depth {depth}");
        }
    }

    #[test]
    fn test_quickest_mate_beats_slower_mates() {
        //! With king and queen against king many moves mate within three
        //! plies; only the immediate Qb8# may be reported
        for depth in 3..=4 {
            for ordering in [OrderingStrategy::StaticEval, OrderingStrategy::MvvLva] {
                let result = search_fen("7k/8/6K1/8/8/8/8/1Q6 w - - 0 1", depth, ordering);
                assert!(crate::constants::is_mate_score(result.best_evaluation));
                assert_eq!(
                    result.root_moves,
                    vec!["b1b8".to_string()],
                    "depth {depth} {ordering:?}"
                );
            }
        }
    }

    #[test]
    fn test_orderings_agree_on_value() {
        //! Ordering changes the work done, never the minimax value
        let fen = "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3";
        let by_eval = search_fen(fen, 2, OrderingStrategy::StaticEval);
        let by_mvv = search_fen(fen, 2, OrderingStrategy::MvvLva);
        assert_eq!(by_eval.best_evaluation, by_mvv.best_evaluation);

        let mut a = by_eval.root_moves.clone();
        let mut b = by_mvv.root_moves.clone();
        a.sort();
        b.sort();
        assert_eq!(a, b, "tie sets should match under any ordering");
    }

    #[test]
    fn test_tied_moves_are_all_legal() {
        let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
        let position = position_from_fen(fen).unwrap();
        let result = search_fen(fen, 2, OrderingStrategy::StaticEval);
        assert!(!result.root_moves.is_empty());
        for uci in &result.root_moves {
            assert!(
                rules::find_legal_move(&position, uci).is_some(),
                "{uci} should be legal"
            );
        }
    }
}

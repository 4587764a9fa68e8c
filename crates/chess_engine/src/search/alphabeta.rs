//! Alpha-beta minimax search
//!
//! Recursive, depth-first minimax with alpha-beta pruning. White
//! maximizes and Black minimizes. Scores are never negated between plies.
//!
//! All per-call state (repetition path, node and cut-off counters) lives
//! in a [`SearchContext`] created for one root search and passed down the
//! recursion. The result cache is borrowed from the owner for the
//! duration of the call.
//!
//! ## Cache probing
//!
//! A cached entry is only used when:
//! 1. it was computed with at least the remaining depth,
//! 2. its bound settles the current window (exact, or a lower bound at
//!    or above beta, or an upper bound at or below alpha), and
//! 3. for mate scores, the position is still game over. A mate score on a
//!    position that has legal play left is removed from the cache and the
//!    node is searched again.
//!
//! ## Mate distance
//!
//! A checkmate found with `d` plies of depth left scores
//! `±(MATE_SCORE + d)`, so a quicker mate always outranks a slower one
//! and the root never reports a slow mate as tied with a fast one.

use std::time::Instant;

use shakmaty::{Chess, Position};
use tracing::{debug, trace};

use super::ordering::ordered_children;
use crate::cache::{Bound, PositionCache};
use crate::constants::{is_mate_score, INFINITY, MAX_MATE_DISTANCE};
use crate::evaluation::Evaluator;
use crate::history::PositionHistory;
use crate::rules;
use crate::types::{Evaluation, OrderingStrategy, SearchResult};

/// State for one root search call
pub(crate) struct SearchContext<'a> {
    cache: &'a mut PositionCache,
    evaluator: &'a Evaluator,
    ordering: OrderingStrategy,
    /// Positions from the start of the game down to the current node
    history: PositionHistory,
    nodes: u64,
    cache_hits: u64,
    cutoffs: u64,
}

impl<'a> SearchContext<'a> {
    pub(crate) fn new(
        cache: &'a mut PositionCache,
        evaluator: &'a Evaluator,
        ordering: OrderingStrategy,
        history: PositionHistory,
    ) -> Self {
        Self {
            cache,
            evaluator,
            ordering,
            history,
            nodes: 0,
            cache_hits: 0,
            cutoffs: 0,
        }
    }

    /// Search every root move and collect those tied for the best value.
    ///
    /// Each root child after the first is searched with the window opened
    /// one point past the current best, so a move that equals the best
    /// comes back with its exact value rather than a bound.
    ///
    /// `history` must already contain `position`.
    pub(crate) fn search_root(mut self, position: &Chess, depth: u32, maximizing: bool) -> SearchResult {
        let start = Instant::now();
        let depth = depth.max(1);
        self.nodes += 1;

        let moves = position.legal_moves();
        let repeated = self
            .evaluator
            .is_repetition_draw(&self.history, &rules::repetition_key(position));
        if repeated || rules::is_game_over(position, &moves) {
            debug!("[SEARCH] Root is already decided, no move to search");
            let value = if repeated {
                0
            } else {
                self.evaluator.evaluate(position)
            };
            return SearchResult {
                best_evaluation: value,
                root_moves: Vec::new(),
                depth,
                nodes: self.nodes,
                cache_hits: 0,
                cutoffs: 0,
                elapsed: start.elapsed(),
            };
        }

        let children = ordered_children(
            moves,
            position,
            depth,
            maximizing,
            self.ordering,
            self.evaluator,
        );

        let mut best = if maximizing { -INFINITY } else { INFINITY };
        let mut root_moves: Vec<String> = Vec::new();

        for child in &children {
            let value = if maximizing {
                let alpha = if root_moves.is_empty() {
                    -INFINITY
                } else {
                    best - 1
                };
                self.alphabeta(&child.position, depth - 1, alpha, INFINITY, false)
            } else {
                let beta = if root_moves.is_empty() {
                    INFINITY
                } else {
                    best + 1
                };
                self.alphabeta(&child.position, depth - 1, -INFINITY, beta, true)
            };

            let uci = rules::uci_of(&child.mv);
            trace!("[SEARCH] Root move {} scored {}", uci, value);

            let improves = if maximizing { value > best } else { value < best };
            if improves {
                best = value;
                root_moves.clear();
                root_moves.push(uci);
            } else if value == best {
                root_moves.push(uci);
            }
        }

        self.cache
            .store_bounded(&rules::fen_of(position), best, depth, Bound::Exact);

        let result = SearchResult {
            best_evaluation: best,
            root_moves,
            depth,
            nodes: self.nodes,
            cache_hits: self.cache_hits,
            cutoffs: self.cutoffs,
            elapsed: start.elapsed(),
        };
        debug!(
            "[SEARCH] depth {} best {} ties {:?} nodes {} cache hits {} cutoffs {} in {:?}",
            result.depth,
            result.best_evaluation,
            result.root_moves,
            result.nodes,
            result.cache_hits,
            result.cutoffs,
            result.elapsed
        );
        result
    }

    /// Minimax value of `position` with `depth` plies remaining
    fn alphabeta(
        &mut self,
        position: &Chess,
        depth: u32,
        alpha: Evaluation,
        beta: Evaluation,
        maximizing: bool,
    ) -> Evaluation {
        let fen = rules::fen_of(position);
        self.history.push(rules::repetition_key_from_fen(&fen));
        let value = self.node(position, &fen, depth, alpha, beta, maximizing);
        self.history.pop();
        value
    }

    fn node(
        &mut self,
        position: &Chess,
        fen: &str,
        depth: u32,
        mut alpha: Evaluation,
        mut beta: Evaluation,
        maximizing: bool,
    ) -> Evaluation {
        self.nodes += 1;

        // Repetition draws depend on the path, so they are never cached
        if self
            .evaluator
            .is_repetition_draw(&self.history, &rules::repetition_key_from_fen(fen))
        {
            return 0;
        }

        if let Some(value) = self.probe(position, fen, depth, alpha, beta) {
            self.cache_hits += 1;
            return value;
        }

        if depth == 0 {
            let value = self.evaluator.evaluate(position);
            self.cache.store(fen, value, 0);
            return value;
        }

        let moves = position.legal_moves();
        if rules::is_game_over(position, &moves) {
            let value = self.terminal_value(position, depth);
            self.cache.store(fen, value, depth);
            return value;
        }

        let children = ordered_children(
            moves,
            position,
            depth,
            maximizing,
            self.ordering,
            self.evaluator,
        );
        let (alpha_in, beta_in) = (alpha, beta);

        let value = if maximizing {
            let mut value_max = -INFINITY;
            for child in &children {
                let value = self.alphabeta(&child.position, depth - 1, alpha, beta, false);
                value_max = value_max.max(value);
                alpha = alpha.max(value_max);
                if alpha >= beta {
                    self.cutoffs += 1;
                    break;
                }
            }
            value_max
        } else {
            let mut value_min = INFINITY;
            for child in &children {
                let value = self.alphabeta(&child.position, depth - 1, alpha, beta, true);
                value_min = value_min.min(value);
                beta = beta.min(value_min);
                if beta <= alpha {
                    self.cutoffs += 1;
                    break;
                }
            }
            value_min
        };

        let bound = if value <= alpha_in {
            Bound::Upper
        } else if value >= beta_in {
            Bound::Lower
        } else {
            Bound::Exact
        };
        self.cache.store_bounded(fen, value, depth, bound);
        value
    }

    /// Value of a finished game with `depth` plies left, mates scored by distance
    fn terminal_value(&self, position: &Chess, depth: u32) -> Evaluation {
        let value = self.evaluator.evaluate(position);
        if is_mate_score(value) {
            let bonus = depth.min(MAX_MATE_DISTANCE) as Evaluation;
            value + value.signum() * bonus
        } else {
            value
        }
    }

    /// Cached value for this node, if it may be trusted
    fn probe(
        &mut self,
        position: &Chess,
        fen: &str,
        depth: u32,
        alpha: Evaluation,
        beta: Evaluation,
    ) -> Option<Evaluation> {
        let entry = self.cache.get(fen)?;
        if entry.depth < depth {
            return None;
        }

        if is_mate_score(entry.evaluation) {
            let moves = position.legal_moves();
            if !rules::is_game_over(position, &moves) {
                trace!("[CACHE] Discarding stale mate score for {}", fen);
                self.cache.remove(fen);
                return None;
            }
            // Still mate, but the distance bonus belongs to the current depth
            return Some(self.terminal_value(position, depth));
        }

        match entry.bound {
            Bound::Exact => Some(entry.evaluation),
            Bound::Lower if entry.evaluation >= beta => Some(entry.evaluation),
            Bound::Upper if entry.evaluation <= alpha => Some(entry.evaluation),
            _ => None,
        }
    }
}

//! Chess-playing agent
//!
//! [`ChessAgent`] owns the long-lived engine state (result cache, opening
//! book, random source) and answers "which move?" for a position or a
//! game session.
//!
//! # Move selection
//!
//! 1. While the session is still in book and fewer than
//!    `book.max_plies` moves have been played, the book is asked for a
//!    continuation of the moves so far.
//! 2. Otherwise the position is searched and one of the root moves tied
//!    for the best value is picked uniformly at random. The session then
//!    leaves the book for good.
//! 3. If a search reports no tied moves although the game is not over,
//!    the first legal move is played and the fault is logged.
//!
//! A finished game (mate, stalemate, insufficient material, the
//! seventy-five-move rule or a repetition draw) gets no move at all.
//!
//! # Examples
//!
//! ```rust,ignore
//! let mut agent = ChessAgent::new(EngineConfig::default());
//! let mut session = GameSession::new();
//! if let Some(choice) = agent.select_move(&mut session) {
//!     session.play(&choice.uci)?;
//! }
//! ```

use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use shakmaty::{Chess, Position};
use tracing::{error, info};

use crate::book::OpeningBook;
use crate::cache::PositionCache;
use crate::config::EngineConfig;
use crate::error::ChessEngineResult;
use crate::evaluation::Evaluator;
use crate::history::PositionHistory;
use crate::rules;
use crate::search::{iterative_deepening, Searcher};
use crate::session::GameSession;
use crate::types::{EngineMove, Evaluation, MoveSource, SearchResult};

pub struct ChessAgent {
    config: EngineConfig,
    evaluator: Evaluator,
    cache: PositionCache,
    book: OpeningBook,
    rng: StdRng,
}

impl ChessAgent {
    /// Build an agent, loading the opening book as configured
    pub fn new(config: EngineConfig) -> Self {
        let book = OpeningBook::load(&config.book);
        Self::with_book(config, book)
    }

    /// Build an agent around an already loaded book
    pub fn with_book(config: EngineConfig, book: OpeningBook) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        info!(
            "[AGENT] depth {} ordering {:?} cache {} book {} lines ({:?})",
            config.search.depth,
            config.search.ordering,
            config.cache.capacity,
            book.len(),
            book.mode()
        );
        Self {
            evaluator: Evaluator::new(config.evaluation.draw_on_threefold),
            cache: PositionCache::new(config.cache.capacity),
            book,
            rng,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn cache(&self) -> &PositionCache {
        &self.cache
    }

    pub fn book(&self) -> &OpeningBook {
        &self.book
    }

    /// Static evaluation, White positive
    pub fn evaluate(&self, position: &Chess) -> Evaluation {
        self.evaluator.evaluate(position)
    }

    /// Search a standalone position with no prior game history
    pub fn search(&mut self, position: &Chess, depth: u32, maximizing: bool) -> SearchResult {
        let history = PositionHistory::starting_at(position);
        self.search_with_history(position, &history, depth, maximizing)
    }

    /// Search a position reached through `history` (which must end with it)
    pub fn search_with_history(
        &mut self,
        position: &Chess,
        history: &PositionHistory,
        depth: u32,
        maximizing: bool,
    ) -> SearchResult {
        Searcher::new(&mut self.cache, &self.evaluator)
            .with_ordering(self.config.search.ordering)
            .search(position, depth, maximizing, history)
    }

    /// Search the session's current position for the side to move
    pub fn search_session(&mut self, session: &GameSession, depth: u32) -> SearchResult {
        let maximizing = session.turn().is_white();
        self.search_with_history(session.position(), session.history(), depth, maximizing)
    }

    /// Iterative deepening on the session's position within `budget`
    pub fn search_iterative(
        &mut self,
        session: &GameSession,
        max_depth: u32,
        budget: Duration,
    ) -> SearchResult {
        iterative_deepening(max_depth, budget, |depth| self.search_session(session, depth))
    }

    /// Search and pick one of the best moves.
    ///
    /// Returns `None` when the position has no legal moves.
    pub fn choose_move(&mut self, position: &Chess, depth: u32, maximizing: bool) -> Option<String> {
        let history = PositionHistory::starting_at(position);
        let result = self.search_with_history(position, &history, depth, maximizing);
        self.pick(position, &history, &result).map(|choice| choice.uci)
    }

    /// Book continuation of `played`, if any
    pub fn book_move(&mut self, played: &[String]) -> Option<String> {
        self.book.next_move(played, &mut self.rng)
    }

    /// Choose a move for the side to move in `session`, using the book
    /// first and the configured search depth otherwise
    pub fn select_move(&mut self, session: &mut GameSession) -> Option<EngineMove> {
        let depth = self.config.search.depth;
        self.select_move_with(session, |agent, session| agent.search_session(session, depth))
    }

    /// Like [`ChessAgent::select_move`], searching by iterative deepening
    /// within `budget` instead of at a fixed depth
    pub fn select_move_timed(
        &mut self,
        session: &mut GameSession,
        max_depth: u32,
        budget: Duration,
    ) -> Option<EngineMove> {
        self.select_move_with(session, |agent, session| {
            agent.search_iterative(session, max_depth, budget)
        })
    }

    fn select_move_with<F>(&mut self, session: &mut GameSession, search: F) -> Option<EngineMove>
    where
        F: FnOnce(&mut Self, &GameSession) -> SearchResult,
    {
        if self.is_finished(session.position(), session.history()) {
            info!("[AGENT] Game is over ({}), no move to play", session.status());
            return None;
        }

        if let Some(uci) = self.try_book(session) {
            info!("[AGENT] Book move {}", uci);
            return Some(EngineMove {
                uci,
                source: MoveSource::Book,
                evaluation: None,
                depth: None,
            });
        }

        session.leave_book();
        let result = search(self, session);
        let choice = self.pick(session.position(), session.history(), &result)?;
        info!(
            "[AGENT] Playing {} ({:?}, eval {:?}, {} tied, {} nodes)",
            choice.uci,
            choice.source,
            choice.evaluation,
            result.root_moves.len(),
            result.nodes
        );
        Some(choice)
    }

    fn try_book(&mut self, session: &GameSession) -> Option<String> {
        if !self.config.book.enabled
            || !session.in_book()
            || session.moves().len() >= self.config.book.max_plies
        {
            return None;
        }
        let uci = self.book.next_move(session.moves(), &mut self.rng)?;
        // A book line that is not playable here counts as a miss
        rules::find_legal_move(session.position(), &uci).map(|_| uci)
    }

    /// No move may be played: the rules or the repetition policy end the game
    fn is_finished(&self, position: &Chess, history: &PositionHistory) -> bool {
        rules::is_game_over(position, &position.legal_moves())
            || self
                .evaluator
                .is_repetition_draw(history, &rules::repetition_key(position))
    }

    /// Random choice among the tied root moves, or the first legal move
    /// when the search produced none in an unfinished game
    fn pick(
        &mut self,
        position: &Chess,
        history: &PositionHistory,
        result: &SearchResult,
    ) -> Option<EngineMove> {
        if let Some(uci) = result.root_moves.choose(&mut self.rng) {
            return Some(EngineMove {
                uci: uci.clone(),
                source: MoveSource::Search,
                evaluation: Some(result.best_evaluation),
                depth: Some(result.depth),
            });
        }

        if self.is_finished(position, history) {
            return None;
        }
        let first = position.legal_moves().first().map(rules::uci_of)?;
        error!(
            "[AGENT] Search returned no moves for {} despite legal moves, playing {}",
            rules::fen_of(position),
            first
        );
        Some(EngineMove {
            uci: first,
            source: MoveSource::Fallback,
            evaluation: None,
            depth: None,
        })
    }

    /// Forget every cached search result
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Take back the session's last move and clear the cache
    pub fn undo(&mut self, session: &mut GameSession) -> ChessEngineResult<String> {
        let taken_back = session.undo()?;
        self.clear_cache();
        Ok(taken_back)
    }
}

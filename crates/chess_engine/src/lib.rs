//! Chess engine core
//!
//! Move selection for a chess-playing agent. Given a position, the agent
//! consults an opening book while the game is young, and otherwise runs a
//! bounded-depth alpha-beta search over a static evaluator, memoizing
//! node results in a FIFO cache. Among root moves tied for the best value
//! one is chosen at random.
//!
//! Chess rules (legal moves, check, mate, draws, FEN) come from
//! [`shakmaty`]. This crate never mutates a caller's position.
//!
//! ## Module Organization
//!
//! - `evaluation` - Static evaluator (material, piece-square tables, heuristic terms)
//! - `cache` - Bounded FIFO position-result cache
//! - `search` - Alpha-beta search, move ordering, iterative deepening
//! - `book` - Opening-book matcher
//! - `agent` - [`ChessAgent`], tying the above together
//! - `session` - [`GameSession`], the caller's game with undo and status
//! - `history` - Repetition tracking
//! - `time_manager` - Clock and thinking-time allocation
//! - `config` - [`EngineConfig`] and its JSON loader
//! - `rules` - Conversions and predicates over `shakmaty`
//!
//! ## Example
//!
//! ```rust,ignore
//! use chess_engine::{ChessAgent, EngineConfig, GameSession};
//!
//! let mut agent = ChessAgent::new(EngineConfig::default());
//! let mut session = GameSession::new();
//! while !session.status().is_over() {
//!     let Some(choice) = agent.select_move(&mut session) else { break };
//!     session.play(&choice.uci)?;
//! }
//! ```

pub mod agent;
pub mod book;
pub mod cache;
pub mod config;
pub mod constants;
pub mod error;
pub mod evaluation;
pub mod history;
pub mod rules;
pub mod search;
pub mod session;
pub mod time_manager;
pub mod types;

pub use agent::ChessAgent;
pub use book::{OpeningBook, OpeningLine};
pub use cache::{Bound, CacheEntry, CacheStats, PositionCache};
pub use config::{BookConfig, CacheConfig, EngineConfig, EvaluationConfig, SearchConfig};
pub use constants::{INFINITY, MATE_SCORE};
pub use error::{ChessEngineError, ChessEngineResult};
pub use evaluation::{evaluate, evaluate_material, game_phase, Evaluator};
pub use history::PositionHistory;
pub use search::{adaptive_depth, iterative_deepening, Searcher};
pub use session::GameSession;
pub use time_manager::TimeManager;
pub use types::{
    BookMode, Difficulty, EngineMove, Evaluation, GamePhase, GameStatus, MoveSource,
    OrderingStrategy, SearchResult,
};

pub use shakmaty;

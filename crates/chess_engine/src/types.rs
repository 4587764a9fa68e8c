//! Shared engine types
//!
//! Search results, move provenance, configuration enums and game status.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use shakmaty::Color;

/// White-positive centipawn score
pub type Evaluation = i32;

/// Game phase, chosen once per evaluation to select piece-square tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamePhase {
    Opening,
    Endgame,
}

/// Outcome of one root search call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// Minimax value of the root (White positive)
    pub best_evaluation: Evaluation,
    /// Every root move whose value equals `best_evaluation`, in search order
    pub root_moves: Vec<String>,
    /// Depth the search was run at
    pub depth: u32,
    /// Nodes visited, root included
    pub nodes: u64,
    /// Cache probes that were accepted
    pub cache_hits: u64,
    /// Beta/alpha cut-offs taken
    pub cutoffs: u64,
    /// Wall-clock time spent in the call
    pub elapsed: Duration,
}

impl SearchResult {
    /// True when the root had no legal moves
    pub fn is_terminal(&self) -> bool {
        self.root_moves.is_empty()
    }
}

/// Where a selected move came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveSource {
    /// Opening book hit
    Book,
    /// Chosen among the tied root moves of a search
    Search,
    /// First legal move, used when a search reported no tied moves
    Fallback,
}

/// A move chosen by the agent together with its provenance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineMove {
    pub uci: String,
    pub source: MoveSource,
    /// Root value when the move came from a search
    pub evaluation: Option<Evaluation>,
    pub depth: Option<u32>,
}

/// How children are ordered before recursing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderingStrategy {
    /// Full static evaluation of every child (one evaluator call per legal move)
    #[default]
    StaticEval,
    /// Captures by victim/attacker value, promotions, then centralisation
    MvvLva,
}

/// Whether book lookups remove diverged lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookMode {
    /// Lines that stop matching are removed for the rest of the process
    #[default]
    Pruning,
    /// Lookups never modify the book
    Immutable,
}

/// Playing strength presets, mapped to a search depth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    /// Search depth in plies for this preset
    pub fn depth(self) -> u32 {
        match self {
            Difficulty::Easy => 2,
            Difficulty::Medium => 4,
            Difficulty::Hard => 6,
            Difficulty::Expert => 8,
        }
    }

    pub fn all() -> [Difficulty; 4] {
        [
            Difficulty::Easy,
            Difficulty::Medium,
            Difficulty::Hard,
            Difficulty::Expert,
        ]
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Expert => "expert",
        };
        f.write_str(name)
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::all()
            .into_iter()
            .find(|d| d.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown difficulty '{s}' (expected easy, medium, hard or expert)"))
    }
}

/// State of a game as seen by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    Checkmate { winner: Color },
    Stalemate,
    InsufficientMaterial,
    SeventyFiveMoves,
    FivefoldRepetition,
    ThreefoldRepetition,
}

impl GameStatus {
    pub fn is_over(self) -> bool {
        self != GameStatus::Ongoing
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::Ongoing => f.write_str("ongoing"),
            GameStatus::Checkmate { winner } => write!(f, "checkmate, {winner:?} wins"),
            GameStatus::Stalemate => f.write_str("draw by stalemate"),
            GameStatus::InsufficientMaterial => f.write_str("draw by insufficient material"),
            GameStatus::SeventyFiveMoves => f.write_str("draw by the seventy-five-move rule"),
            GameStatus::FivefoldRepetition => f.write_str("draw by fivefold repetition"),
            GameStatus::ThreefoldRepetition => f.write_str("draw by threefold repetition"),
        }
    }
}

//! Command-line interface
//!
//! Global flags override values from the engine config file. Each
//! subcommand is handled in [`crate::commands`].

use std::path::PathBuf;

use chess_engine::{BookMode, Difficulty, OrderingStrategy};
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "chessbot",
    version,
    about = "Chess agent: opening book, alpha-beta search and a static evaluator"
)]
pub struct Cli {
    /// Engine config file (JSON). Defaults to chessbot.json, then the user config directory
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Seed for tie-breaking and book choices
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Log filter, e.g. `debug` or `chess_engine=trace` (RUST_LOG wins)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Move ordering used by the search
    #[arg(long, global = true, value_enum)]
    pub ordering: Option<OrderingArg>,

    /// Opening book file
    #[arg(long, global = true)]
    pub book: Option<PathBuf>,

    /// Never use the opening book
    #[arg(long, global = true)]
    pub no_book: bool,

    /// Whether book lookups prune diverged lines
    #[arg(long, global = true, value_enum)]
    pub book_mode: Option<BookModeArg>,

    /// Result cache capacity (0 disables it)
    #[arg(long, global = true)]
    pub cache_size: Option<usize>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the static evaluation of a position
    Eval {
        #[command(flatten)]
        position: PositionArgs,
    },

    /// Choose a move for the side to move
    Bestmove {
        #[command(flatten)]
        position: PositionArgs,

        /// Search depth in plies
        #[arg(long, conflicts_with = "difficulty")]
        depth: Option<u32>,

        /// Strength preset: easy, medium, hard or expert
        #[arg(long)]
        difficulty: Option<Difficulty>,

        /// Adjust depth to the number of legal moves
        #[arg(long)]
        adaptive: bool,

        /// Iterative deepening within this many milliseconds
        #[arg(long)]
        movetime: Option<u64>,
    },

    /// Let the engine play itself on a clock
    Selfplay {
        /// Stop after this many plies
        #[arg(long, default_value_t = 80)]
        plies: usize,

        /// Seconds on each clock
        #[arg(long, default_value_t = 300)]
        clock: u64,

        /// Seconds added after each move
        #[arg(long, default_value_t = 3)]
        increment: u64,

        /// Deepest iteration per move
        #[arg(long, default_value_t = 4)]
        max_depth: u32,
    },

    /// Play against the engine on stdin/stdout
    Play {
        /// Colour you play
        #[arg(long, value_enum, default_value_t = SideArg::White)]
        color: SideArg,

        /// Engine search depth
        #[arg(long)]
        depth: Option<u32>,
    },

    /// Print the effective engine configuration as JSON
    Config {
        /// Also write it to this file
        #[arg(long)]
        write: Option<PathBuf>,
    },
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct PositionArgs {
    /// Starting position (defaults to the standard start)
    #[arg(long)]
    pub fen: Option<String>,

    /// Moves played from the starting position, in UCI notation
    #[arg(long, num_args = 1..)]
    pub moves: Vec<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderingArg {
    StaticEval,
    MvvLva,
}

impl From<OrderingArg> for OrderingStrategy {
    fn from(arg: OrderingArg) -> Self {
        match arg {
            OrderingArg::StaticEval => OrderingStrategy::StaticEval,
            OrderingArg::MvvLva => OrderingStrategy::MvvLva,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookModeArg {
    Pruning,
    Immutable,
}

impl From<BookModeArg> for BookMode {
    fn from(arg: BookModeArg) -> Self {
        match arg {
            BookModeArg::Pruning => BookMode::Pruning,
            BookModeArg::Immutable => BookMode::Immutable,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideArg {
    White,
    Black,
}

impl From<SideArg> for chess_engine::shakmaty::Color {
    fn from(side: SideArg) -> Self {
        match side {
            SideArg::White => chess_engine::shakmaty::Color::White,
            SideArg::Black => chess_engine::shakmaty::Color::Black,
        }
    }
}

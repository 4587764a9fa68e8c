//! chessbot - command-line front end for the chess engine
//!
//! ## Module Organization
//!
//! - `cli` - Argument definitions
//! - `commands` - Subcommand implementations
//! - `settings` - Config file discovery and command-line overrides
//! - `logging` - `tracing` subscriber setup

pub mod cli;
pub mod commands;
pub mod logging;
pub mod settings;

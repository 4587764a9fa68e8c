//! Engine settings resolution
//!
//! Finds the engine config file and layers command-line overrides on top.
//!
//! # File Location
//!
//! In order of preference:
//! 1. the file given with `--config` (must exist and parse),
//! 2. `chessbot.json` in the working directory,
//! 3. `chessbot.json` in the user configuration directory,
//!    e.g. `~/.config/chessbot/chessbot.json`.
//!
//! Without any of these the built-in defaults are used.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chess_engine::EngineConfig;
use directories::ProjectDirs;
use tracing::info;

use crate::cli::Cli;

/// Settings filename
pub const SETTINGS_FILENAME: &str = "chessbot.json";

/// Path of the settings file in the user's configuration directory.
///
/// Falls back to a local `chessbot.json` if the system config dir cannot
/// be determined.
pub fn user_settings_path() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("com", "trilltino", "chessbot") {
        proj_dirs.config_dir().join(SETTINGS_FILENAME)
    } else {
        PathBuf::from(SETTINGS_FILENAME)
    }
}

/// First existing settings file, if any
pub fn find_settings_file(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    [PathBuf::from(SETTINGS_FILENAME), user_settings_path()]
        .into_iter()
        .find(|path| path.exists())
}

/// Load the engine config for this invocation
pub fn load_config(cli: &Cli) -> Result<EngineConfig> {
    let mut config = match (cli.config.as_deref(), find_settings_file(None)) {
        (Some(explicit), _) => EngineConfig::load(explicit)
            .with_context(|| format!("loading engine config {}", explicit.display()))?,
        (None, Some(found)) => EngineConfig::load_or_default(&found),
        (None, None) => {
            info!("[SETTINGS] No settings file found. Using defaults.");
            EngineConfig::default()
        }
    };
    apply_overrides(&mut config, cli);
    Ok(config)
}

/// Command-line flags win over the config file
pub fn apply_overrides(config: &mut EngineConfig, cli: &Cli) {
    if let Some(seed) = cli.seed {
        config.rng_seed = Some(seed);
    }
    if let Some(ordering) = cli.ordering {
        config.search.ordering = ordering.into();
    }
    if let Some(path) = &cli.book {
        config.book.path = Some(path.clone());
    }
    if cli.no_book {
        config.book.enabled = false;
    }
    if let Some(mode) = cli.book_mode {
        config.book.mode = mode.into();
    }
    if let Some(capacity) = cli.cache_size {
        config.cache.capacity = capacity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_engine::{BookMode, OrderingStrategy};
    use clap::Parser;

    #[test]
    fn test_overrides_apply_on_top_of_file_values() {
        let cli = Cli::parse_from([
            "chessbot",
            "--seed",
            "4",
            "--no-book",
            "--ordering",
            "mvv-lva",
            "--book-mode",
            "immutable",
            "--cache-size",
            "0",
            "eval",
        ]);
        let mut config = EngineConfig::default();
        apply_overrides(&mut config, &cli);

        assert_eq!(config.rng_seed, Some(4));
        assert!(!config.book.enabled);
        assert_eq!(config.search.ordering, OrderingStrategy::MvvLva);
        assert_eq!(config.book.mode, BookMode::Immutable);
        assert_eq!(config.cache.capacity, 0);
    }

    #[test]
    fn test_explicit_missing_config_is_an_error() {
        let cli = Cli::parse_from([
            "chessbot",
            "--config",
            "/definitely/not/here/chessbot.json",
            "eval",
        ]);
        assert!(load_config(&cli).is_err());
    }

    #[test]
    fn test_explicit_path_is_preferred() {
        let explicit = Path::new("custom.json");
        assert_eq!(find_settings_file(Some(explicit)), Some(explicit.to_path_buf()));
    }
}

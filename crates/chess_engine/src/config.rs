//! Engine configuration
//!
//! [`EngineConfig`] groups every tunable of the agent. It serializes to
//! JSON and every field has a default, so a config file only needs the
//! keys it wants to change:
//!
//! ```json
//! {
//!   "search": { "depth": 4, "ordering": "mvv_lva" },
//!   "book": { "mode": "immutable" }
//! }
//! ```
//!
//! # Error Handling
//!
//! [`EngineConfig::load`] reports read and parse failures.
//! [`EngineConfig::load_or_default`] logs them and falls back to defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::constants::{DEFAULT_BOOK_MAX_PLIES, DEFAULT_CACHE_CAPACITY, DEFAULT_SEARCH_DEPTH};
use crate::error::{ChessEngineError, ChessEngineResult};
use crate::types::{BookMode, OrderingStrategy};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Plies searched when the caller gives no depth
    pub depth: u32,
    pub ordering: OrderingStrategy,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_SEARCH_DEPTH,
            ordering: OrderingStrategy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum entries; 0 disables the cache
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookConfig {
    pub enabled: bool,
    /// Book file. When unset the standard locations are tried, then the
    /// built-in lines.
    pub path: Option<PathBuf>,
    pub mode: BookMode,
    /// Book is consulted only while fewer plies than this have been played
    pub max_plies: usize,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
            mode: BookMode::default(),
            max_plies: DEFAULT_BOOK_MAX_PLIES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Score threefold repetitions as draws (fivefold always is)
    pub draw_on_threefold: bool,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            draw_on_threefold: true,
        }
    }
}

/// Complete agent configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub search: SearchConfig,
    pub cache: CacheConfig,
    pub book: BookConfig,
    pub evaluation: EvaluationConfig,
    /// Seed for tie-breaking and book choices; random when unset
    pub rng_seed: Option<u64>,
}

impl EngineConfig {
    /// Parse a JSON document. `path` is only used in error messages.
    pub fn from_json(contents: &str, path: &Path) -> ChessEngineResult<Self> {
        serde_json::from_str(contents).map_err(|source| ChessEngineError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read and parse a config file
    pub fn load(path: &Path) -> ChessEngineResult<Self> {
        let contents = fs::read_to_string(path).map_err(|source| ChessEngineError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents, path)
    }

    /// Read a config file, falling back to defaults if it is missing or invalid
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            info!("[SETTINGS] No engine config at {:?}. Using defaults.", path);
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => {
                info!("[SETTINGS] Loaded engine config from {:?}", path);
                config
            }
            Err(e) => {
                warn!("[SETTINGS] {}. Using defaults.", e);
                Self::default()
            }
        }
    }

    /// Write the config as pretty JSON, creating parent directories
    pub fn save(&self, path: &Path) -> ChessEngineResult<()> {
        let io_err = |source| ChessEngineError::ConfigIo {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| {
            ChessEngineError::ConfigParse {
                path: path.to_path_buf(),
                source,
            }
        })?;
        fs::write(path, json).map_err(io_err)?;
        info!("[SETTINGS] Saved engine config to {:?}", path);
        Ok(())
    }
}

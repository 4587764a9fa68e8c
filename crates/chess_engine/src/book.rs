//! Opening book
//!
//! A book is a list of opening lines, each an ordered sequence of UCI
//! moves. Given the moves played so far, every line that extends them
//! (the played moves are a strict prefix of the line) offers its next
//! move as a candidate.
//!
//! ## Modes
//!
//! - [`BookMode::Pruning`]: a lookup permanently removes every line that
//!   no longer extends the played moves, including lines shorter than the
//!   game. The book shrinks as play leaves it and stays shrunk for the
//!   rest of the process, across games.
//! - [`BookMode::Immutable`]: lookups never modify the book.
//!
//! ## File format
//!
//! One opening per line, moves separated by whitespace. Lines starting
//! with `#` are comments. Reading stops at the first blank line. A line
//! containing a token that is not a coordinate move is skipped with a
//! warning.

use std::fs;
use std::path::{Path, PathBuf};

use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::config::BookConfig;
use crate::error::{ChessEngineError, ChessEngineResult};
use crate::rules;
use crate::types::BookMode;

/// One opening line
pub type OpeningLine = Vec<String>;

/// Locations tried, in order, when no book path is configured
pub const BOOK_SEARCH_PATHS: [&str; 2] = ["openings.txt", "data/openings.txt"];

const BUILTIN_LINES: [[&str; 5]; 5] = [
    ["e2e4", "e7e5", "g1f3", "b8c6", "f1b5"],
    ["d2d4", "d7d5", "c2c4", "e7e6", "b1c3"],
    ["g1f3", "g8f6", "c2c4", "g7g6", "b1c3"],
    ["e2e4", "c7c5", "g1f3", "d7d6", "d2d4"],
    ["d2d4", "g8f6", "c2c4", "e7e6", "b1c3"],
];

#[derive(Debug, Clone)]
pub struct OpeningBook {
    lines: Vec<OpeningLine>,
    mode: BookMode,
}

impl OpeningBook {
    pub fn new(lines: Vec<OpeningLine>, mode: BookMode) -> Self {
        Self { lines, mode }
    }

    /// A book with no lines; every lookup misses
    pub fn empty() -> Self {
        Self::new(Vec::new(), BookMode::Immutable)
    }

    /// The five lines used when no book file is found
    pub fn builtin(mode: BookMode) -> Self {
        let lines = BUILTIN_LINES
            .iter()
            .map(|line| line.iter().map(|m| m.to_string()).collect())
            .collect();
        Self::new(lines, mode)
    }

    /// Parse book text (see the module docs for the format)
    pub fn parse(text: &str, mode: BookMode) -> Self {
        let mut lines = Vec::new();
        for (number, raw) in text.lines().enumerate() {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                break;
            }
            if trimmed.starts_with('#') {
                continue;
            }
            let moves: OpeningLine = trimmed.split_whitespace().map(str::to_string).collect();
            match moves.iter().find(|m| !rules::is_coordinate_move(m)) {
                Some(bad) => warn!(
                    "[BOOK] Skipping line {}: '{}' is not a coordinate move",
                    number + 1,
                    bad
                ),
                None => lines.push(moves),
            }
        }
        Self::new(lines, mode)
    }

    /// Read a book file
    pub fn from_file(path: &Path, mode: BookMode) -> ChessEngineResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| ChessEngineError::BookIo {
            path: path.to_path_buf(),
            source,
        })?;
        let book = Self::parse(&text, mode);
        info!("[BOOK] Loaded {} lines from {:?}", book.len(), path);
        Ok(book)
    }

    /// Resolve the book from configuration.
    ///
    /// Uses `config.path` when set, otherwise the first readable entry of
    /// [`BOOK_SEARCH_PATHS`]. Falls back to [`OpeningBook::builtin`] when
    /// nothing can be read. A disabled book is empty.
    pub fn load(config: &BookConfig) -> Self {
        if !config.enabled {
            return Self::empty();
        }

        let candidates: Vec<PathBuf> = match &config.path {
            Some(path) => vec![path.clone()],
            None => BOOK_SEARCH_PATHS.iter().map(PathBuf::from).collect(),
        };

        for path in &candidates {
            if !path.exists() {
                continue;
            }
            match Self::from_file(path, config.mode) {
                Ok(book) => return book,
                Err(e) => warn!("[BOOK] {}", e),
            }
        }

        info!(
            "[BOOK] No opening book found at {:?}, using built-in lines",
            candidates
        );
        Self::builtin(config.mode)
    }

    pub fn lines(&self) -> &[OpeningLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn mode(&self) -> BookMode {
        self.mode
    }

    /// Next moves offered by every line that strictly extends `played`.
    ///
    /// A move shared by several lines appears once per line. In pruning
    /// mode the lines that no longer extend `played` are removed.
    pub fn candidates(&mut self, played: &[String]) -> Vec<String> {
        let n = played.len();
        let candidates: Vec<String> = self
            .lines
            .iter()
            .filter(|line| line.len() > n && line[..n] == *played)
            .map(|line| line[n].clone())
            .collect();

        if self.mode == BookMode::Pruning {
            let before = self.lines.len();
            self.lines
                .retain(|line| line.len() >= n && line[..n] == *played);
            let pruned = before - self.lines.len();
            if pruned > 0 {
                debug!(
                    "[BOOK] Pruned {} lines, {} remain",
                    pruned,
                    self.lines.len()
                );
            }
        }

        candidates
    }

    /// Pick one book move uniformly among the candidates
    pub fn next_move<R: Rng + ?Sized>(&mut self, played: &[String], rng: &mut R) -> Option<String> {
        self.candidates(played).choose(rng).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn moves(list: &[&str]) -> Vec<String> {
        list.iter().map(|m| m.to_string()).collect()
    }

    fn ruy_lopez(mode: BookMode) -> OpeningBook {
        OpeningBook::new(vec![moves(&["e2e4", "e7e5", "g1f3", "b8c6", "f1b5"])], mode)
    }

    #[test]
    fn test_strict_prefix_gives_next_move() {
        let mut book = ruy_lopez(BookMode::Immutable);
        let mut rng = StdRng::seed_from_u64(1);
        let played = moves(&["e2e4", "e7e5", "g1f3", "b8c6"]);
        assert_eq!(book.next_move(&played, &mut rng).as_deref(), Some("f1b5"));
    }

    #[test]
    fn test_full_line_gives_no_move() {
        //! Once the game has played the whole line there is nothing left to offer
        let mut book = ruy_lopez(BookMode::Pruning);
        let mut rng = StdRng::seed_from_u64(1);
        let played = moves(&["e2e4", "e7e5", "g1f3", "b8c6", "f1b5"]);
        assert_eq!(book.next_move(&played, &mut rng), None);
        // The exhausted line still matches, so it is kept
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn test_empty_history_offers_first_moves() {
        let mut book = OpeningBook::builtin(BookMode::Immutable);
        let mut first = book.candidates(&[]);
        first.sort();
        assert_eq!(first, moves(&["d2d4", "d2d4", "e2e4", "e2e4", "g1f3"]));
    }

    #[test]
    fn test_pruning_removes_diverged_lines() {
        let mut book = OpeningBook::builtin(BookMode::Pruning);
        let candidates = book.candidates(&moves(&["e2e4"]));
        let mut sorted = candidates.clone();
        sorted.sort();
        assert_eq!(sorted, moves(&["c7c5", "e7e5"]));
        assert_eq!(book.len(), 2, "only the two e4 lines survive");

        // The d4 lines are gone for good, even for a new game
        assert_eq!(book.candidates(&[]), moves(&["e2e4", "e2e4"]));
    }

    #[test]
    fn test_pruning_drops_lines_shorter_than_game() {
        let mut book = OpeningBook::new(
            vec![moves(&["e2e4"]), moves(&["e2e4", "e7e5", "g1f3"])],
            BookMode::Pruning,
        );
        assert_eq!(book.candidates(&moves(&["e2e4", "e7e5"])), moves(&["g1f3"]));
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn test_immutable_mode_keeps_every_line() {
        let mut book = OpeningBook::builtin(BookMode::Immutable);
        book.candidates(&moves(&["e2e4", "c7c5"]));
        book.candidates(&moves(&["h2h4"]));
        assert_eq!(book.len(), 5);
        assert_eq!(book.candidates(&[]).len(), 5);
    }

    #[test]
    fn test_off_book_returns_none() {
        let mut book = OpeningBook::builtin(BookMode::Pruning);
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(book.next_move(&moves(&["a2a3"]), &mut rng), None);
        assert!(book.is_empty());
    }

    #[test]
    fn test_parse_stops_at_blank_line_and_skips_bad_tokens() {
        let text = "# comment\ne2e4 e7e5\nd2d4 Nf6\n\ng1f3 g8f6\n";
        let book = OpeningBook::parse(text, BookMode::Pruning);
        assert_eq!(book.lines(), &[moves(&["e2e4", "e7e5"])]);
    }

    #[test]
    fn test_load_missing_path_falls_back_to_builtin() {
        let config = BookConfig {
            path: Some(PathBuf::from("/definitely/not/here/openings.txt")),
            ..BookConfig::default()
        };
        let book = OpeningBook::load(&config);
        assert_eq!(book.len(), 5);
    }

    #[test]
    fn test_disabled_book_is_empty() {
        let config = BookConfig {
            enabled: false,
            ..BookConfig::default()
        };
        assert!(OpeningBook::load(&config).is_empty());
    }

    #[test]
    fn test_seeded_choice_is_reproducible() {
        let played: Vec<String> = Vec::new();
        let pick = |seed| {
            let mut book = OpeningBook::builtin(BookMode::Immutable);
            book.next_move(&played, &mut StdRng::seed_from_u64(seed))
        };
        assert_eq!(pick(42), pick(42));
        assert!(pick(42).is_some());
    }
}

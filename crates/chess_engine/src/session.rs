//! Game session
//!
//! Tracks one game from its starting position: the positions reached,
//! the moves played, the repetition history and whether the game is
//! still following the opening book.

use shakmaty::{Chess, Color, Position};

use crate::error::{ChessEngineError, ChessEngineResult};
use crate::history::PositionHistory;
use crate::rules;
use crate::types::GameStatus;

#[derive(Debug, Clone)]
pub struct GameSession {
    current: Chess,
    previous: Vec<Chess>,
    moves: Vec<String>,
    history: PositionHistory,
    in_book: bool,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::from_position(Chess::default())
    }
}

impl GameSession {
    /// New game from the standard starting position
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_position(position: Chess) -> Self {
        let history = PositionHistory::starting_at(&position);
        Self {
            current: position,
            previous: Vec::new(),
            moves: Vec::new(),
            history,
            in_book: true,
        }
    }

    pub fn from_fen(fen: &str) -> ChessEngineResult<Self> {
        Ok(Self::from_position(rules::position_from_fen(fen)?))
    }

    pub fn position(&self) -> &Chess {
        &self.current
    }

    pub fn turn(&self) -> Color {
        self.current.turn()
    }

    /// Moves played so far, as UCI strings
    pub fn moves(&self) -> &[String] {
        &self.moves
    }

    pub fn history(&self) -> &PositionHistory {
        &self.history
    }

    pub fn fen(&self) -> String {
        rules::fen_of(&self.current)
    }

    /// Still eligible for book moves
    pub fn in_book(&self) -> bool {
        self.in_book
    }

    /// Stop consulting the book for the rest of this game
    pub fn leave_book(&mut self) {
        self.in_book = false;
    }

    /// Play a move given in UCI notation.
    ///
    /// # Errors
    ///
    /// [`ChessEngineError::IllegalMove`] if the string is malformed or the
    /// move is not legal here. The session is unchanged in that case.
    pub fn play(&mut self, uci: &str) -> ChessEngineResult<()> {
        let mv = rules::find_legal_move(&self.current, uci).ok_or_else(|| {
            ChessEngineError::IllegalMove {
                uci: uci.to_string(),
                fen: self.fen(),
            }
        })?;
        let next = rules::successor(&self.current, &mv);
        self.history.push_position(&next);
        self.previous.push(std::mem::replace(&mut self.current, next));
        self.moves.push(rules::uci_of(&mv));
        Ok(())
    }

    /// Take back the last move and return it.
    ///
    /// Callers holding a result cache must clear it afterwards.
    pub fn undo(&mut self) -> ChessEngineResult<String> {
        let previous = self.previous.pop().ok_or(ChessEngineError::NothingToUndo)?;
        self.current = previous;
        self.history.pop();
        self.moves.pop().ok_or(ChessEngineError::NothingToUndo)
    }

    /// Result of the game so far
    pub fn status(&self) -> GameStatus {
        let position = &self.current;
        let legal = position.legal_moves();
        if legal.is_empty() {
            return if position.is_check() {
                GameStatus::Checkmate {
                    winner: !position.turn(),
                }
            } else {
                GameStatus::Stalemate
            };
        }
        if position.is_insufficient_material() {
            return GameStatus::InsufficientMaterial;
        }
        if rules::is_seventy_five_moves(position) {
            return GameStatus::SeventyFiveMoves;
        }
        let seen = self.history.count(&rules::repetition_key(position));
        if seen >= 5 {
            GameStatus::FivefoldRepetition
        } else if seen >= 3 {
            GameStatus::ThreefoldRepetition
        } else {
            GameStatus::Ongoing
        }
    }
}

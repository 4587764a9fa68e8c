//! Engine constants
//!
//! Piece values, score sentinels and heuristic weights shared by the
//! evaluator and the search.

use shakmaty::Role;

/// Score of a position won by force. Sign gives the winner (White positive).
pub const MATE_SCORE: i32 = 99_999;

/// Largest distance bonus added to a mate score by the search
pub const MAX_MATE_DISTANCE: u32 = 1_000;

/// Alpha-beta bound. Exceeds any evaluation and is never stored as a result.
pub const INFINITY: i32 = 1_000_000;

/// Default number of entries kept by the position-result cache
pub const DEFAULT_CACHE_CAPACITY: usize = 100_000;

/// Positions with at most this many non-king pieces use endgame tables
pub const ENDGAME_PIECE_THRESHOLD: usize = 12;

/// Halfmove clock value at which the seventy-five-move rule applies
pub const SEVENTY_FIVE_MOVE_PLIES: u32 = 150;

/// Default search depth in plies
pub const DEFAULT_SEARCH_DEPTH: u32 = 3;

/// Book is only consulted while fewer than this many plies have been played
pub const DEFAULT_BOOK_MAX_PLIES: usize = 6;

// Piece values in centipawns
pub const PAWN_VALUE: i32 = 100;
pub const KNIGHT_VALUE: i32 = 320;
pub const BISHOP_VALUE: i32 = 330;
pub const ROOK_VALUE: i32 = 500;
pub const QUEEN_VALUE: i32 = 900;
pub const KING_VALUE: i32 = 20_000;

// Heuristic weights
pub const MOBILITY_WEIGHT: i32 = 2;
pub const CASTLING_RIGHTS_BONUS: i32 = 30;
pub const CENTRAL_KING_PENALTY: i32 = 20;
pub const DOUBLED_PAWN_PENALTY: i32 = 20;
pub const ISOLATED_PAWN_PENALTY: i32 = 15;
pub const TEMPO_BONUS: i32 = 10;
pub const CENTER_ATTACK_BONUS: i32 = 5;
pub const PINNED_PIECE_PENALTY: i32 = 30;
pub const CHECK_PENALTY: i32 = 50;
pub const PASSED_PAWN_BONUS: i32 = 20;

/// Material value of a role
#[inline]
pub fn piece_value(role: Role) -> i32 {
    match role {
        Role::Pawn => PAWN_VALUE,
        Role::Knight => KNIGHT_VALUE,
        Role::Bishop => BISHOP_VALUE,
        Role::Rook => ROOK_VALUE,
        Role::Queen => QUEEN_VALUE,
        Role::King => KING_VALUE,
    }
}

/// True if `value` encodes a forced mate for either side
#[inline]
pub fn is_mate_score(value: i32) -> bool {
    value.abs() >= MATE_SCORE
}

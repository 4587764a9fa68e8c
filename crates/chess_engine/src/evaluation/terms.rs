//! Heuristic evaluation terms
//!
//! Each term scores one positional feature, White positive. A term that
//! cannot be computed returns a [`TermError`]. The evaluator logs it and
//! carries on with the remaining terms.

use shakmaty::attacks;
use shakmaty::{Bitboard, Board, Chess, Color, Position, Role, Square};
use thiserror::Error;

use crate::constants::*;
use crate::types::GamePhase;

/// Why a term could not be scored
#[derive(Error, Debug)]
pub enum TermError {
    #[error("no {color:?} king on the board")]
    MissingKing { color: Color },
}

/// Inputs shared by every term
pub struct TermContext<'a> {
    pub position: &'a Chess,
    pub phase: GamePhase,
    /// Legal moves for the side to move, already generated by the evaluator
    pub legal_moves: usize,
}

impl TermContext<'_> {
    fn board(&self) -> &Board {
        self.position.board()
    }
}

pub type Term = fn(&TermContext<'_>) -> Result<i32, TermError>;

/// All heuristic terms, in the order they are summed
pub const TERMS: [(&str, Term); 8] = [
    ("mobility", mobility),
    ("king_safety", king_safety),
    ("pawn_structure", pawn_structure),
    ("tempo", tempo),
    ("centre_control", centre_control),
    ("pins", pins),
    ("check", check),
    ("passed_pawns", passed_pawns),
];

#[inline]
fn sign(color: Color) -> i32 {
    match color {
        Color::White => 1,
        Color::Black => -1,
    }
}

fn pawns_of(board: &Board, color: Color) -> Bitboard {
    board.pawns() & board.by_color(color)
}

/// Legal-move differential between the side to move and its opponent.
///
/// While in check the opponent cannot be handed the move, so its count
/// falls back to [`pseudo_mobility`].
pub fn mobility(ctx: &TermContext<'_>) -> Result<i32, TermError> {
    let turn = ctx.position.turn();
    let ours = ctx.legal_moves as i32;
    let theirs = match ctx.position.clone().swap_turn() {
        Ok(swapped) => swapped.legal_moves().len() as i32,
        Err(_) => pseudo_mobility(ctx.board(), !turn),
    };
    Ok(sign(turn) * (ours - theirs) * MOBILITY_WEIGHT)
}

/// Moves available to `color` ignoring checks: piece attacks onto squares
/// not held by its own pieces, pawn captures and single pawn pushes
pub fn pseudo_mobility(board: &Board, color: Color) -> i32 {
    let own = board.by_color(color);
    let enemy = board.by_color(!color);
    let occupied = board.occupied();
    let push = if color.is_white() { 8 } else { -8 };

    let mut count = 0;
    for square in own {
        let Some(piece) = board.piece_at(square) else {
            continue;
        };
        if piece.role == Role::Pawn {
            count += (attacks::pawn_attacks(color, square) & enemy).count() as i32;
            if square.offset(push).is_some_and(|to| !occupied.contains(to)) {
                count += 1;
            }
        } else {
            count += (attacks::attacks(square, piece, occupied) & !own).count() as i32;
        }
    }
    count
}

/// Castling rights kept, and kings left on c-f files before the endgame
pub fn king_safety(ctx: &TermContext<'_>) -> Result<i32, TermError> {
    let board = ctx.board();
    let mut score = 0;
    for color in [Color::White, Color::Black] {
        let Some(king) = board.king_of(color) else {
            continue;
        };
        if ctx.position.castles().has_color(color) {
            score += sign(color) * CASTLING_RIGHTS_BONUS;
        }
        let file = king.file() as i32;
        if ctx.phase == GamePhase::Opening && (2..=5).contains(&file) {
            score -= sign(color) * CENTRAL_KING_PENALTY;
        }
    }
    Ok(score)
}

/// Doubled and isolated pawns
pub fn pawn_structure(ctx: &TermContext<'_>) -> Result<i32, TermError> {
    let board = ctx.board();
    let mut score = 0;
    for color in [Color::White, Color::Black] {
        let pawns = pawns_of(board, color);
        let mut per_file = [0i32; 8];
        for square in pawns {
            per_file[square.file() as usize] += 1;
        }

        let mut penalty = 0;
        for count in per_file {
            if count > 1 {
                penalty += DOUBLED_PAWN_PENALTY * (count - 1);
            }
        }
        for square in pawns {
            let file = square.file() as usize;
            let left = file.checked_sub(1).map_or(0, |f| per_file[f]);
            let right = per_file.get(file + 1).copied().unwrap_or(0);
            if left + right == 0 {
                penalty += ISOLATED_PAWN_PENALTY;
            }
        }
        score -= sign(color) * penalty;
    }
    Ok(score)
}

/// Small bonus for having the move
pub fn tempo(ctx: &TermContext<'_>) -> Result<i32, TermError> {
    Ok(sign(ctx.position.turn()) * TEMPO_BONUS)
}

const CENTRE: [Square; 4] = [Square::D4, Square::D5, Square::E4, Square::E5];

/// Attackers of d4, d5, e4 and e5 by each side
pub fn centre_control(ctx: &TermContext<'_>) -> Result<i32, TermError> {
    let board = ctx.board();
    let occupied = board.occupied();
    let mut score = 0;
    for square in CENTRE {
        let white = board.attacks_to(square, Color::White, occupied).count() as i32;
        let black = board.attacks_to(square, Color::Black, occupied).count() as i32;
        score += (white - black) * CENTER_ATTACK_BONUS;
    }
    Ok(score)
}

/// Pieces of `color` absolutely pinned against their own king
pub fn pinned_pieces(board: &Board, color: Color) -> Result<Bitboard, TermError> {
    let king = board.king_of(color).ok_or(TermError::MissingKing { color })?;
    let enemy = board.by_color(!color);
    let snipers = ((attacks::rook_attacks(king, Bitboard(0)) & board.rooks_and_queens())
        | (attacks::bishop_attacks(king, Bitboard(0)) & board.bishops_and_queens()))
        & enemy;

    let mut pinned = Bitboard(0);
    for sniper in snipers {
        let blockers = attacks::between(king, sniper) & board.occupied();
        if blockers.count() == 1 && !(blockers & board.by_color(color)).is_empty() {
            pinned |= blockers;
        }
    }
    Ok(pinned)
}

/// Penalty per pinned piece
pub fn pins(ctx: &TermContext<'_>) -> Result<i32, TermError> {
    let board = ctx.board();
    let mut score = 0;
    for color in [Color::White, Color::Black] {
        let count = pinned_pieces(board, color)?.count() as i32;
        score -= sign(color) * count * PINNED_PIECE_PENALTY;
    }
    Ok(score)
}

/// Penalty for the side to move being in check
pub fn check(ctx: &TermContext<'_>) -> Result<i32, TermError> {
    if ctx.position.is_check() {
        Ok(-sign(ctx.position.turn()) * CHECK_PENALTY)
    } else {
        Ok(0)
    }
}

/// Pawns with no enemy pawn ahead on their own or an adjacent file
pub fn passed_pawns(ctx: &TermContext<'_>) -> Result<i32, TermError> {
    let board = ctx.board();
    let mut score = 0;
    for color in [Color::White, Color::Black] {
        let enemy = pawns_of(board, !color);
        for pawn in pawns_of(board, color) {
            let file = pawn.file() as i32;
            let rank = pawn.rank() as i32;
            let blocked = enemy.into_iter().any(|other| {
                let ahead = match color {
                    Color::White => other.rank() as i32 > rank,
                    Color::Black => (other.rank() as i32) < rank,
                };
                ahead && (other.file() as i32 - file).abs() <= 1
            });
            if !blocked {
                score += sign(color) * PASSED_PAWN_BONUS;
            }
        }
    }
    Ok(score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::game_phase;
    use crate::rules::position_from_fen;

    fn score(term: Term, fen: &str) -> Result<i32, TermError> {
        let position = position_from_fen(fen).unwrap();
        let ctx = TermContext {
            position: &position,
            phase: game_phase(&position),
            legal_moves: position.legal_moves().len(),
        };
        term(&ctx)
    }

    #[test]
    fn test_start_position_terms_cancel_except_tempo() {
        let start = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
        for (name, term) in TERMS {
            let expected = if name == "tempo" { TEMPO_BONUS } else { 0 };
            assert_eq!(score(term, start).unwrap(), expected, "term {name}");
        }
    }

    #[test]
    fn test_mobility_counts_attacks_while_in_check() {
        //! White, in check, has three king moves. Black's rook reaches 13
        //! squares and its king 5.
        let in_check = "4k3/8/8/8/8/8/4r3/4K3 w - - 0 1";
        assert_eq!(score(mobility, in_check).unwrap(), (3 - 18) * MOBILITY_WEIGHT);
    }

    #[test]
    fn test_pseudo_mobility_of_start_position() {
        //! Eight single pawn pushes plus four knight hops for either side
        let position = position_from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap();
        assert_eq!(pseudo_mobility(position.board(), Color::White), 12);
        assert_eq!(pseudo_mobility(position.board(), Color::Black), 12);
    }

    #[test]
    fn test_mobility_sign_follows_white() {
        // White queen has far more moves than the bare black king
        let white_to_move = "4k3/8/8/8/8/8/8/3QK3 w - - 0 1";
        let black_to_move = "4k3/8/8/8/8/8/8/3QK3 b - - 0 1";
        assert!(score(mobility, white_to_move).unwrap() > 0);
        assert!(score(mobility, black_to_move).unwrap() > 0);
    }

    #[test]
    fn test_doubled_and_isolated_pawns() {
        // White: doubled isolated pawns on the e-file. Black: pawn on a7 only.
        let fen = "4k3/p7/8/8/4P3/4P3/8/4K3 w - - 0 1";
        let expected = -(DOUBLED_PAWN_PENALTY + 2 * ISOLATED_PAWN_PENALTY) + ISOLATED_PAWN_PENALTY;
        assert_eq!(score(pawn_structure, fen).unwrap(), expected);
    }

    #[test]
    fn test_passed_pawns() {
        // e5 is passed; the black a7 pawn is passed too
        let fen = "4k3/p7/8/4P3/8/8/8/4K3 w - - 0 1";
        assert_eq!(score(passed_pawns, fen).unwrap(), 0);

        let fen = "4k3/8/8/4P3/8/8/8/4K3 w - - 0 1";
        assert_eq!(score(passed_pawns, fen).unwrap(), PASSED_PAWN_BONUS);

        // d6 and e5 each stand ahead of the other on an adjacent file
        let fen = "4k3/8/3p4/4P3/8/8/8/4K3 w - - 0 1";
        assert_eq!(score(passed_pawns, fen).unwrap(), 0);
    }

    #[test]
    fn test_pinned_knight_is_penalised() {
        // White knight on e2 pinned by the rook on e8
        let fen = "4r1k1/8/8/8/8/8/4N3/4K3 w - - 0 1";
        let position = position_from_fen(fen).unwrap();
        let pinned = pinned_pieces(position.board(), Color::White).unwrap();
        assert!(pinned.contains(Square::E2));
        assert_eq!(score(pins, fen).unwrap(), -PINNED_PIECE_PENALTY);
    }

    #[test]
    fn test_check_penalises_side_to_move() {
        assert_eq!(
            score(check, "4k3/8/8/8/8/8/4r3/4K3 w - - 0 1").unwrap(),
            -CHECK_PENALTY
        );
        assert_eq!(
            score(check, "4k3/4R3/8/8/8/8/8/4K3 b - - 0 1").unwrap(),
            CHECK_PENALTY
        );
    }

    #[test]
    fn test_castling_rights_bonus() {
        // Only White keeps its rights
        let fen = "r3k2r/8/8/8/8/8/8/R3K2R w KQ - 0 1";
        let position = position_from_fen(fen).unwrap();
        assert_eq!(game_phase(&position), GamePhase::Endgame);
        assert_eq!(score(king_safety, fen).unwrap(), CASTLING_RIGHTS_BONUS);
    }

    #[test]
    fn test_centre_control_counts_attackers() {
        // White knight on f3 hits d4 and e5
        let fen = "4k3/8/8/8/8/5N2/8/4K3 w - - 0 1";
        assert_eq!(score(centre_control, fen).unwrap(), 2 * CENTER_ATTACK_BONUS);
    }
}

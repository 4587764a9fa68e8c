//! Move ordering for alpha-beta pruning
//!
//! Orders children so the likely best replies are searched first, which
//! tightens the window early and maximizes cut-offs. Two strategies:
//!
//! - [`OrderingStrategy::StaticEval`] statically evaluates every child and
//!   sorts best-first for the side to move. Costs one evaluator call per
//!   legal move at each interior node.
//! - [`OrderingStrategy::MvvLva`] scores moves without playing them:
//!   captures by most valuable victim / least valuable attacker, then
//!   promotions, then how central the destination is.
//!
//! Both use a stable sort, so equal scores keep generation order.

use shakmaty::{Chess, Move, MoveList};

use crate::constants::piece_value;
use crate::evaluation::Evaluator;
use crate::rules;
use crate::types::OrderingStrategy;

/// A legal move together with the position it leads to
pub struct Child {
    pub mv: Move,
    pub position: Chess,
}

/// Children of a node, ordered only when at least two plies remain
pub fn ordered_children(
    moves: MoveList,
    position: &Chess,
    depth: u32,
    maximizing: bool,
    strategy: OrderingStrategy,
    evaluator: &Evaluator,
) -> Vec<Child> {
    let mut children: Vec<Child> = moves
        .into_iter()
        .map(|mv| {
            let next = rules::successor(position, &mv);
            Child { mv, position: next }
        })
        .collect();

    if depth < 2 {
        return children;
    }

    match strategy {
        OrderingStrategy::StaticEval => {
            let mut scored: Vec<(i32, Child)> = children
                .into_iter()
                .map(|child| (evaluator.evaluate(&child.position), child))
                .collect();
            if maximizing {
                scored.sort_by(|a, b| b.0.cmp(&a.0));
            } else {
                scored.sort_by(|a, b| a.0.cmp(&b.0));
            }
            scored.into_iter().map(|(_, child)| child).collect()
        }
        OrderingStrategy::MvvLva => {
            children.sort_by_cached_key(|child| std::cmp::Reverse(mvv_lva_score(&child.mv)));
            children
        }
    }
}

/// Cheap ordering score of a move; higher is searched first
pub fn mvv_lva_score(mv: &Move) -> i32 {
    let mut score = 0i32;

    // MVV-LVA: Most Valuable Victim - Least Valuable Attacker
    if let Some(victim) = mv.capture() {
        score += piece_value(victim) * 10 - piece_value(mv.role());
    }

    if let Some(promotion) = mv.promotion() {
        score += piece_value(promotion);
    }

    // Center control bonus
    let to = mv.to();
    let center_dist = (to.file() as i32 - 3).abs() + (to.rank() as i32 - 3).abs();
    score += (8 - center_dist) * 5;

    score
}

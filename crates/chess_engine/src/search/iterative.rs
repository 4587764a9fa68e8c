//! Iterative deepening search
//!
//! Runs complete searches at increasing depth until a wall-clock budget
//! is used up. The budget is only checked between depths. A search that
//! has started always runs to completion.

use std::time::{Duration, Instant};

use shakmaty::{Chess, Position};
use tracing::debug;

use crate::constants::is_mate_score;
use crate::types::SearchResult;

/// Run `search_at(1)`, `search_at(2)`, ... up to `max_depth`.
///
/// Stops issuing deeper searches once `budget` has elapsed, when a mate
/// score is found, or when the root has no legal moves. Depth 1 always
/// runs, so a result is always returned.
///
/// # Arguments
///
/// * `max_depth` - Deepest search to attempt
/// * `budget` - Time after which no further depth is started
/// * `search_at` - Runs one complete search at the given depth
///
/// # Examples
///
/// ```rust,ignore
/// let result = iterative_deepening(6, Duration::from_secs(2), |depth| {
///     agent.search(&position, depth, true)
/// });
/// ```
pub fn iterative_deepening<F>(max_depth: u32, budget: Duration, mut search_at: F) -> SearchResult
where
    F: FnMut(u32) -> SearchResult,
{
    let start = Instant::now();
    let mut best = search_at(1);

    for depth in 2..=max_depth {
        if is_mate_score(best.best_evaluation) || best.root_moves.is_empty() {
            break;
        }
        if start.elapsed() >= budget {
            debug!(
                "[SEARCH] Budget of {:?} used after depth {}",
                budget, best.depth
            );
            break;
        }
        best = search_at(depth);
    }

    best
}

/// Adjust a base depth to how busy the position is.
///
/// Fewer than 10 legal moves searches one ply deeper. More than 30
/// searches one ply shallower, but never below 2.
pub fn adaptive_depth(position: &Chess, base: u32) -> u32 {
    let legal = position.legal_moves().len();
    if legal < 10 {
        base + 1
    } else if legal > 30 {
        base.saturating_sub(1).max(2)
    } else {
        base
    }
}

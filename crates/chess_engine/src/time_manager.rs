//! Chess clock and thinking-time allocation
//!
//! A deliberately simple allocator for callers that play on a clock. It
//! hands out a slice of the remaining time by game stage and keeps both
//! clocks up to date, including the per-move increment.

use std::time::Duration;

use shakmaty::Color;

/// Remaining time of both players and the per-move increment
#[derive(Debug, Clone)]
pub struct TimeManager {
    white: Duration,
    black: Duration,
    increment: Duration,
    move_times: Vec<(Color, Duration)>,
}

impl Default for TimeManager {
    /// Five minutes each with a three second increment
    fn default() -> Self {
        Self::new(Duration::from_secs(300), Duration::from_secs(3))
    }
}

impl TimeManager {
    pub fn new(initial: Duration, increment: Duration) -> Self {
        Self {
            white: initial,
            black: initial,
            increment,
            move_times: Vec::new(),
        }
    }

    pub fn remaining(&self, color: Color) -> Duration {
        match color {
            Color::White => self.white,
            Color::Black => self.black,
        }
    }

    pub fn increment(&self) -> Duration {
        self.increment
    }

    pub fn move_times(&self) -> &[(Color, Duration)] {
        &self.move_times
    }

    /// Thinking time for `color`'s next move.
    ///
    /// Opening (fewer than 10 moves made): 5% of the clock, at most 10 s.
    /// Middlegame (fewer than 30): 8% scaled by `complexity`, at most 30 s.
    /// Endgame: 15%, at most 60 s. Never less than one second.
    pub fn allocate(&self, color: Color, moves_made: usize, complexity: f64) -> Duration {
        let remaining = self.remaining(color).as_secs_f64();
        let seconds = if moves_made < 10 {
            (remaining * 0.05).min(10.0)
        } else if moves_made < 30 {
            (remaining * 0.08 * complexity.max(0.0)).min(30.0)
        } else {
            (remaining * 0.15).min(60.0)
        };
        Duration::from_secs_f64(seconds.max(1.0))
    }

    /// Charge `used` to `color`'s clock and add the increment
    pub fn update(&mut self, color: Color, used: Duration) {
        let clock = match color {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        };
        *clock = clock.saturating_sub(used) + self.increment;
        self.move_times.push((color, used));
    }

    /// True once `color` has no time left
    pub fn is_flagged(&self, color: Color) -> bool {
        self.remaining(color).is_zero()
    }
}

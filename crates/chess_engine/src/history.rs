//! Repetition history
//!
//! Tracks how often each position (by [`rules::repetition_key`]) has
//! occurred along the current line of play. The game session owns one
//! for the moves actually played. Each search copies it and extends it
//! along the path being explored.

use std::collections::HashMap;

use shakmaty::Chess;

use crate::rules;

/// Multiset of repetition keys plus the order they were pushed in
#[derive(Debug, Clone, Default)]
pub struct PositionHistory {
    counts: HashMap<String, u32>,
    stack: Vec<String>,
}

impl PositionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// History containing only `position`
    pub fn starting_at(position: &Chess) -> Self {
        let mut history = Self::new();
        history.push_position(position);
        history
    }

    pub fn push(&mut self, key: String) {
        *self.counts.entry(key.clone()).or_insert(0) += 1;
        self.stack.push(key);
    }

    pub fn push_position(&mut self, position: &Chess) {
        self.push(rules::repetition_key(position));
    }

    /// Remove the most recent occurrence
    pub fn pop(&mut self) -> Option<String> {
        let key = self.stack.pop()?;
        if let Some(count) = self.counts.get_mut(&key) {
            *count -= 1;
            if *count == 0 {
                self.counts.remove(&key);
            }
        }
        Some(key)
    }

    /// Number of times `key` occurs in the history
    pub fn count(&self, key: &str) -> u32 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}

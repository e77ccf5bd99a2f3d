//! Pending direction queue fed by player input

use std::collections::VecDeque;

use super::direction::Direction;

/// FIFO of accepted direction changes, drained one per tick
#[derive(Debug, Clone, Default)]
pub struct InputBuffer {
    pending: VecDeque<Direction>,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a direction unless it reverses the effective direction.
    ///
    /// The effective direction is the last queued entry, or `committed`
    /// when the queue is empty. Returns whether the intent was accepted.
    pub fn enqueue(&mut self, direction: Direction, committed: Direction) -> bool {
        let effective = self.pending.back().copied().unwrap_or(committed);
        if effective.is_opposite(&direction) {
            return false;
        }
        self.pending.push_back(direction);
        true
    }

    /// Take the next direction to commit, if any
    pub fn pop(&mut self) -> Option<Direction> {
        self.pending.pop_front()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

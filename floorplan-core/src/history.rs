//! Bounded undo/redo history over plan snapshots.
//!
//! History is linear: two stacks of whole-collection snapshots. Recording a
//! new state clears the redo stack, so there is no redo branching. Whole
//! snapshots trade memory for correctness; plans hold tens to low hundreds
//! of elements.

use std::collections::VecDeque;

use crate::element::Element;

/// Maximum number of past states retained (oldest dropped when exceeded).
pub const HISTORY_LIMIT: usize = 50;

/// Linear undo/redo history of ordered element snapshots.
#[derive(Debug, Clone)]
pub struct History {
    /// Past states, oldest first.
    past: VecDeque<Vec<Element>>,
    /// Undone states, most recently undone last.
    future: Vec<Vec<Element>>,
    /// Maximum number of past states retained.
    limit: usize,
}

impl History {
    /// Create an empty history with the default limit.
    #[must_use]
    pub fn new() -> Self {
        Self::with_limit(HISTORY_LIMIT)
    }

    /// Create an empty history with a custom limit.
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self {
            past: VecDeque::new(),
            future: Vec::new(),
            limit,
        }
    }

    /// Record the state that existed before a mutation. Clears the redo
    /// stack.
    pub fn record(&mut self, snapshot: Vec<Element>) {
        self.push_past(snapshot);
        self.future.clear();
    }

    /// Step back: returns the snapshot to restore, storing `current` for
    /// redo. Returns `None` when there is nothing to undo.
    pub fn undo(&mut self, current: Vec<Element>) -> Option<Vec<Element>> {
        let snapshot = self.past.pop_back()?;
        self.future.push(current);
        Some(snapshot)
    }

    /// Step forward: returns the snapshot to restore, storing `current` for
    /// undo. Returns `None` when there is nothing to redo.
    pub fn redo(&mut self, current: Vec<Element>) -> Option<Vec<Element>> {
        let snapshot = self.future.pop()?;
        self.push_past(current);
        Some(snapshot)
    }

    /// Drop all recorded states.
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }

    /// Whether an undo step is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    /// Whether a redo step is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Number of retained past states.
    #[must_use]
    pub fn past_len(&self) -> usize {
        self.past.len()
    }

    /// Number of retained future states.
    #[must_use]
    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    fn push_past(&mut self, snapshot: Vec<Element>) {
        // Drop oldest if at capacity
        if self.past.len() >= self.limit {
            self.past.pop_front();
        }
        self.past.push_back(snapshot);
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

//! Undo history - bounded ring of board snapshots
//!
//! Snapshots are full `Board` values taken before each selection. Once the ring
//! is full the oldest snapshot is discarded.

use std::collections::VecDeque;

use crate::board::Board;
use crate::types::UNDO_HISTORY_CAPACITY;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoHistory {
    snapshots: VecDeque<Board>,
    capacity: usize,
}

impl UndoHistory {
    pub fn new() -> Self {
        Self::with_capacity(UNDO_HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            snapshots: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, board: Board) {
        if self.capacity == 0 {
            return;
        }
        if self.snapshots.len() == self.capacity {
            self.snapshots.pop_front();
        }
        self.snapshots.push_back(board);
    }

    /// Most recent snapshot
    pub fn pop(&mut self) -> Option<Board> {
        self.snapshots.pop_back()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self::new()
    }
}

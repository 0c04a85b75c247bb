//! Linear undo/redo log of full scene snapshots.
//!
//! Entries after the cursor are the redo branch; pushing from anywhere but
//! the end discards that branch. The log is bounded and evicts its oldest
//! entries first. This module only manages the sequence and cursor; the
//! editor decides when to commit and restores scenes from the returned
//! entries.
use std::collections::VecDeque;

use log::debug;

mod action;
mod entry;

pub use action::ActionKind;
pub use entry::HistoryEntry;

pub const DEFAULT_HISTORY_LIMIT: usize = 50;

#[derive(Debug, Clone)]
pub struct HistoryLog {
    entries: VecDeque<HistoryEntry>,
    current: usize,
    limit: usize,
    evicted: usize,
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl HistoryLog {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            current: 0,
            limit: limit.max(1),
            evicted: 0,
        }
    }

    /// Drop everything and start over from `entry` at step 0.
    pub fn reset(&mut self, entry: HistoryEntry) {
        self.entries.clear();
        self.entries.push_back(entry);
        self.current = 0;
        self.evicted = 0;
    }

    /// Append `entry` after the cursor, truncating any redo branch and
    /// evicting the oldest entries past the limit. Returns the new step.
    pub fn push(&mut self, entry: HistoryEntry) -> usize {
        if !self.entries.is_empty() && self.current + 1 < self.entries.len() {
            let dropped = self.entries.len() - self.current - 1;
            self.entries.truncate(self.current + 1);
            debug!("History: discarded {} redo entries", dropped);
        }

        self.entries.push_back(entry);
        while self.entries.len() > self.limit {
            self.entries.pop_front();
            self.evicted += 1;
        }
        self.current = self.entries.len() - 1;
        self.current
    }

    /// Move the cursor one step back. `None` at the start.
    pub fn step_back(&mut self) -> Option<&HistoryEntry> {
        if !self.can_undo() {
            return None;
        }
        self.current -= 1;
        self.entries.get(self.current)
    }

    /// Move the cursor one step forward. `None` at the end.
    pub fn step_forward(&mut self) -> Option<&HistoryEntry> {
        if !self.can_redo() {
            return None;
        }
        self.current += 1;
        self.entries.get(self.current)
    }

    /// Put the cursor on `index`. `None` when out of bounds.
    pub fn jump_to(&mut self, index: usize) -> Option<&HistoryEntry> {
        if index >= self.entries.len() {
            return None;
        }
        self.current = index;
        self.entries.get(index)
    }

    pub fn can_undo(&self) -> bool {
        self.current > 0
    }

    pub fn can_redo(&self) -> bool {
        self.current + 1 < self.entries.len()
    }

    pub fn current_step(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> Option<&HistoryEntry> {
        self.entries.get(self.current)
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> impl ExactSizeIterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Entries dropped off the front since the last reset. Lets
    /// callers holding an index notice it shifted.
    pub fn evicted(&self) -> usize {
        self.evicted
    }

    /// Whether the entry about to be pushed should carry a thumbnail:
    /// always for image/clear/background, otherwise when the entry's
    /// ordinal since the last reset is a multiple of `interval`.
    pub fn wants_thumbnail(&self, kind: ActionKind, interval: usize) -> bool {
        if kind.always_thumbnailed() {
            return true;
        }
        // Evicted entries still count
        let ordinal = self.evicted + self.current + 2;
        interval > 0 && ordinal % interval == 0
    }
}

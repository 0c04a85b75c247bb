use std::collections::HashMap;
use std::hash::Hash;

/// Single-shot deferred tasks keyed by concern.
///
/// Each key has at most one pending deadline. Scheduling a key that is already
/// pending replaces its deadline, so a burst of events collapses into one
/// firing `delay` after the last of them.
#[derive(Debug, Clone)]
pub struct Scheduler<K> {
    pending: HashMap<K, u64>,
}

impl<K: Copy + Eq + Hash> Default for Scheduler<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Eq + Hash> Scheduler<K> {
    pub fn new() -> Self {
        Self {
            pending: HashMap::new(),
        }
    }

    /// Cancel any pending run of `key` and schedule it `delay_ms` after `now`.
    pub fn schedule(&mut self, key: K, now: u64, delay_ms: u64) {
        self.pending.insert(key, now.saturating_add(delay_ms));
    }

    /// Returns true if a pending run was cancelled.
    pub fn cancel(&mut self, key: K) -> bool {
        self.pending.remove(&key).is_some()
    }

    pub fn is_pending(&self, key: K) -> bool {
        self.pending.contains_key(&key)
    }

    pub fn deadline(&self, key: K) -> Option<u64> {
        self.pending.get(&key).copied()
    }

    /// Remove and return every task whose deadline is at or before `now`,
    /// earliest first.
    pub fn take_due(&mut self, now: u64) -> Vec<K> {
        let mut due: Vec<(u64, K)> = self
            .pending
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(key, deadline)| (*deadline, *key))
            .collect();
        due.sort_by_key(|(deadline, _)| *deadline);
        for (_, key) in &due {
            self.pending.remove(key);
        }
        due.into_iter().map(|(_, key)| key).collect()
    }

    /// Earliest pending deadline, useful for hosts that arm a real timer.
    pub fn next_deadline(&self) -> Option<u64> {
        self.pending.values().copied().min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Key {
        A,
        B,
    }

    #[test]
    fn rescheduling_replaces_the_deadline() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(Key::A, 0, 300);
        scheduler.schedule(Key::A, 200, 300);

        assert!(scheduler.take_due(300).is_empty());
        assert_eq!(scheduler.take_due(500), vec![Key::A]);
        assert!(!scheduler.is_pending(Key::A));
    }

    #[test]
    fn due_tasks_fire_in_deadline_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(Key::A, 0, 2000);
        scheduler.schedule(Key::B, 0, 300);

        assert_eq!(scheduler.next_deadline(), Some(300));
        assert_eq!(scheduler.take_due(5000), vec![Key::B, Key::A]);
    }

    #[test]
    fn cancelled_tasks_never_fire() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(Key::B, 0, 10);
        assert!(scheduler.cancel(Key::B));
        assert!(!scheduler.cancel(Key::B));
        assert!(scheduler.take_due(100).is_empty());
    }
}

//! `TimerQueue` — virtual-time ordered timer store.
//!
//! Timers due at the same instant fire in the order they were pushed, which
//! gives every simultaneous event a stable global order.
//!
//! `BTreeMap` gives O(log W) insert and pop where W is the number of distinct
//! pending instants.  A passenger has at most two live timers at a time, so W
//! stays small even for large descriptor files.

use std::collections::{BTreeMap, VecDeque};

use lift_core::SimTime;

pub struct TimerQueue<T> {
    inner: BTreeMap<SimTime, VecDeque<T>>,
    /// Cached total entry count for O(1) `len()`.
    total: usize,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self { inner: BTreeMap::new(), total: 0 }
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `item` to fire at `at`, after anything already due then.
    pub fn push(&mut self, at: SimTime, item: T) {
        self.inner.entry(at).or_default().push_back(item);
        self.total += 1;
    }

    /// Remove and return the earliest entry if it is due at or before
    /// `until`.
    pub fn pop_due(&mut self, until: SimTime) -> Option<(SimTime, T)> {
        let mut first = self.inner.first_entry()?;
        let at = *first.key();
        if at > until {
            return None;
        }
        let item = first.get_mut().pop_front()?;
        if first.get().is_empty() {
            first.remove();
        }
        self.total -= 1;
        Some((at, item))
    }

    /// The earliest instant with at least one pending entry.
    pub fn next_time(&self) -> Option<SimTime> {
        self.inner.keys().next().copied()
    }

    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn clear(&mut self) {
        self.inner.clear();
        self.total = 0;
    }
}

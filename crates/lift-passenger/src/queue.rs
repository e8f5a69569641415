//! Ordered passenger membership list for one hall landing or the car.

use std::collections::VecDeque;

use lift_core::PassengerId;

/// Tooltip text for an empty queue.
pub const EMPTY_TOOLTIP: &str = "<empty>";

/// FIFO of passenger ids.  Holds ids only; passengers live in the handler's
/// arena.
#[derive(Clone, Debug, Default)]
pub struct PassengerQueue {
    members: VecDeque<PassengerId>,
}

impl PassengerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_back(&mut self, p: PassengerId) {
        self.members.push_back(p);
    }

    pub fn push_front(&mut self, p: PassengerId) {
        self.members.push_front(p);
    }

    pub fn pop_front(&mut self) -> Option<PassengerId> {
        self.members.pop_front()
    }

    pub fn pop_back(&mut self) -> Option<PassengerId> {
        self.members.pop_back()
    }

    pub fn front(&self) -> Option<PassengerId> {
        self.members.front().copied()
    }

    pub fn back(&self) -> Option<PassengerId> {
        self.members.back().copied()
    }

    /// Remove `p`; returns whether it was present.
    pub fn remove(&mut self, p: PassengerId) -> bool {
        match self.index_of(p) {
            Some(i) => {
                self.members.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn index_of(&self, p: PassengerId) -> Option<usize> {
        self.members.iter().position(|&q| q == p)
    }

    pub fn contains(&self, p: PassengerId) -> bool {
        self.members.contains(&p)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = PassengerId> + '_ {
        self.members.iter().copied()
    }

    /// Copy of the current membership, in order.  Broadcasts iterate this so
    /// a member's reaction cannot disturb delivery to the rest.
    pub fn snapshot(&self) -> Vec<PassengerId> {
        self.members.iter().copied().collect()
    }

    /// First member, in order, matching `pred`.
    pub fn first_where(&self, mut pred: impl FnMut(PassengerId) -> bool) -> Option<PassengerId> {
        self.members.iter().copied().find(|&p| pred(p))
    }

    /// One `line(p)` per member, or [`EMPTY_TOOLTIP`].
    pub fn tooltip(&self, line: impl Fn(PassengerId) -> String) -> String {
        if self.members.is_empty() {
            return EMPTY_TOOLTIP.to_string();
        }
        self.members.iter().map(|&p| line(p)).collect::<Vec<_>>().join("\n")
    }
}

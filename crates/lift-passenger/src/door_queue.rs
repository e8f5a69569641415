//! Per-doorway arbitration: exiting passengers go before entering ones.

use std::fmt;

use lift_core::{Hallway, PassengerId};

use crate::{PassengerError, PassengerResult};

/// Which side of a door queue to join.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DoorRequest {
    Enter,
    Exit,
}

/// Two ordered sub-queues for one door.  A passenger appears at most once
/// across both.
#[derive(Clone, Debug)]
pub struct DoorQueue {
    hallway: Hallway,
    enter:   Vec<PassengerId>,
    exit:    Vec<PassengerId>,
}

impl DoorQueue {
    pub fn new(hallway: Hallway) -> Self {
        Self { hallway, enter: Vec::new(), exit: Vec::new() }
    }

    #[inline]
    pub fn hallway(&self) -> Hallway {
        self.hallway
    }

    pub fn request_enter(&mut self, p: PassengerId) -> PassengerResult<()> {
        self.ensure_absent(p)?;
        self.enter.push(p);
        Ok(())
    }

    pub fn request_exit(&mut self, p: PassengerId) -> PassengerResult<()> {
        self.ensure_absent(p)?;
        self.exit.push(p);
        Ok(())
    }

    fn ensure_absent(&self, p: PassengerId) -> PassengerResult<()> {
        if self.contains(p) {
            return Err(PassengerError::DoubleQueued { passenger: p, hallway: self.hallway });
        }
        Ok(())
    }

    /// Remove `p` from whichever sub-queue holds it.  No-op if absent.
    pub fn remove(&mut self, p: PassengerId) {
        self.enter.retain(|&q| q != p);
        self.exit.retain(|&q| q != p);
    }

    /// Empty both sub-queues.
    pub fn clear(&mut self) {
        self.enter.clear();
        self.exit.clear();
    }

    pub fn contains(&self, p: PassengerId) -> bool {
        self.enter.contains(&p) || self.exit.contains(&p)
    }

    /// `true` iff `p` heads the exit list, or heads the enter list while
    /// nobody is waiting to exit.
    pub fn is_next(&self, p: PassengerId) -> bool {
        match self.exit.first() {
            Some(&head) => head == p,
            None => self.enter.first() == Some(&p),
        }
    }

    pub fn entering(&self) -> &[PassengerId] {
        &self.enter
    }

    pub fn exiting(&self) -> &[PassengerId] {
        &self.exit
    }

    pub fn is_empty(&self) -> bool {
        self.enter.is_empty() && self.exit.is_empty()
    }
}

impl fmt::Display for DoorQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let list = |ids: &[PassengerId]| -> String {
            if ids.is_empty() {
                "<empty>".to_string()
            } else {
                ids.iter().map(|p| p.0.to_string()).collect::<Vec<_>>().join(",")
            }
        };
        write!(f, "door queue {}: exit [{}] enter [{}]", self.hallway, list(&self.exit), list(&self.enter))
    }
}

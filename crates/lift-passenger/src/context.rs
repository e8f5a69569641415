//! Mutable world view handed to a passenger for one reaction.

use lift_core::{PassengerId, PassengerTiming, SimTime};

use crate::{ElevatorModel, QueueSet, State, Wakeup};

/// Everything a passenger may read or change while running one action or
/// handling one event.
///
/// Built by the handler for each call and dropped right after, so a
/// passenger never holds onto shared state between reactions.
pub struct PassengerContext<'a> {
    /// Current virtual time.
    pub now:             SimTime,
    pub model:           &'a mut dyn ElevatorModel,
    pub queues:          &'a mut QueueSet,
    pub timing:          &'a PassengerTiming,
    /// Board and exit without waiting for the level sensor.
    pub ignore_leveling: bool,
    /// Timers requested during this reaction.
    pub wakeups:         &'a mut Vec<Wakeup>,
    /// Observable results of this reaction, in order.
    pub outcomes:        &'a mut Vec<Outcome>,
}

/// Something observable that happened to a passenger.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    Transition {
        passenger: PassengerId,
        from:      State,
        to:        State,
    },
    Deduction {
        passenger: PassengerId,
        factor:    f64,
        reason:    String,
    },
    Delivered {
        passenger:     PassengerId,
        delivery_time: SimTime,
    },
}

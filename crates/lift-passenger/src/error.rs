use lift_core::{Hallway, PassengerId, SimTime};
use thiserror::Error;

use crate::State;

/// Configuration and programming errors.  Any of these aborts the run.
#[derive(Debug, Error)]
pub enum PassengerError {
    #[error("{passenger}: {action} expected state {expected} but was {actual}")]
    InvalidState {
        passenger: PassengerId,
        action:    &'static str,
        expected:  State,
        actual:    State,
    },

    #[error("{passenger}: {action} ran at floor {actual}, expected floor {expected}")]
    WrongFloor {
        passenger: PassengerId,
        action:    &'static str,
        expected:  i32,
        actual:    i32,
    },

    #[error("{passenger}: unexpected {event} in state {state}")]
    UnexpectedEvent {
        passenger: PassengerId,
        event:     String,
        state:     State,
    },

    #[error("{passenger} added to the {hallway} door queue twice")]
    DoubleQueued {
        passenger: PassengerId,
        hallway:   Hallway,
    },

    #[error("{passenger} is not in any passenger queue")]
    NotQueued { passenger: PassengerId },

    #[error("{passenger} already injected")]
    AlreadyInjected { passenger: PassengerId },

    #[error("{passenger} tried to join hall queue {floor},{hallway} but the car is at floor {car_floor}")]
    UnreachableHallQueue {
        passenger: PassengerId,
        floor:     i32,
        hallway:   Hallway,
        car_floor: i32,
    },

    #[error("{passenger} tried to join hall queue {floor},{hallway} but the {hallway} door is closed")]
    HallDoorClosed {
        passenger: PassengerId,
        floor:     i32,
        hallway:   Hallway,
    },

    #[error("no landing at {floor},{hallway} for {passenger}")]
    NoLanding {
        passenger: PassengerId,
        floor:     i32,
        hallway:   Hallway,
    },

    #[error("{passenger} can only be injected into the car at time 0, not {at}")]
    CarInjectionAfterStart {
        passenger: PassengerId,
        at:        SimTime,
    },
}

pub type PassengerResult<T> = Result<T, PassengerError>;

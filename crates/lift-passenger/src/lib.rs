//! `lift-passenger` — the passenger behavioral core.
//!
//! # Crate layout
//!
//! | Module           | Contents                                                    |
//! |------------------|-------------------------------------------------------------|
//! | [`event`]        | `PassengerEvent` broadcast kinds                            |
//! | [`model`]        | `ElevatorModel` trait (doors, buttons, sensors), `DriveState` |
//! | [`action`]       | `PendingAction<A>`, `Ticket`, `Wakeup`, door/call action kinds |
//! | [`satisfaction`] | `Satisfaction` ledger, `Deduction`                          |
//! | [`door_queue`]   | `DoorQueue` exit-before-enter arbitration                   |
//! | [`queue`]        | `PassengerQueue` ordered membership list                    |
//! | [`queue_set`]    | `QueueSet`: every queue plus the reverse index and car weight |
//! | [`context`]      | `PassengerContext<'a>`, `Outcome`                           |
//! | [`state`]        | `State` enum                                                |
//! | [`passenger`]    | `Passenger` state machine                                   |
//! | [`error`]        | `PassengerError`, `PassengerResult<T>`                      |
//!
//! # Execution model
//!
//! Nothing here owns a clock.  A passenger reacts to two kinds of input, both
//! delivered by the simulation loop in lift-sim:
//!
//! 1. **Wakeups**: a previously scheduled door or call action falls due.
//!    [`Passenger::fire`] runs it if its [`Ticket`] is still current.
//! 2. **Events**: a [`PassengerEvent`] broadcast routed by the handler.
//!
//! Every reaction reads and writes the world through a [`PassengerContext`]
//! and may push new [`Wakeup`]s, which the loop turns into timers.  Exactly
//! one action per category is pending per passenger; scheduling a new one
//! supersedes the old ticket, so a stale timer finds nothing to run.
//!
//! Fatal design errors (wrong state, double queuing, unreachable hall queue)
//! surface as [`PassengerError`]; undesirable but expected outcomes are
//! satisfaction deductions only.

pub mod action;
pub mod context;
pub mod door_queue;
pub mod error;
pub mod event;
pub mod model;
pub mod passenger;
pub mod queue;
pub mod queue_set;
pub mod satisfaction;
pub mod state;

mod call;
mod door;

#[cfg(test)]
mod tests;

pub use action::{ActionCategory, CallAction, DoorAction, PendingAction, Ticket, Wakeup};
pub use context::{Outcome, PassengerContext};
pub use door_queue::{DoorQueue, DoorRequest};
pub use error::{PassengerError, PassengerResult};
pub use event::PassengerEvent;
pub use model::{DriveState, ElevatorModel};
pub use passenger::{PASSENGER_WEIGHT, Passenger};
pub use queue::PassengerQueue;
pub use queue_set::{QueueKey, QueueSet};
pub use satisfaction::{Deduction, Satisfaction};
pub use state::State;

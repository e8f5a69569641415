//! Simulation observer trait for progress reporting and data collection.

use lift_core::{PassengerId, SimTime};
use lift_passenger::{Passenger, State};

use crate::PassengerHandler;

/// Callbacks invoked by [`Sim`][crate::Sim] as passengers move through the
/// system.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: delivery printer
///
/// ```rust,ignore
/// struct DeliveryPrinter;
///
/// impl SimObserver for DeliveryPrinter {
///     fn on_delivered(&mut self, now: SimTime, passenger: &Passenger) {
///         println!("{now}: {}", passenger.status_line());
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called right after `passenger` enters its first queue, before any
    /// of its transitions are reported.
    fn on_injected(&mut self, _now: SimTime, _passenger: &Passenger) {}

    fn on_transition(&mut self, _now: SimTime, _passenger: PassengerId, _from: State, _to: State) {}

    /// Called for every satisfaction deduction.
    fn on_deduction(&mut self, _now: SimTime, _passenger: PassengerId, _factor: f64, _reason: &str) {}

    /// Called once per passenger when it reaches `Done`.
    fn on_delivered(&mut self, _now: SimTime, _passenger: &Passenger) {}

    /// Called once when [`Sim::run`][crate::Sim::run] returns normally.
    ///
    /// Provides read-only access to every passenger so that output writers
    /// can record final statistics.
    fn on_sim_end(&mut self, _now: SimTime, _handler: &PassengerHandler) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

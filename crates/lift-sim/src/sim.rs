//! The `Sim` struct and its virtual-time loop.

use tracing::{debug, info};

use lift_core::{PassengerId, SimClock, SimConfig, SimTime};
use lift_passenger::{ElevatorModel, Outcome, PassengerEvent, Wakeup};
use lift_schedule::TimerQueue;

use crate::{PassengerHandler, SimError, SimObserver, SimResult};

/// A pending callback in the timer queue.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Timer {
    /// Inject the passenger at its injection time.
    Inject(PassengerId),
    /// Run a scheduled passenger action.
    Action(Wakeup),
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// `Sim<M>` holds the elevator model, the passenger handler, and the timer
/// queue standing in for the external scheduler.  Time only moves forward,
/// and only to the time of the next timer (or the target of
/// [`run_until`][Sim::run_until]).
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<M: ElevatorModel> {
    /// Global configuration (seed, building, timing, end time).
    pub config: SimConfig,

    /// Current virtual time.
    pub clock: SimClock,

    /// Doors, buttons and sensors.  Tests and drivers mutate it between
    /// `run_until` calls.
    pub model: M,

    /// Passenger arena and queues.
    pub handler: PassengerHandler,

    /// Sparse timer queue (`BTreeMap<SimTime, VecDeque<Timer>>`).
    pub timers: TimerQueue<Timer>,
}

impl<M: ElevatorModel> Sim<M> {
    // ── Public API ────────────────────────────────────────────────────────

    #[inline]
    pub fn now(&self) -> SimTime {
        self.clock.now()
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// Run until every passenger is delivered, no timer remains, or the
    /// configured end time is passed.
    ///
    /// Waiting passengers poll forever, so without an `end_time` this only
    /// returns once the model has served everyone.
    ///
    /// Calls `observer.on_sim_end` on normal completion.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let end = self.config.end_time();
        while !self.handler.is_finished() {
            match self.timers.next_time() {
                Some(t) if t <= end => {
                    self.step(end, observer)?;
                }
                _ => break,
            }
        }
        info!(
            now = %self.clock.now(),
            delivered = self.handler.delivered().len(),
            total = self.handler.total(),
            "simulation finished"
        );
        observer.on_sim_end(self.clock.now(), &self.handler);
        Ok(())
    }

    /// Fire every timer due at or before `t`, then move the clock to `t`.
    ///
    /// Ignores `end_time`.  Useful for tests and for drivers that interleave
    /// model updates with passenger reactions.
    pub fn run_until<O: SimObserver>(&mut self, t: SimTime, observer: &mut O) -> SimResult<()> {
        while self.step(t, observer)? {}
        self.clock.advance_to(t);
        Ok(())
    }

    /// Route a broadcast from the elevator model at the current time.
    pub fn deliver<O: SimObserver>(&mut self, event: PassengerEvent, observer: &mut O) -> SimResult<()> {
        let now = self.clock.now();
        self.handler.route(event, now, &mut self.model)?;
        self.flush(now, observer)
    }

    // ── Core processing ───────────────────────────────────────────────────

    /// Fire the earliest timer due at or before `until`.  Returns `false` if
    /// there was none.
    fn step<O: SimObserver>(&mut self, until: SimTime, observer: &mut O) -> SimResult<bool> {
        let Some((at, timer)) = self.timers.pop_due(until) else {
            return Ok(false);
        };
        self.clock.advance_to(at);
        match timer {
            Timer::Inject(id) => {
                self.handler.inject(id, at, &mut self.model)?;
                let passenger = self.handler.passenger(id).ok_or(SimError::UnknownPassenger(id))?;
                observer.on_injected(at, passenger);
            }
            Timer::Action(wakeup) => self.handler.fire(wakeup, at, &mut self.model)?,
        }
        self.flush(at, observer)?;
        Ok(true)
    }

    /// Turn new wakeups into timers and report outcomes, in order.
    fn flush<O: SimObserver>(&mut self, now: SimTime, observer: &mut O) -> SimResult<()> {
        for wakeup in self.handler.take_wakeups() {
            self.timers.push(wakeup.at, Timer::Action(wakeup));
        }
        for outcome in self.handler.take_outcomes() {
            match outcome {
                Outcome::Transition { passenger, from, to } => observer.on_transition(now, passenger, from, to),
                Outcome::Deduction { passenger, factor, reason } => {
                    observer.on_deduction(now, passenger, factor, &reason)
                }
                Outcome::Delivered { passenger, .. } => {
                    let p = self
                        .handler
                        .passenger(passenger)
                        .ok_or(SimError::UnknownPassenger(passenger))?;
                    observer.on_delivered(now, p);
                    if self.handler.is_finished() {
                        debug!(now = %now, "last passenger delivered");
                    }
                }
            }
        }
        Ok(())
    }
}

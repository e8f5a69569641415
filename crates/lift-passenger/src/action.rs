//! One-shot, cancelable, time-delayed passenger actions.
//!
//! # Model
//!
//! An action is a plain tag ([`DoorAction`] or [`CallAction`]) stored in a
//! per-category [`PendingAction`] slot together with a generation
//! [`Ticket`].  Scheduling returns a [`Wakeup`] for the timer layer; when the
//! timer fires, the slot hands the action back only if the ticket still
//! matches.  Replacing or clearing the slot is therefore the whole of
//! cancellation: a superseded timer fires, finds a newer ticket, and does
//! nothing.

use std::fmt;

use lift_core::{PassengerId, SimTime};

// ── Ticket ────────────────────────────────────────────────────────────────────

/// Generation counter identifying one scheduling of a slot.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, PartialOrd, Ord)]
pub struct Ticket(pub u64);

// ── PendingAction ─────────────────────────────────────────────────────────────

/// Single-slot holder: at most one pending action per category.
#[derive(Clone, Debug)]
pub struct PendingAction<A> {
    current:    Option<(Ticket, A)>,
    generation: u64,
}

impl<A> Default for PendingAction<A> {
    fn default() -> Self {
        Self { current: None, generation: 0 }
    }
}

impl<A: Copy> PendingAction<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `action`, superseding whatever was pending.
    pub fn set(&mut self, action: A) -> Ticket {
        self.generation += 1;
        let ticket = Ticket(self.generation);
        self.current = Some((ticket, action));
        ticket
    }

    /// Drop the pending action, if any.  Its timer becomes a no-op.
    #[inline]
    pub fn cancel(&mut self) {
        self.current = None;
    }

    /// Take the pending action if `ticket` is the one it was scheduled
    /// with.  Taking empties the slot, so an action runs at most once.
    pub fn take_if_current(&mut self, ticket: Ticket) -> Option<A> {
        match self.current {
            Some((t, action)) if t == ticket => {
                self.current = None;
                Some(action)
            }
            _ => None,
        }
    }

    #[inline]
    pub fn get(&self) -> Option<A> {
        self.current.map(|(_, a)| a)
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.current.is_some()
    }
}

// ── Action kinds ──────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionCategory {
    Door,
    Call,
}

/// Door-side steps of the boarding and alighting sequences.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DoorAction {
    /// Waiting in the hall while the start door is open.
    CheckHallDoor,
    /// Walking into the car through the blocked start door.
    FinishCarEnter,
    /// Just boarded; watching the lantern while the start door is open.
    CheckLanternDirection,
    /// Lantern changed: queue to get back out at the start floor.
    BeginExitAtStart,
    FinishExitAtStart,
    ExitAtStartAbort,
    EnterAbort,
    /// At the destination with the end door open.
    CheckCarDoor,
    ExitCar,
    ExitAbort,
    OverweightExitStart,
    OverweightExitFinish,
    /// Back in the hall after an overweight refusal; waiting for the door to
    /// close.
    OverweightBackoff,
}

impl DoorAction {
    pub fn name(self) -> &'static str {
        match self {
            DoorAction::CheckHallDoor         => "CheckHallDoor",
            DoorAction::FinishCarEnter        => "FinishCarEnter",
            DoorAction::CheckLanternDirection => "CheckLanternDirection",
            DoorAction::BeginExitAtStart      => "BeginExitAtStart",
            DoorAction::FinishExitAtStart     => "FinishExitAtStart",
            DoorAction::ExitAtStartAbort      => "ExitAtStartAbort",
            DoorAction::EnterAbort            => "EnterAbort",
            DoorAction::CheckCarDoor          => "CheckCarDoor",
            DoorAction::ExitCar               => "ExitCar",
            DoorAction::ExitAbort             => "ExitAbort",
            DoorAction::OverweightExitStart   => "OverweightExitStart",
            DoorAction::OverweightExitFinish  => "OverweightExitFinish",
            DoorAction::OverweightBackoff     => "OverweightBackoff",
        }
    }
}

impl fmt::Display for DoorAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Button pressing loops.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CallAction {
    HallCallCheck,
    CarCallCheck,
}

// ── Wakeup ────────────────────────────────────────────────────────────────────

/// A request to the timer layer: call back `passenger` at `at` for
/// `category`, quoting `ticket`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Wakeup {
    pub at:        SimTime,
    pub passenger: PassengerId,
    pub category:  ActionCategory,
    pub ticket:    Ticket,
}

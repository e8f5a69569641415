//! The passenger state machine: data, lifecycle and event handling.
//!
//! Door actions live in `door.rs` and call actions in `call.rs`; both are
//! further `impl Passenger` blocks.

use tracing::{debug, info, warn};

use lift_core::{Direction, Hallway, PassengerId, SimTime};
use lift_schedule::PassengerInfo;

use crate::{
    ActionCategory, CallAction, DoorAction, DriveState, Outcome, PassengerContext, PassengerError,
    DoorRequest, PassengerEvent, PassengerResult, PendingAction, Satisfaction, State, Ticket, Wakeup,
};

/// Weight of one passenger, in tenths of a pound.
pub const PASSENGER_WEIGHT: i32 = 1500;

// ── Deduction factors ─────────────────────────────────────────────────────────

pub(crate) const WRONG_MOTION: f64 = 0.5;
pub(crate) const ABORT: f64 = 0.8;
pub(crate) const REPEATED_PRESS: f64 = 0.9;
pub(crate) const FAIL_TO_EXIT: f64 = 0.5;
pub(crate) const LANTERN_CHANGE: f64 = 0.8;
pub(crate) const SKIPPED_DESTINATION: f64 = 0.5;
pub(crate) const MISSED_OPENINGS: f64 = 0.5;

/// Named delays; resolved against the shared timing and the passenger's own
/// traits when scheduling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Delay {
    DoorCheck,
    CallCheck,
    CallRecheck,
    Null,
    Backoff,
    Traversal,
    Backout,
}

pub struct Passenger {
    pub(crate) id:                 PassengerId,
    pub(crate) info:               PassengerInfo,
    pub(crate) state:              State,
    pub(crate) door_action:        PendingAction<DoorAction>,
    pub(crate) call_action:        PendingAction<CallAction>,
    /// Door queue this passenger believes it is in.
    pub(crate) queued_at:          Option<Hallway>,
    pub(crate) car_press_count:    u32,
    pub(crate) hall_press_count:   u32,
    pub(crate) missed_openings:    u32,
    pub(crate) abort_count:        u32,
    /// Lantern direction seen when boarding; `Stop` means "don't care".
    pub(crate) expected_direction: Direction,
    pub(crate) delivery_time:      Option<SimTime>,
    pub(crate) satisfaction:       Satisfaction,
}

impl Passenger {
    pub fn new(id: PassengerId, info: PassengerInfo) -> Self {
        Self {
            id,
            info,
            state:              State::Init,
            door_action:        PendingAction::new(),
            call_action:        PendingAction::new(),
            queued_at:          None,
            car_press_count:    0,
            hall_press_count:   0,
            missed_openings:    0,
            abort_count:        0,
            expected_direction: Direction::Stop,
            delivery_time:      None,
            satisfaction:       Satisfaction::new(),
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn id(&self) -> PassengerId {
        self.id
    }

    #[inline]
    pub fn info(&self) -> &PassengerInfo {
        &self.info
    }

    #[inline]
    pub fn state(&self) -> State {
        self.state
    }

    pub fn satisfaction(&self) -> &Satisfaction {
        &self.satisfaction
    }

    pub fn score(&self) -> f64 {
        self.satisfaction.score()
    }

    /// Time from injection to delivery; `None` until `Done`.
    pub fn delivery_time(&self) -> Option<SimTime> {
        self.delivery_time
    }

    pub fn weight(&self) -> i32 {
        PASSENGER_WEIGHT
    }

    pub fn missed_openings(&self) -> u32 {
        self.missed_openings
    }

    pub fn abort_count(&self) -> u32 {
        self.abort_count
    }

    pub fn hall_press_count(&self) -> u32 {
        self.hall_press_count
    }

    pub fn car_press_count(&self) -> u32 {
        self.car_press_count
    }

    pub fn expected_direction(&self) -> Direction {
        self.expected_direction
    }

    pub fn queued_at(&self) -> Option<Hallway> {
        self.queued_at
    }

    pub fn pending_door_action(&self) -> Option<DoorAction> {
        self.door_action.get()
    }

    pub fn pending_call_action(&self) -> Option<CallAction> {
        self.call_action.get()
    }

    // ── Report lines ──────────────────────────────────────────────────────

    pub fn status_line(&self) -> String {
        match (self.state, self.delivery_time) {
            (State::Done, Some(t)) => format!(
                "{}: INJECTED AT {} and DELIVERED in {}",
                self.id, self.info.injection_time, t
            ),
            _ => format!("{}: NOT_DELIVERED, {}", self.id, self.state),
        }
    }

    pub fn info_line(&self) -> String {
        let i = &self.info;
        format!(
            "{} injected at {} {},{} --> {},{}",
            self.id, i.injection_time, i.start_floor, i.start_hallway, i.end_floor, i.end_hallway
        )
    }

    pub fn tooltip_line(&self) -> String {
        let i = &self.info;
        format!(
            "{} | {} | {},{}->{},{} | {}",
            self.id, i.injection_time, i.start_floor, i.start_hallway, i.end_floor, i.end_hallway, self.state
        )
    }

    // ── Door-control predicates ───────────────────────────────────────────

    /// Would board at `floor`,`hallway` given the lantern showing `lantern`.
    pub fn might_enter(&self, floor: i32, hallway: Hallway, lantern: Direction) -> bool {
        floor == self.info.start_floor
            && hallway == self.info.start_hallway
            && self.direction_compatible(lantern)
    }

    /// Would get out at `floor`,`hallway`.
    pub fn might_exit(&self, floor: i32, hallway: Hallway) -> bool {
        floor == self.info.end_floor && hallway == self.info.end_hallway
    }

    /// A car showing `lantern` goes the passenger's way, or the passenger has
    /// given up caring.
    pub(crate) fn direction_compatible(&self, lantern: Direction) -> bool {
        self.missed_openings > self.info.traits.missed_opening_threshold
            || self.info.travel_direction == Direction::Stop
            || lantern == Direction::Stop
            || lantern == self.info.travel_direction
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Activate at injection.  The handler has already placed the passenger
    /// in its first queue.
    pub fn start(&mut self, ctx: &mut PassengerContext<'_>) -> PassengerResult<()> {
        self.expect_state("start", State::Init)?;
        if self.info.starts_in_car() {
            debug!(passenger = %self.id, "starting in car");
            self.set_state(ctx, State::WaitingInCar);
            self.schedule_call(ctx, CallAction::CarCallCheck, Delay::CallCheck);
        } else {
            debug!(
                passenger = %self.id,
                floor = self.info.start_floor,
                hallway = %self.info.start_hallway,
                "starting at landing"
            );
            self.set_state(ctx, State::WaitingInHall);
            self.schedule_call(ctx, CallAction::HallCallCheck, Delay::CallCheck);
        }
        Ok(())
    }

    /// Run the pending action of `category` if `ticket` is still current.
    pub fn fire(
        &mut self,
        category: ActionCategory,
        ticket:   Ticket,
        ctx:      &mut PassengerContext<'_>,
    ) -> PassengerResult<()> {
        match category {
            ActionCategory::Door => match self.door_action.take_if_current(ticket) {
                Some(action) => self.run_door_action(action, ctx),
                None => Ok(()),
            },
            ActionCategory::Call => match self.call_action.take_if_current(ticket) {
                Some(action) => self.run_call_action(action, ctx),
                None => Ok(()),
            },
        }
    }

    /// Mark delivered and leave the system.
    pub(crate) fn finish(&mut self, ctx: &mut PassengerContext<'_>) -> PassengerResult<()> {
        let delivery_time = ctx.now.since(self.info.injection_time);
        self.delivery_time = Some(delivery_time);
        self.set_state(ctx, State::Done);
        self.door_action.cancel();
        self.call_action.cancel();
        ctx.queues.finish(self.id, &mut *ctx.model)?;
        info!(
            passenger = %self.id,
            floor = self.info.end_floor,
            hallway = %self.info.end_hallway,
            %delivery_time,
            "delivered"
        );
        ctx.outcomes.push(Outcome::Delivered { passenger: self.id, delivery_time });
        Ok(())
    }

    // ── Events ────────────────────────────────────────────────────────────

    pub fn on_event(&mut self, event: &PassengerEvent, ctx: &mut PassengerContext<'_>) -> PassengerResult<()> {
        match *event {
            PassengerEvent::DoorOpening { hallway } => self.on_door_opening(hallway, ctx),
            PassengerEvent::Motion { direction } => {
                // The handler empties both door queues when the car moves.
                self.forget_door_queue();
                if self.expected_direction != Direction::Stop && self.expected_direction != direction {
                    let reason = format!("expected to move {} but moved {direction}", self.expected_direction);
                    self.deduct(ctx, WRONG_MOTION, reason);
                }
                Ok(())
            }
            PassengerEvent::Overweight => self.on_overweight(ctx),
            PassengerEvent::PositionChanged { previous, .. } => {
                if self.state == State::WaitingInCar
                    && previous == self.info.end_floor
                    && ctx.model.drive_state() == DriveState::Moving
                {
                    self.deduct(ctx, SKIPPED_DESTINATION, "car passed the destination floor without servicing it");
                }
                Ok(())
            }
        }
    }

    fn on_door_opening(&mut self, hallway: Hallway, ctx: &mut PassengerContext<'_>) -> PassengerResult<()> {
        match self.state {
            State::WaitingInHall => {
                if hallway != self.info.start_hallway {
                    return Err(self.unexpected(format!("door opening at the {hallway} hallway")));
                }
                let floor = ctx.model.current_floor();
                if floor != self.info.start_floor {
                    return Err(self.unexpected(format!("door opening at floor {floor}")));
                }
                debug!(passenger = %self.id, floor, %hallway, "checking door from hall");
                self.schedule_door(ctx, DoorAction::CheckHallDoor, Delay::DoorCheck);
                self.call_action.cancel();
            }
            State::WaitingInCar if hallway == self.info.end_hallway => {
                debug!(passenger = %self.id, %hallway, "checking door from car");
                self.schedule_door(ctx, DoorAction::CheckCarDoor, Delay::DoorCheck);
                self.call_action.cancel();
            }
            state => {
                debug!(passenger = %self.id, %hallway, %state, "door opening ignored");
            }
        }
        Ok(())
    }

    fn on_overweight(&mut self, ctx: &mut PassengerContext<'_>) -> PassengerResult<()> {
        match self.state {
            State::WaitingInCar => {
                // Only the last passenger to board is told to get out.  The
                // exit action insists on the start floor.
                self.set_state(ctx, State::OverweightExiting);
                self.schedule_door(ctx, DoorAction::OverweightExitStart, Delay::DoorCheck);
                self.call_action.cancel();
            }
            State::WaitingInHall => {
                self.leave_door_queue(ctx);
                self.set_state(ctx, State::OverweightBackoff);
                self.schedule_door(ctx, DoorAction::OverweightBackoff, Delay::DoorCheck);
                self.call_action.cancel();
            }
            State::Entering
            | State::EnterBackout
            | State::Exiting
            | State::ExitBackout
            | State::OverweightExiting
            | State::OverweightBackoff => {}
            State::Init | State::Done => {
                return Err(self.unexpected("overweight alarm".to_string()));
            }
        }
        Ok(())
    }

    // ── Shared helpers ────────────────────────────────────────────────────

    pub(crate) fn expect_state(&self, action: &'static str, expected: State) -> PassengerResult<()> {
        if self.state != expected {
            return Err(PassengerError::InvalidState {
                passenger: self.id,
                action,
                expected,
                actual: self.state,
            });
        }
        Ok(())
    }

    pub(crate) fn expect_floor(&self, action: &'static str, expected: i32, actual: i32) -> PassengerResult<()> {
        if expected != actual {
            return Err(PassengerError::WrongFloor { passenger: self.id, action, expected, actual });
        }
        Ok(())
    }

    fn unexpected(&self, event: String) -> PassengerError {
        PassengerError::UnexpectedEvent { passenger: self.id, event, state: self.state }
    }

    pub(crate) fn set_state(&mut self, ctx: &mut PassengerContext<'_>, to: State) {
        let from = self.state;
        if from == to {
            return;
        }
        self.state = to;
        debug!(passenger = %self.id, %from, state = %to, "state change");
        ctx.outcomes.push(Outcome::Transition { passenger: self.id, from, to });
    }

    pub(crate) fn deduct(&mut self, ctx: &mut PassengerContext<'_>, factor: f64, reason: impl Into<String>) {
        let reason = reason.into();
        self.satisfaction.deduct(ctx.now, factor, reason.clone());
        warn!(passenger = %self.id, factor, score = self.satisfaction.score(), "{reason}");
        ctx.outcomes.push(Outcome::Deduction { passenger: self.id, factor, reason });
    }

    fn delay(&self, ctx: &PassengerContext<'_>, delay: Delay) -> SimTime {
        let traits = &self.info.traits;
        match delay {
            Delay::DoorCheck   => ctx.timing.door_check,
            Delay::CallCheck   => ctx.timing.call_check,
            Delay::CallRecheck => ctx.timing.call_recheck,
            Delay::Null        => ctx.timing.null_period,
            Delay::Backoff     => ctx.timing.backoff,
            Delay::Traversal   => traits.door_traversal_delay,
            Delay::Backout     => traits.door_backout_delay,
        }
    }

    pub(crate) fn schedule_door(&mut self, ctx: &mut PassengerContext<'_>, action: DoorAction, delay: Delay) {
        let at = ctx.now.offset(self.delay(ctx, delay));
        let ticket = self.door_action.set(action);
        ctx.wakeups.push(Wakeup {
            at,
            passenger: self.id,
            category:  ActionCategory::Door,
            ticket,
        });
    }

    pub(crate) fn schedule_call(&mut self, ctx: &mut PassengerContext<'_>, action: CallAction, delay: Delay) {
        let at = ctx.now.offset(self.delay(ctx, delay));
        let ticket = self.call_action.set(action);
        ctx.wakeups.push(Wakeup {
            at,
            passenger: self.id,
            category:  ActionCategory::Call,
            ticket,
        });
    }

    /// Make sure the passenger is in the `hallway` door queue, leaving any
    /// other door queue first.
    pub(crate) fn join_door_queue(
        &mut self,
        ctx:     &mut PassengerContext<'_>,
        hallway: Hallway,
        request: DoorRequest,
    ) -> PassengerResult<()> {
        if self.queued_at == Some(hallway) {
            return Ok(());
        }
        ctx.queues.request_door(self.id, hallway, request)?;
        self.queued_at = Some(hallway);
        Ok(())
    }

    /// The handler emptied the door queues.
    pub fn forget_door_queue(&mut self) {
        self.queued_at = None;
    }

    pub(crate) fn leave_door_queue(&mut self, ctx: &mut PassengerContext<'_>) {
        if let Some(hallway) = self.queued_at.take() {
            ctx.queues.door_queue_mut(hallway).remove(self.id);
        }
    }

    /// Level (or leveling ignored), queued at `hallway`, door wide enough, and
    /// first in line.
    pub(crate) fn may_traverse(&self, ctx: &PassengerContext<'_>, hallway: Hallway) -> bool {
        (ctx.ignore_leveling || ctx.model.is_level())
            && self.queued_at == Some(hallway)
            && ctx.model.door_width(hallway) >= self.info.traits.width
            && ctx.queues.door_queue(hallway).is_next(self.id)
    }

    /// Settle into the car: watch the door if already at the destination,
    /// otherwise watch the lantern; always keep the car call pressed.
    pub(crate) fn resume_in_car(&mut self, ctx: &mut PassengerContext<'_>) {
        let next = if ctx.model.current_floor() == self.info.end_floor {
            DoorAction::CheckCarDoor
        } else {
            DoorAction::CheckLanternDirection
        };
        self.schedule_door(ctx, next, Delay::DoorCheck);
        self.schedule_call(ctx, CallAction::CarCallCheck, Delay::CallCheck);
    }
}

//! Unit tests for lift-passenger.

use lift_core::{Building, Direction, Hallway, PassengerId, PassengerRng, PassengerTiming, SimTime};
use lift_schedule::{PassengerInfo, PassengerTraits};

use crate::{
    ActionCategory, CallAction, DoorAction, DoorQueue, DoorRequest, DriveState, ElevatorModel, Outcome, PASSENGER_WEIGHT,
    Passenger, PassengerContext, PassengerError, PassengerEvent, PassengerQueue, PendingAction, QueueKey,
    QueueSet, Satisfaction, State, Wakeup,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Elevator double with directly settable doors and sensors.  Buttons never
/// light up on their own.
#[derive(Default)]
struct TestModel {
    floor:        i32,
    moving:       bool,
    lantern:      Direction,
    door_width:   [i32; 2],
    blocked:      [bool; 2],
    car_lit:      bool,
    hall_presses: u32,
    car_presses:  u32,
    weight:       i32,
    overweight:   bool,
}

impl ElevatorModel for TestModel {
    fn door_width(&self, hallway: Hallway) -> i32 {
        self.door_width[hallway.index()]
    }

    fn door_is_closed(&self, hallway: Hallway) -> bool {
        self.door_width[hallway.index()] == 0
    }

    fn door_block(&mut self, hallway: Hallway, _width: i32) -> bool {
        let slot = &mut self.blocked[hallway.index()];
        if *slot {
            return false;
        }
        *slot = true;
        true
    }

    fn door_unblock(&mut self, hallway: Hallway) {
        self.blocked[hallway.index()] = false;
    }

    fn current_floor(&self) -> i32 {
        if self.moving { -1 } else { self.floor }
    }

    fn drive_state(&self) -> DriveState {
        if self.moving { DriveState::Moving } else { DriveState::Stopped }
    }

    fn is_level(&self) -> bool {
        !self.moving
    }

    fn indicated_floor(&self) -> i32 {
        self.floor
    }

    fn lantern_direction(&self) -> Direction {
        self.lantern
    }

    fn hall_light_lit(&self, _floor: i32, _hallway: Hallway, _direction: Direction) -> bool {
        false
    }

    fn press_hall_button(&mut self, _floor: i32, _hallway: Hallway, _direction: Direction, _duration: SimTime) {
        self.hall_presses += 1;
    }

    fn car_light_lit(&self, _floor: i32, _hallway: Hallway) -> bool {
        self.car_lit
    }

    fn press_car_button(&mut self, _floor: i32, _hallway: Hallway, _duration: SimTime) {
        self.car_presses += 1;
    }

    fn car_weight(&self) -> i32 {
        self.weight
    }

    fn set_car_weight(&mut self, weight: i32) {
        self.weight = weight;
    }

    fn overweight_alarm_ringing(&self) -> bool {
        self.overweight
    }
}

struct Harness {
    model:    TestModel,
    queues:   QueueSet,
    timing:   PassengerTiming,
    wakeups:  Vec<Wakeup>,
    outcomes: Vec<Outcome>,
    now:      SimTime,
}

impl Harness {
    fn new() -> Self {
        Self {
            model:    TestModel { floor: 1, ..TestModel::default() },
            queues:   QueueSet::new(&Building::reference()),
            timing:   PassengerTiming::default(),
            wakeups:  Vec::new(),
            outcomes: Vec::new(),
            now:      SimTime::ZERO,
        }
    }

    fn with<R>(&mut self, f: impl FnOnce(&mut PassengerContext<'_>) -> R) -> R {
        let mut ctx = PassengerContext {
            now:             self.now,
            model:           &mut self.model,
            queues:          &mut self.queues,
            timing:          &self.timing,
            ignore_leveling: false,
            wakeups:         &mut self.wakeups,
            outcomes:        &mut self.outcomes,
        };
        f(&mut ctx)
    }

    /// Inject and start `p` at time zero.
    fn start(&mut self, p: &mut Passenger) {
        let (id, floor, hallway) = (p.id(), p.info().start_floor, p.info().start_hallway);
        self.queues.inject(id, floor, hallway, self.now, &mut self.model).unwrap();
        self.with(|ctx| p.start(ctx)).unwrap();
    }

    /// Advance to the most recent wakeup of `category` and fire it.
    fn fire(&mut self, p: &mut Passenger, category: ActionCategory) -> Result<(), PassengerError> {
        let wakeup = self
            .wakeups
            .iter()
            .rev()
            .find(|w| w.passenger == p.id() && w.category == category)
            .copied()
            .expect("no wakeup scheduled");
        self.now = wakeup.at;
        self.with(|ctx| p.fire(category, wakeup.ticket, ctx))
    }

    fn event(&mut self, p: &mut Passenger, event: PassengerEvent) -> Result<(), PassengerError> {
        self.with(|ctx| p.on_event(&event, ctx))
    }

    fn open(&mut self, hallway: Hallway, width: i32) {
        self.model.door_width[hallway.index()] = width;
    }
}

fn traits(width: i32) -> PassengerTraits {
    PassengerTraits {
        hall_press_time:          SimTime::from_millis(500),
        car_press_time:           SimTime::from_millis(500),
        width,
        door_traversal_delay:     SimTime::from_secs(1),
        door_backout_delay:       SimTime::from_secs(2),
        missed_opening_threshold: 3,
    }
}

fn passenger(id: u32, start: (i32, Hallway), end: (i32, Hallway), width: i32) -> Passenger {
    let id = PassengerId(id);
    let mut rng = PassengerRng::new(1, id);
    let info = PassengerInfo::new(SimTime::ZERO, start, end, &Building::reference(), &mut rng)
        .unwrap()
        .with_traits(traits(width));
    Passenger::new(id, info)
}

fn deductions(h: &Harness) -> Vec<f64> {
    h.outcomes
        .iter()
        .filter_map(|o| match o {
            Outcome::Deduction { factor, .. } => Some(*factor),
            _ => None,
        })
        .collect()
}

// ── PendingAction ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod pending_action {
    use super::*;

    #[test]
    fn newer_schedule_supersedes_older_ticket() {
        let mut slot = PendingAction::new();
        let old = slot.set(DoorAction::CheckHallDoor);
        let new = slot.set(DoorAction::CheckCarDoor);
        assert_eq!(slot.take_if_current(old), None);
        assert_eq!(slot.take_if_current(new), Some(DoorAction::CheckCarDoor));
        // Runs at most once.
        assert_eq!(slot.take_if_current(new), None);
    }

    #[test]
    fn cancel_empties_slot() {
        let mut slot = PendingAction::new();
        let t = slot.set(CallAction::HallCallCheck);
        assert!(slot.is_pending());
        slot.cancel();
        assert!(!slot.is_pending());
        assert_eq!(slot.take_if_current(t), None);
    }
}

// ── DoorQueue ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod door_queue {
    use super::*;

    #[test]
    fn exit_goes_before_enter() {
        let mut q = DoorQueue::new(Hallway::Front);
        q.request_enter(PassengerId(1)).unwrap();
        assert!(q.is_next(PassengerId(1)));
        q.request_exit(PassengerId(2)).unwrap();
        assert!(q.is_next(PassengerId(2)));
        assert!(!q.is_next(PassengerId(1)));
        q.remove(PassengerId(2));
        assert!(q.is_next(PassengerId(1)));
    }

    #[test]
    fn double_request_is_an_error() {
        let mut q = DoorQueue::new(Hallway::Back);
        q.request_enter(PassengerId(4)).unwrap();
        let err = q.request_exit(PassengerId(4)).unwrap_err();
        assert!(matches!(err, PassengerError::DoubleQueued { hallway: Hallway::Back, .. }));
    }

    #[test]
    fn remove_absent_is_noop() {
        let mut q = DoorQueue::new(Hallway::Front);
        q.remove(PassengerId(9));
        assert!(q.is_empty());
        assert_eq!(q.to_string(), "door queue FRONT: exit [<empty>] enter [<empty>]");
    }
}

// ── PassengerQueue ────────────────────────────────────────────────────────────

#[cfg(test)]
mod passenger_queue {
    use super::*;

    #[test]
    fn keeps_fifo_order() {
        let mut q = PassengerQueue::new();
        for i in 1..=3 {
            q.push_back(PassengerId(i));
        }
        assert!(q.remove(PassengerId(2)));
        assert!(!q.remove(PassengerId(2)));
        assert_eq!(q.snapshot(), vec![PassengerId(1), PassengerId(3)]);
        assert_eq!(q.back(), Some(PassengerId(3)));
        assert_eq!(q.first_where(|p| p.0 > 1), Some(PassengerId(3)));
    }

    #[test]
    fn tooltip_lists_members() {
        let mut q = PassengerQueue::new();
        assert_eq!(q.tooltip(|p| p.to_string()), "<empty>");
        q.push_back(PassengerId(1));
        q.push_back(PassengerId(2));
        assert_eq!(q.tooltip(|p| p.to_string()), "Passenger 1\nPassenger 2");
    }
}

// ── QueueSet ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod queue_set {
    use super::*;

    #[test]
    fn inject_places_in_hall_or_car() {
        let mut model = TestModel::default();
        let mut qs = QueueSet::new(&Building::reference());
        qs.inject(PassengerId(0), 3, Hallway::Front, SimTime::ZERO, &mut model).unwrap();
        qs.inject(PassengerId(1), 0, Hallway::Front, SimTime::ZERO, &mut model).unwrap();
        assert_eq!(qs.queue_of(PassengerId(0)), Some(QueueKey::Hall { floor: 3, hallway: Hallway::Front }));
        assert_eq!(qs.queue_of(PassengerId(1)), Some(QueueKey::Car));
        assert_eq!(model.weight, PASSENGER_WEIGHT);

        let again = qs.inject(PassengerId(0), 3, Hallway::Front, SimTime::ZERO, &mut model);
        assert!(matches!(again, Err(PassengerError::AlreadyInjected { .. })));
    }

    #[test]
    fn car_injection_only_at_time_zero() {
        let mut model = TestModel::default();
        let mut qs = QueueSet::new(&Building::reference());
        let err = qs.inject(PassengerId(0), 0, Hallway::Front, SimTime::from_secs(1), &mut model);
        assert!(matches!(err, Err(PassengerError::CarInjectionAfterStart { .. })));
    }

    #[test]
    fn missing_landing_has_no_queue() {
        let mut model = TestModel::default();
        let mut qs = QueueSet::new(&Building::reference());
        assert!(qs.hall_queue(2, Hallway::Front).is_none());
        let err = qs.inject(PassengerId(0), 2, Hallway::Front, SimTime::ZERO, &mut model);
        assert!(matches!(err, Err(PassengerError::NoLanding { floor: 2, .. })));
    }

    #[test]
    fn hall_queue_requires_car_and_open_door() {
        let mut model = TestModel { floor: 4, ..TestModel::default() };
        let mut qs = QueueSet::new(&Building::reference());
        qs.inject(PassengerId(0), 0, Hallway::Front, SimTime::ZERO, &mut model).unwrap();

        let far = qs.join_hall_queue(PassengerId(0), 3, Hallway::Front, &mut model);
        assert!(matches!(far, Err(PassengerError::UnreachableHallQueue { car_floor: 4, .. })));
        let closed = qs.join_hall_queue(PassengerId(0), 4, Hallway::Front, &mut model);
        assert!(matches!(closed, Err(PassengerError::HallDoorClosed { .. })));

        model.door_width[0] = 30;
        qs.join_hall_queue(PassengerId(0), 4, Hallway::Front, &mut model).unwrap();
        assert_eq!(model.weight, 0);
        assert!(qs.car_queue().is_empty());
    }

    #[test]
    fn requeue_moves_to_back() {
        let mut model = TestModel::default();
        let mut qs = QueueSet::new(&Building::reference());
        for i in 0..3 {
            qs.inject(PassengerId(i), 0, Hallway::Front, SimTime::ZERO, &mut model).unwrap();
        }
        qs.requeue(PassengerId(0), &mut model).unwrap();
        assert_eq!(qs.car_queue().snapshot(), vec![PassengerId(1), PassengerId(2), PassengerId(0)]);
        assert_eq!(model.weight, 3 * PASSENGER_WEIGHT);
    }

    #[test]
    fn finish_removes_everywhere() {
        let mut model = TestModel::default();
        let mut qs = QueueSet::new(&Building::reference());
        qs.inject(PassengerId(0), 0, Hallway::Front, SimTime::ZERO, &mut model).unwrap();
        qs.door_queue_mut(Hallway::Front).request_exit(PassengerId(0)).unwrap();
        qs.finish(PassengerId(0), &mut model).unwrap();
        assert_eq!(qs.queue_of(PassengerId(0)), None);
        assert!(qs.door_queue(Hallway::Front).is_empty());
        assert!(matches!(qs.finish(PassengerId(0), &mut model), Err(PassengerError::NotQueued { .. })));
    }

    #[test]
    fn door_request_leaves_other_hallway() {
        let mut qs = QueueSet::new(&Building::reference());
        let p = PassengerId(0);
        qs.request_door(p, Hallway::Front, DoorRequest::Enter).unwrap();
        qs.request_door(p, Hallway::Back, DoorRequest::Exit).unwrap();
        assert!(!qs.door_queue(Hallway::Front).contains(p));
        assert!(qs.door_queue(Hallway::Back).is_next(p));

        // Same door twice is still a double request.
        let err = qs.request_door(p, Hallway::Back, DoorRequest::Enter).unwrap_err();
        assert!(matches!(err, PassengerError::DoubleQueued { hallway: Hallway::Back, .. }));

        qs.request_door(PassengerId(1), Hallway::Front, DoorRequest::Enter).unwrap();
        qs.clear_door_queues();
        assert!(qs.door_queue(Hallway::Front).is_empty());
        assert!(qs.door_queue(Hallway::Back).is_empty());
    }
}

// ── Satisfaction ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod satisfaction {
    use super::*;

    #[test]
    fn score_is_product_of_factors() {
        let mut s = Satisfaction::new();
        s.deduct(SimTime::from_millis(1500), 0.5, "first");
        s.deduct(SimTime::from_secs(2), 0.8, "second");
        assert!((s.score() - 40.0).abs() < 1e-9);
        assert_eq!(s.deductions().len(), 2);
    }

    #[test]
    fn score_never_rises_or_leaves_range() {
        let mut s = Satisfaction::new();
        let mut last = s.score();
        assert_eq!(last, 100.0);
        for (i, factor) in [0.9, 0.5, 0.8, 0.9, 0.5, 0.8, 0.5].into_iter().enumerate() {
            s.deduct(SimTime::from_secs(i as u64), factor, "penalty");
            assert!(s.score() <= last);
            assert!((0.0..=100.0).contains(&s.score()));
            last = s.score();
        }
    }

    #[test]
    fn display_lists_deductions() {
        let mut s = Satisfaction::new();
        s.deduct(SimTime::from_millis(1500), 0.5, "late");
        assert_eq!(s.to_string(), "  Satisfaction score: 50\n    @1.500000000: 0.50 late\n");
    }
}

// ── Passenger state machine ───────────────────────────────────────────────────

#[cfg(test)]
mod passenger {
    use super::*;

    #[test]
    fn presses_hall_button_and_penalizes_repeats() {
        let mut h = Harness::new();
        let mut p = passenger(0, (1, Hallway::Front), (5, Hallway::Front), 30);
        h.start(&mut p);
        assert_eq!(p.state(), State::WaitingInHall);
        assert_eq!(p.pending_call_action(), Some(CallAction::HallCallCheck));

        h.fire(&mut p, ActionCategory::Call).unwrap();
        assert_eq!(h.model.hall_presses, 1);
        assert!(deductions(&h).is_empty());

        h.fire(&mut p, ActionCategory::Call).unwrap();
        assert_eq!(h.model.hall_presses, 2);
        assert_eq!(deductions(&h), vec![0.9]);
        assert_eq!(h.now, SimTime::from_millis(700));
    }

    #[test]
    fn boards_when_door_opens_wide_enough() {
        let mut h = Harness::new();
        let mut p = passenger(0, (1, Hallway::Front), (5, Hallway::Front), 30);
        h.start(&mut p);

        h.model.lantern = Direction::Up;
        h.open(Hallway::Front, 40);
        h.event(&mut p, PassengerEvent::DoorOpening { hallway: Hallway::Front }).unwrap();
        assert_eq!(p.pending_door_action(), Some(DoorAction::CheckHallDoor));
        assert_eq!(p.pending_call_action(), None);

        h.fire(&mut p, ActionCategory::Door).unwrap();
        assert_eq!(p.state(), State::Entering);
        assert!(h.model.blocked[0]);

        h.fire(&mut p, ActionCategory::Door).unwrap();
        assert_eq!(p.state(), State::WaitingInCar);
        assert!(!h.model.blocked[0]);
        assert_eq!(h.queues.queue_of(p.id()), Some(QueueKey::Car));
        assert_eq!(h.model.weight, PASSENGER_WEIGHT);
        assert_eq!(p.expected_direction(), Direction::Up);
        assert_eq!(p.pending_door_action(), Some(DoorAction::CheckLanternDirection));
        assert_eq!(p.pending_call_action(), Some(CallAction::CarCallCheck));
        assert!(h.queues.door_queue(Hallway::Front).is_empty());
    }

    #[test]
    fn narrow_door_never_lets_passenger_in() {
        let mut h = Harness::new();
        let mut p = passenger(0, (1, Hallway::Front), (5, Hallway::Front), 45);
        h.start(&mut p);

        h.open(Hallway::Front, 20);
        h.event(&mut p, PassengerEvent::DoorOpening { hallway: Hallway::Front }).unwrap();
        for _ in 0..5 {
            h.fire(&mut p, ActionCategory::Door).unwrap();
            assert_eq!(p.state(), State::WaitingInHall);
            assert_eq!(p.pending_door_action(), Some(DoorAction::CheckHallDoor));
        }

        h.open(Hallway::Front, 0);
        h.fire(&mut p, ActionCategory::Door).unwrap();
        assert_eq!(p.pending_door_action(), None);
        assert_eq!(p.pending_call_action(), Some(CallAction::HallCallCheck));
        // Was queued the whole time, so this is not a missed opening.
        assert_eq!(p.missed_openings(), 0);
        assert_eq!(p.abort_count(), 0);
        assert!(h.queues.door_queue(Hallway::Front).is_empty());
    }

    #[test]
    fn wrong_lantern_counts_missed_opening() {
        let mut h = Harness::new();
        let mut p = passenger(0, (1, Hallway::Front), (5, Hallway::Front), 30);
        h.start(&mut p);

        h.model.lantern = Direction::Down;
        h.open(Hallway::Front, 40);
        h.event(&mut p, PassengerEvent::DoorOpening { hallway: Hallway::Front }).unwrap();
        h.fire(&mut p, ActionCategory::Door).unwrap();
        assert_eq!(p.state(), State::WaitingInHall);
        assert!(h.queues.door_queue(Hallway::Front).is_empty());

        h.open(Hallway::Front, 0);
        h.fire(&mut p, ActionCategory::Door).unwrap();
        assert_eq!(p.missed_openings(), 1);
        let backoff = h.wakeups.last().unwrap();
        assert_eq!(backoff.category, ActionCategory::Call);
        assert_eq!(backoff.at, h.now.offset(SimTime::from_secs(10)));
    }

    #[test]
    fn door_opening_elsewhere_is_fatal() {
        let mut h = Harness::new();
        let mut p = passenger(0, (1, Hallway::Front), (5, Hallway::Front), 30);
        h.start(&mut p);
        h.model.floor = 3;
        let err = h.event(&mut p, PassengerEvent::DoorOpening { hallway: Hallway::Front }).unwrap_err();
        assert!(matches!(err, PassengerError::UnexpectedEvent { .. }));
    }

    #[test]
    fn motion_against_expectation_deducts() {
        let mut h = Harness::new();
        let mut p = passenger(0, (1, Hallway::Front), (5, Hallway::Front), 30);
        h.start(&mut p);
        h.model.lantern = Direction::Up;
        h.open(Hallway::Front, 40);
        h.event(&mut p, PassengerEvent::DoorOpening { hallway: Hallway::Front }).unwrap();
        h.fire(&mut p, ActionCategory::Door).unwrap();
        h.fire(&mut p, ActionCategory::Door).unwrap();

        h.event(&mut p, PassengerEvent::Motion { direction: Direction::Up }).unwrap();
        assert!(deductions(&h).is_empty());
        h.event(&mut p, PassengerEvent::Motion { direction: Direction::Down }).unwrap();
        assert_eq!(deductions(&h), vec![0.5]);
    }

    /// Board at 1F Front with the lantern up.
    fn boarded(h: &mut Harness) -> Passenger {
        let mut p = passenger(0, (1, Hallway::Front), (5, Hallway::Front), 30);
        h.start(&mut p);
        h.model.lantern = Direction::Up;
        h.open(Hallway::Front, 40);
        h.event(&mut p, PassengerEvent::DoorOpening { hallway: Hallway::Front }).unwrap();
        h.fire(&mut p, ActionCategory::Door).unwrap();
        h.fire(&mut p, ActionCategory::Door).unwrap();
        assert_eq!(p.pending_door_action(), Some(DoorAction::CheckLanternDirection));
        p
    }

    #[test]
    fn lantern_flip_counts_even_as_door_closes() {
        let mut h = Harness::new();
        let mut p = boarded(&mut h);
        h.model.lantern = Direction::Down;
        h.open(Hallway::Front, 0);
        h.fire(&mut p, ActionCategory::Door).unwrap();
        assert_eq!(deductions(&h), vec![0.8]);
        assert_eq!(p.pending_door_action(), Some(DoorAction::BeginExitAtStart));
    }

    #[test]
    fn closed_door_with_steady_lantern_ends_watch() {
        let mut h = Harness::new();
        let mut p = boarded(&mut h);
        h.fire(&mut p, ActionCategory::Door).unwrap();
        assert_eq!(p.pending_door_action(), Some(DoorAction::CheckLanternDirection));

        h.open(Hallway::Front, 0);
        h.fire(&mut p, ActionCategory::Door).unwrap();
        assert_eq!(p.pending_door_action(), None);
        assert!(deductions(&h).is_empty());
        assert_eq!(p.state(), State::WaitingInCar);
    }

    #[test]
    fn rides_from_car_start_to_delivery() {
        let mut h = Harness::new();
        h.model.floor = 5;
        let mut p = passenger(0, (0, Hallway::Front), (5, Hallway::Front), 30);
        h.start(&mut p);
        assert_eq!(p.state(), State::WaitingInCar);

        h.fire(&mut p, ActionCategory::Call).unwrap();
        assert_eq!(h.model.car_presses, 1);

        h.open(Hallway::Front, 40);
        h.event(&mut p, PassengerEvent::DoorOpening { hallway: Hallway::Front }).unwrap();
        h.fire(&mut p, ActionCategory::Door).unwrap();
        assert_eq!(p.state(), State::Exiting);
        h.fire(&mut p, ActionCategory::Door).unwrap();

        assert_eq!(p.state(), State::Done);
        assert_eq!(p.delivery_time(), Some(h.now));
        assert_eq!(h.queues.queue_of(p.id()), None);
        assert_eq!(h.model.weight, 0);
        assert!(matches!(h.outcomes.last(), Some(Outcome::Delivered { .. })));
        assert!(p.status_line().contains("DELIVERED in"));
    }

    #[test]
    fn skipped_destination_deducts() {
        let mut h = Harness::new();
        let mut p = passenger(0, (0, Hallway::Front), (5, Hallway::Front), 30);
        h.start(&mut p);
        h.model.moving = true;
        h.event(&mut p, PassengerEvent::PositionChanged { current: 6, previous: 5 }).unwrap();
        h.event(&mut p, PassengerEvent::PositionChanged { current: 7, previous: 6 }).unwrap();
        assert_eq!(deductions(&h), vec![0.5]);
    }

    #[test]
    fn stale_wakeup_does_nothing() {
        let mut h = Harness::new();
        let mut p = passenger(0, (1, Hallway::Front), (5, Hallway::Front), 30);
        h.start(&mut p);
        let stale = h.wakeups[0];
        h.open(Hallway::Front, 40);
        h.event(&mut p, PassengerEvent::DoorOpening { hallway: Hallway::Front }).unwrap();
        h.with(|ctx| p.fire(ActionCategory::Call, stale.ticket, ctx)).unwrap();
        assert_eq!(h.model.hall_presses, 0);
    }
}

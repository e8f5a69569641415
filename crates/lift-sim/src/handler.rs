//! Passenger arena, queue ownership and broadcast routing.

use std::mem;

use tracing::{debug, info};

use lift_core::{Direction, Hallway, PassengerId, PassengerTiming, SimConfig, SimTime};
use lift_passenger::{
    DriveState, ElevatorModel, Outcome, Passenger, PassengerContext, PassengerEvent, QueueSet, Wakeup,
    queue::EMPTY_TOOLTIP,
};
use lift_schedule::PassengerInfo;

use crate::{SimError, SimResult};

/// Owns every passenger and every queue.
///
/// Passengers are stored in an arena indexed by [`PassengerId`]; queues hold
/// ids only.  All reactions go through one private `react` step, which
/// builds a fresh [`PassengerContext`] and records deliveries from the
/// outcomes it produces.
pub struct PassengerHandler {
    passengers:      Vec<Passenger>,
    queues:          QueueSet,
    /// Injected and not yet delivered, in injection order.
    injected:        Vec<PassengerId>,
    /// Delivered, in delivery order.
    delivered:       Vec<PassengerId>,
    timing:          PassengerTiming,
    ignore_leveling: bool,
    wakeups:         Vec<Wakeup>,
    outcomes:        Vec<Outcome>,
}

impl PassengerHandler {
    /// Passenger `i` of `infos` gets id `i`.
    pub fn new(infos: Vec<PassengerInfo>, config: &SimConfig) -> Self {
        let passengers = infos
            .into_iter()
            .enumerate()
            .map(|(i, info)| Passenger::new(PassengerId(i as u32), info))
            .collect();
        Self {
            passengers,
            queues:          QueueSet::new(&config.building),
            injected:        Vec::new(),
            delivered:       Vec::new(),
            timing:          config.timing.clone(),
            ignore_leveling: config.ignore_leveling,
            wakeups:         Vec::new(),
            outcomes:        Vec::new(),
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn passenger(&self, id: PassengerId) -> Option<&Passenger> {
        self.passengers.get(id.index())
    }

    pub fn passengers(&self) -> &[Passenger] {
        &self.passengers
    }

    pub fn queues(&self) -> &QueueSet {
        &self.queues
    }

    /// Number of passengers this handler was built with.
    #[inline]
    pub fn total(&self) -> usize {
        self.passengers.len()
    }

    /// Injected passengers not yet delivered.
    pub fn injected(&self) -> &[PassengerId] {
        &self.injected
    }

    pub fn delivered(&self) -> &[PassengerId] {
        &self.delivered
    }

    /// Every passenger has been delivered.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.delivered.len() == self.passengers.len()
    }

    /// Timers requested since the last call.
    pub fn take_wakeups(&mut self) -> Vec<Wakeup> {
        mem::take(&mut self.wakeups)
    }

    /// Outcomes produced since the last call.
    pub fn take_outcomes(&mut self) -> Vec<Outcome> {
        mem::take(&mut self.outcomes)
    }

    /// Push the current car weight to the weight sensor.
    pub fn sync_car_weight(&self, model: &mut dyn ElevatorModel) {
        self.queues.update_car_weight(model);
    }

    // ── Reactions ─────────────────────────────────────────────────────────

    /// Place `id` in its first queue and start it.
    pub fn inject(&mut self, id: PassengerId, now: SimTime, model: &mut dyn ElevatorModel) -> SimResult<()> {
        let (floor, hallway) = {
            let p = self.passenger(id).ok_or(SimError::UnknownPassenger(id))?;
            (p.info().start_floor, p.info().start_hallway)
        };
        self.queues.inject(id, floor, hallway, now, model)?;
        self.injected.push(id);
        info!(passenger = %id, floor, %hallway, "injected");
        self.react(id, now, model, |p, ctx| p.start(ctx))
    }

    /// Fire the action `wakeup` was scheduled for, if it is still current.
    pub fn fire(&mut self, wakeup: Wakeup, now: SimTime, model: &mut dyn ElevatorModel) -> SimResult<()> {
        self.react(wakeup.passenger, now, model, |p, ctx| p.fire(wakeup.category, wakeup.ticket, ctx))
    }

    /// Fan a broadcast out to the passengers it concerns.
    ///
    /// Members are visited in queue order, from a snapshot taken before the
    /// first delivery.
    pub fn route(&mut self, event: PassengerEvent, now: SimTime, model: &mut dyn ElevatorModel) -> SimResult<()> {
        debug!(%event, "routing event");
        match event {
            PassengerEvent::Motion { .. } => {
                self.queues.clear_door_queues();
                for id in &self.injected {
                    if let Some(p) = self.passengers.get_mut(id.index()) {
                        p.forget_door_queue();
                    }
                }
                let car = self.queues.car_queue().snapshot();
                self.broadcast(&car, event, now, model)
            }
            PassengerEvent::DoorOpening { hallway } => {
                if model.drive_state() != DriveState::Stopped {
                    debug!(%hallway, "door opening while moving ignored");
                    return Ok(());
                }
                let floor = model.current_floor();
                let hall = self.hall_snapshot(floor, hallway);
                self.broadcast(&hall, event, now, model)?;
                let car = self.queues.car_queue().snapshot();
                self.broadcast(&car, event, now, model)
            }
            PassengerEvent::Overweight => {
                let floor = model.current_floor();
                for hallway in Hallway::ALL {
                    if !model.door_is_closed(hallway) {
                        let hall = self.hall_snapshot(floor, hallway);
                        self.broadcast(&hall, event, now, model)?;
                    }
                }
                // Only the last one in has to get out.
                match self.queues.car_queue().back() {
                    Some(tail) => self.broadcast(&[tail], event, now, model),
                    None => Ok(()),
                }
            }
            PassengerEvent::PositionChanged { .. } => {
                let car = self.queues.car_queue().snapshot();
                self.broadcast(&car, event, now, model)
            }
        }
    }

    fn hall_snapshot(&self, floor: i32, hallway: Hallway) -> Vec<PassengerId> {
        self.queues
            .hall_queue(floor, hallway)
            .map(|q| q.snapshot())
            .unwrap_or_default()
    }

    fn broadcast(
        &mut self,
        ids:   &[PassengerId],
        event: PassengerEvent,
        now:   SimTime,
        model: &mut dyn ElevatorModel,
    ) -> SimResult<()> {
        for &id in ids {
            self.react(id, now, model, |p, ctx| p.on_event(&event, ctx))?;
        }
        Ok(())
    }

    /// Run one reaction of `id` and record any delivery it produced.
    fn react<F>(&mut self, id: PassengerId, now: SimTime, model: &mut dyn ElevatorModel, f: F) -> SimResult<()>
    where
        F: FnOnce(&mut Passenger, &mut PassengerContext<'_>) -> lift_passenger::PassengerResult<()>,
    {
        let mark = self.outcomes.len();
        let passenger = self
            .passengers
            .get_mut(id.index())
            .ok_or(SimError::UnknownPassenger(id))?;
        let mut ctx = PassengerContext {
            now,
            model,
            queues:          &mut self.queues,
            timing:          &self.timing,
            ignore_leveling: self.ignore_leveling,
            wakeups:         &mut self.wakeups,
            outcomes:        &mut self.outcomes,
        };
        f(passenger, &mut ctx)?;

        for outcome in &self.outcomes[mark..] {
            if let Outcome::Delivered { passenger, .. } = *outcome {
                self.injected.retain(|&p| p != passenger);
                self.delivered.push(passenger);
            }
        }
        Ok(())
    }

    // ── Observable surface ────────────────────────────────────────────────

    pub fn car_count(&self) -> usize {
        self.queues.car_queue().len()
    }

    /// Zero where the building has no landing.
    pub fn hall_count(&self, floor: i32, hallway: Hallway) -> usize {
        self.queues.hall_queue(floor, hallway).map_or(0, |q| q.len())
    }

    pub fn car_tooltip(&self) -> String {
        self.queues.car_queue().tooltip(|id| self.tooltip_line(id))
    }

    pub fn hall_tooltip(&self, floor: i32, hallway: Hallway) -> String {
        match self.queues.hall_queue(floor, hallway) {
            Some(q) => q.tooltip(|id| self.tooltip_line(id)),
            None => EMPTY_TOOLTIP.to_string(),
        }
    }

    fn tooltip_line(&self, id: PassengerId) -> String {
        self.passenger(id).map(Passenger::tooltip_line).unwrap_or_default()
    }

    /// First passenger in the car who would get out at `floor`,`hallway`.
    pub fn first_exit_blocker(&self, floor: i32, hallway: Hallway) -> Option<PassengerId> {
        self.queues
            .car_queue()
            .first_where(|id| self.passenger(id).is_some_and(|p| p.might_exit(floor, hallway)))
    }

    /// First passenger waiting at `floor`,`hallway` who would board a car
    /// showing `direction`.
    pub fn first_entry_blocker(&self, floor: i32, hallway: Hallway, direction: Direction) -> Option<PassengerId> {
        self.queues
            .hall_queue(floor, hallway)?
            .first_where(|id| self.passenger(id).is_some_and(|p| p.might_enter(floor, hallway, direction)))
    }

    /// One status line per passenger, in id order.
    pub fn status_lines(&self) -> Vec<String> {
        self.passengers.iter().map(Passenger::status_line).collect()
    }
}

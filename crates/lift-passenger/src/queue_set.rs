//! Every queue a passenger can be in, plus the reverse index and car weight.
//!
//! All membership changes go through `QueueSet` so the passenger -> queue
//! index and the car weight sensor are updated together with the queues.

#[cfg(not(feature = "fx-hash"))]
use std::collections::HashMap;

#[cfg(feature = "fx-hash")]
use rustc_hash::FxHashMap as HashMap;

use tracing::debug;

use lift_core::{Building, Hallway, PassengerId, SimTime};

use crate::{DoorQueue, DoorRequest, ElevatorModel, PASSENGER_WEIGHT, PassengerError, PassengerQueue, PassengerResult};

/// Which passenger queue a passenger is in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum QueueKey {
    Hall { floor: i32, hallway: Hallway },
    Car,
}

pub struct QueueSet {
    building:   Building,
    doors:      [DoorQueue; 2],
    /// Indexed by `Building::landing_index`; `None` where no landing exists.
    hall:       Vec<Option<PassengerQueue>>,
    car:        PassengerQueue,
    membership: HashMap<PassengerId, QueueKey>,
}

impl QueueSet {
    pub fn new(building: &Building) -> Self {
        let mut hall = vec![None; building.floors() as usize * 2];
        for (floor, hallway) in building.landings() {
            if let Some(i) = building.landing_index(floor, hallway) {
                hall[i] = Some(PassengerQueue::new());
            }
        }
        Self {
            building:   building.clone(),
            doors:      [DoorQueue::new(Hallway::Front), DoorQueue::new(Hallway::Back)],
            hall,
            car:        PassengerQueue::new(),
            membership: HashMap::default(),
        }
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    #[inline]
    pub fn door_queue(&self, hallway: Hallway) -> &DoorQueue {
        &self.doors[hallway.index()]
    }

    #[inline]
    pub fn door_queue_mut(&mut self, hallway: Hallway) -> &mut DoorQueue {
        &mut self.doors[hallway.index()]
    }

    /// `None` if the building has no landing there.
    pub fn hall_queue(&self, floor: i32, hallway: Hallway) -> Option<&PassengerQueue> {
        let i = self.building.landing_index(floor, hallway)?;
        self.hall[i].as_ref()
    }

    fn hall_queue_mut(&mut self, floor: i32, hallway: Hallway) -> Option<&mut PassengerQueue> {
        let i = self.building.landing_index(floor, hallway)?;
        self.hall[i].as_mut()
    }

    #[inline]
    pub fn car_queue(&self) -> &PassengerQueue {
        &self.car
    }

    pub fn queue(&self, key: QueueKey) -> Option<&PassengerQueue> {
        match key {
            QueueKey::Car => Some(&self.car),
            QueueKey::Hall { floor, hallway } => self.hall_queue(floor, hallway),
        }
    }

    fn queue_mut(&mut self, key: QueueKey) -> Option<&mut PassengerQueue> {
        match key {
            QueueKey::Car => Some(&mut self.car),
            QueueKey::Hall { floor, hallway } => self.hall_queue_mut(floor, hallway),
        }
    }

    /// The queue `p` is in, `None` before injection and after delivery.
    pub fn queue_of(&self, p: PassengerId) -> Option<QueueKey> {
        self.membership.get(&p).copied()
    }

    pub fn building(&self) -> &Building {
        &self.building
    }

    // ── Membership changes ────────────────────────────────────────────────

    /// Place a newly injected passenger: in the car for start floor 0 (time
    /// zero only), otherwise at the back of its start landing's hall queue.
    pub fn inject(
        &mut self,
        p:       PassengerId,
        floor:   i32,
        hallway: Hallway,
        now:     SimTime,
        model:   &mut dyn ElevatorModel,
    ) -> PassengerResult<()> {
        if self.membership.contains_key(&p) {
            return Err(PassengerError::AlreadyInjected { passenger: p });
        }
        let key = if floor == 0 {
            if now != SimTime::ZERO {
                return Err(PassengerError::CarInjectionAfterStart { passenger: p, at: now });
            }
            QueueKey::Car
        } else {
            QueueKey::Hall { floor, hallway }
        };
        self.insert(p, key)?;
        self.update_car_weight(model);
        Ok(())
    }

    /// Move `p` from its hall queue to the back of the car queue.
    pub fn join_car_queue(&mut self, p: PassengerId, model: &mut dyn ElevatorModel) -> PassengerResult<()> {
        debug!(passenger = %p, "joining car queue");
        self.detach(p)?;
        self.insert(p, QueueKey::Car)?;
        self.update_car_weight(model);
        Ok(())
    }

    /// Move `p` from the car to the back of the `floor`,`hallway` hall queue.
    ///
    /// Only legal while the car is at `floor` with that door not closed.
    pub fn join_hall_queue(
        &mut self,
        p:       PassengerId,
        floor:   i32,
        hallway: Hallway,
        model:   &mut dyn ElevatorModel,
    ) -> PassengerResult<()> {
        debug!(passenger = %p, floor, %hallway, "joining hall queue");
        let car_floor = model.current_floor();
        if car_floor != floor {
            return Err(PassengerError::UnreachableHallQueue { passenger: p, floor, hallway, car_floor });
        }
        if model.door_is_closed(hallway) {
            return Err(PassengerError::HallDoorClosed { passenger: p, floor, hallway });
        }
        self.detach(p)?;
        self.insert(p, QueueKey::Hall { floor, hallway })?;
        self.update_car_weight(model);
        Ok(())
    }

    /// Move `p` to the back of the queue it is already in.
    pub fn requeue(&mut self, p: PassengerId, model: &mut dyn ElevatorModel) -> PassengerResult<()> {
        debug!(passenger = %p, "moved to the back of its queue");
        let key = self.detach(p)?;
        self.insert(p, key)?;
        self.update_car_weight(model);
        Ok(())
    }

    /// Remove a delivered passenger from every queue and the index.
    pub fn finish(&mut self, p: PassengerId, model: &mut dyn ElevatorModel) -> PassengerResult<()> {
        self.detach(p)?;
        for door in &mut self.doors {
            door.remove(p);
        }
        self.update_car_weight(model);
        Ok(())
    }

    /// Queue `p` at the `hallway` door, first taking it out of the other
    /// door's queue.  A passenger waits at one door at a time.
    pub fn request_door(&mut self, p: PassengerId, hallway: Hallway, request: DoorRequest) -> PassengerResult<()> {
        for door in &mut self.doors {
            if door.hallway() != hallway {
                door.remove(p);
            }
        }
        let door = &mut self.doors[hallway.index()];
        match request {
            DoorRequest::Enter => door.request_enter(p),
            DoorRequest::Exit => door.request_exit(p),
        }
    }

    /// Empty both door queues.  Queued intents go stale once the car moves.
    pub fn clear_door_queues(&mut self) {
        for door in &mut self.doors {
            door.clear();
        }
    }

    fn detach(&mut self, p: PassengerId) -> PassengerResult<QueueKey> {
        let key = self
            .membership
            .remove(&p)
            .ok_or(PassengerError::NotQueued { passenger: p })?;
        if let Some(q) = self.queue_mut(key) {
            q.remove(p);
        }
        Ok(key)
    }

    fn insert(&mut self, p: PassengerId, key: QueueKey) -> PassengerResult<()> {
        let queue = match self.queue_mut(key) {
            Some(q) => q,
            None => {
                let (floor, hallway) = match key {
                    QueueKey::Hall { floor, hallway } => (floor, hallway),
                    QueueKey::Car => (0, Hallway::Front),
                };
                return Err(PassengerError::NoLanding { passenger: p, floor, hallway });
            }
        };
        queue.push_back(p);
        self.membership.insert(p, key);
        Ok(())
    }

    // ── Weight ────────────────────────────────────────────────────────────

    /// Total weight of the passengers in the car queue.
    pub fn car_weight(&self) -> i32 {
        self.car.iter().map(|_| PASSENGER_WEIGHT).sum()
    }

    /// Recompute the car weight from membership and push it to the weight
    /// sensor if it changed.
    pub fn update_car_weight(&self, model: &mut dyn ElevatorModel) {
        let weight = self.car_weight();
        if model.car_weight() != weight {
            debug!(weight, "car weight changed");
            model.set_car_weight(weight);
        }
    }
}

//! A sweeping shuttle car.
//!
//! The car keeps its direction while any lit call lies ahead, stops at every
//! floor with a lit call, opens the doors on the lit sides, and closes them
//! once the dwell time has passed with nobody in the doorway.  It has no
//! dispatcher beyond that.

use lift_core::{Building, Direction, Hallway, SimTime};
use lift_passenger::{DriveState, ElevatorModel, PASSENGER_WEIGHT, PassengerEvent};
use tracing::debug;

use crate::config::RunConfig;

const DOOR_OPEN_WIDTH: i32 = 50;

#[derive(Clone, Copy, Debug, PartialEq)]
enum Phase {
    /// Doors closed, car stopped.
    Idle { just_arrived: bool },
    /// Travelling; arrives at the next floor at `arrive`.
    Moving { arrive: SimTime },
    /// Doors open until at least `close_at`.
    Open { close_at: SimTime },
}

pub struct Shuttle {
    building:   Building,
    floor:      i32,
    sweep:      Direction,
    lantern:    Direction,
    phase:      Phase,
    door_width: [i32; 2],
    blocked:    [bool; 2],
    hall_lit:   Vec<(i32, Hallway, Direction)>,
    car_lit:    Vec<(i32, Hallway)>,
    weight:     i32,
    capacity:   i32,
    alarm:      bool,
    floor_time: SimTime,
    dwell:      SimTime,
}

impl Shuttle {
    pub fn new(building: Building, config: &RunConfig) -> Self {
        Self {
            building,
            floor:      1,
            sweep:      Direction::Up,
            lantern:    Direction::Stop,
            phase:      Phase::Idle { just_arrived: false },
            door_width: [0; 2],
            blocked:    [false; 2],
            hall_lit:   Vec::new(),
            car_lit:    Vec::new(),
            weight:     0,
            capacity:   config.capacity * PASSENGER_WEIGHT,
            alarm:      false,
            floor_time: millis(config.floor_secs),
            dwell:      millis(config.dwell_secs),
        }
    }

    /// Advance the car to `now` and return the broadcasts it produced.
    pub fn tick(&mut self, now: SimTime) -> Vec<PassengerEvent> {
        let mut events = Vec::new();
        match self.phase {
            Phase::Idle { just_arrived } => self.decide(now, just_arrived, &mut events),
            Phase::Moving { arrive } if now >= arrive => {
                let previous = self.floor;
                self.floor += if self.sweep == Direction::Up { 1 } else { -1 };
                events.push(PassengerEvent::PositionChanged { current: self.floor, previous });
                if self.has_call_at(self.floor) {
                    debug!(floor = self.floor, "stopping");
                    self.phase = Phase::Idle { just_arrived: true };
                    self.decide(now, true, &mut events);
                } else {
                    self.phase = Phase::Moving { arrive: now.offset(self.floor_time) };
                }
            }
            Phase::Moving { .. } => {}
            Phase::Open { close_at } => {
                if self.weight > self.capacity {
                    if !self.alarm {
                        self.alarm = true;
                        events.push(PassengerEvent::Overweight);
                    }
                    return events;
                }
                self.alarm = false;
                if now >= close_at && !self.blocked.iter().any(|&b| b) {
                    self.door_width = [0; 2];
                    self.phase = Phase::Idle { just_arrived: false };
                    debug!(floor = self.floor, "doors closed");
                } else if self.blocked.iter().any(|&b| b) {
                    self.phase = Phase::Open { close_at: close_at.max(now.offset(self.dwell)) };
                }
            }
        }
        events
    }

    fn decide(&mut self, now: SimTime, just_arrived: bool, events: &mut Vec<PassengerEvent>) {
        let elsewhere = self.has_call_elsewhere();
        if self.has_call_at(self.floor) && (just_arrived || !elsewhere) {
            self.open(now, events);
            return;
        }
        if !elsewhere {
            self.lantern = Direction::Stop;
            return;
        }
        if !self.has_call_beyond(self.sweep) {
            self.sweep = flip(self.sweep);
        }
        self.lantern = self.sweep;
        self.phase = Phase::Moving { arrive: now.offset(self.floor_time) };
        events.push(PassengerEvent::Motion { direction: self.sweep });
    }

    fn open(&mut self, now: SimTime, events: &mut Vec<PassengerEvent>) {
        let floor = self.floor;
        self.lantern = if self.hall_call(floor, self.sweep) || self.has_call_beyond(self.sweep) {
            self.sweep
        } else if self.hall_call(floor, flip(self.sweep)) || self.has_call_beyond(flip(self.sweep)) {
            flip(self.sweep)
        } else {
            Direction::Stop
        };
        if self.lantern != Direction::Stop {
            self.sweep = self.lantern;
        }

        for hallway in Hallway::ALL {
            if !self.building.has_landing(floor, hallway) || !self.has_call_at_side(floor, hallway) {
                continue;
            }
            let lantern = self.lantern;
            self.car_lit.retain(|&c| c != (floor, hallway));
            self.hall_lit
                .retain(|&(f, h, d)| !(f == floor && h == hallway && (lantern == Direction::Stop || d == lantern)));
            self.door_width[hallway.index()] = DOOR_OPEN_WIDTH;
            events.push(PassengerEvent::DoorOpening { hallway });
        }
        debug!(floor, lantern = %self.lantern, "doors opening");
        self.phase = Phase::Open { close_at: now.offset(self.dwell) };
    }

    // ── Call bookkeeping ──────────────────────────────────────────────────

    fn hall_call(&self, floor: i32, direction: Direction) -> bool {
        self.hall_lit.iter().any(|&(f, _, d)| f == floor && d == direction)
    }

    fn has_call_at_side(&self, floor: i32, hallway: Hallway) -> bool {
        self.car_lit.contains(&(floor, hallway)) || self.hall_lit.iter().any(|&(f, h, _)| f == floor && h == hallway)
    }

    fn has_call_at(&self, floor: i32) -> bool {
        self.call_floors().any(|f| f == floor)
    }

    fn has_call_elsewhere(&self) -> bool {
        self.call_floors().any(|f| f != self.floor)
    }

    fn has_call_beyond(&self, direction: Direction) -> bool {
        self.call_floors().any(|f| match direction {
            Direction::Up => f > self.floor,
            Direction::Down => f < self.floor,
            Direction::Stop => false,
        })
    }

    fn call_floors(&self) -> impl Iterator<Item = i32> + '_ {
        self.car_lit.iter().map(|&(f, _)| f).chain(self.hall_lit.iter().map(|&(f, _, _)| f))
    }
}

fn flip(direction: Direction) -> Direction {
    match direction {
        Direction::Up => Direction::Down,
        Direction::Down => Direction::Up,
        Direction::Stop => Direction::Stop,
    }
}

fn millis(secs: f64) -> SimTime {
    SimTime::from_millis((secs * 1000.0).round().max(0.0) as u64)
}

impl ElevatorModel for Shuttle {
    fn door_width(&self, hallway: Hallway) -> i32 {
        self.door_width[hallway.index()]
    }

    fn door_is_closed(&self, hallway: Hallway) -> bool {
        self.door_width[hallway.index()] == 0
    }

    fn door_block(&mut self, hallway: Hallway, _width: i32) -> bool {
        let i = hallway.index();
        if self.blocked[i] || self.door_width[i] == 0 {
            return false;
        }
        self.blocked[i] = true;
        true
    }

    fn door_unblock(&mut self, hallway: Hallway) {
        self.blocked[hallway.index()] = false;
    }

    fn current_floor(&self) -> i32 {
        match self.phase {
            Phase::Moving { .. } => -1,
            _ => self.floor,
        }
    }

    fn drive_state(&self) -> DriveState {
        match self.phase {
            Phase::Moving { .. } => DriveState::Moving,
            _ => DriveState::Stopped,
        }
    }

    fn is_level(&self) -> bool {
        !matches!(self.phase, Phase::Moving { .. })
    }

    fn indicated_floor(&self) -> i32 {
        self.floor
    }

    fn lantern_direction(&self) -> Direction {
        self.lantern
    }

    fn hall_light_lit(&self, floor: i32, hallway: Hallway, direction: Direction) -> bool {
        self.hall_lit.contains(&(floor, hallway, direction))
    }

    fn press_hall_button(&mut self, floor: i32, hallway: Hallway, direction: Direction, _duration: SimTime) {
        if !self.hall_light_lit(floor, hallway, direction) {
            self.hall_lit.push((floor, hallway, direction));
        }
    }

    fn car_light_lit(&self, floor: i32, hallway: Hallway) -> bool {
        self.car_lit.contains(&(floor, hallway))
    }

    fn press_car_button(&mut self, floor: i32, hallway: Hallway, _duration: SimTime) {
        if !self.car_light_lit(floor, hallway) {
            self.car_lit.push((floor, hallway));
        }
    }

    fn car_weight(&self) -> i32 {
        self.weight
    }

    fn set_car_weight(&mut self, weight: i32) {
        self.weight = weight;
    }

    fn overweight_alarm_ringing(&self) -> bool {
        self.alarm
    }
}

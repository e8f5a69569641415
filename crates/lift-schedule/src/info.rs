//! Immutable per-passenger journey descriptor.
//!
//! A `PassengerInfo` is built once, at load time, and never changes.  The
//! randomized traits come from the passenger's own [`PassengerRng`], so the
//! same seed and descriptor always produce the same passenger.

use std::fmt;

use lift_core::{Building, Direction, Hallway, PassengerRng, SimTime};

use crate::{ScheduleError, ScheduleResult};

// ── PassengerTraits ───────────────────────────────────────────────────────────

/// Randomized physical and behavioral parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PassengerTraits {
    /// How long the passenger holds a hall button.
    pub hall_press_time:          SimTime,
    /// How long the passenger holds a car button.
    pub car_press_time:           SimTime,
    /// Door opening needed to pass through, in the door model's width units.
    pub width:                    i32,
    /// Time to walk through a blocked door.
    pub door_traversal_delay:     SimTime,
    /// Time to back out after a failed traversal.
    pub door_backout_delay:       SimTime,
    /// Missed openings tolerated before boarding regardless of direction.
    pub missed_opening_threshold: u32,
}

impl PassengerTraits {
    /// Draw every trait from `rng` in a fixed order.
    pub fn sample(rng: &mut PassengerRng) -> Self {
        Self {
            hall_press_time:          random_millis(rng, 250, 1000),
            car_press_time:           random_millis(rng, 250, 1000),
            width:                    rng.gen_range(20..=45),
            door_traversal_delay:     random_millis(rng, 1000, 2000),
            door_backout_delay:       random_millis(rng, 2000, 4000),
            missed_opening_threshold: rng.gen_range(3..=5),
        }
    }
}

fn random_millis(rng: &mut PassengerRng, lo: u64, hi: u64) -> SimTime {
    SimTime::from_millis(rng.gen_range(lo..=hi))
}

// ── PassengerInfo ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PassengerInfo {
    pub injection_time:      SimTime,
    /// 0 means the passenger starts inside the car.
    pub start_floor:         i32,
    pub start_hallway:       Hallway,
    pub end_floor:           i32,
    pub end_hallway:         Hallway,
    /// Direction the passenger wants the car to travel.
    pub travel_direction:    Direction,
    /// Hall button the passenger presses.
    pub hall_call_direction: Direction,
    pub traits:              PassengerTraits,
}

impl PassengerInfo {
    /// Validate a journey against `building` and draw its random parameters.
    pub fn new(
        injection_time: SimTime,
        start: (i32, Hallway),
        end: (i32, Hallway),
        building: &Building,
        rng: &mut PassengerRng,
    ) -> ScheduleResult<Self> {
        let (start_floor, start_hallway) = start;
        let (end_floor, end_hallway) = end;
        validate(injection_time, start, end, building)?;

        let travel_direction = if start_floor == 0 {
            Direction::Stop
        } else {
            Direction::between(start_floor, end_floor)
        };
        let hall_call_direction = match travel_direction {
            Direction::Stop if start_floor == 0 => Direction::Stop,
            // Same-floor trip: the end floors only have one button.
            Direction::Stop if start_floor == 1 => Direction::Up,
            Direction::Stop if start_floor == building.floors() => Direction::Down,
            Direction::Stop => {
                if rng.gen_bool(0.5) { Direction::Down } else { Direction::Up }
            }
            d => d,
        };

        Ok(Self {
            injection_time,
            start_floor,
            start_hallway,
            end_floor,
            end_hallway,
            travel_direction,
            hall_call_direction,
            traits: PassengerTraits::sample(rng),
        })
    }

    /// Replace the sampled traits, e.g. to pin a width in a scenario.
    pub fn with_traits(mut self, traits: PassengerTraits) -> Self {
        self.traits = traits;
        self
    }

    /// `true` if the passenger is injected directly into the car.
    #[inline]
    pub fn starts_in_car(&self) -> bool {
        self.start_floor == 0
    }
}

fn validate(
    injection_time: SimTime,
    (start_floor, start_hallway): (i32, Hallway),
    (end_floor, end_hallway): (i32, Hallway),
    building: &Building,
) -> ScheduleResult<()> {
    let floors = building.floors();
    if start_floor < 0 || start_floor > floors {
        return Err(ScheduleError::Invalid(format!("start floor {start_floor} out of range")));
    }
    if start_floor == 0 && injection_time != SimTime::ZERO {
        return Err(ScheduleError::Invalid(format!(
            "start floor 0 is only allowed at time 0, not {injection_time}"
        )));
    }
    if start_floor != 0 && !building.has_landing(start_floor, start_hallway) {
        return Err(ScheduleError::Invalid(format!(
            "no landing at {start_floor},{start_hallway}"
        )));
    }
    if end_floor < 1 || end_floor > floors {
        return Err(ScheduleError::Invalid(format!("end floor {end_floor} out of range")));
    }
    if !building.has_landing(end_floor, end_hallway) {
        return Err(ScheduleError::Invalid(format!("no landing at {end_floor},{end_hallway}")));
    }
    Ok(())
}

impl fmt::Display for PassengerInfo {
    /// Descriptor form with an absolute time: `12.5s 3 FRONT 7 BACK`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.injection_time, self.start_floor, self.start_hallway, self.end_floor, self.end_hallway
        )
    }
}

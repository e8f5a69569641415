//! The `ElevatorModel` trait — everything a passenger can see or touch.

use lift_core::{Direction, Hallway, SimTime};

/// Coarse drive state as seen by passengers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DriveState {
    #[default]
    Stopped,
    Moving,
}

/// Simulated doors, buttons and sensors of one car and its hoistway.
///
/// Implemented by the physical model of the testbed, or by a scripted double
/// in tests.  Passengers only ever reach it through a
/// [`PassengerContext`][crate::PassengerContext], so there is no global
/// instance.
///
/// Floors are numbered from 1.  Floor readings return `-1` while the car is
/// between floors.
pub trait ElevatorModel {
    // ── Doors ─────────────────────────────────────────────────────────────

    /// Current opening of the `hallway` door, in passenger width units.
    fn door_width(&self, hallway: Hallway) -> i32;

    /// `true` only when the door is fully closed.
    fn door_is_closed(&self, hallway: Hallway) -> bool;

    /// Hold the door open while a passenger of `width` walks through.
    ///
    /// Returns `false` if another passenger already holds it.
    fn door_block(&mut self, hallway: Hallway, width: i32) -> bool;

    fn door_unblock(&mut self, hallway: Hallway);

    // ── Drive and position ────────────────────────────────────────────────

    /// Floor the car is stopped (or leveling) at, `-1` while moving.
    fn current_floor(&self) -> i32;

    fn drive_state(&self) -> DriveState;

    /// Both leveling sensors report the car aligned with the landing.
    fn is_level(&self) -> bool;

    /// Floor shown by the car position indicator.
    fn indicated_floor(&self) -> i32;

    /// Direction the car lantern currently shows.
    fn lantern_direction(&self) -> Direction;

    // ── Buttons ───────────────────────────────────────────────────────────

    fn hall_light_lit(&self, floor: i32, hallway: Hallway, direction: Direction) -> bool;

    fn press_hall_button(&mut self, floor: i32, hallway: Hallway, direction: Direction, duration: SimTime);

    fn car_light_lit(&self, floor: i32, hallway: Hallway) -> bool;

    fn press_car_button(&mut self, floor: i32, hallway: Hallway, duration: SimTime);

    // ── Weight ────────────────────────────────────────────────────────────

    fn car_weight(&self) -> i32;

    fn set_car_weight(&mut self, weight: i32);

    fn overweight_alarm_ringing(&self) -> bool;
}

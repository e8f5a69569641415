//! Plain data row types written by output backends.

use lift_core::{Hallway, SimTime};
use lift_passenger::Passenger;

/// One delivered passenger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeliveryRow {
    pub passenger_id:    u32,
    /// Seconds since the start of the run.
    pub injection_time:  f64,
    /// Seconds from injection to delivery.
    pub delivery_time:   f64,
    /// 0 for passengers that started in the car.
    pub start_floor:     i32,
    pub start_hallway:   Hallway,
    pub end_floor:       i32,
    pub end_hallway:     Hallway,
    pub satisfaction:    f64,
    pub deduction_count: u32,
}

impl DeliveryRow {
    /// Row for `p`, delivered at `now`.
    pub fn new(p: &Passenger, now: SimTime) -> Self {
        let info = p.info();
        let delivery_time = p.delivery_time().unwrap_or_else(|| now.since(info.injection_time));
        Self {
            passenger_id:    p.id().0,
            injection_time:  info.injection_time.as_secs_f64(),
            delivery_time:   delivery_time.as_secs_f64(),
            start_floor:     info.start_floor,
            start_hallway:   info.start_hallway,
            end_floor:       info.end_floor,
            end_hallway:     info.end_hallway,
            satisfaction:    p.score(),
            deduction_count: p.satisfaction().deductions().len() as u32,
        }
    }
}

/// One satisfaction deduction.
#[derive(Debug, Clone, PartialEq)]
pub struct DeductionRow {
    pub passenger_id: u32,
    /// Seconds since the start of the run.
    pub time:         f64,
    pub factor:       f64,
    pub reason:       String,
}

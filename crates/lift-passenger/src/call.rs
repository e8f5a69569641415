//! Call actions: keep the hall or car button lit until served.

use tracing::debug;

use crate::passenger::{Delay, REPEATED_PRESS};
use crate::{CallAction, Passenger, PassengerContext, PassengerResult, State};

impl Passenger {
    pub(crate) fn run_call_action(&mut self, action: CallAction, ctx: &mut PassengerContext<'_>) -> PassengerResult<()> {
        match action {
            CallAction::HallCallCheck => self.hall_call_check(ctx),
            CallAction::CarCallCheck => self.car_call_check(ctx),
        }
        Ok(())
    }

    /// Outside `WaitingInHall` the loop ends without re-arming.
    fn hall_call_check(&mut self, ctx: &mut PassengerContext<'_>) {
        if self.state != State::WaitingInHall {
            return;
        }
        let (floor, hallway, direction) = (self.info.start_floor, self.info.start_hallway, self.info.hall_call_direction);
        let door_open_here = ctx.model.current_floor() == floor && !ctx.model.door_is_closed(hallway);

        if !ctx.model.hall_light_lit(floor, hallway, direction) && !door_open_here {
            ctx.model.press_hall_button(floor, hallway, direction, self.info.traits.hall_press_time);
            self.hall_press_count += 1;
            debug!(passenger = %self.id, floor, %hallway, %direction, presses = self.hall_press_count, "pressing hall call");
            if self.hall_press_count > 1 {
                self.deduct(ctx, REPEATED_PRESS, "repeated hall call press");
            }
            self.schedule_call(ctx, CallAction::HallCallCheck, Delay::CallRecheck);
        } else {
            self.schedule_call(ctx, CallAction::HallCallCheck, Delay::CallCheck);
        }
    }

    /// Outside `WaitingInCar` the loop ends without re-arming.
    fn car_call_check(&mut self, ctx: &mut PassengerContext<'_>) {
        if self.state != State::WaitingInCar {
            return;
        }
        let (floor, hallway) = (self.info.end_floor, self.info.end_hallway);

        if !ctx.model.car_light_lit(floor, hallway) && ctx.model.door_is_closed(hallway) {
            ctx.model.press_car_button(floor, hallway, self.info.traits.car_press_time);
            self.car_press_count += 1;
            debug!(passenger = %self.id, floor, %hallway, presses = self.car_press_count, "pressing car call");
            if self.car_press_count > 1 {
                self.deduct(ctx, REPEATED_PRESS, "repeated car call press");
            }
            self.schedule_call(ctx, CallAction::CarCallCheck, Delay::CallRecheck);
        } else {
            self.schedule_call(ctx, CallAction::CarCallCheck, Delay::CallCheck);
        }
    }
}

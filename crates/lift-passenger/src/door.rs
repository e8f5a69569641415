//! Door actions: boarding, alighting, backing out, and overweight handling.
//!
//! Entering and every exit back at the start floor use the start hallway's
//! door and door queue; exiting at the destination uses the end hallway's.

use tracing::debug;

use lift_core::Direction;

use crate::passenger::{ABORT, Delay, FAIL_TO_EXIT, LANTERN_CHANGE, MISSED_OPENINGS};
use crate::{CallAction, DoorAction, DoorRequest, Passenger, PassengerContext, PassengerResult, State};

impl Passenger {
    pub(crate) fn run_door_action(&mut self, action: DoorAction, ctx: &mut PassengerContext<'_>) -> PassengerResult<()> {
        match action {
            DoorAction::CheckHallDoor         => self.check_hall_door(ctx),
            DoorAction::FinishCarEnter        => self.finish_car_enter(ctx),
            DoorAction::CheckLanternDirection => self.check_lantern_direction(ctx),
            DoorAction::BeginExitAtStart      => self.begin_exit_at_start(ctx),
            DoorAction::FinishExitAtStart     => self.finish_exit_at_start(ctx),
            DoorAction::ExitAtStartAbort      => self.exit_at_start_abort(ctx),
            DoorAction::EnterAbort            => self.enter_abort(ctx),
            DoorAction::CheckCarDoor          => self.check_car_door(ctx),
            DoorAction::ExitCar               => self.exit_car(ctx),
            DoorAction::ExitAbort             => self.exit_abort(ctx),
            DoorAction::OverweightExitStart   => self.overweight_exit_start(ctx),
            DoorAction::OverweightExitFinish  => self.overweight_exit_finish(ctx),
            DoorAction::OverweightBackoff     => self.overweight_backoff(ctx),
        }
    }

    // ── Boarding ──────────────────────────────────────────────────────────

    fn check_hall_door(&mut self, ctx: &mut PassengerContext<'_>) -> PassengerResult<()> {
        self.expect_state("CheckHallDoor", State::WaitingInHall)?;
        let hallway = self.info.start_hallway;
        let lantern = ctx.model.lantern_direction();

        // Queue while the lantern suits us; drop out if it turns against us
        // after the door started opening.
        if self.direction_compatible(lantern) && ctx.model.current_floor() == self.info.start_floor {
            self.join_door_queue(ctx, hallway, DoorRequest::Enter)?;
        } else {
            self.leave_door_queue(ctx);
        }

        if self.may_traverse(ctx, hallway) {
            if ctx.model.door_block(hallway, self.info.traits.width) {
                debug!(passenger = %self.id, %hallway, width = self.info.traits.width, "blocking door to enter");
                self.expected_direction = lantern;
                self.set_state(ctx, State::Entering);
                self.schedule_door(ctx, DoorAction::FinishCarEnter, Delay::Traversal);
            } else {
                self.schedule_door(ctx, DoorAction::CheckHallDoor, Delay::DoorCheck);
            }
        } else if !ctx.model.door_is_closed(hallway) {
            self.schedule_door(ctx, DoorAction::CheckHallDoor, Delay::DoorCheck);
        } else {
            if self.queued_at.is_some() {
                // Wanted in but never got a turn, e.g. behind a wide passenger.
                self.leave_door_queue(ctx);
            } else {
                self.missed_openings += 1;
                debug!(
                    passenger = %self.id,
                    floor = self.info.start_floor,
                    %hallway,
                    missed = self.missed_openings,
                    "door closed without a compatible direction"
                );
            }
            self.schedule_call(ctx, CallAction::HallCallCheck, Delay::Backoff);
        }
        Ok(())
    }

    fn finish_car_enter(&mut self, ctx: &mut PassengerContext<'_>) -> PassengerResult<()> {
        self.expect_state("FinishCarEnter", State::Entering)?;
        let hallway = self.info.start_hallway;

        if ctx.model.door_width(hallway) >= self.info.traits.width {
            ctx.queues.join_car_queue(self.id, &mut *ctx.model)?;
            self.leave_door_queue(ctx);
            ctx.model.door_unblock(hallway);
            self.set_state(ctx, State::WaitingInCar);
            debug!(passenger = %self.id, floor = self.info.start_floor, %hallway, "entered the car");

            if self.missed_openings > self.info.traits.missed_opening_threshold {
                let reason = format!(
                    "car came by {} times without a lantern compatible with {}; boarded anyway",
                    self.missed_openings, self.info.travel_direction
                );
                self.deduct(ctx, MISSED_OPENINGS, reason);
                self.expected_direction = Direction::Stop;
            }
            self.resume_in_car(ctx);
        } else {
            self.abort_count += 1;
            self.deduct(ctx, ABORT, "failed to enter car");
            self.set_state(ctx, State::EnterBackout);
            self.schedule_door(ctx, DoorAction::EnterAbort, Delay::Backout);
        }
        Ok(())
    }

    fn enter_abort(&mut self, ctx: &mut PassengerContext<'_>) -> PassengerResult<()> {
        self.expect_state("EnterAbort", State::EnterBackout)?;
        let hallway = self.info.start_hallway;
        ctx.model.door_unblock(hallway);
        self.leave_door_queue(ctx);
        debug!(passenger = %self.id, aborts = self.abort_count, "returned to the hall after failing to enter");
        self.set_state(ctx, State::WaitingInHall);
        ctx.queues.requeue(self.id, &mut *ctx.model)?;
        self.schedule_door(ctx, DoorAction::CheckHallDoor, Delay::DoorCheck);
        self.schedule_call(ctx, CallAction::HallCallCheck, Delay::CallCheck);
        self.hall_press_count = 0;
        Ok(())
    }

    // ── Early exit when the lantern turns ─────────────────────────────────

    fn check_lantern_direction(&mut self, ctx: &mut PassengerContext<'_>) -> PassengerResult<()> {
        self.expect_state("CheckLanternDirection", State::WaitingInCar)?;
        let lantern = ctx.model.lantern_direction();
        if self.expected_direction != Direction::Stop && lantern != self.info.travel_direction {
            let reason = format!(
                "car lantern changed from {} to {lantern} after boarding",
                self.expected_direction
            );
            self.deduct(ctx, LANTERN_CHANGE, reason);
            self.schedule_door(ctx, DoorAction::BeginExitAtStart, Delay::Null);
        } else if !ctx.model.door_is_closed(self.info.start_hallway) {
            self.schedule_door(ctx, DoorAction::CheckLanternDirection, Delay::DoorCheck);
        }
        // Door closed with the lantern unchanged: ride along.
        Ok(())
    }

    fn begin_exit_at_start(&mut self, ctx: &mut PassengerContext<'_>) -> PassengerResult<()> {
        self.expect_state("BeginExitAtStart", State::WaitingInCar)?;
        let hallway = self.info.start_hallway;

        if ctx.model.door_is_closed(hallway) {
            // Missed the chance to get back out; ride to the destination.
            debug!(passenger = %self.id, "door closed before exiting at start floor");
            self.leave_door_queue(ctx);
            self.schedule_call(ctx, CallAction::CarCallCheck, Delay::CallCheck);
            return Ok(());
        }
        self.expect_floor("BeginExitAtStart", self.info.start_floor, ctx.model.current_floor())?;
        self.join_door_queue(ctx, hallway, DoorRequest::Exit)?;

        if self.may_traverse(ctx, hallway) && ctx.model.door_block(hallway, self.info.traits.width) {
            debug!(passenger = %self.id, %hallway, "blocking door to exit at start floor");
            self.set_state(ctx, State::Exiting);
            self.schedule_door(ctx, DoorAction::FinishExitAtStart, Delay::Traversal);
        } else {
            self.schedule_door(ctx, DoorAction::BeginExitAtStart, Delay::DoorCheck);
        }
        Ok(())
    }

    fn finish_exit_at_start(&mut self, ctx: &mut PassengerContext<'_>) -> PassengerResult<()> {
        self.expect_state("FinishExitAtStart", State::Exiting)?;
        self.expect_floor("FinishExitAtStart", self.info.start_floor, ctx.model.current_floor())?;
        let (floor, hallway) = (self.info.start_floor, self.info.start_hallway);

        if ctx.model.door_width(hallway) >= self.info.traits.width {
            ctx.queues.join_hall_queue(self.id, floor, hallway, &mut *ctx.model)?;
            ctx.model.door_unblock(hallway);
            self.leave_door_queue(ctx);
            self.set_state(ctx, State::WaitingInHall);
            self.schedule_call(ctx, CallAction::HallCallCheck, Delay::CallCheck);
            debug!(passenger = %self.id, floor, %hallway, "exited car at start floor");
        } else {
            self.abort_count += 1;
            self.deduct(ctx, ABORT, format!("failed to exit car at {floor},{hallway}"));
            self.set_state(ctx, State::ExitBackout);
            self.schedule_door(ctx, DoorAction::ExitAtStartAbort, Delay::Backout);
        }
        Ok(())
    }

    fn exit_at_start_abort(&mut self, ctx: &mut PassengerContext<'_>) -> PassengerResult<()> {
        self.expect_state("ExitAtStartAbort", State::ExitBackout)?;
        ctx.model.door_unblock(self.info.start_hallway);
        self.leave_door_queue(ctx);
        debug!(passenger = %self.id, "returned to the car after failing to exit at start floor");
        self.set_state(ctx, State::WaitingInCar);
        ctx.queues.requeue(self.id, &mut *ctx.model)?;
        self.schedule_door(ctx, DoorAction::BeginExitAtStart, Delay::DoorCheck);
        Ok(())
    }

    // ── Alighting at the destination ──────────────────────────────────────

    fn check_car_door(&mut self, ctx: &mut PassengerContext<'_>) -> PassengerResult<()> {
        self.expect_state("CheckCarDoor", State::WaitingInCar)?;
        let hallway = self.info.end_hallway;

        if ctx.model.indicated_floor() != self.info.end_floor {
            // Not our floor.  The door opening cancelled the car call, so
            // restart it.
            self.schedule_call(ctx, CallAction::CarCallCheck, Delay::CallCheck);
            return Ok(());
        }
        self.join_door_queue(ctx, hallway, DoorRequest::Exit)?;

        if self.may_traverse(ctx, hallway) {
            if ctx.model.door_block(hallway, self.info.traits.width) {
                debug!(passenger = %self.id, %hallway, "blocking door to exit");
                self.set_state(ctx, State::Exiting);
                self.schedule_door(ctx, DoorAction::ExitCar, Delay::Traversal);
            } else {
                self.schedule_door(ctx, DoorAction::CheckCarDoor, Delay::DoorCheck);
            }
        } else if !ctx.model.door_is_closed(hallway) {
            self.schedule_door(ctx, DoorAction::CheckCarDoor, Delay::DoorCheck);
        } else {
            self.missed_openings += 1;
            let reason = format!(
                "failed to exit at {},{} even though the door opened",
                self.info.end_floor, hallway
            );
            self.deduct(ctx, FAIL_TO_EXIT, reason);
            self.leave_door_queue(ctx);
            self.expected_direction = Direction::Stop;
            self.schedule_call(ctx, CallAction::CarCallCheck, Delay::CallCheck);
        }
        Ok(())
    }

    fn exit_car(&mut self, ctx: &mut PassengerContext<'_>) -> PassengerResult<()> {
        self.expect_state("ExitCar", State::Exiting)?;
        let hallway = self.info.end_hallway;

        if ctx.model.door_width(hallway) >= self.info.traits.width {
            ctx.model.door_unblock(hallway);
            self.leave_door_queue(ctx);
            self.finish(ctx)?;
        } else {
            self.abort_count += 1;
            let reason = format!("failed to exit car at {},{hallway}", self.info.end_floor);
            self.deduct(ctx, ABORT, reason);
            self.set_state(ctx, State::ExitBackout);
            self.schedule_door(ctx, DoorAction::ExitAbort, Delay::Backout);
        }
        Ok(())
    }

    fn exit_abort(&mut self, ctx: &mut PassengerContext<'_>) -> PassengerResult<()> {
        self.expect_state("ExitAbort", State::ExitBackout)?;
        ctx.model.door_unblock(self.info.end_hallway);
        self.leave_door_queue(ctx);
        debug!(passenger = %self.id, aborts = self.abort_count, "returned to the car after failing to exit");
        self.set_state(ctx, State::WaitingInCar);
        ctx.queues.requeue(self.id, &mut *ctx.model)?;
        self.schedule_door(ctx, DoorAction::CheckCarDoor, Delay::DoorCheck);
        self.schedule_call(ctx, CallAction::CarCallCheck, Delay::CallCheck);
        self.car_press_count = 0;
        Ok(())
    }

    // ── Overweight ────────────────────────────────────────────────────────

    fn overweight_exit_start(&mut self, ctx: &mut PassengerContext<'_>) -> PassengerResult<()> {
        self.expect_state("OverweightExitStart", State::OverweightExiting)?;
        self.expect_floor("OverweightExitStart", self.info.start_floor, ctx.model.indicated_floor())?;
        let hallway = self.info.start_hallway;
        self.join_door_queue(ctx, hallway, DoorRequest::Exit)?;

        if self.may_traverse(ctx, hallway) {
            if ctx.model.door_block(hallway, self.info.traits.width) {
                debug!(passenger = %self.id, %hallway, "blocking door to leave overweight car");
                self.schedule_door(ctx, DoorAction::OverweightExitFinish, Delay::Traversal);
            } else {
                self.schedule_door(ctx, DoorAction::OverweightExitStart, Delay::DoorCheck);
            }
        } else if !ctx.model.overweight_alarm_ringing() {
            // Someone else got out first; stay aboard.
            self.leave_door_queue(ctx);
            self.set_state(ctx, State::WaitingInCar);
            self.resume_in_car(ctx);
        } else {
            self.schedule_door(ctx, DoorAction::OverweightExitStart, Delay::DoorCheck);
        }
        Ok(())
    }

    fn overweight_exit_finish(&mut self, ctx: &mut PassengerContext<'_>) -> PassengerResult<()> {
        self.expect_state("OverweightExitFinish", State::OverweightExiting)?;
        let (floor, hallway) = (self.info.start_floor, self.info.start_hallway);

        if ctx.model.door_width(hallway) >= self.info.traits.width {
            ctx.queues.join_hall_queue(self.id, floor, hallway, &mut *ctx.model)?;
            ctx.model.door_unblock(hallway);
            self.leave_door_queue(ctx);
            self.set_state(ctx, State::OverweightBackoff);
            debug!(passenger = %self.id, floor, %hallway, "left the overweight car");
            self.schedule_door(ctx, DoorAction::OverweightBackoff, Delay::DoorCheck);
        } else {
            self.abort_count += 1;
            self.deduct(ctx, ABORT, format!("failed to exit overweight car at {floor},{hallway}"));
            // Still holding the door; keep trying.
            self.schedule_door(ctx, DoorAction::OverweightExitFinish, Delay::Backout);
        }
        self.call_action.cancel();
        Ok(())
    }

    fn overweight_backoff(&mut self, ctx: &mut PassengerContext<'_>) -> PassengerResult<()> {
        self.expect_state("OverweightBackoff", State::OverweightBackoff)?;
        if ctx.model.door_is_closed(self.info.start_hallway) {
            debug!(passenger = %self.id, "door closed, backing off before calling again");
            self.set_state(ctx, State::WaitingInHall);
            self.schedule_call(ctx, CallAction::HallCallCheck, Delay::Backoff);
            self.hall_press_count = 0;
        } else {
            self.call_action.cancel();
            self.schedule_door(ctx, DoorAction::OverweightBackoff, Delay::DoorCheck);
        }
        Ok(())
    }
}

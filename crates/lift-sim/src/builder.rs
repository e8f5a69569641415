//! Fluent builder for constructing a [`Sim`].

use std::path::PathBuf;

use lift_core::{SimClock, SimConfig, SimTime};
use lift_passenger::ElevatorModel;
use lift_schedule::{PassengerInfo, TimerQueue, load_passengers};

use crate::{PassengerHandler, Sim, SimError, SimResult, Timer};

/// Fluent builder for [`Sim<M>`].
///
/// # Required inputs
///
/// - [`SimConfig`]: seed, building, timing, end time
/// - `M: ElevatorModel`: the doors, buttons and sensors passengers use
///
/// # Optional inputs (have defaults)
///
/// | Method                   | Default         |
/// |--------------------------|-----------------|
/// | `.passengers(v)`         | No passengers   |
/// | `.descriptor_file(path)` | None            |
///
/// Passengers from a descriptor file are appended after those given with
/// `.passengers`, and ids follow that order.
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, car)
///     .descriptor_file("tests/up_peak.pass")
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<M: ElevatorModel> {
    config:     SimConfig,
    model:      M,
    passengers: Vec<PassengerInfo>,
    descriptor: Option<PathBuf>,
}

impl<M: ElevatorModel> SimBuilder<M> {
    pub fn new(config: SimConfig, model: M) -> Self {
        Self { config, model, passengers: Vec::new(), descriptor: None }
    }

    /// Supply already-built passengers.
    pub fn passengers(mut self, passengers: Vec<PassengerInfo>) -> Self {
        self.passengers = passengers;
        self
    }

    /// Load passengers from a descriptor file at build time, using the
    /// configured seed and building.
    pub fn descriptor_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.descriptor = Some(path.into());
        self
    }

    /// Validate inputs, schedule every injection, and return a ready-to-run
    /// [`Sim`].
    pub fn build(mut self) -> SimResult<Sim<M>> {
        let mut passengers = self.passengers;
        if let Some(path) = &self.descriptor {
            passengers.extend(load_passengers(path, &self.config.building, self.config.seed)?);
        }

        // ── Validate ──────────────────────────────────────────────────────
        let building = &self.config.building;
        for (i, info) in passengers.iter().enumerate() {
            if info.starts_in_car() {
                if info.injection_time != SimTime::ZERO {
                    return Err(SimError::Config(format!(
                        "passenger {i} starts in the car but is injected at {}",
                        info.injection_time
                    )));
                }
            } else if !building.has_landing(info.start_floor, info.start_hallway) {
                return Err(SimError::Config(format!(
                    "passenger {i} starts at {},{} which has no landing",
                    info.start_floor, info.start_hallway
                )));
            }
            if !building.has_landing(info.end_floor, info.end_hallway) {
                return Err(SimError::Config(format!(
                    "passenger {i} ends at {},{} which has no landing",
                    info.end_floor, info.end_hallway
                )));
            }
        }

        // ── Schedule injections ───────────────────────────────────────────
        let mut timers = TimerQueue::new();
        let handler = PassengerHandler::new(passengers, &self.config);
        for p in handler.passengers() {
            timers.push(p.info().injection_time, Timer::Inject(p.id()));
        }
        handler.sync_car_weight(&mut self.model);

        Ok(Sim {
            clock: SimClock::new(),
            config: self.config,
            model: self.model,
            handler,
            timers,
        })
    }
}

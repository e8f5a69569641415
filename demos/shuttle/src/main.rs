//! shuttle — a single car sweeping the reference building.
//!
//! Drives the passenger simulator with a scripted shuttle model: the car
//! moves in 100 ms steps, passengers react in between, and deliveries and
//! satisfaction deductions are written as CSV.  Prints the end-of-run
//! statistics report.
//!
//! ```text
//! cargo run -p shuttle -- [config.json]
//! RUST_LOG=debug cargo run -p shuttle
//! ```

mod config;
mod shuttle;

use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use lift_core::{Building, SimConfig, SimTime};
use lift_output::{CsvWriter, SimOutputObserver};
use lift_schedule::load_passengers_reader;
use lift_sim::{SimBuilder, SimObserver, StatsReport};

use config::RunConfig;
use shuttle::Shuttle;

// ── Constants ─────────────────────────────────────────────────────────────────

/// Model update period.
const STEP: SimTime = SimTime::from_millis(100);

// ── Built-in trips ────────────────────────────────────────────────────────────

// Reference building: 8 floors, front landings everywhere except floor 2,
// back landings at 1, 2 and 7.
const TRIPS: &str = "\
; time   start      end
0s       0 FRONT    7 BACK    ; already aboard
0s       1 FRONT    6 FRONT
2s       3 FRONT    8 FRONT
+3s      7 BACK     1 BACK
+4s      5 FRONT    2 BACK
+5s      8 FRONT    3 FRONT
+6s      2 BACK     7 FRONT
+1s      6 FRONT    1 FRONT
+20s     1 BACK     5 FRONT
";

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let run = match std::env::args().nth(1) {
        Some(path) => RunConfig::load(Path::new(&path))?,
        None => RunConfig::default(),
    };
    info!(?run, "starting shuttle run");

    // 1. Config and passengers.
    let config = SimConfig {
        seed:     run.seed,
        building: Building::reference(),
        end_time: Some(SimTime::from_secs(run.end_time_secs)),
        ..SimConfig::default()
    };
    let mut builder = SimBuilder::new(config.clone(), Shuttle::new(config.building.clone(), &run));
    builder = match &run.descriptor {
        Some(path) => builder.descriptor_file(path),
        None => builder.passengers(load_passengers_reader(TRIPS.as_bytes(), &config.building, run.seed)?),
    };
    let mut sim = builder.build()?;
    println!("Passengers: {}  |  Seed: {}  |  End: {}", sim.handler.total(), run.seed, config.end_time());

    // 2. Output.
    std::fs::create_dir_all(&run.output_dir)?;
    let mut obs = SimOutputObserver::new(CsvWriter::new(&run.output_dir)?);

    // 3. Run: passengers first, then the car, every step.
    let t0 = Instant::now();
    let end = config.end_time();
    while !sim.handler.is_finished() && sim.now() < end {
        let t = sim.now().offset(STEP).min(end);
        sim.run_until(t, &mut obs)?;
        for event in sim.model_mut().tick(t) {
            sim.deliver(event, &mut obs)?;
        }
    }
    obs.on_sim_end(sim.now(), &sim.handler);
    info!(now = %sim.now(), elapsed_ms = t0.elapsed().as_millis() as u64, "run finished");

    if let Some(e) = obs.take_error() {
        warn!(error = %e, "output incomplete");
    }

    // 4. Report.
    let report = StatsReport::from_handler(&sim.handler)?;
    println!();
    print!("{}", report.full_text());
    println!();
    println!("Output written to {}", run.output_dir.display());
    Ok(())
}

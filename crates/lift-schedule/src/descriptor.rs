//! Passenger descriptor parsing.
//!
//! # Format
//!
//! Five whitespace-separated fields per line:
//!
//! ```text
//! <injection time> <start floor> <start side> <end floor> <end side>
//! ```
//!
//! | Field      | Values                                                     |
//! |------------|------------------------------------------------------------|
//! | time       | `SimTime` text (`0s`, `1.5s`, `250ms`); `+` = relative     |
//! | start floor| `0` (already in the car, time 0 only) or `1..=floors`      |
//! | sides      | `FRONT` or `BACK`                                          |
//! | end floor  | `1..=floors`                                               |
//!
//! Everything after a `;` is a comment.  Blank lines are skipped.

use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use lift_core::{Building, Hallway, PassengerId, PassengerRng, SimTime};

use crate::{PassengerInfo, ScheduleError, ScheduleResult};

/// Parse one descriptor line into a `PassengerInfo`.
///
/// `latest` is the latest injection time seen so far; a `+`-prefixed time is
/// added to it.
pub fn parse_descriptor(
    line: &str,
    latest: SimTime,
    building: &Building,
    rng: &mut PassengerRng,
) -> ScheduleResult<PassengerInfo> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let [time, start_floor, start_hallway, end_floor, end_hallway] = words.as_slice() else {
        return Err(ScheduleError::Parse(format!(
            "expected 5 fields (injection time, start floor, start side, end floor, end side), got {}",
            words.len()
        )));
    };

    let offset: SimTime = time.parse()?;
    let injection_time = if time.starts_with('+') { latest + offset } else { offset };

    PassengerInfo::new(
        injection_time,
        (parse_floor(start_floor)?, start_hallway.parse::<Hallway>()?),
        (parse_floor(end_floor)?, end_hallway.parse::<Hallway>()?),
        building,
        rng,
    )
}

fn parse_floor(s: &str) -> ScheduleResult<i32> {
    s.parse::<i32>()
        .map_err(|_| ScheduleError::Parse(format!("invalid floor {s:?}")))
}

/// Load every passenger in a descriptor file.
///
/// Passenger `i` (in file order) draws its traits from
/// `PassengerRng::new(seed, PassengerId(i))`.
pub fn load_passengers(path: &Path, building: &Building, seed: u64) -> ScheduleResult<Vec<PassengerInfo>> {
    let file = std::fs::File::open(path).map_err(ScheduleError::Io)?;
    load_passengers_reader(file, building, seed)
}

/// Like [`load_passengers`] but accepts any `Read` source.
pub fn load_passengers_reader<R: Read>(
    reader: R,
    building: &Building,
    seed: u64,
) -> ScheduleResult<Vec<PassengerInfo>> {
    let mut passengers = Vec::new();
    let mut latest = SimTime::ZERO;

    for (i, line) in BufReader::new(reader).lines().enumerate() {
        let line = line?;
        let text = match line.split_once(';') {
            Some((before, _)) => before,
            None => &line,
        };
        if text.trim().is_empty() {
            continue;
        }

        let id = PassengerId::try_from(passengers.len())
            .map_err(|_| ScheduleError::Parse("too many passengers".into()))?;
        let mut rng = PassengerRng::new(seed, id);
        let info = parse_descriptor(text, latest, building, &mut rng).map_err(|e| {
            ScheduleError::AtLine { line: i + 1, source: Box::new(e) }
        })?;

        latest = latest.max(info.injection_time);
        passengers.push(info);
    }

    Ok(passengers)
}

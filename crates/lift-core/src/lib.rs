//! `lift-core` — foundational types for the lift passenger simulator.
//!
//! This crate is a dependency of every other `lift-*` crate.  It has no
//! `lift-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `PassengerId`                                         |
//! | [`hallway`]     | `Hallway`, `Direction`                                |
//! | [`building`]    | `Building` landing table                              |
//! | [`time`]        | `SimTime`, `SimClock`, `SimConfig`, `PassengerTiming` |
//! | [`rng`]         | `PassengerRng` (per-passenger, seed-derived)          |
//! | [`error`]       | `LiftError`, `LiftResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod building;
pub mod error;
pub mod hallway;
pub mod ids;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use building::Building;
pub use error::{LiftError, LiftResult};
pub use hallway::{Direction, Hallway};
pub use ids::PassengerId;
pub use rng::PassengerRng;
pub use time::{PassengerTiming, SimClock, SimConfig, SimTime};

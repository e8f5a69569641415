//! `lift-schedule` — who arrives when, and the timer queue that fires it.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                |
//! |-----------------|---------------------------------------------------------|
//! | [`info`]        | `PassengerInfo`, `PassengerTraits`                      |
//! | [`descriptor`]  | `parse_descriptor`, `load_passengers`, `load_passengers_reader` |
//! | [`timer_queue`] | `TimerQueue<T>` (`BTreeMap<SimTime, VecDeque<T>>`)      |
//! | [`error`]       | `ScheduleError`, `ScheduleResult<T>`                    |
//!
//! # Descriptor format (summary)
//!
//! One passenger per line, five whitespace-separated fields:
//!
//! ```text
//! ; time   start  side   end  side
//! 0s       3      FRONT  7    BACK
//! +5s      1      BACK   8    FRONT
//! ```
//!
//! A `+` time is relative to the latest injection time seen so far.

pub mod descriptor;
pub mod error;
pub mod info;
pub mod timer_queue;

#[cfg(test)]
mod tests;

pub use descriptor::{load_passengers, load_passengers_reader, parse_descriptor};
pub use error::{ScheduleError, ScheduleResult};
pub use info::{PassengerInfo, PassengerTraits};
pub use timer_queue::TimerQueue;

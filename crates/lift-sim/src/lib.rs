//! `lift-sim` — virtual-time loop and passenger bookkeeping.
//!
//! # Event loop
//!
//! ```text
//! until every passenger is delivered, no timer remains, or end_time:
//!   ① Pop      — take the earliest timer (ties fire in insertion order).
//!   ② Advance  — move the clock to the timer's time.
//!   ③ React    — Inject(p)   → place p in its first queue and start it
//!                Action(w)   → fire p's pending action if w's ticket is
//!                              still current
//!   ④ Flush    — new wakeups become timers; outcomes go to the observer.
//! ```
//!
//! Broadcast events from the elevator model enter through [`Sim::deliver`]
//! and are fanned out by the [`PassengerHandler`] in queue order.
//!
//! # Modules
//!
//! | Module       | Contents                                        |
//! |--------------|-------------------------------------------------|
//! | [`handler`]  | `PassengerHandler`: arena, queues, routing      |
//! | [`sim`]      | `Sim<M>`, `Timer`                               |
//! | [`builder`]  | `SimBuilder<M>`                                 |
//! | [`observer`] | `SimObserver`, `NoopObserver`                   |
//! | [`stats`]    | `StatsReport`, `DeliverySummary`                |
//! | [`error`]    | `SimError`, `SimResult<T>`                      |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use lift_core::SimConfig;
//! use lift_sim::{NoopObserver, SimBuilder, StatsReport};
//!
//! let mut sim = SimBuilder::new(SimConfig::default(), my_car)
//!     .descriptor_file("passengers.pass")
//!     .build()?;
//! sim.run(&mut NoopObserver)?;
//! println!("{}", StatsReport::from_handler(&sim.handler)?);
//! ```

pub mod builder;
pub mod error;
pub mod handler;
pub mod observer;
pub mod sim;
pub mod stats;


pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use handler::PassengerHandler;
pub use observer::{NoopObserver, SimObserver};
pub use sim::{Sim, Timer};
pub use stats::{DeliverySummary, StatsReport};

//! Virtual time model.
//!
//! # Design
//!
//! Time is an integer nanosecond count since the start of the run.  Using an
//! integer as the canonical unit keeps all scheduling arithmetic exact (no
//! floating-point drift) and makes timer ordering a plain integer compare.
//!
//! Human-facing text (descriptor files, reports) uses unit-suffixed
//! durations such as `500ms`, `12.5s` or `+3s`; see [`SimTime`]'s `FromStr`.

use std::fmt;
use std::str::FromStr;

use crate::{Building, LiftError};

const NANOS_PER_MICRO: u64 = 1_000;
const NANOS_PER_MILLI: u64 = 1_000_000;
const NANOS_PER_SEC:   u64 = 1_000_000_000;

// ── SimTime ───────────────────────────────────────────────────────────────────

/// A point in (or span of) virtual time, in nanoseconds.
///
/// The same type is used for absolute instants and for offsets; `SimTime`
/// values are only ever added, never multiplied.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimTime(pub u64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0);

    /// Never reached.  Used as the "no end time" sentinel.
    pub const FOREVER: SimTime = SimTime(u64::MAX);

    #[inline]
    pub const fn from_nanos(ns: u64) -> SimTime {
        SimTime(ns)
    }

    #[inline]
    pub const fn from_millis(ms: u64) -> SimTime {
        SimTime(ms * NANOS_PER_MILLI)
    }

    #[inline]
    pub const fn from_secs(s: u64) -> SimTime {
        SimTime(s * NANOS_PER_SEC)
    }

    #[inline]
    pub fn as_nanos(self) -> u64 {
        self.0
    }

    #[inline]
    pub fn as_millis(self) -> u64 {
        self.0 / NANOS_PER_MILLI
    }

    #[inline]
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / NANOS_PER_SEC as f64
    }

    /// The instant `delay` after `self`, saturating at `FOREVER`.
    #[inline]
    pub fn offset(self, delay: SimTime) -> SimTime {
        SimTime(self.0.saturating_add(delay.0))
    }

    /// Time elapsed from `earlier` to `self` (zero if `earlier` is later).
    #[inline]
    pub fn since(self, earlier: SimTime) -> SimTime {
        SimTime(self.0.saturating_sub(earlier.0))
    }
}

impl std::ops::Add for SimTime {
    type Output = SimTime;
    #[inline]
    fn add(self, rhs: SimTime) -> SimTime {
        self.offset(rhs)
    }
}

impl std::ops::Sub for SimTime {
    type Output = SimTime;
    #[inline]
    fn sub(self, rhs: SimTime) -> SimTime {
        self.since(rhs)
    }
}

impl fmt::Display for SimTime {
    /// Fractional seconds with trailing zeros trimmed: `0s`, `1.25s`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == SimTime::FOREVER {
            return f.write_str("FOREVER");
        }
        let secs = self.0 / NANOS_PER_SEC;
        let frac = self.0 % NANOS_PER_SEC;
        if frac == 0 {
            write!(f, "{secs}s")
        } else {
            let digits = format!("{frac:09}");
            write!(f, "{secs}.{}s", digits.trim_end_matches('0'))
        }
    }
}

/// Nanoseconds per unit, for the unit suffixes accepted by `FromStr`.
fn unit_nanos(unit: &str) -> Option<u64> {
    match unit.to_ascii_lowercase().as_str() {
        "ns" => Some(1),
        "us" => Some(NANOS_PER_MICRO),
        "ms" => Some(NANOS_PER_MILLI),
        "s"  => Some(NANOS_PER_SEC),
        "m"  => Some(60 * NANOS_PER_SEC),
        "h"  => Some(3_600 * NANOS_PER_SEC),
        _    => None,
    }
}

impl FromStr for SimTime {
    type Err = LiftError;

    /// Parse `<int>[.<frac>]<unit>` with an optional leading `+` and optional
    /// whitespace before the unit, or one of `ZERO`, `FOREVER`, `INFINITE`.
    ///
    /// The `+` is accepted and ignored here; whether a time is relative is
    /// decided by the caller.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || LiftError::Parse(format!("invalid time {s:?}"));

        let text = s.trim();
        let text = text.strip_prefix('+').unwrap_or(text).trim_start();
        match text.to_ascii_uppercase().as_str() {
            "ZERO" => return Ok(SimTime::ZERO),
            "FOREVER" | "INFINITE" => return Ok(SimTime::FOREVER),
            _ => {}
        }

        let split = text
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .ok_or_else(bad)?;
        let (number, unit) = text.split_at(split);
        let per_unit = unit_nanos(unit.trim()).ok_or_else(bad)?;

        let (whole, frac) = match number.split_once('.') {
            Some((w, f)) => (w, f),
            None => (number, ""),
        };
        if whole.is_empty() || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(bad());
        }
        let whole: u128 = whole.parse().map_err(|_| bad())?;

        let mut total = whole.checked_mul(per_unit as u128).ok_or_else(bad)?;
        if !frac.is_empty() {
            // Digits past nanosecond resolution cannot contribute.
            let frac = &frac[..frac.len().min(18)];
            let numer: u128 = frac.parse().map_err(|_| bad())?;
            total += numer * per_unit as u128 / 10u128.pow(frac.len() as u32);
        }
        u64::try_from(total).map(SimTime).map_err(|_| bad())
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// The current virtual time.  Only the scheduler advances it.
#[derive(Clone, Debug, Default)]
pub struct SimClock {
    now: SimTime,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Move the clock forward to `t`.  Time never runs backwards; an earlier
    /// `t` leaves the clock unchanged.
    #[inline]
    pub fn advance_to(&mut self, t: SimTime) {
        debug_assert!(t >= self.now, "clock moved backwards: {} -> {}", self.now, t);
        self.now = self.now.max(t);
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={}", self.now)
    }
}

// ── PassengerTiming ───────────────────────────────────────────────────────────

/// Fixed polling and backoff periods shared by every passenger.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PassengerTiming {
    /// Re-check period for door actions.  Default: 100 ms.
    pub door_check:   SimTime,
    /// Re-check period for call buttons when no press was made.  Default: 200 ms.
    pub call_check:   SimTime,
    /// Re-check period after a button press.  Default: 500 ms.
    pub call_recheck: SimTime,
    /// Near-immediate follow-up, used to chain actions.  Default: 1 ms.
    pub null_period:  SimTime,
    /// Delay before retrying hall calls after a missed or refused boarding.
    /// Default: 10 s.
    pub backoff:      SimTime,
}

impl Default for PassengerTiming {
    fn default() -> Self {
        Self {
            door_check:   SimTime::from_millis(100),
            call_check:   SimTime::from_millis(200),
            call_recheck: SimTime::from_millis(500),
            null_period:  SimTime::from_millis(1),
            backoff:      SimTime::from_secs(10),
        }
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// Typically built in code or loaded from a JSON file by the application
/// crate and handed to `SimBuilder`.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Master RNG seed.  The same seed always produces identical passengers.
    pub seed: u64,

    /// When set, passengers board and exit without waiting for the level
    /// sensor.
    pub ignore_leveling: bool,

    /// Which landings exist.
    pub building: Building,

    pub timing: PassengerTiming,

    /// Hard stop for runs that never deliver everyone.  `None` runs until the
    /// last passenger is delivered or no timers remain.
    pub end_time: Option<SimTime>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed:            0,
            ignore_leveling: false,
            building:        Building::default(),
            timing:          PassengerTiming::default(),
            end_time:        None,
        }
    }
}

impl SimConfig {
    /// The instant the run stops at, `FOREVER` when unbounded.
    #[inline]
    pub fn end_time(&self) -> SimTime {
        self.end_time.unwrap_or(SimTime::FOREVER)
    }
}

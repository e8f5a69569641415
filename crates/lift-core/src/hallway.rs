//! Hallway and direction enums shared by every crate.

use std::fmt;
use std::str::FromStr;

use crate::LiftError;

// ── Hallway ───────────────────────────────────────────────────────────────────

/// One of the two physical sides of the car.  Each side has its own door,
/// its own door queue, and (per floor) an optional landing.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Hallway {
    Front,
    Back,
}

impl Hallway {
    /// Both sides, in replication order.
    pub const ALL: [Hallway; 2] = [Hallway::Front, Hallway::Back];

    /// Dense index for per-side arrays.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Hallway::Front => 0,
            Hallway::Back  => 1,
        }
    }

    pub fn opposite(self) -> Hallway {
        match self {
            Hallway::Front => Hallway::Back,
            Hallway::Back  => Hallway::Front,
        }
    }

    /// Descriptor token for this side.
    pub fn as_str(self) -> &'static str {
        match self {
            Hallway::Front => "FRONT",
            Hallway::Back  => "BACK",
        }
    }
}

impl fmt::Display for Hallway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Hallway {
    type Err = LiftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FRONT" => Ok(Hallway::Front),
            "BACK"  => Ok(Hallway::Back),
            other   => Err(LiftError::Parse(format!(
                "invalid hallway {other:?}: expected \"FRONT\" or \"BACK\""
            ))),
        }
    }
}

// ── Direction ─────────────────────────────────────────────────────────────────

/// Travel direction, as shown by the car lantern, commanded to the drive, or
/// wanted by a passenger.  `Stop` doubles as "no preference".
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    Up,
    Down,
    #[default]
    Stop,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up   => "UP",
            Direction::Down => "DOWN",
            Direction::Stop => "STOP",
        }
    }

    /// Direction of travel from `from` to `to`; `Stop` when equal.
    pub fn between(from: i32, to: i32) -> Direction {
        match from.cmp(&to) {
            std::cmp::Ordering::Less    => Direction::Up,
            std::cmp::Ordering::Greater => Direction::Down,
            std::cmp::Ordering::Equal   => Direction::Stop,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

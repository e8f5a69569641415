//! Broadcast events the handler fans out to passenger queues.

use std::fmt;

use lift_core::{Direction, Hallway};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PassengerEvent {
    /// The drive started moving in `direction`.
    Motion { direction: Direction },
    /// The `hallway` door left the fully closed position.
    DoorOpening { hallway: Hallway },
    /// The car weight alarm started ringing.
    Overweight,
    /// The car position indicator changed from `previous` to `current`.
    PositionChanged { current: i32, previous: i32 },
}

impl fmt::Display for PassengerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PassengerEvent::Motion { direction } => write!(f, "motion {direction}"),
            PassengerEvent::DoorOpening { hallway } => write!(f, "door opening {hallway}"),
            PassengerEvent::Overweight => f.write_str("overweight alarm"),
            PassengerEvent::PositionChanged { current, previous } => {
                write!(f, "position indicator {previous} -> {current}")
            }
        }
    }
}

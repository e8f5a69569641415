use std::fmt;

/// Passenger lifecycle state.  Transitions happen only inside action
/// execution or event handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum State {
    /// Created but not yet injected.
    #[default]
    Init,
    WaitingInHall,
    Entering,
    EnterBackout,
    WaitingInCar,
    Exiting,
    ExitBackout,
    OverweightExiting,
    OverweightBackoff,
    Done,
}

impl State {
    pub fn as_str(self) -> &'static str {
        match self {
            State::Init              => "INIT",
            State::WaitingInHall     => "WAITING_IN_HALL",
            State::Entering          => "ENTERING",
            State::EnterBackout      => "ENTER_BACKOUT",
            State::WaitingInCar      => "WAITING_IN_CAR",
            State::Exiting           => "EXITING",
            State::ExitBackout       => "EXIT_BACKOUT",
            State::OverweightExiting => "OVERWEIGHT_EXITING",
            State::OverweightBackoff => "OVERWEIGHT_BACKOFF",
            State::Done              => "DONE",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

use lift_core::PassengerId;
use lift_passenger::PassengerError;
use lift_schedule::ScheduleError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("{0} is not a known passenger")]
    UnknownPassenger(PassengerId),

    #[error("passenger error: {0}")]
    Passenger(#[from] PassengerError),

    #[error("schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    /// Bookkeeping no longer matches passenger state.
    #[error("inconsistent simulation state: {0}")]
    Inconsistent(String),
}

pub type SimResult<T> = Result<T, SimError>;

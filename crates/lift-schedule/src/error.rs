use thiserror::Error;

use lift_core::LiftError;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("descriptor parse error: {0}")]
    Parse(String),

    /// The fields parsed but describe an impossible passenger.
    #[error("invalid passenger: {0}")]
    Invalid(String),

    #[error("line {line}: {source}")]
    AtLine {
        line:   usize,
        #[source]
        source: Box<ScheduleError>,
    },

    #[error(transparent)]
    Core(#[from] LiftError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;

use chrono::NaiveDateTime;
use thiserror::Error;

/// Error depicting errors that occur while building a typical meteorological year
///
#[derive(Debug, Error)]
#[error("error while building typical meteorological year: {0}")]
pub struct BuildError(pub String);

/// Error depicting errors in the ordering of time series samples
///
#[derive(Debug, Error)]
pub enum TimeValuesError {
    #[error("time value not strictly increasing at {0}")]
    NotIncreasing(NaiveDateTime),
}

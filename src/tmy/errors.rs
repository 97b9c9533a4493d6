use thiserror::Error;
use crate::models::{MeteorologicalVariable, Quantity};

#[derive(Debug, Error)]
pub enum TmyError {
    #[error("insufficient data for {variable}: no candidate year for month {month}")]
    InsufficientData { variable: MeteorologicalVariable, month: u32 },
    #[error("no wind speed samples to select the {variable} year for month {month}")]
    MissingWindSpeed { variable: MeteorologicalVariable, month: u32 },
    #[error("missing {0} series")]
    MissingSeries(Quantity),
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("error while assembling year: {0}")]
    Assembly(String),
}

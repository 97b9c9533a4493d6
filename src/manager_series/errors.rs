use thiserror::Error;
use crate::errors::TimeValuesError;

#[derive(Debug, Error)]
pub enum SeriesError {
    #[error("invalid file pattern {0}")]
    PatternError(String),
    #[error("no files matching {0}")]
    NoFiles(String),
    #[error("error reading series file: {0}")]
    ReadError(String),
    #[error("error parsing series file: {0}")]
    ParseError(String),
    #[error("{0}")]
    NotIncreasing(#[from] TimeValuesError),
}

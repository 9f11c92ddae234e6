use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum XoError {
    #[error("Input file does not exist: {0}")]
    InputFileNotFound(String),
    #[error("Unknown chromosome {0}: no entry in the chromosome length table")]
    UnknownChromosome(u32),
    #[error("Invalid chromosome pattern '{0}': {1}")]
    InvalidChromosomePattern(String, String),
    #[error("Invalid range: min {0} is greater than max {1}")]
    InvalidRange(u64, u64),
    #[error("Missing column in input table: {0}")]
    MissingColumn(String),
    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

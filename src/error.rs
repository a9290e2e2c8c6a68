//! Error types for the agrifert crate

use thiserror::Error;

/// Result type alias for agrifert operations
pub type Result<T> = std::result::Result<T, AgrifertError>;

/// Main error type for the agrifert crate
#[derive(Error, Debug)]
pub enum AgrifertError {
    #[error("Data error: {0}")]
    DataError(String),

    #[error("Unknown {column}: '{value}' was not seen in the training data")]
    UnknownCategory { column: String, value: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Training error: {0}")]
    TrainingError(String),

    #[error("Model not fitted")]
    ModelNotFitted,

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<polars::error::PolarsError> for AgrifertError {
    fn from(err: polars::error::PolarsError) -> Self {
        AgrifertError::DataError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for AgrifertError {
    fn from(err: ndarray::ShapeError) -> Self {
        AgrifertError::ShapeError {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}

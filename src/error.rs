//! Error types for the session core.

use thiserror::Error;

/// Failures of the stress classifier. These abort classification entirely;
/// no partial result is produced.
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("The temperature should be between 26 and 38")]
    OutOfRangeInput,

    #[error("No samples were collected for classification")]
    InsufficientData,

    #[error("Model output mismatch: {0}")]
    ModelMismatch(String),

    #[error("Model failure: {0}")]
    Model(#[source] anyhow::Error),
}

/// Errors surfaced by `SessionController` operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Logging is not currently active")]
    NotActive,

    #[error("No data available")]
    NoData,

    #[error("Gaze tracker failure: {0}")]
    Gaze(#[source] anyhow::Error),

    #[error("Failed to persist candidate record: {0}")]
    Persistence(#[source] anyhow::Error),

    #[error("Persisting candidate record timed out after {0} ms")]
    PersistenceTimeout(u64),
}

/// Returned by a gaze tracker's `stop` when no capture is running.
#[derive(Debug, Error)]
#[error("Gaze logging is not currently active")]
pub struct GazeNotActive;

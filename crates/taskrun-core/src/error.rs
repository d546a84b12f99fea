//! Core domain errors.
//!
//! The resolvers never fail; these cover decoding and validating snapshots.

use thiserror::Error;

/// Core domain errors for TaskRun snapshots.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Invalid input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

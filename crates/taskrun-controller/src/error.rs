//! Controller errors.

use thiserror::Error;

use taskrun_core::{CoreError, RunKey};

/// Controller errors.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Another worker already holds this snapshot.
    #[error("Reconcile already in flight: {0}")]
    AlreadyInFlight(RunKey),

    /// Snapshot could not be decoded or failed validation.
    #[error(transparent)]
    Core(#[from] CoreError),
}

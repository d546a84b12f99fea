//! In-process admission keyed by run key.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use taskrun_core::RunKey;

use crate::error::ControllerError;

/// Set of run keys currently being reconciled.
///
/// Admits at most one [`AdmitGuard`] per key at a time. Cloning shares the
/// same set.
#[derive(Debug, Clone, Default)]
pub struct InflightRuns {
    keys: Arc<Mutex<HashSet<RunKey>>>,
}

impl InflightRuns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `key`, failing if another guard already holds it.
    pub fn try_admit(&self, key: &RunKey) -> Result<AdmitGuard, ControllerError> {
        if !self.lock().insert(key.clone()) {
            return Err(ControllerError::AlreadyInFlight(key.clone()));
        }
        Ok(AdmitGuard {
            runs: self.clone(),
            key: key.clone(),
        })
    }

    pub fn contains(&self, key: &RunKey) -> bool {
        self.lock().contains(key)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // The set stays consistent across a panic in another holder, so a
    // poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, HashSet<RunKey>> {
        self.keys.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Releases its key when dropped.
#[derive(Debug)]
pub struct AdmitGuard {
    runs: InflightRuns,
    key: RunKey,
}

impl AdmitGuard {
    pub fn key(&self) -> &RunKey {
        &self.key
    }
}

impl Drop for AdmitGuard {
    fn drop(&mut self) {
        self.runs.lock().remove(&self.key);
    }
}

//! Controller configuration.

/// Controller configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Service account used when a TaskRun names none.
    pub default_service_account: String,

    /// Maximum number of snapshots reconciled concurrently.
    pub workers: usize,

    /// Capacity of the reconcile queue.
    pub queue_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_service_account: "default".to_string(),
            workers: 4,
            queue_capacity: 64,
        }
    }
}

//! Queue-driven reconcile driver.

use std::sync::Arc;

use tokio::sync::{mpsc, Semaphore};
use tracing::{info, warn};

use taskrun_core::{RunKey, TaskRun};

use crate::config::Config;
use crate::error::ControllerError;
use crate::inflight::InflightRuns;
use crate::plan::{plan, ReconcileAction};

/// Result of reconciling one snapshot.
#[derive(Debug)]
pub struct ReconcileOutcome {
    pub key: RunKey,
    pub name: String,
    pub namespace: String,
    pub result: Result<ReconcileAction, ControllerError>,
}

/// Admits snapshots by run key and plans their next step.
pub struct Reconciler {
    config: Config,
    inflight: InflightRuns,
}

impl Reconciler {
    /// Create a new Reconciler wrapped in Arc.
    pub fn new(config: Config) -> Arc<Self> {
        Arc::new(Self {
            config,
            inflight: InflightRuns::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Keys currently being reconciled.
    pub fn inflight(&self) -> &InflightRuns {
        &self.inflight
    }

    /// Reconcile one snapshot, rejecting it if it fails validation or the
    /// same instance is already being reconciled.
    pub fn reconcile(&self, tr: &TaskRun) -> Result<ReconcileAction, ControllerError> {
        tr.validate()?;
        let _guard = self.inflight.try_admit(tr.run_key()).map_err(|e| {
            warn!(
                taskrun = %tr.metadata.name,
                run_key = %tr.run_key(),
                "Skipping reconcile - already in flight"
            );
            e
        })?;
        Ok(plan(Some(tr), &self.config))
    }

    /// Drain `queue`, reconciling up to `config.workers` snapshots at a
    /// time, and send every outcome to `results`. Returns once the queue
    /// is closed and all spawned work has finished.
    pub async fn run(
        self: Arc<Self>,
        mut queue: mpsc::Receiver<Arc<TaskRun>>,
        results: mpsc::Sender<ReconcileOutcome>,
    ) {
        let permits = Arc::new(Semaphore::new(self.config.workers.max(1)));
        let mut handles = Vec::new();

        info!(workers = self.config.workers, "Reconciler started");

        while let Some(tr) = queue.recv().await {
            let Ok(permit) = permits.clone().acquire_owned().await else {
                break;
            };
            let reconciler = self.clone();
            let results = results.clone();

            handles.push(tokio::spawn(async move {
                let outcome = ReconcileOutcome {
                    key: tr.run_key().clone(),
                    name: tr.metadata.name.clone(),
                    namespace: tr.metadata.namespace.clone(),
                    result: reconciler.reconcile(&tr),
                };
                drop(permit);

                if results.send(outcome).await.is_err() {
                    warn!("Failed to send reconcile outcome - receiver dropped");
                }
            }));
        }

        for handle in handles {
            if let Err(e) = handle.await {
                warn!(error = %e, "Reconcile task panicked");
            }
        }

        info!("Reconciler stopped");
    }
}

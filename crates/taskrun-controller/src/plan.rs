//! Decides what a reconcile should do with a TaskRun snapshot.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use taskrun_core::membership::{label_key, TASK_RUN_LABEL_KEY};
use taskrun_core::{ObjectReference, RunState, TaskRun};

use crate::config::Config;

/// Next step for a reconcile.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ReconcileAction {
    /// The snapshot is gone; drop any cached state.
    Forget,
    /// Terminal. Report to the owning PipelineRun, if any.
    Finalize {
        state: RunState,
        notify_pipeline_run: Option<String>,
    },
    /// Cancellation requested; tear down the pod.
    Cancel { pod: ObjectReference },
    /// Not started yet; create the pod.
    CreatePod(PodPlan),
    /// Running; keep watching the pod.
    Observe { pod: ObjectReference },
}

/// Everything needed to create the pod for a TaskRun.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PodPlan {
    pub pod: ObjectReference,
    pub service_account: String,
    /// Claim shared with the owning PipelineRun.
    pub workspace_claim: Option<String>,
    pub labels: HashMap<String, String>,
}

/// Plan the next step for a (possibly absent) snapshot.
pub fn plan(tr: Option<&TaskRun>, config: &Config) -> ReconcileAction {
    let Some(tr) = tr else {
        debug!("TaskRun snapshot missing, forgetting");
        return ReconcileAction::Forget;
    };

    let name = tr.metadata.name.as_str();
    let namespace = tr.metadata.namespace.as_str();

    let action = if tr.is_done() {
        ReconcileAction::Finalize {
            state: tr.state(),
            notify_pipeline_run: tr.pipeline_run_owner().map(|owner| owner.name.clone()),
        }
    } else if tr.is_cancelled() {
        ReconcileAction::Cancel {
            pod: tr.build_pod_ref(),
        }
    } else if !tr.has_started() {
        ReconcileAction::CreatePod(pod_plan(tr, config))
    } else {
        ReconcileAction::Observe {
            pod: tr.build_pod_ref(),
        }
    };

    debug!(
        taskrun = %name,
        namespace = %namespace,
        run_key = %tr.run_key(),
        state = %tr.state(),
        ?action,
        "Planned reconcile"
    );

    action
}

fn pod_plan(tr: &TaskRun, config: &Config) -> PodPlan {
    let service_account = match tr.service_account_name() {
        "" => config.default_service_account.clone(),
        sa => sa.to_string(),
    };

    let workspace_claim = Some(tr.pipeline_run_pvc_name()).filter(|claim| !claim.is_empty());

    let mut labels = tr.metadata.labels.clone();
    labels.insert(label_key(TASK_RUN_LABEL_KEY), tr.metadata.name.clone());

    PodPlan {
        pod: tr.build_pod_ref(),
        service_account,
        workspace_claim,
        labels,
    }
}

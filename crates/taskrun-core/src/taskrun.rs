//! TaskRun resource types.

use serde::{Deserialize, Serialize};

use crate::condition::{Condition, Conditions};
use crate::error::CoreError;
use crate::identity::RunKey;
use crate::meta::{ObjectMeta, OwnerReference, Time};

/// Value of `spec.status` that requests cancellation.
pub const TASK_RUN_SPEC_STATUS_CANCELLED: &str = "TaskRunCancelled";

/// Maximum length of a TaskRun name (it doubles as the pod name).
pub const MAX_NAME_LENGTH: usize = 63;

/// Execution record of a single task.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TaskRun {
    #[serde(default)]
    pub metadata: ObjectMeta,

    #[serde(default)]
    pub spec: TaskRunSpec,

    #[serde(default)]
    pub status: TaskRunStatus,

    #[serde(skip)]
    pub(crate) run_key: RunKey,
}

/// Desired state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRunSpec {
    /// Task to execute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_ref: Option<TaskRef>,

    /// Service account the pod runs as.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub service_account_name: String,

    /// Legacy alias of `service_account_name`.
    #[serde(
        default,
        rename = "serviceAccount",
        skip_serializing_if = "String::is_empty"
    )]
    pub deprecated_service_account: String,

    /// Status override; `TaskRunCancelled` requests cancellation.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub status: String,
}

/// Reference to a Task definition by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRef {
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
}

/// Observed state. Written only by the reconciling controller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRunStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<Time>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_time: Option<Time>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub pod_name: String,

    #[serde(default, skip_serializing_if = "Conditions::is_empty")]
    pub conditions: Conditions,
}

/// A copy is a distinct in-memory instance and gets its own run key.
impl Clone for TaskRun {
    fn clone(&self) -> Self {
        Self {
            metadata: self.metadata.clone(),
            spec: self.spec.clone(),
            status: self.status.clone(),
            run_key: RunKey::generate(),
        }
    }
}

impl TaskRunStatus {
    /// Stamp the start time and set Succeeded=Unknown, leaving anything
    /// already present alone.
    pub fn initialize_conditions(&mut self) {
        if self.start_time.is_none() {
            self.start_time = Some(Time::now());
        }
        if self.conditions.succeeded().is_none() {
            self.conditions.set(Condition::running("Started", ""));
        }
    }

    fn stamp_completion(&mut self) {
        if self.completion_time.is_none() {
            self.completion_time = Some(Time::now());
        }
    }

    pub fn mark_running(&mut self, reason: impl Into<String>, message: impl Into<String>) {
        self.conditions.set(Condition::running(reason, message));
    }

    pub fn mark_succeeded(&mut self, reason: impl Into<String>, message: impl Into<String>) {
        self.conditions.set(Condition::succeeded(reason, message));
        self.stamp_completion();
    }

    pub fn mark_failed(&mut self, reason: impl Into<String>, message: impl Into<String>) {
        self.conditions.set(Condition::failed(reason, message));
        self.stamp_completion();
    }
}

impl TaskRun {
    /// Create a TaskRun with empty spec and status.
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            metadata: ObjectMeta::new(name, namespace),
            ..Self::default()
        }
    }

    /// Decode a snapshot from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        serde_json::from_str(json).map_err(|e| CoreError::Serialization(e.to_string()))
    }

    /// Encode this snapshot as pretty JSON.
    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(self).map_err(|e| CoreError::Serialization(e.to_string()))
    }

    /// Check that the object is acceptable for admission.
    pub fn validate(&self) -> Result<(), CoreError> {
        let name = &self.metadata.name;
        if name.is_empty() {
            return Err(CoreError::InvalidInput("metadata.name is required".to_string()));
        }
        if name.len() > MAX_NAME_LENGTH {
            return Err(CoreError::InvalidInput(format!(
                "metadata.name '{name}' exceeds {MAX_NAME_LENGTH} characters"
            )));
        }
        if name.contains('.') {
            return Err(CoreError::InvalidInput(format!(
                "metadata.name '{name}' must not contain dots"
            )));
        }
        if let Some(task_ref) = &self.spec.task_ref {
            if task_ref.name.is_empty() {
                return Err(CoreError::InvalidInput("spec.taskRef.name is required".to_string()));
            }
        }
        Ok(())
    }

    /// Builder method to add a label.
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.labels.insert(key.into(), value.into());
        self
    }

    /// Builder method to append an owner reference.
    pub fn with_owner_reference(mut self, owner: OwnerReference) -> Self {
        self.metadata.owner_references.push(owner);
        self
    }

    /// Builder method to reference a Task by name.
    pub fn with_task_ref(mut self, name: impl Into<String>) -> Self {
        self.spec.task_ref = Some(TaskRef {
            name: name.into(),
            kind: String::new(),
        });
        self
    }

    /// Builder method to set the service account name.
    pub fn with_service_account_name(mut self, name: impl Into<String>) -> Self {
        self.spec.service_account_name = name.into();
        self
    }

    /// Builder method to set the deprecated service account field.
    pub fn with_deprecated_service_account(mut self, name: impl Into<String>) -> Self {
        self.spec.deprecated_service_account = name.into();
        self
    }

    /// Builder method to request cancellation.
    pub fn with_cancel_requested(mut self) -> Self {
        self.spec.status = TASK_RUN_SPEC_STATUS_CANCELLED.to_string();
        self
    }

    /// Builder method to replace the observed status.
    pub fn with_status(mut self, status: TaskRunStatus) -> Self {
        self.status = status;
        self
    }

    /// Builder method to set a single condition.
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.status.conditions.set(condition);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"{
        "metadata": {
            "name": "build-1",
            "namespace": "ci",
            "labels": {"tekton.dev/pipeline": "build"},
            "ownerReferences": [{
                "apiVersion": "tekton.dev/v1alpha1",
                "kind": "PipelineRun",
                "name": "build-run",
                "controller": true
            }]
        },
        "spec": {
            "taskRef": {"name": "compile"},
            "serviceAccount": "legacy",
            "status": "TaskRunCancelled"
        },
        "status": {
            "startTime": "2019-05-01T12:00:00Z",
            "conditions": [{"type": "Succeeded", "status": "Unknown", "reason": "Running"}]
        }
    }"#;

    #[test]
    fn test_from_json() {
        let tr = TaskRun::from_json(SNAPSHOT).unwrap();
        assert_eq!(tr.metadata.name, "build-1");
        assert_eq!(tr.metadata.owner_references[0].kind, "PipelineRun");
        assert_eq!(tr.spec.deprecated_service_account, "legacy");
        assert_eq!(tr.spec.status, TASK_RUN_SPEC_STATUS_CANCELLED);
        assert_eq!(tr.spec.task_ref.as_ref().unwrap().name, "compile");
        assert!(tr.status.start_time.is_some());
        assert!(tr.status.conditions.succeeded().unwrap().is_unknown());
    }

    #[test]
    fn test_from_json_with_other_conditions() {
        let json = r#"{
            "metadata": {"name": "build-1", "namespace": "ci"},
            "status": {
                "startTime": "2019-05-01T12:00:00Z",
                "conditions": [
                    {"type": "Succeeded", "status": "True"},
                    {"type": "Ready", "status": "True"}
                ]
            }
        }"#;
        let tr = TaskRun::from_json(json).unwrap();
        assert!(tr.is_done());
        assert!(tr.has_started());
        assert_eq!(tr.status.conditions.len(), 2);
    }

    #[test]
    fn test_clone_is_new_instance() {
        let tr = TaskRun::new("build-1", "ci").with_service_account_name("builder");
        let copy = tr.clone();
        assert_ne!(copy.run_key(), tr.run_key());
        assert_eq!(copy.metadata, tr.metadata);
        assert_eq!(copy.spec, tr.spec);
        assert_eq!(copy.status, tr.status);
    }

    #[test]
    fn test_from_json_minimal() {
        let tr = TaskRun::from_json(r#"{"metadata": {"name": "x"}}"#).unwrap();
        assert_eq!(tr.metadata.namespace, "");
        assert!(tr.status.conditions.is_empty());
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let err = TaskRun::from_json("not json").unwrap_err();
        assert!(matches!(err, CoreError::Serialization(_)));
    }

    #[test]
    fn test_to_json_omits_run_key() {
        let tr = TaskRun::new("build-1", "ci").with_service_account_name("builder");
        let json = tr.to_json().unwrap();
        assert!(json.contains("\"serviceAccountName\": \"builder\""));
        assert!(!json.contains("run_key"));
        assert!(!json.contains("TaskRun/"));
    }

    #[test]
    fn test_validate() {
        assert!(TaskRun::new("build-1", "ci").validate().is_ok());
        assert!(TaskRun::new("", "ci").validate().is_err());
        assert!(TaskRun::new("a.b", "ci").validate().is_err());
        assert!(TaskRun::new("a".repeat(64), "ci").validate().is_err());
        assert!(TaskRun::new("build-1", "ci").with_task_ref("").validate().is_err());
    }

    #[test]
    fn test_initialize_conditions() {
        let mut status = TaskRunStatus::default();
        status.initialize_conditions();

        assert!(status.start_time.is_some());
        assert!(status.conditions.succeeded().unwrap().is_unknown());

        status.mark_failed("Failed", "step exited 1");
        let start = status.start_time;
        status.initialize_conditions();
        assert_eq!(status.start_time, start);
        assert!(status.conditions.succeeded().unwrap().is_false());
        assert!(status.completion_time.is_some());
    }
}

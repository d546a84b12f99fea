//! Identifiers derived from a TaskRun's name and owner chain.

use std::fmt;
use uuid::Uuid;

use crate::meta::ObjectReference;
use crate::TaskRun;

/// Suffix appended to the owning PipelineRun's name to form the claim name.
pub const PVC_SUFFIX: &str = "-pvc";

/// In-process key for de-duplicating concurrent reconciles of one
/// in-memory TaskRun instance.
///
/// Generated fresh for every instance, including copies of a TaskRun and
/// freshly decoded snapshots. Cloning the key itself keeps its value. Not
/// stable across restarts; never persist it or compare it across
/// processes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RunKey(String);

impl RunKey {
    /// Generate a new key for a fresh instance.
    pub fn generate() -> Self {
        Self(format!("TaskRun/{}", Uuid::new_v4()))
    }

    /// Get the inner string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RunKey {
    fn default() -> Self {
        Self::generate()
    }
}

impl fmt::Display for RunKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TaskRun {
    /// Reference to the pod backing this run. The pod shares the
    /// TaskRun's name and namespace.
    pub fn build_pod_ref(&self) -> ObjectReference {
        ObjectReference {
            api_version: "v1".to_string(),
            kind: "Pod".to_string(),
            namespace: self.metadata.namespace.clone(),
            name: self.metadata.name.clone(),
        }
    }

    /// Name of the volume claim shared by the owning PipelineRun, or an
    /// empty string when there is no PipelineRun owner.
    pub fn pipeline_run_pvc_name(&self) -> String {
        match self.pipeline_run_owner() {
            Some(owner) => format!("{}{}", owner.name, PVC_SUFFIX),
            None => String::new(),
        }
    }

    /// Process-local de-duplication key for this instance.
    pub fn run_key(&self) -> &RunKey {
        &self.run_key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::OwnerReference;

    #[test]
    fn test_build_pod_ref() {
        let tr = TaskRun::new("taskrunname", "testns");
        assert_eq!(
            tr.build_pod_ref(),
            ObjectReference {
                api_version: "v1".to_string(),
                kind: "Pod".to_string(),
                namespace: "testns".to_string(),
                name: "taskrunname".to_string(),
            }
        );
        assert_eq!(tr.build_pod_ref(), tr.build_pod_ref());
    }

    #[test]
    fn test_pipeline_run_pvc_name() {
        let owned = TaskRun::new("taskrunname", "testns")
            .with_owner_reference(OwnerReference::new("PipelineRun", "testpr"));
        assert_eq!(owned.pipeline_run_pvc_name(), "testpr-pvc");

        let other = TaskRun::new("taskrunname", "testns")
            .with_owner_reference(OwnerReference::new("SomeOtherOwner", "testpr"));
        assert_eq!(other.pipeline_run_pvc_name(), "");

        assert_eq!(TaskRun::new("taskrunname", "testns").pipeline_run_pvc_name(), "");
    }

    #[test]
    fn test_pvc_name_uses_first_pipeline_run_owner() {
        let tr = TaskRun::new("taskrunname", "testns")
            .with_owner_reference(OwnerReference::new("SomeOtherOwner", "x"))
            .with_owner_reference(OwnerReference::new("PipelineRun", "first"))
            .with_owner_reference(OwnerReference::new("PipelineRun", "second"));
        assert_eq!(tr.pipeline_run_pvc_name(), "first-pvc");
    }

    #[test]
    fn test_run_key_stable_per_instance() {
        let tr = TaskRun::new("taskrunname", "");
        assert_eq!(tr.run_key(), tr.run_key());
        assert!(tr.run_key().as_str().starts_with("TaskRun/"));
    }

    #[test]
    fn test_run_key_differs_between_instances() {
        let a = TaskRun::new("taskrunname", "");
        let b = TaskRun::new("taskrunname", "");
        let copy = a.clone();
        assert_ne!(a.run_key(), b.run_key());
        assert_ne!(a.run_key(), copy.run_key());
    }

    #[test]
    fn test_cloned_key_keeps_value() {
        let tr = TaskRun::new("taskrunname", "");
        let key = tr.run_key().clone();
        assert_eq!(&key, tr.run_key());

        let mut seen = std::collections::HashSet::new();
        seen.insert(key);
        assert!(seen.contains(tr.run_key()));
        assert!(!seen.contains(tr.clone().run_key()));
    }
}

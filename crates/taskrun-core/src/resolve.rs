//! Nil-safe entry points over possibly-absent snapshots.
//!
//! A reconciler often holds `Option<&TaskRun>` (fetched but missing,
//! speculative lookups). Every function here is total and returns the
//! same answer for `None` as for a zero-valued TaskRun.

use crate::identity::RunKey;
use crate::membership::PipelineMembership;
use crate::meta::ObjectReference;
use crate::TaskRun;

pub fn has_started(tr: Option<&TaskRun>) -> bool {
    tr.is_some_and(TaskRun::has_started)
}

pub fn is_done(tr: Option<&TaskRun>) -> bool {
    tr.is_some_and(TaskRun::is_done)
}

pub fn is_cancelled(tr: Option<&TaskRun>) -> bool {
    tr.is_some_and(TaskRun::is_cancelled)
}

/// Pod reference; `None` yields a reference with empty namespace and name.
pub fn build_pod_ref(tr: Option<&TaskRun>) -> ObjectReference {
    tr.map(TaskRun::build_pod_ref)
        .unwrap_or_else(|| TaskRun::default().build_pod_ref())
}

pub fn pipeline_run_pvc_name(tr: Option<&TaskRun>) -> String {
    tr.map(TaskRun::pipeline_run_pvc_name).unwrap_or_default()
}

pub fn run_key(tr: Option<&TaskRun>) -> Option<&RunKey> {
    tr.map(TaskRun::run_key)
}

pub fn has_pipeline_run_owner_reference(tr: Option<&TaskRun>) -> bool {
    tr.is_some_and(TaskRun::has_pipeline_run_owner_reference)
}

pub fn is_part_of_pipeline(tr: Option<&TaskRun>) -> Option<PipelineMembership> {
    tr.and_then(TaskRun::is_part_of_pipeline)
}

pub fn service_account_name(tr: Option<&TaskRun>) -> &str {
    tr.map(TaskRun::service_account_name).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::OwnerReference;

    #[test]
    fn test_none_matches_zero_value() {
        let zero = TaskRun::default();

        assert_eq!(has_started(None), has_started(Some(&zero)));
        assert_eq!(is_done(None), is_done(Some(&zero)));
        assert_eq!(is_cancelled(None), is_cancelled(Some(&zero)));
        assert_eq!(build_pod_ref(None), build_pod_ref(Some(&zero)));
        assert_eq!(pipeline_run_pvc_name(None), pipeline_run_pvc_name(Some(&zero)));
        assert_eq!(
            has_pipeline_run_owner_reference(None),
            has_pipeline_run_owner_reference(Some(&zero))
        );
        assert_eq!(is_part_of_pipeline(None), is_part_of_pipeline(Some(&zero)));
        assert_eq!(service_account_name(None), service_account_name(Some(&zero)));
        assert!(run_key(None).is_none());
    }

    #[test]
    fn test_none_defaults() {
        assert!(!has_started(None));
        assert!(!is_done(None));
        assert!(!is_cancelled(None));
        assert_eq!(pipeline_run_pvc_name(None), "");
        assert_eq!(service_account_name(None), "");
        assert_eq!(build_pod_ref(None).kind, "Pod");
    }

    #[test]
    fn test_owned_taskrun_scenario() {
        let tr = TaskRun::new("taskrunname", "testns")
            .with_owner_reference(OwnerReference::new("PipelineRun", "testpr"));
        let tr = Some(&tr);

        assert_eq!(pipeline_run_pvc_name(tr), "testpr-pvc");
        assert!(has_pipeline_run_owner_reference(tr));
        let pod = build_pod_ref(tr);
        assert_eq!(pod.api_version, "v1");
        assert_eq!(pod.kind, "Pod");
        assert_eq!(pod.namespace, "testns");
        assert_eq!(pod.name, "taskrunname");
    }
}

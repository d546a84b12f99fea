//! Effective service account resolution.

use crate::TaskRun;

impl TaskRun {
    /// Service account the task's pod should run as.
    ///
    /// `spec.serviceAccountName` wins, then the deprecated
    /// `spec.serviceAccount`. An empty result means "use the namespace
    /// default" and is not an error.
    pub fn service_account_name(&self) -> &str {
        let spec = &self.spec;
        if !spec.service_account_name.is_empty() {
            &spec.service_account_name
        } else {
            &spec.deprecated_service_account
        }
    }
}

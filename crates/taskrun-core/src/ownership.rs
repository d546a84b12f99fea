//! Resolves whether a TaskRun is owned by a PipelineRun.

use crate::meta::OwnerReference;
use crate::TaskRun;

/// Kind name of the pipeline execution resource.
pub const PIPELINE_RUN_KIND: &str = "PipelineRun";

impl TaskRun {
    /// The owning PipelineRun reference: the first `PipelineRun`-kind
    /// entry in list order.
    pub fn pipeline_run_owner(&self) -> Option<&OwnerReference> {
        self.metadata.owner_of_kind(PIPELINE_RUN_KIND)
    }

    /// True iff any owner reference has kind `PipelineRun`.
    pub fn has_pipeline_run_owner_reference(&self) -> bool {
        self.pipeline_run_owner().is_some()
    }
}

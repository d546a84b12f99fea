//! Pipeline membership from well-known labels.
//!
//! Membership is independent of owner references: a TaskRun can carry the
//! pipeline labels without being owned by that PipelineRun.

use serde::Serialize;

use crate::TaskRun;

/// API group prefix shared by all well-known label keys.
pub const GROUP_NAME: &str = "tekton.dev";

pub const PIPELINE_LABEL_KEY: &str = "/pipeline";
pub const PIPELINE_RUN_LABEL_KEY: &str = "/pipelineRun";
pub const TASK_LABEL_KEY: &str = "/task";
pub const TASK_RUN_LABEL_KEY: &str = "/taskRun";

/// Full label key for a `*_LABEL_KEY` suffix, e.g. `tekton.dev/pipelineRun`.
pub fn label_key(suffix: &str) -> String {
    format!("{GROUP_NAME}{suffix}")
}

/// Pipeline and PipelineRun a TaskRun is labeled as belonging to.
///
/// Either value may be empty if the label is present with an empty value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineMembership {
    pub pipeline: String,
    pub pipeline_run: String,
}

impl TaskRun {
    /// Membership if both the pipeline and pipeline-run label keys are
    /// present, `None` otherwise.
    pub fn is_part_of_pipeline(&self) -> Option<PipelineMembership> {
        let meta = &self.metadata;
        let pipeline = meta.label(&label_key(PIPELINE_LABEL_KEY))?;
        let pipeline_run = meta.label(&label_key(PIPELINE_RUN_LABEL_KEY))?;
        Some(PipelineMembership {
            pipeline: pipeline.to_string(),
            pipeline_run: pipeline_run.to_string(),
        })
    }
}

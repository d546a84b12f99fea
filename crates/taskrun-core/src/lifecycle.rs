//! Coarse run-state derived from conditions and the start timestamp.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::condition::ConditionStatus;
use crate::taskrun::TASK_RUN_SPEC_STATUS_CANCELLED;
use crate::TaskRun;

/// Composite lifecycle view of a TaskRun.
///
/// Cancellation is orthogonal and not represented here; see
/// [`TaskRun::is_cancelled`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunState {
    /// Not started and not done.
    #[default]
    Pending,
    /// Started, outcome not yet known.
    Running,
    /// Succeeded=True.
    Succeeded,
    /// Succeeded=False.
    Failed,
}

impl RunState {
    /// Returns true if the run is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Running => write!(f, "running"),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

impl TaskRun {
    /// True iff a non-zero start time has been recorded.
    pub fn has_started(&self) -> bool {
        self.status
            .start_time
            .is_some_and(|start| !start.is_zero())
    }

    /// True iff the Succeeded condition is present and not Unknown.
    pub fn is_done(&self) -> bool {
        self.status
            .conditions
            .succeeded()
            .is_some_and(|c| !c.is_unknown())
    }

    /// True iff cancellation has been requested through `spec.status`.
    pub fn is_cancelled(&self) -> bool {
        self.spec.status == TASK_RUN_SPEC_STATUS_CANCELLED
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RunState {
        match self.status.conditions.succeeded().map(|c| c.status) {
            Some(ConditionStatus::True) => RunState::Succeeded,
            Some(ConditionStatus::False) => RunState::Failed,
            _ if self.has_started() => RunState::Running,
            _ => RunState::Pending,
        }
    }
}

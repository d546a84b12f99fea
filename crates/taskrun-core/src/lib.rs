//! TaskRun Core Domain Types
//!
//! The TaskRun resource model and the read-only queries a controller runs
//! against a snapshot of it. Nothing here performs I/O or mutates the
//! snapshot it is asked about, so every query is safe to call from any
//! number of reconcile workers at once.
//!
//! - [`lifecycle`]: started / done / cancelled
//! - [`identity`]: pod reference, PipelineRun claim name, run key
//! - [`ownership`]: PipelineRun owner lookup
//! - [`membership`]: pipeline labels
//! - [`credentials`]: effective service account
//! - [`resolve`]: the same queries over `Option<&TaskRun>`

pub mod condition;
pub mod credentials;
pub mod error;
pub mod identity;
pub mod lifecycle;
pub mod membership;
pub mod meta;
pub mod ownership;
pub mod resolve;
pub mod taskrun;

// Re-export commonly used types
pub use condition::{Condition, ConditionStatus, ConditionType, Conditions};
pub use error::CoreError;
pub use identity::RunKey;
pub use lifecycle::RunState;
pub use membership::PipelineMembership;
pub use meta::{ObjectMeta, ObjectReference, OwnerReference, Time};
pub use taskrun::{TaskRef, TaskRun, TaskRunSpec, TaskRunStatus};

//! TaskRun Controller Library
//!
//! The caller side of the TaskRun queries: decides what a reconcile should
//! do with a snapshot, and makes sure one in-memory snapshot is never
//! reconciled by two workers at once.

pub mod config;
pub mod error;
pub mod inflight;
pub mod plan;
pub mod reconciler;

pub use config::Config;
pub use error::ControllerError;
pub use inflight::{AdmitGuard, InflightRuns};
pub use plan::{plan, PodPlan, ReconcileAction};
pub use reconciler::{ReconcileOutcome, Reconciler};

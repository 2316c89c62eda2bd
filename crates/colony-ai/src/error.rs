//! Errors surfaced by the scheduler API.
//!
//! Per-target failures are not errors at this level: they are contained
//! inside the tick as [`crate::TargetFault`]s. Only construction can fail.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SchedulerError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    #[error("cannot build an AI for job '{job}': its citizen has no live entity")]
    NoCitizenEntity { job: String },
}

//! Priority-tiered target scheduler for colony worker AI.
//!
//! A worker's behavior is expressed as a set of [`Target`]s: predicate/action
//! pairs registered under an [`AiState`] tier. Once per host tick the
//! [`TargetScheduler`] walks the tiers in a fixed order and applies at most one
//! target, recording the state transition that target produced.
//!
//! - **Fixed priority**: `AiBlockingPrio` > `Event` > `StateBlockingPrio` >
//!   the tier of the current state
//! - **One transition per tick**: the first target that transitions wins
//! - **Fault containment**: predicate and action failures (including panics)
//!   are reported to a [`FaultHandler`] and never escape the tick
//!
//! # Architecture
//!
//! - [`scheduler`] hosts the tier walk and per-target evaluation
//! - [`registry`] owns targets and their tier ordering
//! - [`worker_ai`] binds a scheduler to a job/worker pair and implements the
//!   host's [`HostTask`] contract
//! - [`host`] is a small reference driver for [`HostTask`] implementations

pub mod builder;
pub mod config;
pub mod error;
pub mod fault;
pub mod host;
pub mod lifecycle;
pub mod metrics;
pub mod registry;
pub mod scheduler;
pub mod state;
pub mod target;
pub mod transition;
pub mod worker;
pub mod worker_ai;

pub use config::SchedulerConfig;
pub use error::{Result, SchedulerError};
pub use fault::{FaultHandler, FaultReport, FaultStage, IgnoreFaults, TargetFault};
pub use host::{TaskHandle, TaskSet};
pub use lifecycle::{HostTask, MutexBits};
pub use metrics::{MetricsSnapshot, SchedulerMetrics};
pub use registry::TargetRegistry;
pub use scheduler::{TargetScheduler, TickOutcome};
pub use state::AiState;
pub use target::{Target, TargetId};
pub use transition::Transition;
pub use worker::{CitizenStatus, DesiredActivity, Job, Worker};
pub use worker_ai::WorkerAi;

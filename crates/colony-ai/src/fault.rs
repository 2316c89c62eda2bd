//! Per-target fault reporting and containment.
//!
//! A target's predicate or action may fail, either by returning a
//! [`TargetFault`] or by panicking. Neither case is allowed to escape the
//! scheduler's tick: the fault is turned into a [`FaultReport`], handed to the
//! scheduler's [`FaultHandler`], and the target is treated as "did not match".

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use thiserror::Error;

use crate::{AiState, TargetId};

/// Failure raised by a target's predicate or action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TargetFault {
    /// The closure reported a failure.
    #[error("{0}")]
    Failed(String),

    /// The closure panicked; the payload message is preserved.
    #[error("panicked: {0}")]
    Panicked(String),
}

impl TargetFault {
    /// Creates a [`TargetFault::Failed`] from any message.
    pub fn failed(message: impl Into<String>) -> Self {
        TargetFault::Failed(message.into())
    }

    /// Returns `true` if the fault came from a caught panic.
    pub fn is_panic(&self) -> bool {
        matches!(self, TargetFault::Panicked(_))
    }
}

/// Which half of a target failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum FaultStage {
    /// The eligibility check failed; silently treated as "no match".
    Predicate,
    /// The action failed; logged, then treated as "no transition".
    Action,
}

/// Everything a [`FaultHandler`] learns about one fault.
#[derive(Debug, Clone, Copy)]
pub struct FaultReport<'a> {
    pub target: TargetId,
    pub name: &'a str,
    pub tier: AiState,
    /// State the scheduler was in when the fault happened.
    pub state: AiState,
    pub stage: FaultStage,
    pub fault: &'a TargetFault,
}

/// Hook invoked for every contained fault.
///
/// The default implementation does nothing. Owners override it to recover
/// (e.g. schedule a reset), record, or escalate faults through their own
/// channels. The scheduler never lets a fault propagate to the host loop,
/// whatever the handler does.
pub trait FaultHandler {
    fn on_fault(&mut self, report: &FaultReport<'_>) {
        let _ = report;
    }
}

/// Handler that absorbs every fault.
#[derive(Debug, Clone, Copy, Default)]
pub struct IgnoreFaults;

impl FaultHandler for IgnoreFaults {}

impl<F> FaultHandler for F
where
    F: FnMut(&FaultReport<'_>),
{
    fn on_fault(&mut self, report: &FaultReport<'_>) {
        self(report)
    }
}

/// Runs a target closure, converting a panic into [`TargetFault::Panicked`].
///
/// Unwinding still passes through the process panic hook first, so the default
/// hook prints the panic to stderr before it is contained. Hosts that want
/// contained panics to stay quiet install their own hook (see
/// [`std::panic::set_hook`]). Builds with `panic = "abort"` cannot contain
/// panics at all.
pub(crate) fn contain<R>(f: impl FnOnce() -> Result<R, TargetFault>) -> Result<R, TargetFault> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => Err(TargetFault::Panicked(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

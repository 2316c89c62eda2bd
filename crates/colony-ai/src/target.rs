//! Predicate/action pairs registered with a scheduler.
//!
//! A [`Target`] is generic over a context type `C`, which is whatever the
//! owning AI hands to the scheduler on each tick (for a [`crate::WorkerAi`]
//! this is the job). Predicates read the context; actions may modify it.

use std::borrow::Cow;
use std::fmt;

use crate::{AiState, TargetFault, Transition};

type Predicate<C> = Box<dyn Fn(&C) -> Result<bool, TargetFault>>;
type Action<C> = Box<dyn FnMut(&mut C) -> Result<Transition, TargetFault>>;

/// Stable identifier of a registered target.
///
/// Ids are assigned by the registry at registration time, counting up from
/// zero, and are not reused within one scheduler before `u64::MAX`
/// registrations. Past that point the counter saturates instead of wrapping,
/// so every later registration receives `u64::MAX`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(u64);

impl TargetId {
    pub(crate) const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the numeric value of this id.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One candidate behavior of a worker AI.
///
/// # Fields
///
/// - `tier`: the [`AiState`] this target is registered under
/// - predicate: eligibility check, "always" when not set
/// - action: runs when the predicate holds, returns a [`Transition`]
/// - `should_unregister`: drop the target after its first transition
/// - `okay_to_eat`: whether the worker may eat while this target's tier is
///   the current state
pub struct Target<C> {
    tier: AiState,
    name: Cow<'static, str>,
    predicate: Option<Predicate<C>>,
    action: Action<C>,
    should_unregister: bool,
    okay_to_eat: bool,
}

impl<C> Target<C> {
    /// Creates a target that runs `action` whenever its tier is evaluated.
    pub fn new<A>(tier: AiState, action: A) -> Self
    where
        A: FnMut(&mut C) -> Result<Transition, TargetFault> + 'static,
    {
        Self {
            tier,
            name: Cow::Borrowed("unnamed"),
            predicate: None,
            action: Box::new(action),
            should_unregister: false,
            okay_to_eat: false,
        }
    }

    /// Guards the action with a predicate.
    pub fn with_predicate<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&C) -> Result<bool, TargetFault> + 'static,
    {
        self.predicate = Some(Box::new(predicate));
        self
    }

    /// Sets the name used in logs and fault reports.
    pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    /// Removes the target from its tier after it first transitions state.
    pub fn unregister_after_transition(mut self) -> Self {
        self.should_unregister = true;
        self
    }

    /// Marks whether eating is safe while this target's tier is current.
    pub fn with_okay_to_eat(mut self, okay_to_eat: bool) -> Self {
        self.okay_to_eat = okay_to_eat;
        self
    }

    pub fn tier(&self) -> AiState {
        self.tier
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn should_unregister(&self) -> bool {
        self.should_unregister
    }

    pub fn is_okay_to_eat(&self) -> bool {
        self.okay_to_eat
    }

    /// Evaluates the predicate against the context.
    pub fn test(&self, ctx: &C) -> Result<bool, TargetFault> {
        match &self.predicate {
            Some(predicate) => predicate(ctx),
            None => Ok(true),
        }
    }

    /// Runs the action against the context.
    pub fn apply(&mut self, ctx: &mut C) -> Result<Transition, TargetFault> {
        (self.action)(ctx)
    }
}

impl<C> fmt::Debug for Target<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Target")
            .field("tier", &self.tier)
            .field("name", &self.name)
            .field("guarded", &self.predicate.is_some())
            .field("should_unregister", &self.should_unregister)
            .field("okay_to_eat", &self.okay_to_eat)
            .finish()
    }
}

//! Priority-tiered target evaluation.
//!
//! # Semantics
//!
//! Each [`TargetScheduler::tick`] walks four tiers in a fixed order:
//!
//! 1. `AiBlockingPrio`
//! 2. `Event`
//! 3. `StateBlockingPrio`
//! 4. the tier named by the current state
//!
//! Within a tier, targets are checked in registration order. The first target
//! whose predicate holds and whose action returns [`Transition::To`] ends the
//! tick, so at most one transition happens per tick. A target whose action
//! returns [`Transition::None`] does not end the tick.
//!
//! This is analogous to a `Selector` over every tier's targets, with faults
//! counted as failures instead of aborting the walk.

use tracing::{debug, error, warn};

use crate::fault::{self, FaultHandler, FaultReport, FaultStage, IgnoreFaults, TargetFault};
use crate::{AiState, SchedulerMetrics, Target, TargetId, TargetRegistry, Transition};

/// Result of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A target fired and the scheduler switched state.
    Transitioned {
        target: TargetId,
        from: AiState,
        to: AiState,
    },

    /// No target fired; the state is unchanged.
    Unchanged,
}

impl TickOutcome {
    /// Returns `true` if the tick changed state.
    #[inline]
    pub fn is_transition(self) -> bool {
        matches!(self, TickOutcome::Transitioned { .. })
    }

    /// Returns the state switched to, if any.
    #[inline]
    pub fn new_state(self) -> Option<AiState> {
        match self {
            TickOutcome::Transitioned { to, .. } => Some(to),
            TickOutcome::Unchanged => None,
        }
    }
}

/// Outcome of checking a single target.
enum Evaluation {
    Matched(AiState),
    NoMatch,
    Fault { stage: FaultStage, fault: TargetFault },
}

/// Finite-state target scheduler for one worker AI.
///
/// The scheduler owns its targets and its current [`AiState`]. The state only
/// changes through a target transition or [`TargetScheduler::reset_ai_to_idle`].
///
/// # Threading
///
/// A scheduler is driven by a single host loop. Registration happens at
/// construction time or between ticks; targets cannot reach the scheduler
/// while a tick is running.
pub struct TargetScheduler<C> {
    state: AiState,
    registry: TargetRegistry<C>,
    fault_handler: Box<dyn FaultHandler>,
    metrics: SchedulerMetrics,
}

impl<C> TargetScheduler<C> {
    /// Creates a scheduler in [`AiState::Init`] with the four builtin tiers.
    pub fn new() -> Self {
        Self {
            state: AiState::Init,
            registry: TargetRegistry::new(),
            fault_handler: Box::new(IgnoreFaults),
            metrics: SchedulerMetrics::new(),
        }
    }

    /// Replaces the fault handler (default: [`IgnoreFaults`]).
    pub fn set_fault_handler(&mut self, handler: impl FaultHandler + 'static) {
        self.fault_handler = Box::new(handler);
    }

    /// Registers one target at the end of its tier.
    pub fn register_target(&mut self, target: Target<C>) -> TargetId {
        self.registry.register(target)
    }

    /// Registers targets in order.
    ///
    /// Targets are checked in the order of registration, so sort them
    /// accordingly. Returns the assigned ids in the same order.
    pub fn register_targets<I>(&mut self, targets: I) -> Vec<TargetId>
    where
        I: IntoIterator<Item = Target<C>>,
    {
        targets
            .into_iter()
            .map(|target| self.registry.register(target))
            .collect()
    }

    /// Removes a target from its tier and hands it back.
    ///
    /// Returns `None` if the target is not registered (already removed or
    /// unregistered after a transition); the call is then a no-op.
    pub fn unregister_target(&mut self, id: TargetId) -> Option<Target<C>> {
        self.registry.unregister(id)
    }

    /// Returns the current state.
    pub fn state(&self) -> AiState {
        self.state
    }

    pub fn registry(&self) -> &TargetRegistry<C> {
        &self.registry
    }

    pub fn metrics(&self) -> &SchedulerMetrics {
        &self.metrics
    }

    /// Returns `true` if any target registered under the current state allows
    /// eating. A state without targets never does.
    pub fn is_okay_to_eat(&self) -> bool {
        self.registry
            .targets_in(self.state)
            .any(Target::is_okay_to_eat)
    }

    /// Forces the state to [`AiState::Idle`], abandoning whatever multi-tick
    /// behavior was in progress. No targets are evaluated.
    pub fn reset_ai_to_idle(&mut self) {
        debug!(
            target: "colony_ai::scheduler",
            from = %self.state,
            "resetting AI to idle"
        );
        self.state = AiState::Idle;
        self.metrics.record_reset();
    }

    /// Evaluates the tiers once and applies at most one target.
    ///
    /// Never fails and never panics because of a target: faults are contained
    /// per target and evaluation moves on to the next one.
    ///
    /// A panicking target still runs the process panic hook before it is
    /// contained, so with the default hook the panic message reaches stderr
    /// even though the tick carries on. Install a quiet hook to suppress it.
    pub fn tick(&mut self, ctx: &mut C) -> TickOutcome {
        self.metrics.record_tick();

        let current = self.state;
        for tier in AiState::PRIORITY_TIERS.into_iter().chain([current]) {
            if let Some(outcome) = self.run_tier(tier, ctx) {
                return outcome;
            }
        }

        TickOutcome::Unchanged
    }

    /// Checks every target of `tier` until one transitions.
    fn run_tier(&mut self, tier: AiState, ctx: &mut C) -> Option<TickOutcome> {
        let mut index = 0;
        while let Some(&id) = self.registry.tier(tier).get(index) {
            index += 1;

            match self.check_on_target(id, ctx) {
                Evaluation::Matched(next) => return Some(self.apply_transition(id, next)),
                Evaluation::NoMatch => {}
                Evaluation::Fault { stage, fault } => self.report_fault(id, stage, &fault),
            }
        }
        None
    }

    /// Tests the predicate, then runs the action if it holds.
    fn check_on_target(&mut self, id: TargetId, ctx: &mut C) -> Evaluation {
        let Some(target) = self.registry.get_mut(id) else {
            return Evaluation::NoMatch;
        };

        match fault::contain(|| target.test(ctx)) {
            Ok(true) => {}
            Ok(false) => return Evaluation::NoMatch,
            Err(fault) => {
                return Evaluation::Fault {
                    stage: FaultStage::Predicate,
                    fault,
                };
            }
        }

        match fault::contain(|| target.apply(ctx)) {
            Ok(Transition::To(next)) => Evaluation::Matched(next),
            Ok(Transition::None) => Evaluation::NoMatch,
            Err(fault) => Evaluation::Fault {
                stage: FaultStage::Action,
                fault,
            },
        }
    }

    fn apply_transition(&mut self, id: TargetId, next: AiState) -> TickOutcome {
        let from = self.state;
        let unregister = match self.registry.get(id) {
            Some(target) => {
                debug!(
                    target: "colony_ai::scheduler",
                    target_id = %id,
                    name = target.name(),
                    tier = %target.tier(),
                    %from,
                    to = %next,
                    "state transition"
                );
                target.should_unregister()
            }
            None => false,
        };

        if unregister {
            self.registry.unregister(id);
        }
        self.state = next;
        self.metrics.record_transition(unregister);

        TickOutcome::Transitioned {
            target: id,
            from,
            to: next,
        }
    }

    /// Records a contained fault and hands it to the fault handler.
    ///
    /// Action faults are logged; predicate faults are only counted.
    fn report_fault(&mut self, id: TargetId, stage: FaultStage, fault: &TargetFault) {
        let Some(target) = self.registry.get(id) else {
            return;
        };

        match stage {
            FaultStage::Predicate => self.metrics.record_predicate_fault(),
            FaultStage::Action => {
                self.metrics.record_action_fault();
                warn!(
                    target: "colony_ai::scheduler",
                    target_id = %id,
                    name = target.name(),
                    tier = %target.tier(),
                    error = %fault,
                    "Action for target failed"
                );
            }
        }

        let report = FaultReport {
            target: id,
            name: target.name(),
            tier: target.tier(),
            state: self.state,
            stage,
            fault,
        };
        let handler = &mut self.fault_handler;
        if let Err(handler_fault) = fault::contain(|| {
            handler.on_fault(&report);
            Ok(())
        }) {
            error!(
                target: "colony_ai::scheduler",
                target_id = %id,
                error = %handler_fault,
                "Fault handler failed"
            );
        }
    }
}

impl<C> Default for TargetScheduler<C> {
    fn default() -> Self {
        Self::new()
    }
}

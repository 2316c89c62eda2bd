//! Scheduler counters.
//!
//! Tracks how often the scheduler ticks, transitions and contains faults.

/// Counters owned by one [`crate::TargetScheduler`].
///
/// The scheduler is driven from a single thread, so plain counters are
/// enough; hosts that aggregate across workers copy out a [`MetricsSnapshot`].
#[derive(Debug, Default, Clone)]
pub struct SchedulerMetrics {
    /// Number of ticks evaluated
    ticks: u64,

    /// Number of ticks that ended in a state transition
    transitions: u64,

    /// Targets removed after transitioning (`should_unregister`)
    unregistrations: u64,

    /// Predicate faults absorbed
    predicate_faults: u64,

    /// Action faults absorbed
    action_faults: u64,

    /// Explicit resets to idle
    resets: u64,
}

/// Point-in-time copy of [`SchedulerMetrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    pub ticks: u64,
    pub transitions: u64,
    pub unregistrations: u64,
    pub predicate_faults: u64,
    pub action_faults: u64,
    pub resets: u64,
}

impl MetricsSnapshot {
    /// Total faults of either stage.
    pub fn faults(&self) -> u64 {
        self.predicate_faults + self.action_faults
    }
}

impl SchedulerMetrics {
    /// Creates a new empty metrics tracker.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_tick(&mut self) {
        self.ticks += 1;
    }

    pub(crate) fn record_transition(&mut self, unregistered: bool) {
        self.transitions += 1;
        if unregistered {
            self.unregistrations += 1;
        }
    }

    pub(crate) fn record_predicate_fault(&mut self) {
        self.predicate_faults += 1;
    }

    pub(crate) fn record_action_fault(&mut self) {
        self.action_faults += 1;
    }

    pub(crate) fn record_reset(&mut self) {
        self.resets += 1;
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    /// Copies all counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            ticks: self.ticks,
            transitions: self.transitions,
            unregistrations: self.unregistrations,
            predicate_faults: self.predicate_faults,
            action_faults: self.action_faults,
            resets: self.resets,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_recorded_events() {
        let mut metrics = SchedulerMetrics::new();
        metrics.record_tick();
        metrics.record_tick();
        metrics.record_transition(true);
        metrics.record_transition(false);
        metrics.record_predicate_fault();
        metrics.record_action_fault();
        metrics.record_action_fault();
        metrics.record_reset();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.ticks, 2);
        assert_eq!(snapshot.transitions, 2);
        assert_eq!(snapshot.unregistrations, 1);
        assert_eq!(snapshot.faults(), 3);
        assert_eq!(snapshot.resets, 1);
    }
}

//! Worker AI skeleton binding a scheduler to a job.
//!
//! [`WorkerAi`] is what a host task scheduler actually drives: it answers the
//! [`HostTask`] lifecycle calls from the citizen's desired activity and status
//! flag, and forwards every update to its [`TargetScheduler`] with the job as
//! the target context. Job-specific behavior lives entirely in the targets the
//! owner registers.

use tracing::debug;

use crate::{
    AiState, CitizenStatus, DesiredActivity, FaultHandler, HostTask, Job, MutexBits, Result,
    SchedulerConfig, SchedulerError, SchedulerMetrics, Target, TargetId, TargetScheduler,
    TickOutcome, Worker,
};

/// Skeleton shared by every worker AI.
pub struct WorkerAi<J: Job> {
    job: J,
    worker: J::Worker,
    scheduler: TargetScheduler<J>,
    config: SchedulerConfig,
}

impl<J: Job> WorkerAi<J> {
    /// Builds an AI for `job` with default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::NoCitizenEntity`] if the job's citizen has no
    /// live entity.
    pub fn new(job: J) -> Result<Self> {
        Self::with_config(job, SchedulerConfig::default())
    }

    /// Builds an AI for `job`.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::NoCitizenEntity`] if the job's citizen has no
    /// live entity.
    pub fn with_config(job: J, config: SchedulerConfig) -> Result<Self> {
        let worker = job
            .citizen_entity()
            .ok_or_else(|| SchedulerError::NoCitizenEntity {
                job: job.name().to_string(),
            })?;

        debug!(
            target: "colony_ai::worker",
            job = job.name(),
            mutex_bits = config.mutex_bits.bits(),
            "worker AI created"
        );

        Ok(Self {
            scheduler: TargetScheduler::new(),
            job,
            worker,
            config,
        })
    }

    /// Registers all targets this AI needs, in evaluation order.
    pub fn register_targets<I>(&mut self, targets: I) -> Vec<TargetId>
    where
        I: IntoIterator<Item = Target<J>>,
    {
        self.scheduler.register_targets(targets)
    }

    pub fn register_target(&mut self, target: Target<J>) -> TargetId {
        self.scheduler.register_target(target)
    }

    /// Removes a target; `None` if it is not registered.
    pub fn unregister_target(&mut self, id: TargetId) -> Option<Target<J>> {
        self.scheduler.unregister_target(id)
    }

    /// Replaces the hook that receives contained target faults.
    pub fn set_fault_handler(&mut self, handler: impl FaultHandler + 'static) {
        self.scheduler.set_fault_handler(handler);
    }

    /// Runs one scheduler tick against the job.
    pub fn update(&mut self) -> TickOutcome {
        self.scheduler.tick(&mut self.job)
    }

    /// Returns the current state.
    pub fn state(&self) -> AiState {
        self.scheduler.state()
    }

    /// Check if it is okay to eat by checking the targets of the current state.
    pub fn is_okay_to_eat(&self) -> bool {
        self.scheduler.is_okay_to_eat()
    }

    /// Resets the AI to idle; interrupts all current actions.
    pub fn reset_ai_to_idle(&mut self) {
        self.scheduler.reset_ai_to_idle();
    }

    /// Delay between level-dependent actions, in ticks.
    pub fn level_delay(&self) -> u32 {
        self.config.level_delay
    }

    pub fn job(&self) -> &J {
        &self.job
    }

    pub fn job_mut(&mut self) -> &mut J {
        &mut self.job
    }

    pub fn worker(&self) -> &J::Worker {
        &self.worker
    }

    pub fn scheduler(&self) -> &TargetScheduler<J> {
        &self.scheduler
    }

    pub fn metrics(&self) -> &SchedulerMetrics {
        self.scheduler.metrics()
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }
}

impl<J: Job> HostTask for WorkerAi<J> {
    fn name(&self) -> &str {
        self.job.name()
    }

    fn mutex_bits(&self) -> MutexBits {
        self.config.mutex_bits
    }

    fn should_execute(&mut self) -> bool {
        self.worker.desired_activity() == DesiredActivity::Work
    }

    fn start_executing(&mut self) {
        self.worker.set_status(CitizenStatus::Working);
    }

    fn update_task(&mut self) {
        self.update();
    }

    fn reset_task(&mut self) {
        self.worker.set_status(CitizenStatus::Idle);
    }
}

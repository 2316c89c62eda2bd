//! Contract between a host task scheduler and the behaviors it drives.

use bitflags::bitflags;

bitflags! {
    /// Declares which other behaviors may not run alongside this one.
    ///
    /// The test is a bitwise AND: two behaviors whose masks intersect must run
    /// exclusively from each other. The scheduler core never interprets the
    /// mask itself, it only forwards it to the host.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct MutexBits: u32 {
        const MOVEMENT = 1 << 0;
        const LOOK     = 1 << 1;
        const JUMP     = 1 << 2;
    }
}

impl MutexBits {
    /// Mask claimed by worker AIs.
    pub const WORKER_AI: MutexBits = MutexBits::MOVEMENT.union(MutexBits::LOOK);

    /// Returns `true` if behaviors with these masks may run concurrently.
    #[inline]
    pub fn compatible_with(self, other: MutexBits) -> bool {
        !self.intersects(other)
    }
}

/// A behavior driven by a host task scheduler.
///
/// The host calls these methods strictly sequentially, once per tick:
///
/// 1. `should_execute` while the task is idle; `true` starts it
/// 2. `start_executing` once when it starts
/// 3. `update_task` every tick while it runs
/// 4. `should_continue_executing` every tick while it runs; `false` stops it
/// 5. `reset_task` once when it stops
pub trait HostTask {
    /// Returns a human-readable name for this task (used in logging).
    fn name(&self) -> &str;

    /// Mask of behaviors this one excludes.
    fn mutex_bits(&self) -> MutexBits;

    /// Returns whether the task should begin execution.
    fn should_execute(&mut self) -> bool;

    /// Returns whether an in-progress task should keep executing.
    ///
    /// Defaults to re-checking [`HostTask::should_execute`].
    fn should_continue_executing(&mut self) -> bool {
        self.should_execute()
    }

    /// Execute a one shot task or start executing a continuous task.
    fn start_executing(&mut self) {}

    /// Advances a running task by one tick.
    fn update_task(&mut self) {}

    /// Called when the task stops.
    fn reset_task(&mut self) {}
}

impl<T: HostTask + ?Sized> HostTask for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn mutex_bits(&self) -> MutexBits {
        (**self).mutex_bits()
    }

    fn should_execute(&mut self) -> bool {
        (**self).should_execute()
    }

    fn should_continue_executing(&mut self) -> bool {
        (**self).should_continue_executing()
    }

    fn start_executing(&mut self) {
        (**self).start_executing()
    }

    fn update_task(&mut self) {
        (**self).update_task()
    }

    fn reset_task(&mut self) {
        (**self).reset_task()
    }
}

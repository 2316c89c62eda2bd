//! Scheduler configuration.
use std::env;

use crate::MutexBits;

/// Configuration shared by a worker AI and its scheduler.
#[derive(Clone, Debug)]
pub struct SchedulerConfig {
    /// Mask forwarded to the host task scheduler.
    pub mutex_bits: MutexBits,
    /// Delay reported by `WorkerAi::level_delay`, in ticks.
    pub level_delay: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            mutex_bits: MutexBits::WORKER_AI,
            level_delay: 10,
        }
    }
}

impl SchedulerConfig {
    /// Construct scheduler configuration from environment variables.
    ///
    /// Environment variables:
    /// - `COLONY_AI_MUTEX_BITS` - Raw mutex mask; unknown bits are dropped (default: 3)
    /// - `COLONY_AI_LEVEL_DELAY` - Level delay in ticks (default: 10)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(bits) = read_env::<u32>("COLONY_AI_MUTEX_BITS") {
            config.mutex_bits = MutexBits::from_bits_truncate(bits);
        }
        if let Some(delay) = read_env::<u32>("COLONY_AI_LEVEL_DELAY") {
            config.level_delay = delay;
        }

        config
    }

    pub fn with_mutex_bits(mut self, mutex_bits: MutexBits) -> Self {
        self.mutex_bits = mutex_bits;
        self
    }

    pub fn with_level_delay(mut self, level_delay: u32) -> Self {
        self.level_delay = level_delay;
        self
    }

}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_worker_ai() {
        let config = SchedulerConfig::default();
        assert_eq!(config.mutex_bits, MutexBits::WORKER_AI);
        assert_eq!(config.level_delay, 10);
    }

    #[test]
    fn builder_overrides() {
        let config = SchedulerConfig::default()
            .with_mutex_bits(MutexBits::JUMP)
            .with_level_delay(4);
        assert_eq!(config.mutex_bits, MutexBits::JUMP);
        assert_eq!(config.level_delay, 4);
    }
}

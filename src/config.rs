//! Runner configuration.

use std::time::Duration;

use crate::errors::ConfigError;
use crate::idle::IdleVariant;

pub const DEFAULT_PER_GROUP: usize = 3;
pub const DEFAULT_TICK: Duration = Duration::from_secs(1);
pub const DEFAULT_NAME_PREFIX: &str = "idle";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    per_group: usize,
    tick: Duration,
    name_prefix: String,
}

impl RunnerConfig {
    pub fn new() -> Self {
        Self {
            per_group: DEFAULT_PER_GROUP,
            tick: DEFAULT_TICK,
            name_prefix: DEFAULT_NAME_PREFIX.to_string(),
        }
    }

    /// Workers spawned for each idle variant.
    pub fn per_group(mut self, count: usize) -> Self {
        self.per_group = count;
        self
    }

    /// Sleep length of one idle cycle.
    pub fn tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    pub fn name_prefix<T: Into<String>>(mut self, prefix: T) -> Self {
        self.name_prefix = prefix.into();
        self
    }

    pub fn workers_per_group(&self) -> usize {
        self.per_group
    }

    pub fn tick_duration(&self) -> Duration {
        self.tick
    }

    pub fn total_workers(&self) -> usize {
        self.per_group * IdleVariant::ALL.len()
    }

    /// `{prefix}-{variant}-{index}`, e.g. `idle-a-0`.
    pub fn worker_name(&self, variant: IdleVariant, index: usize) -> String {
        format!("{}-{}-{}", self.name_prefix, variant.label(), index)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.per_group == 0 {
            return Err(ConfigError::EmptyGroup);
        }
        if self.tick.is_zero() {
            return Err(ConfigError::ZeroTick);
        }
        Ok(())
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self::new()
    }
}

//! # Queue Configuration
//!
//! Configuration for the deferred ray-cast queue: admission quota, aging of
//! waiting requests, and the contention statistics policy.
//!
//! ## Design Goals
//!
//! - **Fixed at construction**: the scheduler copies what it needs when built
//! - **Serializable**: loadable from TOML or RON through [`Config`]
//! - **Type Safe**: validation with explicit errors and sensible defaults

use serde::{Deserialize, Serialize};

use crate::config::{Config, ConfigError};
use crate::request::Priority;

/// Default per-tick submission quota
pub const DEFAULT_QUOTA: usize = 64;

/// # Aging Configuration
///
/// Waiting requests gain priority over time so low classes cannot starve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgingConfig {
    /// Priority units gained per second spent waiting
    ///
    /// Class base values are 10 units apart, so the default of 1.0 lets a
    /// request climb one class every ten seconds.
    pub rate: f32,
}

impl AgingConfig {
    /// Scheduling value of a request of class `priority` that has waited `age` seconds
    pub fn priority_for(&self, priority: Priority, age: f32) -> f32 {
        priority.base_value() + age * self.rate
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.rate.is_finite() || self.rate < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "Aging rate must be a finite, non-negative number (got {})",
                self.rate
            )));
        }
        Ok(())
    }
}

impl Default for AgingConfig {
    fn default() -> Self {
        Self { rate: 1.0 }
    }
}

/// # Contention Configuration
///
/// Selects the statistics policy and sizes its buffers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentionConfig {
    /// Use the policy that can record per-request history
    pub extended_stats: bool,
    /// Whether history gathering starts enabled
    pub gather_on_start: bool,
    /// Completed records kept between two stats polls
    pub completed_history_capacity: usize,
    /// Number of ticks the throughput averages cover
    pub average_window: usize,
}

impl ContentionConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.completed_history_capacity == 0 {
            return Err(ConfigError::Invalid(
                "Completed history capacity must be at least 1".to_string(),
            ));
        }
        if self.average_window == 0 {
            return Err(ConfigError::Invalid(
                "Average window must be at least 1 tick".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ContentionConfig {
    fn default() -> Self {
        Self {
            extended_stats: true,
            // Gather by default in debug builds only
            gather_on_start: cfg!(debug_assertions),
            completed_history_capacity: 256,
            average_window: 32,
        }
    }
}

/// # Ray-Cast Queue Configuration
///
/// Everything a [`crate::scheduler::DeferredActionQueue`] needs at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RayCastQueueConfig {
    /// Maximum submissions to the executor per tick
    pub quota: usize,
    /// Let `queue` submit synchronously while the backlog is empty and the
    /// tick budget is not spent
    pub immediate_execution: bool,
    /// Aging of waiting requests
    pub aging: AgingConfig,
    /// Statistics policy
    pub contention: ContentionConfig,
    /// Default log filter used by binaries embedding the queue
    pub log_level: String,
}

impl RayCastQueueConfig {
    /// Create a configuration with the given quota and defaults elsewhere
    pub fn new(quota: usize) -> Self {
        Self {
            quota,
            ..Self::default()
        }
    }

    /// Set the per-tick quota
    pub fn with_quota(mut self, quota: usize) -> Self {
        self.quota = quota;
        self
    }

    /// Enable or disable the immediate execution path
    pub fn with_immediate_execution(mut self, enabled: bool) -> Self {
        self.immediate_execution = enabled;
        self
    }

    /// Set the aging rate
    pub fn with_aging_rate(mut self, rate: f32) -> Self {
        self.aging.rate = rate;
        self
    }

    /// Choose the statistics policy and its initial gathering state
    pub fn with_extended_stats(mut self, available: bool, gather_on_start: bool) -> Self {
        self.contention.extended_stats = available;
        self.contention.gather_on_start = gather_on_start;
        self
    }

    /// Set the completed history capacity
    pub fn with_completed_history_capacity(mut self, capacity: usize) -> Self {
        self.contention.completed_history_capacity = capacity;
        self
    }

    /// Set the number of ticks the throughput averages cover
    pub fn with_average_window(mut self, ticks: usize) -> Self {
        self.contention.average_window = ticks;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.quota == 0 {
            return Err(ConfigError::Invalid("Quota must be at least 1".to_string()));
        }

        self.aging.validate()?;
        self.contention.validate()?;

        Ok(())
    }
}

impl Default for RayCastQueueConfig {
    fn default() -> Self {
        Self {
            quota: DEFAULT_QUOTA,
            immediate_execution: false,
            aging: AgingConfig::default(),
            contention: ContentionConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl Config for RayCastQueueConfig {}

//! Configuration types and their defaults
//!
//! Defaults reproduce the classic simulation parameters: 20 resource
//! classes of 1 to 10 instances, up to 18 concurrent workers, deadlock
//! detection every simulated second.

use ossim_clock::SimTime;
use serde::{Deserialize, Serialize};

/// Top-level simulator configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub resources: ResourcesConfig,
    #[serde(default)]
    pub workers: WorkersConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

/// Resource class generation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourcesConfig {
    /// Number of resource classes
    #[serde(default = "default_classes")]
    pub classes: usize,
    /// Minimum instances per class
    #[serde(default = "default_min_instances")]
    pub min_instances: u32,
    /// Maximum instances per class
    #[serde(default = "default_max_instances")]
    pub max_instances: u32,
    /// Chance a class is marked shareable (informational only)
    #[serde(default = "default_shareable_probability")]
    pub shareable_probability: f64,
}

impl Default for ResourcesConfig {
    fn default() -> Self {
        Self {
            classes: default_classes(),
            min_instances: default_min_instances(),
            max_instances: default_max_instances(),
            shareable_probability: default_shareable_probability(),
        }
    }
}

/// Worker population and behavior parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkersConfig {
    /// Maximum concurrently running workers (logical pid space)
    #[serde(default = "default_max_running")]
    pub max_running: usize,
    /// Maximum workers ever launched over the whole run
    #[serde(default = "default_max_launched")]
    pub max_launched: usize,
    /// Chance a worker terminates at a decision point
    #[serde(default = "default_termination_probability")]
    pub termination_probability: f64,
    /// Chance a surviving decision is a request rather than a release
    #[serde(default = "default_request_probability")]
    pub request_probability: f64,
    /// Minimum virtual time between worker decisions, nanoseconds
    #[serde(default)]
    pub min_decision_interval_ns: u64,
    /// Maximum virtual time between worker decisions, nanoseconds
    #[serde(default = "default_max_decision_interval_ns")]
    pub max_decision_interval_ns: u64,
}

impl Default for WorkersConfig {
    fn default() -> Self {
        Self {
            max_running: default_max_running(),
            max_launched: default_max_launched(),
            termination_probability: default_termination_probability(),
            request_probability: default_request_probability(),
            min_decision_interval_ns: 0,
            max_decision_interval_ns: default_max_decision_interval_ns(),
        }
    }
}

/// Coordinator loop timing parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Virtual time between deadlock detection passes, nanoseconds
    #[serde(default = "default_detection_interval_ns")]
    pub detection_interval_ns: u64,
    /// Minimum virtual time between worker spawns, nanoseconds
    #[serde(default = "default_min_spawn_interval_ns")]
    pub min_spawn_interval_ns: u64,
    /// Maximum virtual time between worker spawns, nanoseconds
    #[serde(default = "default_max_spawn_interval_ns")]
    pub max_spawn_interval_ns: u64,
    /// Virtual clock advance per coordinator tick, nanoseconds
    #[serde(default = "default_clock_increment_ns")]
    pub clock_increment_ns: u64,
    /// Real time yielded between ticks, microseconds (0 = yield only)
    #[serde(default = "default_tick_sleep_us")]
    pub tick_sleep_us: u64,
    /// Base RNG seed for reproducible runs (None = entropy)
    #[serde(default)]
    pub seed: Option<u64>,
    /// Granted requests between allocation table snapshots (0 = never)
    #[serde(default = "default_grants_per_table")]
    pub grants_per_table: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            detection_interval_ns: default_detection_interval_ns(),
            min_spawn_interval_ns: default_min_spawn_interval_ns(),
            max_spawn_interval_ns: default_max_spawn_interval_ns(),
            clock_increment_ns: default_clock_increment_ns(),
            tick_sleep_us: default_tick_sleep_us(),
            seed: None,
            grants_per_table: default_grants_per_table(),
        }
    }
}

impl SimulationConfig {
    #[must_use]
    pub fn detection_interval(&self) -> SimTime {
        SimTime::from_nanos(self.detection_interval_ns)
    }

    #[must_use]
    pub fn min_spawn_interval(&self) -> SimTime {
        SimTime::from_nanos(self.min_spawn_interval_ns)
    }

    #[must_use]
    pub fn max_spawn_interval(&self) -> SimTime {
        SimTime::from_nanos(self.max_spawn_interval_ns)
    }

    #[must_use]
    pub fn clock_increment(&self) -> SimTime {
        SimTime::from_nanos(self.clock_increment_ns)
    }
}

impl WorkersConfig {
    #[must_use]
    pub fn min_decision_interval(&self) -> SimTime {
        SimTime::from_nanos(self.min_decision_interval_ns)
    }

    #[must_use]
    pub fn max_decision_interval(&self) -> SimTime {
        SimTime::from_nanos(self.max_decision_interval_ns)
    }
}

fn default_classes() -> usize {
    20
}

fn default_min_instances() -> u32 {
    1
}

fn default_max_instances() -> u32 {
    10
}

fn default_shareable_probability() -> f64 {
    0.2
}

fn default_max_running() -> usize {
    18
}

fn default_max_launched() -> usize {
    200
}

fn default_termination_probability() -> f64 {
    0.1
}

fn default_request_probability() -> f64 {
    0.8
}

fn default_max_decision_interval_ns() -> u64 {
    250_000_000
}

fn default_detection_interval_ns() -> u64 {
    1_000_000_000
}

fn default_min_spawn_interval_ns() -> u64 {
    1_000_000
}

fn default_max_spawn_interval_ns() -> u64 {
    500_000_000
}

fn default_clock_increment_ns() -> u64 {
    50_000_000
}

fn default_tick_sleep_us() -> u64 {
    500
}

fn default_grants_per_table() -> usize {
    20
}

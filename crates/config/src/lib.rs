#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration for the ossim simulator
//!
//! Precedence, lowest to highest: built-in defaults, TOML file, `OSSIM_*`
//! environment variables, CLI flags (applied by the binary).

mod core;

pub use core::{Config, ResourcesConfig, SimulationConfig, WorkersConfig};

use ossim_errors::ConfigError;
use std::path::Path;
use tracing::debug;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|e| ConfigError::ReadFailed {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?;

        let config: Config = toml::from_str(&contents).map_err(|e| ConfigError::ParseFailed {
            message: e.to_string(),
        })?;

        debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a file if given, falling back to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if a path was given but could not be read or parsed.
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path).await,
            None => Ok(Self::default()),
        }
    }

    /// Merge `OSSIM_*` environment variables over the current values
    ///
    /// # Errors
    ///
    /// Returns an error if a recognized variable fails to parse.
    pub fn merge_env(&mut self) -> Result<(), ConfigError> {
        merge_env_var("OSSIM_CLASSES", &mut self.resources.classes)?;
        merge_env_var("OSSIM_MAX_RUNNING", &mut self.workers.max_running)?;
        merge_env_var("OSSIM_MAX_LAUNCHED", &mut self.workers.max_launched)?;
        if let Some(seed) = read_env_var::<u64>("OSSIM_SEED")? {
            self.simulation.seed = Some(seed);
        }
        Ok(())
    }

    /// Check that the configuration describes a runnable simulation
    ///
    /// # Errors
    ///
    /// Returns an error naming the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resources.classes == 0 {
            return Err(invalid("resources.classes", "must be at least 1"));
        }
        if self.resources.min_instances == 0 {
            return Err(invalid("resources.min_instances", "must be at least 1"));
        }
        if self.resources.min_instances > self.resources.max_instances {
            return Err(invalid(
                "resources.max_instances",
                "must be >= min_instances",
            ));
        }
        if !(0.0..=1.0).contains(&self.resources.shareable_probability) {
            return Err(invalid(
                "resources.shareable_probability",
                "must be in [0, 1]",
            ));
        }
        if self.workers.max_running == 0 {
            return Err(invalid("workers.max_running", "must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.workers.termination_probability) {
            return Err(invalid(
                "workers.termination_probability",
                "must be in [0, 1]",
            ));
        }
        if !(0.0..=1.0).contains(&self.workers.request_probability) {
            return Err(invalid("workers.request_probability", "must be in [0, 1]"));
        }
        if self.simulation.min_spawn_interval_ns > self.simulation.max_spawn_interval_ns {
            return Err(invalid(
                "simulation.max_spawn_interval_ns",
                "must be >= min_spawn_interval_ns",
            ));
        }
        if self.workers.min_decision_interval_ns > self.workers.max_decision_interval_ns {
            return Err(invalid(
                "workers.max_decision_interval_ns",
                "must be >= min_decision_interval_ns",
            ));
        }
        if self.simulation.clock_increment_ns == 0 {
            return Err(invalid("simulation.clock_increment_ns", "must be nonzero"));
        }
        Ok(())
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::Invalid {
        field: field.to_string(),
        message: message.to_string(),
    }
}

fn read_env_var<T: std::str::FromStr>(name: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv {
                name: name.to_string(),
                message: format!("could not parse {raw:?}"),
            }),
        Err(_) => Ok(None),
    }
}

fn merge_env_var<T: std::str::FromStr>(name: &str, slot: &mut T) -> Result<(), ConfigError> {
    if let Some(value) = read_env_var(name)? {
        *slot = value;
    }
    Ok(())
}

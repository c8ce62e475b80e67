//! CLI-level error type

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ossim_errors::ConfigError),

    #[error("simulation failed: {0}")]
    Simulation(#[from] ossim_errors::Error),

    #[error("simulation task panicked: {0}")]
    Join(#[from] tokio::task::JoinError),
}

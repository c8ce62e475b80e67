#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Error types for the ossim resource-management simulator
//!
//! This crate provides fine-grained error types organized by domain.
//! All simulator errors are logic defects or unrecoverable setup failures;
//! expected runtime conditions (an unsatisfiable request, a detected
//! deadlock) are ordinary control flow and never appear here.

use thiserror::Error;

pub mod config;
pub mod invariant;
pub mod protocol;
pub mod resolve;
pub mod spawn;

// Re-export all error types at the root
pub use config::ConfigError;
pub use invariant::InvariantError;
pub use protocol::ProtocolError;
pub use resolve::ResolveError;
pub use spawn::SpawnError;

/// Generic error type for cross-crate boundaries
#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Error {
    #[error("invariant error: {0}")]
    Invariant(#[from] InvariantError),

    #[error("resolve error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("spawn error: {0}")]
    Spawn(#[from] SpawnError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("internal error: {message}")]
    Internal { message: String },
}

impl Error {
    /// Create an internal error with a message
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

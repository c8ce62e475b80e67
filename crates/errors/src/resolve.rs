//! Deadlock resolution error types

use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResolveError {
    #[error("no victim selectable for non-empty deadlocked set {deadlocked:?}")]
    NoVictim { deadlocked: Vec<usize> },

    #[error("selected victim P{pid} has no live process slot")]
    DeadVictim { pid: usize },

    #[error("deadlocked P{pid} has no pending request on record")]
    MissingRequest { pid: usize },
}

//! Worker spawn and slot assignment error types

use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpawnError {
    #[error("no free process slot (max running: {max_running})")]
    NoFreeSlot { max_running: usize },

    #[error("slot {pid} is empty")]
    SlotEmpty { pid: usize },
}

//! Wire protocol error types

use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProtocolError {
    #[error("decoded resource id {resource} out of range (classes: {classes})")]
    ResourceOutOfRange { resource: usize, classes: usize },

    #[error("decoded zero quantity from payload {payload}")]
    ZeroQuantity { payload: i64 },

    #[error("quantity {quantity} exceeds encodable maximum {max}")]
    QuantityTooLarge { quantity: u32, max: u32 },

    #[error("message from unknown or reclaimed pid {pid}")]
    StalePid { pid: usize },

    #[error("reply channel for P{pid} is closed")]
    ReplyChannelClosed { pid: usize },
}

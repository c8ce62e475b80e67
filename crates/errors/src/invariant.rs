//! Resource bookkeeping invariant violations
//!
//! Any of these indicates a logic defect in the simulator, not a runtime
//! condition. The coordinator aborts the run when one surfaces.

use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InvariantError {
    #[error(
        "conservation violated for R{resource}: {available} available + {allocated} allocated != {instances} instances"
    )]
    ConservationViolated {
        resource: usize,
        available: u32,
        allocated: u32,
        instances: u32,
    },

    #[error("R{resource} has {available} available but only {instances} instances exist")]
    OverCapacity {
        resource: usize,
        available: u32,
        instances: u32,
    },

    #[error("P{pid} released {quantity} of R{resource} but holds only {held}")]
    OverRelease {
        pid: usize,
        resource: usize,
        quantity: u32,
        held: u32,
    },

    #[error("queued request for P{pid} has zero quantity")]
    ZeroQuantityQueued { pid: usize },

    #[error("P{pid} already has a pending request on R{resource}")]
    AlreadyPending { pid: usize, resource: usize },

    #[error("queue handle {handle} is not linked in any queue")]
    NotQueued { handle: usize },

    #[error("resource id {resource} out of range (classes: {classes})")]
    UnknownResource { resource: usize, classes: usize },

    #[error("pid {pid} out of range (max running: {max_running})")]
    UnknownPid { pid: usize, max_running: usize },
}

//! Domain events emitted by the simulation core

use ossim_clock::SimTime;
use serde::{Deserialize, Serialize};
use tracing::Level;

/// Everything the simulation core reports to the outside world
///
/// Quantities and ids are plain integers rather than references into the
/// core state so events can outlive the tick that produced them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SimEvent {
    /// A worker was bound to a logical pid and launched
    WorkerSpawned { pid: usize, launched: usize },

    /// The coordinator decoded a request from a worker
    RequestDetected {
        pid: usize,
        resource: usize,
        quantity: u32,
        time: SimTime,
    },

    /// A request was granted, immediately or from a wait queue
    Granted {
        pid: usize,
        resource: usize,
        quantity: u32,
        from_queue: bool,
        time: SimTime,
    },

    /// A request could not be met and was queued
    Enqueued {
        pid: usize,
        resource: usize,
        quantity: u32,
        available: u32,
    },

    /// A worker voluntarily released instances
    Released {
        pid: usize,
        resource: usize,
        quantity: u32,
        time: SimTime,
    },

    /// A terminating or killed worker's full holdings returned to the pool
    ///
    /// `released` is indexed by resource class, zeros included.
    Reclaimed { pid: usize, released: Vec<u32> },

    /// A worker terminated of its own accord
    WorkerCompleted { pid: usize },

    /// A detection pass is starting
    DetectionStarted { time: SimTime },

    /// The detector found these processes deadlocked
    DeadlockedSet { pids: Vec<usize> },

    /// The resolver is about to start killing victims
    ResolutionAttempt,

    /// The resolver killed this victim
    ProcessKilled { pid: usize },

    /// The system is deadlock-free again
    ResolutionSucceeded {
        killed: usize,
        running_at_start: usize,
    },

    /// Periodic allocation table snapshot, row per pid, column per class
    AllocationTable { rows: Vec<Vec<u32>> },

    /// The main loop exited
    SimulationEnded { launched: usize },
}

impl SimEvent {
    /// The tracing level a renderer should use for this event
    #[must_use]
    pub fn level(&self) -> Level {
        match self {
            SimEvent::DeadlockedSet { .. }
            | SimEvent::ResolutionAttempt
            | SimEvent::ProcessKilled { .. } => Level::WARN,
            SimEvent::WorkerSpawned { .. }
            | SimEvent::WorkerCompleted { .. }
            | SimEvent::DetectionStarted { .. }
            | SimEvent::ResolutionSucceeded { .. }
            | SimEvent::SimulationEnded { .. } => Level::INFO,
            SimEvent::RequestDetected { .. }
            | SimEvent::Granted { .. }
            | SimEvent::Enqueued { .. }
            | SimEvent::Released { .. }
            | SimEvent::Reclaimed { .. }
            | SimEvent::AllocationTable { .. } => Level::DEBUG,
        }
    }
}

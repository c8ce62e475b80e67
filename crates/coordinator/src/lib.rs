#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! The coordination loop of the ossim simulator
//!
//! One coordinator task owns the resource table, the slot table, and the
//! virtual clock tick; worker tasks own nothing and speak only over the
//! proto channels. Each tick the coordinator spawns workers on schedule,
//! drains inbound messages, runs deadlock detection on its interval, and
//! advances the clock - all under the clock lock, so workers observe time
//! moving only between ticks.

pub mod coordinator;
pub mod worker;

pub use coordinator::{Coordinator, RunSummary};
pub use worker::{spawn_worker, WorkerContext, WorkerHandle};

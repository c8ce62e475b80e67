#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Resource allocation bookkeeping for the ossim simulator
//!
//! This crate owns the correctness-critical state: per-class instance
//! counts, per-process allocations, FIFO wait queues of pending requests,
//! and the logical pid slot table. It is written to be single-writer - the
//! coordinator task is the only mutator - so nothing here takes a lock.
//!
//! The one invariant everything below defends: for every class,
//! `available + sum(allocations) == instances`, with no count ever
//! negative. Violations are logic defects and surface as `InvariantError`.

pub mod queue;
pub mod slots;
pub mod table;

pub use queue::{PendingRequest, QueueHandle, WaitQueue};
pub use slots::SlotTable;
pub use table::{ResourceClass, ResourceTable};

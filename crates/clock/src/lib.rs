#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Virtual clock for the ossim simulator
//!
//! Simulated time is a `{seconds, nanoseconds}` pair advanced by the
//! coordinator in fixed increments; it has no relationship to wall-clock
//! time, which is what lets tests drive the whole system deterministically.
//! The shared variant guards the time behind a mutex because both the
//! coordinator and every worker read it to decide when to act.

pub mod shared;
pub mod time;

pub use shared::SharedClock;
pub use time::SimTime;

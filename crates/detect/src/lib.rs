#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Deadlock detection and resolution for the ossim simulator
//!
//! Detection is the classic allocation/request reachability test over
//! matrix snapshots of the resource table. Resolution kills one victim at
//! a time and re-detects until the state is safe. Both halves are pure
//! with respect to I/O; everything observable goes out as events.

pub mod detector;
pub mod matrices;
pub mod resolver;

pub use detector::detect;
pub use matrices::Matrices;
pub use resolver::resolve;

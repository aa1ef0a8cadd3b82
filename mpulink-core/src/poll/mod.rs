//! Fixed-cadence poll loop
//!
//! Read, report, idle; forever.

pub mod runner;

pub use runner::{CycleOutcome, PollLoop, PollStats};

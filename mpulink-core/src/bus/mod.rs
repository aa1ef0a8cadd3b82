//! I2C transaction layer
//!
//! - [`engine`] sequences register-level primitives into transactions
//! - [`burst`] reads consecutive 16-bit registers in one transaction
//! - [`sim`] is a simulated peripheral for host-side testing

pub mod burst;
pub mod engine;
pub mod sim;

pub use burst::TrailingWord;
pub use engine::{BusEngine, BusFault, SpinBudget, TransactionPhase};

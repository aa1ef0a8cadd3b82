//! Configuration types
//!
//! There is no runtime configuration surface. Everything tunable is a
//! compile-time constant, grouped into plain structs with sensible defaults.

pub mod timing;

pub use timing::*;

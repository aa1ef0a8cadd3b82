//! Sensor abstraction traits
//!
//! These traits define the interface between the poll loop and concrete
//! sensor drivers.

pub mod motion;

pub use motion::{MotionSensor, Reading, READING_WORDS};

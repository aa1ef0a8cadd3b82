//! Board-agnostic core logic for the IMU telemetry firmware
//!
//! This crate contains all logic that does not depend on a specific
//! microcontroller:
//!
//! - I2C transaction engine and burst register reader
//! - Motion reading model and sensor trait
//! - Telemetry line formatting and link-gated reporting
//! - Fixed-cadence poll loop
//! - Fixed timing constants
//! - A simulated I2C peripheral for host-side testing

#![no_std]
#![deny(unsafe_code)]

// This mod MUST go first, so that the others see its macros.
mod fmt;

pub mod bus;
pub mod config;
pub mod poll;
pub mod telemetry;
pub mod traits;

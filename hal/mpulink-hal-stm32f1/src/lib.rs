//! STM32F1-specific HAL for the mpulink firmware
//!
//! This crate implements the `mpulink-hal` traits on top of embassy-stm32
//! for STM32F103 parts:
//!
//! - [`i2c::Stm32I2c`] - register-level I2C master on the v1 peripheral
//! - [`link::PipeLink`] - telemetry transport feeding the USB CDC endpoint
//!
//! # Features
//!
//! - `defmt` - Enable debug formatting support
//!
//! # Usage
//!
//! The firmware builds the embassy drivers (clocks, pins, USB device) and
//! hands them to these adapters. The adapters only add the pieces embassy
//! does not expose: single-step bus primitives and a non-blocking line
//! queue with a connection flag.

#![no_std]

pub mod i2c;
pub mod link;

// Re-export shared types from mpulink-hal
pub use mpulink_hal::{I2cConfig, LinkConfig};

//! mpulink Hardware Abstraction Layer
//!
//! This crate defines the hardware abstraction traits the board-agnostic
//! core is written against. Chip-specific HALs implement them for real
//! peripherals; `mpulink-core` implements them for a simulated bus so the
//! protocol logic can be tested on the host.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  mpulink-firmware / mpulink-core        │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  mpulink-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ mpulink-hal-  │       │  simulated    │
//! │   stm32f1     │       │  peripheral   │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`i2c::I2cPrimitives`] - Register-level I2C master operations
//! - [`link::TextLink`] - Outbound text transport (USB CDC, UART, ...)

#![no_std]
#![deny(unsafe_code)]

pub mod i2c;
pub mod link;

// Re-export key traits at crate root for convenience
pub use i2c::{Direction, I2cConfig, I2cPrimitives, StatusFlag};
pub use link::{LinkConfig, TextLink};

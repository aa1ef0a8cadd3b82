//! Board definition: STM32F103C8 "blue pill"
//!
//! - I2C1 on PB6 (SCL) / PB7 (SDA), MPU-6050 breakout at 0x68
//! - USB full-speed on PA11 (D-) / PA12 (D+), 1.5k pull-up fitted on D+

use mpulink_hal::I2cConfig;

/// External crystal
pub const HSE_HZ: u32 = 8_000_000;

/// Sensor bus
pub const I2C: I2cConfig = I2cConfig::FAST;

/// How long D+ is held low so the host re-enumerates after a reset
pub const USB_REENUMERATE_MS: u64 = 10;

/// USB identity
pub const USB_VID: u16 = 0xc0de;
pub const USB_PID: u16 = 0xcafe;
pub const USB_MANUFACTURER: &str = "mpulink";
pub const USB_PRODUCT: &str = "MPU-6050 telemetry";
pub const USB_SERIAL: &str = "00000001";

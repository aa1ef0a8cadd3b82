//! Sensor driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in mpulink-core:
//!
//! - Motion sensors (MPU-6050 over I2C)

#![no_std]
#![deny(unsafe_code)]

pub mod sensor;

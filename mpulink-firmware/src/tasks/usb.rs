//! USB device task
//!
//! Runs the embassy-usb device state machine (enumeration, control
//! requests, suspend/resume). Class traffic is handled by other tasks.

use defmt::*;
use embassy_stm32::peripherals::USB;
use embassy_stm32::usb::Driver;
use embassy_usb::UsbDevice;

/// USB driver for this chip
pub type UsbDriver = Driver<'static, USB>;

/// USB device task - never returns
#[embassy_executor::task]
pub async fn usb_task(mut usb: UsbDevice<'static, UsbDriver>) {
    info!("USB task started");
    usb.run().await
}

//! CDC transmit task
//!
//! Tracks whether the host has the serial interface open and forwards
//! queued telemetry to the bulk IN endpoint while it does. Anything
//! queued while the link is down is discarded on reconnect.

use defmt::*;
use embassy_usb::class::cdc_acm::CdcAcmClass;
use mpulink_hal_stm32f1::link::forward_pipe;
use portable_atomic::Ordering;

use super::UsbDriver;
use crate::channels::{LINK_UP, TX_PIPE};

/// CDC transmit task
#[embassy_executor::task]
pub async fn cdc_tx_task(mut class: CdcAcmClass<'static, UsbDriver>) {
    info!("CDC TX task started");

    loop {
        class.wait_connection().await;
        TX_PIPE.clear();
        LINK_UP.store(true, Ordering::Relaxed);
        info!("Host connected");

        let err = forward_pipe(&mut class, &TX_PIPE).await;

        LINK_UP.store(false, Ordering::Relaxed);
        warn!("Host link lost: {}", Debug2Format(&err));
    }
}

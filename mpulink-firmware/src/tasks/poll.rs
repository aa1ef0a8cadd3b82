//! Sensor poll task
//!
//! Owns the sensor and the telemetry reporter. Setup, settle, banner and
//! the fixed-interval loop all live in [`PollLoop::run`].

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::Delay;
use mpulink_core::poll::PollLoop;
use mpulink_drivers::sensor::Mpu6050;
use mpulink_hal_stm32f1::i2c::Stm32I2c;
use mpulink_hal_stm32f1::link::PipeLink;

use crate::channels::TX_PIPE_SIZE;

/// Poll loop as wired on this board
pub type FirmwarePoll =
    PollLoop<Mpu6050<Stm32I2c<'static>>, PipeLink<'static, CriticalSectionRawMutex, TX_PIPE_SIZE>>;

/// Sensor poll task - never returns
#[embassy_executor::task]
pub async fn poll_task(poll: FirmwarePoll) {
    defmt::info!("Poll task started");
    poll.run(Delay).await
}

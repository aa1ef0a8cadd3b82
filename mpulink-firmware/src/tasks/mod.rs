//! Embassy async tasks
//!
//! Each task runs independently and communicates via the statics in
//! [`crate::channels`].

pub mod cdc_tx;
pub mod poll;
pub mod usb;

pub use cdc_tx::cdc_tx_task;
pub use poll::{poll_task, FirmwarePoll};
pub use usb::{usb_task, UsbDriver};

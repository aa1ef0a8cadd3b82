//! Telemetry output
//!
//! Formats readings as text lines and hands them to a [`TextLink`]
//! (`mpulink_hal::TextLink`) on a best-effort basis.

pub mod reporter;

pub use reporter::{format_line, Reporter, LINE_CAPACITY};

//! Poll cadence and bus timing

/// Delay between the end of one poll cycle and the start of the next
pub const POLL_INTERVAL_MS: u32 = 20;

/// Time given to the sensor and the USB host after setup, before the
/// first reading is taken
pub const SETTLE_DELAY_MS: u32 = 3000;

/// Maximum number of status-flag polls before a wait is abandoned
///
/// One byte at 400 kHz takes ~23 µs; at 72 MHz this budget is several
/// milliseconds, far beyond any healthy transfer.
pub const DEFAULT_MAX_POLLS: u32 = 100_000;

/// Log reporter/fault counters every N cycles (~10 s at 20 ms)
pub const STATS_EVERY_CYCLES: u32 = 500;

/// Status line sent once setup has finished
pub const SETUP_BANNER: &str = "Setup ok.\n";

/// Poll loop configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollConfig {
    /// Idle delay between cycles (ms)
    pub interval_ms: u32,
    /// Delay between sensor setup and the first cycle (ms)
    pub settle_ms: u32,
    /// Counter logging period in cycles (0 disables)
    pub stats_every: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: POLL_INTERVAL_MS,
            settle_ms: SETTLE_DELAY_MS,
            stats_every: STATS_EVERY_CYCLES,
        }
    }
}

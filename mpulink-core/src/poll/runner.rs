//! Poll loop runner
//!
//! Owns the sensor and the reporter for the lifetime of the program. The
//! only way out of [`PollLoop::run`] is a reset.

use embedded_hal_async::delay::DelayNs;
use mpulink_hal::link::TextLink;

use crate::bus::BusFault;
use crate::config::{PollConfig, SETUP_BANNER};
use crate::telemetry::Reporter;
use crate::traits::{MotionSensor, Reading};

/// Result of a single poll cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CycleOutcome {
    /// A complete reading was taken and handed to the reporter
    Reported(Reading),
    /// The read failed; nothing was reported
    Faulted(BusFault),
}

/// Counters kept across cycles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollStats {
    /// Cycles run
    pub cycles: u32,
    /// Cycles whose read failed
    pub faults: u32,
    /// Most recent read failure
    pub last_fault: Option<BusFault>,
}

/// Poll loop over one sensor and one transport
pub struct PollLoop<S, L> {
    sensor: S,
    reporter: Reporter<L>,
    config: PollConfig,
    stats: PollStats,
}

impl<S: MotionSensor, L: TextLink> PollLoop<S, L> {
    /// Create a poll loop; nothing touches the bus until [`setup`](Self::setup)
    pub fn new(sensor: S, reporter: Reporter<L>, config: PollConfig) -> Self {
        Self {
            sensor,
            reporter,
            config,
            stats: PollStats::default(),
        }
    }

    /// One-time sensor setup
    pub fn setup(&mut self) -> Result<(), BusFault> {
        self.sensor.configure()
    }

    /// Setup, settle, and announce readiness
    ///
    /// A setup fault is returned but the banner is still announced; the
    /// loop runs either way and each cycle reports its own faults.
    pub async fn start<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), BusFault> {
        let result = self.setup();
        delay.delay_ms(self.config.settle_ms).await;
        self.reporter.announce(SETUP_BANNER);
        result
    }

    /// Read one sample and report it
    ///
    /// Failed reads are counted and never reach the reporter.
    pub fn cycle(&mut self) -> CycleOutcome {
        self.stats.cycles = self.stats.cycles.wrapping_add(1);

        match self.sensor.read_motion() {
            Ok(reading) => {
                self.reporter.report(&reading);
                CycleOutcome::Reported(reading)
            }
            Err(fault) => {
                self.stats.faults = self.stats.faults.wrapping_add(1);
                self.stats.last_fault = Some(fault);
                CycleOutcome::Faulted(fault)
            }
        }
    }

    /// Run forever: start, then cycle at the configured interval
    pub async fn run<D: DelayNs>(mut self, mut delay: D) -> ! {
        match self.start(&mut delay).await {
            Ok(()) => info!("Sensor configured"),
            Err(fault) => warn!("Sensor setup failed: {}", fault),
        }

        loop {
            match self.cycle() {
                CycleOutcome::Reported(reading) => {
                    trace_reading(&reading);
                }
                CycleOutcome::Faulted(fault) => {
                    warn!("Burst read failed: {}", fault);
                }
            }

            if self.config.stats_every != 0 && self.stats.cycles % self.config.stats_every == 0 {
                debug!(
                    "Poll stats: cycles={}, faults={}, sent={}, dropped={}",
                    self.stats.cycles,
                    self.stats.faults,
                    self.reporter.sent(),
                    self.reporter.dropped()
                );
            }

            delay.delay_ms(self.config.interval_ms).await;
        }
    }

    /// Counters so far
    pub fn stats(&self) -> PollStats {
        self.stats
    }

    /// Borrow the reporter
    pub fn reporter(&self) -> &Reporter<L> {
        &self.reporter
    }

    /// Borrow the sensor
    pub fn sensor(&self) -> &S {
        &self.sensor
    }
}

#[inline]
fn trace_reading(_reading: &Reading) {
    #[cfg(feature = "defmt")]
    defmt::trace!("Reading: {}", _reading);
}

//! Performance metrics collection for the simulation.
//!
//! Provides structured logging and metrics tracking for monitoring
//! experiment progress and health.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Metrics collector for experiment statistics.
pub struct Metrics {
    cycle_count: AtomicU64,
    live_count: AtomicU64,
    dead_count: AtomicU64,
    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    /// Creates a new metrics collector.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cycle_count: AtomicU64::new(0),
            live_count: AtomicU64::new(0),
            dead_count: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Records a completed cycle with its duration.
    pub fn record_cycle(&self, duration: Duration, live: usize, dead: u64) {
        self.cycle_count.fetch_add(1, Ordering::Relaxed);
        self.live_count.store(live as u64, Ordering::Relaxed);
        self.dead_count.store(dead, Ordering::Relaxed);

        // Log at info level every 100 cycles
        let cycle = self.cycle_count.load(Ordering::Relaxed);
        if cycle % 100 == 0 {
            tracing::info!(
                cycle = cycle,
                live = live,
                dead = dead,
                duration_us = duration.as_micros() as u64,
                "Simulation cycle"
            );
        }
    }

    /// Gets the number of cycles recorded so far.
    #[must_use]
    pub fn cycle_count(&self) -> u64 {
        self.cycle_count.load(Ordering::Relaxed)
    }

    /// Gets the live-agent count from the last recorded cycle.
    #[must_use]
    pub fn live_count(&self) -> u64 {
        self.live_count.load(Ordering::Relaxed)
    }

    /// Gets elapsed time since metrics creation.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Initialize tracing subscriber for logging.
pub fn init_logging() {
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(tracing::Level::INFO)
            .finish(),
    )
    .ok();
}

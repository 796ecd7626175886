//! Heartbeat logging for the keeper loop

use std::time::{Duration, Instant};

/// Tracks heartbeat intervals for periodic status logging.
pub struct Heartbeat {
    interval: Duration,
    last_beat: Instant,
}

impl Heartbeat {
    pub fn new(interval_secs: u64) -> Self {
        Self {
            interval: Duration::from_secs(interval_secs),
            last_beat: Instant::now(),
        }
    }

    /// Whether enough time has passed since the last beat.
    pub fn should_beat(&self) -> bool {
        self.last_beat.elapsed() >= self.interval
    }

    /// Record a beat at the current time.
    pub fn beat(&mut self) {
        self.last_beat = Instant::now();
    }
}

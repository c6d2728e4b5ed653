//! Periodic tick source driving the game engine
//!
//! A `TickSource` is polled from the host's `tokio::select!` loop. While it is
//! stopped its `tick` future never resolves, so a stopped source can stay in
//! the select without delivering anything.

use std::future;
use std::time::Duration;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

pub struct TickSource {
    period: Duration,
    interval: Option<Interval>,
}

impl TickSource {
    /// Create a stopped source with the given period
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            interval: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_running(&self) -> bool {
        self.interval.is_some()
    }

    /// Start (or restart) ticking; the first tick arrives one period from now
    pub fn start(&mut self) {
        let mut interval = interval_at(Instant::now() + self.period, self.period);
        // A slow frame should delay the game, not make it jump several cells.
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.interval = Some(interval);
    }

    /// Stop ticking; no tick is delivered until the next `start`
    pub fn stop(&mut self) {
        self.interval = None;
    }

    /// Change the period, restarting the cadence if the source is running
    pub fn set_period(&mut self, period: Duration) {
        self.period = period;
        if self.is_running() {
            self.start();
        }
    }

    /// Wait for the next tick
    ///
    /// Pends forever while stopped. Cancel-safe: dropping the future loses no tick.
    pub async fn tick(&mut self) -> Instant {
        match self.interval.as_mut() {
            Some(interval) => interval.tick().await,
            None => future::pending().await,
        }
    }
}

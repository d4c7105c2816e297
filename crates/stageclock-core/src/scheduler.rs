//! Periodic tick source for a running timer.
//!
//! The scheduler is armed while the engine runs and disarmed otherwise.
//! Disarming drops the underlying interval immediately, so a paused or
//! reset timer never sees a stale tick.

use std::time::Duration;

use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

/// Nominal UI cadence.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(200);

#[derive(Debug)]
pub struct TickScheduler {
    period: Duration,
    interval: Option<Interval>,
}

impl TickScheduler {
    /// A zero period is bumped to one millisecond.
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
            interval: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_armed(&self) -> bool {
        self.interval.is_some()
    }

    /// Start ticking one period from now. No-op when already armed.
    pub fn arm(&mut self) {
        if self.interval.is_none() {
            let mut interval = interval_at(Instant::now() + self.period, self.period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            self.interval = Some(interval);
        }
    }

    pub fn disarm(&mut self) {
        self.interval = None;
    }

    /// Arm while `running`, disarm otherwise.
    pub fn sync(&mut self, running: bool) {
        if running {
            self.arm();
        } else {
            self.disarm();
        }
    }

    /// Wait for the next tick. Never resolves while disarmed, which keeps a
    /// `tokio::select!` branch inert. Cancel safe.
    pub async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}

impl Default for TickScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn ticks_on_cadence_while_armed() {
        let mut scheduler = TickScheduler::default();
        scheduler.arm();
        let start = Instant::now();
        scheduler.tick().await;
        scheduler.tick().await;
        assert_eq!(start.elapsed(), Duration::from_millis(400));
    }

    #[tokio::test(start_paused = true)]
    async fn disarmed_scheduler_never_ticks() {
        let mut scheduler = TickScheduler::default();
        scheduler.arm();
        scheduler.sync(false);
        assert!(!scheduler.is_armed());
        let outcome = tokio::time::timeout(Duration::from_secs(5), scheduler.tick()).await;
        assert!(outcome.is_err());
    }

    #[test]
    fn zero_period_is_bumped() {
        assert_eq!(TickScheduler::new(Duration::ZERO).period(), Duration::from_millis(1));
    }
}

//! Periodic tick sources.
//!
//! The engine only tells its tick source when to start and stop. Whoever owns
//! the engine waits for firings and forwards each one to `CountdownEngine::tick`.
//! Because start/stop and tick delivery happen on the same execution context,
//! a stopped source can never deliver another firing.

use std::time::Duration;

use tokio::time::{Instant, Interval, MissedTickBehavior};

/// Interval between two countdown ticks.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

pub trait TickSource {
    /// Arm the source so it fires every `period`, first firing one period from now.
    fn start(&mut self, period: Duration);
    /// Disarm the source. No firing is delivered after this returns.
    fn stop(&mut self);
    fn is_active(&self) -> bool;
}

/// Tick source that never fires on its own.
///
/// Tests drive the engine by calling `tick()` directly and use this to check
/// that the engine armed and disarmed its source at the right moments.
#[derive(Debug, Clone, Default)]
pub struct ManualTicks {
    period: Option<Duration>,
    starts: usize,
    stops: usize,
}

impl ManualTicks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn period(&self) -> Option<Duration> {
        self.period
    }

    pub fn start_count(&self) -> usize {
        self.starts
    }

    pub fn stop_count(&self) -> usize {
        self.stops
    }
}

impl TickSource for ManualTicks {
    fn start(&mut self, period: Duration) {
        self.period = Some(period);
        self.starts += 1;
    }

    fn stop(&mut self) {
        self.period = None;
        self.stops += 1;
    }

    fn is_active(&self) -> bool {
        self.period.is_some()
    }
}

/// Tick source backed by a tokio interval.
///
/// Delayed firings are not caught up: if the runtime stalls for several
/// periods, the next `fired()` resolves once and the schedule shifts.
#[derive(Debug, Default)]
pub struct IntervalTicks {
    interval: Option<Interval>,
}

impl IntervalTicks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve on the next firing. Pending forever while stopped.
    ///
    /// Cancel safe, so it can sit in a `tokio::select!` loop.
    pub async fn fired(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}

impl TickSource for IntervalTicks {
    fn start(&mut self, period: Duration) {
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.interval = Some(interval);
    }

    fn stop(&mut self) {
        self.interval = None;
    }

    fn is_active(&self) -> bool {
        self.interval.is_some()
    }
}

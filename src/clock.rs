use std::time::{Duration, Instant};

/// Fixed-interval tick scheduler driven by the caller's notion of "now".
///
/// The engine only reports interval changes; this type owns the timing.
#[derive(Debug, Clone, Copy)]
pub struct TickClock {
    interval: Duration,
    last_tick: Instant,
}

impl TickClock {
    #[must_use]
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            last_tick: now,
        }
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns true once a full interval has elapsed since the last tick.
    #[must_use]
    pub fn is_due(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last_tick) >= self.interval
    }

    /// Time left until the next tick is due.
    #[must_use]
    pub fn time_until_due(&self, now: Instant) -> Duration {
        self.interval
            .saturating_sub(now.saturating_duration_since(self.last_tick))
    }

    /// Records that a tick happened at `now`.
    pub fn mark(&mut self, now: Instant) {
        self.last_tick = now;
    }

    /// Switches to a new interval, measured from `now`.
    pub fn rearm(&mut self, interval: Duration, now: Instant) {
        self.interval = interval;
        self.last_tick = now;
    }
}

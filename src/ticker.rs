use std::time::{Duration, Instant};

/// Interval of the process-wide clock
pub const TICK_MS: u64 = 1000;

/// How long the event loop waits for input before checking the clock
pub const POLL_MS: u64 = 100;

pub fn tick_duration() -> Duration {
    Duration::from_millis(TICK_MS)
}

pub fn poll_duration() -> Duration {
    Duration::from_millis(POLL_MS)
}

/// Cancelable repeating 1 Hz clock.
///
/// The event loop polls it; each call reports how many whole ticks fell due
/// since the previous one, so a slow frame never loses seconds.
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    next_due: Instant,
    cancelled: bool,
}

impl Ticker {
    pub fn start(now: Instant) -> Self {
        Self::with_interval(tick_duration(), now)
    }

    pub fn with_interval(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            next_due: now + interval,
            cancelled: false,
        }
    }

    /// Number of ticks due at `now`; advances the schedule past them
    pub fn due_ticks(&mut self, now: Instant) -> u32 {
        if self.cancelled {
            return 0;
        }
        let mut due = 0;
        while now >= self.next_due {
            due += 1;
            self.next_due += self.interval;
        }
        due
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_duration() {
        assert_eq!(tick_duration(), Duration::from_secs(1));
    }

    #[test]
    fn test_due_ticks() {
        let start = Instant::now();
        let mut ticker = Ticker::start(start);

        assert_eq!(ticker.due_ticks(start), 0);
        assert_eq!(ticker.due_ticks(start + Duration::from_millis(999)), 0);
        assert_eq!(ticker.due_ticks(start + Duration::from_millis(1000)), 1);
        // Already consumed
        assert_eq!(ticker.due_ticks(start + Duration::from_millis(1500)), 0);
        // A stalled frame catches up
        assert_eq!(ticker.due_ticks(start + Duration::from_millis(4200)), 3);
    }

    #[test]
    fn test_cancel_stops_ticks() {
        let start = Instant::now();
        let mut ticker = Ticker::start(start);
        ticker.cancel();
        assert!(ticker.is_cancelled());
        assert_eq!(ticker.due_ticks(start + Duration::from_secs(10)), 0);
    }
}

//! Fixed interval tick scheduling

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::time::{Duration, Instant};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Decides when the next tick runs.
///
/// Ticks are never caught up: if the host polls late the tick runs once and
/// the interval restarts from that poll.
#[derive(Debug, Clone)]
pub struct Scheduler {
    interval: Duration,
    last: Option<Instant>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Scheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Change the interval. The current period is measured against the new value.
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    /// Whether a tick is due at `now`, marking it as run if so.
    pub fn poll(&mut self, now: Instant) -> bool {
        if is_due(self.last, now, self.interval) {
            self.last = Some(now);
            true
        }
        else {
            false
        }
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Whether at least `interval` has passed between the `last` tick and `now`.
///
/// The first tick, with no `last`, is always due.
pub fn is_due(last: Option<Instant>, now: Instant, interval: Duration) -> bool {
    match last {
        Some(l) => now.saturating_duration_since(l) >= interval,
        None => true
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_is_due() {
        let t0 = Instant::now();
        let interval = Duration::from_millis(50);

        assert!(is_due(None, t0, interval));
        assert!(!is_due(Some(t0), t0, interval));
        assert!(!is_due(Some(t0), t0 + Duration::from_millis(49), interval));
        assert!(is_due(Some(t0), t0 + interval, interval));

        // A clock going backwards is never due
        assert!(!is_due(Some(t0 + interval), t0, interval));
    }

    #[test]
    fn test_missed_ticks_are_dropped() {
        let t0 = Instant::now();
        let mut s = Scheduler::new(Duration::from_millis(50));

        assert!(s.poll(t0));

        // Polled three periods late, only one tick runs
        let late = t0 + Duration::from_millis(150);
        assert!(s.poll(late));
        assert!(!s.poll(late + Duration::from_millis(10)));
        assert!(s.poll(late + Duration::from_millis(50)));
    }
}

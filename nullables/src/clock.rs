//! Nullable clock: deterministic time for testing.

use quorum_types::Timestamp;
use std::sync::atomic::{AtomicU64, Ordering};

/// A deterministic clock. Shareable across threads; time only advances when you tell it to.
#[derive(Debug)]
pub struct NullClock {
    current: AtomicU64,
}

impl NullClock {
    pub fn new(initial_secs: u64) -> Self {
        Self {
            current: AtomicU64::new(initial_secs),
        }
    }

    pub fn now(&self) -> Timestamp {
        Timestamp::new(self.current.load(Ordering::SeqCst))
    }

    /// Advance time by `secs`, saturating at `u64::MAX`, and return the new time.
    pub fn advance(&self, secs: u64) -> Timestamp {
        let previous = self
            .current
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |t| Some(t.saturating_add(secs)))
            .unwrap_or_else(|t| t);
        Timestamp::new(previous.saturating_add(secs))
    }

    pub fn set(&self, secs: u64) {
        self.current.store(secs, Ordering::SeqCst);
    }
}

impl Default for NullClock {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_moves_only_on_demand() {
        let clock = NullClock::new(100);
        assert_eq!(clock.now(), Timestamp::new(100));
        assert_eq!(clock.now(), Timestamp::new(100));
        assert_eq!(clock.advance(5), Timestamp::new(105));
        clock.set(u64::MAX - 1);
        assert_eq!(clock.advance(10), Timestamp::new(u64::MAX));
        assert_eq!(clock.now(), Timestamp::new(u64::MAX));
        clock.set(1);
        assert_eq!(clock.now(), Timestamp::new(1));
    }
}

use std::time::{SystemTime, UNIX_EPOCH};

/// Wall clock abstraction for staleness checks and alert cooldowns.
///
/// `now_ms()` is milliseconds since the Unix epoch, the unit every persisted
/// timestamp uses.
pub trait Clock {
    fn now_ms(&self) -> i64;
}

/// Real clock backed by `SystemTime`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl SystemClock {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    #[inline]
    fn now_ms(&self) -> i64 {
        // Clock before 1970 only happens on a misconfigured host; report the epoch.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
            .unwrap_or(0)
    }
}

pub mod manual {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// Deterministic clock whose time is set and advanced by hand.
    /// Clones share the same time.
    #[derive(Debug, Clone, Default)]
    pub struct ManualClock {
        now_ms: Arc<Mutex<i64>>,
    }

    impl ManualClock {
        pub fn new(start_ms: i64) -> Self {
            Self {
                now_ms: Arc::new(Mutex::new(start_ms)),
            }
        }

        /// Advance the clock by the given duration.
        pub fn advance(&self, d: Duration) {
            let step = i64::try_from(d.as_millis()).unwrap_or(i64::MAX);
            if let Ok(mut now) = self.now_ms.lock() {
                *now = now.saturating_add(step);
            }
        }

        /// Set the absolute time in epoch milliseconds.
        pub fn set(&self, ms: i64) {
            if let Ok(mut now) = self.now_ms.lock() {
                *now = ms;
            }
        }
    }

    impl Clock for ManualClock {
        fn now_ms(&self) -> i64 {
            self.now_ms.lock().map(|g| *g).unwrap_or(0)
        }
    }

}

use std::sync::Mutex;

use time::OffsetDateTime;

/// Source of the current time for everything token-related.
///
/// Token issuance and expiry checks never read system time directly; they go
/// through this trait so tests can pin the clock to an exact instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> OffsetDateTime;
}

/// Wall-clock time. The production clock.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// A clock that only moves when told to.
pub struct FixedClock {
    current: Mutex<OffsetDateTime>,
}

impl FixedClock {
    pub fn new(start: OffsetDateTime) -> Self {
        Self {
            current: Mutex::new(start),
        }
    }

    pub fn set(&self, now: OffsetDateTime) {
        *self.current.lock().expect("clock lock poisoned") = now;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        *self.current.lock().expect("clock lock poisoned")
    }
}

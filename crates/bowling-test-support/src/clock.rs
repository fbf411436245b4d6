//! Test clock: deterministic `Clock` implementation for tests.

use bowling_core::clock::Clock;
use chrono::{DateTime, TimeZone, Utc};

/// A clock that always returns a fixed point in time.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// The timestamp shared by tests that do not care about a particular time.
///
/// # Panics
///
/// Never in practice; the literal date is valid.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()
}

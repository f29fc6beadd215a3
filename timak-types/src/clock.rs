//! Write-local clock for `modified` stamps.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch according to the system clock.
///
/// A system clock set before the epoch reads as 0.
#[must_use]
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

/// Source of `modified` stamps for local writes.
///
/// Readings are physical milliseconds, but never repeat and never go
/// backwards for a given clock: if the system clock stalls or steps back, the
/// clock advances by one millisecond past its previous reading instead.
#[derive(Debug, Default)]
pub struct WriteClock {
    last: AtomicI64,
}

impl WriteClock {
    /// Creates a clock that has not issued any reading yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a clock whose next reading is strictly greater than `last`.
    #[must_use]
    pub fn starting_after(last: i64) -> Self {
        Self {
            last: AtomicI64::new(last),
        }
    }

    /// Returns the next reading.
    pub fn tick(&self) -> i64 {
        let now = now_millis();
        let mut last = self.last.load(Ordering::Relaxed);
        loop {
            let next = if now > last { now } else { last.saturating_add(1) };
            match self
                .last
                .compare_exchange_weak(last, next, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return next,
                Err(current) => last = current,
            }
        }
    }

    /// Returns the most recent reading without advancing the clock.
    #[must_use]
    pub fn last(&self) -> i64 {
        self.last.load(Ordering::Acquire)
    }
}

//! Score normalization.
//!
//! Integers are used as-is. Timestamp-like values become integer
//! milliseconds since the Unix epoch. Callers are responsible for using one
//! unit consistently within a timeline.

use chrono::{DateTime, TimeZone};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::{Error, Result};

/// A value that can be normalized into an integer score.
pub trait IntoScore {
    /// Normalizes `self`, failing if it does not fit an `i64`.
    fn into_score(self) -> Result<i64>;
}

impl IntoScore for i64 {
    fn into_score(self) -> Result<i64> {
        Ok(self)
    }
}

impl IntoScore for i32 {
    fn into_score(self) -> Result<i64> {
        Ok(i64::from(self))
    }
}

impl IntoScore for u32 {
    fn into_score(self) -> Result<i64> {
        Ok(i64::from(self))
    }
}

impl IntoScore for u64 {
    fn into_score(self) -> Result<i64> {
        i64::try_from(self)
            .map_err(|_| Error::InvalidEntry(format!("score {self} does not fit in i64")))
    }
}

impl IntoScore for usize {
    fn into_score(self) -> Result<i64> {
        i64::try_from(self)
            .map_err(|_| Error::InvalidEntry(format!("score {self} does not fit in i64")))
    }
}

impl<Tz: TimeZone> IntoScore for DateTime<Tz> {
    fn into_score(self) -> Result<i64> {
        Ok(self.timestamp_millis())
    }
}

impl<Tz: TimeZone> IntoScore for &DateTime<Tz> {
    fn into_score(self) -> Result<i64> {
        Ok(self.timestamp_millis())
    }
}

/// Rounds toward negative infinity, matching `DateTime::timestamp_millis`,
/// so an instant before the epoch scores the same through either type.
impl IntoScore for SystemTime {
    fn into_score(self) -> Result<i64> {
        let overflow =
            || Error::InvalidEntry("timestamp out of range for a millisecond score".into());
        match self.duration_since(UNIX_EPOCH) {
            Ok(after) => i64::try_from(after.as_millis()).map_err(|_| overflow()),
            Err(before) => {
                let before = before.duration();
                let partial = u128::from(before.subsec_nanos() % 1_000_000 != 0);
                i64::try_from(before.as_millis() + partial)
                    .map(|ms| -ms)
                    .map_err(|_| overflow())
            }
        }
    }
}

//! Scheduling horizon and timestamp conversion.
//!
//! The horizon fixes the epoch: every other time in the engine is an
//! integer minute offset from `start`. Conversion back to absolute
//! timestamps happens only at the API boundary, in the result compiler.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// The bounded scheduling window.
///
/// `start` is the epoch (offset 0); `end` bounds every assignment.
/// Construction does not validate ordering, the request validator
/// rejects inverted horizons before the engine sees them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Horizon {
    /// Horizon start (offset 0).
    pub start: DateTime<Utc>,
    /// Horizon end (exclusive upper bound for assignment ends).
    pub end: DateTime<Utc>,
}

impl Horizon {
    /// Creates a new horizon.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Horizon length in whole minutes.
    pub fn length_min(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Converts a timestamp to its minute offset from the horizon start.
    ///
    /// Sub-minute precision is truncated; the wire format is expected to
    /// carry minute-aligned instants.
    pub fn offset_of(&self, instant: DateTime<Utc>) -> i64 {
        (instant - self.start).num_minutes()
    }

    /// Converts a minute offset back to an absolute timestamp.
    pub fn timestamp_of(&self, offset_min: i64) -> DateTime<Utc> {
        self.start + Duration::minutes(offset_min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Horizon {
        Horizon::new(
            Utc.with_ymd_and_hms(2026, 3, 2, 6, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 4, 6, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_length() {
        assert_eq!(sample().length_min(), 48 * 60);
    }

    #[test]
    fn test_offset_of() {
        let h = sample();
        assert_eq!(h.offset_of(h.start), 0);
        let t = Utc.with_ymd_and_hms(2026, 3, 2, 7, 30, 0).unwrap();
        assert_eq!(h.offset_of(t), 90);
    }

    #[test]
    fn test_round_trip_identity() {
        let h = sample();
        for offset in [0, 1, 90, 1439, h.length_min()] {
            assert_eq!(h.offset_of(h.timestamp_of(offset)), offset);
        }
        let t = Utc.with_ymd_and_hms(2026, 3, 3, 12, 15, 0).unwrap();
        assert_eq!(h.timestamp_of(h.offset_of(t)), t);
    }
}

//! Half-open time intervals and slot search.
//!
//! All engine arithmetic happens on intervals `[start, end)` expressed in
//! whole minutes from the horizon start. Calendar windows, occupied busy
//! periods, and assignments all share this representation.
//!
//! # Invariants
//! A normalized interval list is sorted by start and non-overlapping.
//! `merge` establishes that invariant; everything downstream relies on it.

use serde::{Deserialize, Serialize};

/// A time interval `[start, end)` in minute offsets.
///
/// Half-open: includes start, excludes end. Two intervals that merely
/// touch do not overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    /// Interval start (minutes, inclusive).
    pub start_min: i64,
    /// Interval end (minutes, exclusive).
    pub end_min: i64,
}

impl Interval {
    /// Creates a new interval.
    pub fn new(start_min: i64, end_min: i64) -> Self {
        Self { start_min, end_min }
    }

    /// Duration of this interval (minutes).
    #[inline]
    pub fn duration_min(&self) -> i64 {
        self.end_min - self.start_min
    }

    /// Whether a minute offset falls within this interval.
    #[inline]
    pub fn contains(&self, offset_min: i64) -> bool {
        offset_min >= self.start_min && offset_min < self.end_min
    }

    /// Whether another interval lies fully inside this one.
    #[inline]
    pub fn encloses(&self, other: &Self) -> bool {
        other.start_min >= self.start_min && other.end_min <= self.end_min
    }

    /// Whether two intervals overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start_min < other.end_min && other.start_min < self.end_min
    }
}

/// Merges overlapping and adjacent intervals into a sorted, disjoint list.
///
/// Zero-length input intervals vanish into whatever neighbors they touch;
/// empty input yields empty output. Merging an already-merged list is a
/// no-op.
pub fn merge(mut intervals: Vec<Interval>) -> Vec<Interval> {
    if intervals.is_empty() {
        return Vec::new();
    }

    intervals.sort_by_key(|iv| iv.start_min);
    let mut merged: Vec<Interval> = Vec::with_capacity(intervals.len());
    merged.push(intervals[0]);

    for next in intervals.into_iter().skip(1) {
        let last = merged.last_mut().unwrap();
        if next.start_min <= last.end_min {
            last.end_min = last.end_min.max(next.end_min);
        } else {
            merged.push(next);
        }
    }

    merged
}

/// Finds the earliest offset where `[offset, offset + duration)` fits
/// inside a calendar window without touching any occupied interval.
///
/// Windows are scanned in order; a window ending at or before
/// `earliest_start_min` is skipped outright. Within a window the cursor
/// starts at `max(window.start, earliest_start_min)` and walks forward
/// past each occupied interval that blocks the remaining space.
///
/// Returns `None` when no window admits the duration anywhere.
pub fn find_earliest_slot(
    calendar: &[Interval],
    occupied: &[Interval],
    duration_min: i64,
    earliest_start_min: i64,
) -> Option<i64> {
    let occupied = merge(occupied.to_vec());

    for window in calendar {
        if window.end_min <= earliest_start_min {
            continue;
        }

        let mut cursor = window.start_min.max(earliest_start_min);
        for busy in &occupied {
            if busy.end_min <= cursor {
                continue;
            }
            if busy.start_min >= window.end_min {
                break;
            }
            if cursor + duration_min <= busy.start_min {
                // Fits in front of this busy interval.
                break;
            }
            cursor = cursor.max(busy.end_min);
        }

        if cursor + duration_min <= window.end_min {
            return Some(cursor);
        }
    }

    None
}

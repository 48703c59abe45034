//! Statistics calculation engine.
//!
//! Computes the weekday presence reports from a parsed [`Dataset`](crate::models::Dataset):
//! - Time-of-day arithmetic in seconds
//! - Weekday grouping of a user's days
//! - Mean/total presence and mean start/end per weekday

mod reports;
mod weekday;

pub use reports::*;
pub use weekday::*;

use chrono::{NaiveTime, Timelike};

/// Seconds elapsed since midnight for a time of day.
pub fn seconds_since_midnight(time: NaiveTime) -> i64 {
    i64::from(time.hour()) * 3600 + i64::from(time.minute()) * 60 + i64::from(time.second())
}

/// Seconds between two times of day. Negative when `end` is before `start`.
pub fn interval(start: NaiveTime, end: NaiveTime) -> i64 {
    seconds_since_midnight(end) - seconds_since_midnight(start)
}

/// Arithmetic mean. Zero for an empty slice.
pub fn mean(items: &[i64]) -> f64 {
    if items.is_empty() {
        0.0
    } else {
        items.iter().sum::<i64>() as f64 / items.len() as f64
    }
}

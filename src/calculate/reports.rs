//! Weekday presence reports for a single user.
//!
//! Each report has one row per weekday, Monday first. A user that is not
//! in the dataset gets an empty report rather than an error.

use serde::Serialize;

use super::{group_by_weekday, group_start_end_by_weekday, mean, seconds_since_midnight};
use crate::models::{day_abbr, Dataset, UserId};

/// Header row the presence view puts in front of [`presence_weekday`].
pub const PRESENCE_HEADER: (&str, &str) = ("Weekday", "Presence (s)");

/// `(day, mean seconds present)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeanTimeRow(pub &'static str, pub f64);

/// `(day, total seconds present)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresenceRow(pub &'static str, pub i64);

/// `(day, mean start, mean end)`, both in seconds since midnight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StartEndRow(pub &'static str, pub f64, pub f64);

fn label(index: usize) -> &'static str {
    day_abbr(index).unwrap_or("?")
}

/// Mean presence time per weekday.
pub fn mean_time_weekday(dataset: &Dataset, user_id: UserId) -> Vec<MeanTimeRow> {
    let Some(log) = dataset.user(user_id) else {
        return Vec::new();
    };

    group_by_weekday(log)
        .iter()
        .map(|(index, intervals)| MeanTimeRow(label(index), mean(intervals)))
        .collect()
}

/// Total presence time per weekday.
pub fn presence_weekday(dataset: &Dataset, user_id: UserId) -> Vec<PresenceRow> {
    let Some(log) = dataset.user(user_id) else {
        return Vec::new();
    };

    group_by_weekday(log)
        .iter()
        .map(|(index, intervals)| PresenceRow(label(index), intervals.iter().sum()))
        .collect()
}

/// Mean start and end time per weekday.
pub fn presence_start_end(dataset: &Dataset, user_id: UserId) -> Vec<StartEndRow> {
    let Some(log) = dataset.user(user_id) else {
        return Vec::new();
    };

    group_start_end_by_weekday(log)
        .iter()
        .map(|(index, lists)| {
            let starts: Vec<i64> = lists.starts.iter().map(|t| seconds_since_midnight(*t)).collect();
            let ends: Vec<i64> = lists.ends.iter().map(|t| seconds_since_midnight(*t)).collect();
            StartEndRow(label(index), mean(&starts), mean(&ends))
        })
        .collect()
}

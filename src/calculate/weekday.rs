//! Grouping of a user's days by weekday.

use chrono::Datelike;

use super::interval;
use crate::models::{StartEndLists, UserLog, WeekdayBuckets};

/// Presence intervals (seconds, possibly negative) per weekday.
pub fn group_by_weekday(items: &UserLog) -> WeekdayBuckets<Vec<i64>> {
    let mut result: WeekdayBuckets<Vec<i64>> = WeekdayBuckets::new();
    for (date, day) in items {
        result
            .get_mut(date.weekday())
            .push(interval(day.start, day.end));
    }
    result
}

/// Start and end times per weekday, kept in separate lists.
pub fn group_start_end_by_weekday(items: &UserLog) -> WeekdayBuckets<StartEndLists> {
    let mut result: WeekdayBuckets<StartEndLists> = WeekdayBuckets::new();
    for (date, day) in items {
        let bucket = result.get_mut(date.weekday());
        bucket.starts.push(day.start);
        bucket.ends.push(day.end);
    }
    result
}

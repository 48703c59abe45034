//! Weekday grouping containers.

use chrono::{NaiveTime, Weekday};
use serde::Serialize;

/// Abbreviated day names, Monday first.
pub const DAY_ABBR: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Seven buckets indexed Monday = 0 .. Sunday = 6.
///
/// Every weekday always has a bucket, so days without records show up
/// as empty buckets rather than missing keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekdayBuckets<B> {
    buckets: [B; 7],
}

impl<B: Default> Default for WeekdayBuckets<B> {
    fn default() -> Self {
        Self {
            buckets: std::array::from_fn(|_| B::default()),
        }
    }
}

impl<B: Default> WeekdayBuckets<B> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<B> WeekdayBuckets<B> {
    pub fn get(&self, weekday: Weekday) -> &B {
        &self.buckets[weekday.num_days_from_monday() as usize]
    }

    pub fn get_mut(&mut self, weekday: Weekday) -> &mut B {
        &mut self.buckets[weekday.num_days_from_monday() as usize]
    }

    /// Bucket by numeric index (0 = Monday). `None` past Sunday.
    pub fn by_index(&self, index: usize) -> Option<&B> {
        self.buckets.get(index)
    }

    /// Buckets in Monday..Sunday order together with their index.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &B)> {
        self.buckets.iter().enumerate()
    }
}

/// Start and end times collected for one weekday.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StartEndLists {
    pub starts: Vec<NaiveTime>,
    pub ends: Vec<NaiveTime>,
}

/// Abbreviated name for a weekday index; `None` past Sunday.
pub fn day_abbr(index: usize) -> Option<&'static str> {
    DAY_ABBR.get(index).copied()
}

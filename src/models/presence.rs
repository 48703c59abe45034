//! Parsed presence data.

use std::collections::{BTreeMap, HashMap};

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Numeric user identifier as it appears in the presence log.
pub type UserId = i64;

/// One day of attendance: when the user came in and when they left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceDay {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl AttendanceDay {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }
}

/// All recorded days of a single user, keyed by calendar date.
pub type UserLog = HashMap<NaiveDate, AttendanceDay>;

/// Full snapshot of the presence log.
///
/// Built in one pass by the log parser and never modified afterwards;
/// the cache hands it out behind an `Arc`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    users: BTreeMap<UserId, UserLog>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a day for a user. A repeated date replaces the earlier entry.
    pub fn insert(&mut self, user_id: UserId, date: NaiveDate, day: AttendanceDay) {
        self.users.entry(user_id).or_default().insert(date, day);
    }

    /// Days of the given user, if the user appears in the log.
    pub fn user(&self, user_id: UserId) -> Option<&UserLog> {
        self.users.get(&user_id)
    }

    pub fn contains_user(&self, user_id: UserId) -> bool {
        self.users.contains_key(&user_id)
    }

    /// User ids in ascending order.
    pub fn user_ids(&self) -> impl Iterator<Item = UserId> + '_ {
        self.users.keys().copied()
    }

    pub fn users(&self) -> impl Iterator<Item = (UserId, &UserLog)> {
        self.users.iter().map(|(id, log)| (*id, log))
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Total number of recorded days across all users.
    pub fn day_count(&self) -> usize {
        self.users.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn time(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn test_dataset_insert_groups_by_user() {
        let mut dataset = Dataset::new();
        dataset.insert(10, date("2013-09-10"), AttendanceDay::new(time(9, 0, 0), time(17, 0, 0)));
        dataset.insert(10, date("2013-09-11"), AttendanceDay::new(time(8, 0, 0), time(16, 0, 0)));
        dataset.insert(11, date("2013-09-10"), AttendanceDay::new(time(10, 0, 0), time(18, 0, 0)));

        assert_eq!(dataset.user_count(), 2);
        assert_eq!(dataset.day_count(), 3);
        assert_eq!(dataset.user(10).unwrap().len(), 2);
        assert!(dataset.contains_user(11));
        assert!(!dataset.contains_user(12));
    }

    #[test]
    fn test_dataset_repeated_date_last_wins() {
        let mut dataset = Dataset::new();
        let d = date("2013-09-10");
        dataset.insert(10, d, AttendanceDay::new(time(9, 0, 0), time(17, 0, 0)));
        dataset.insert(10, d, AttendanceDay::new(time(7, 30, 0), time(15, 0, 0)));

        let day = dataset.user(10).unwrap()[&d];
        assert_eq!(day.start, time(7, 30, 0));
        assert_eq!(day.end, time(15, 0, 0));
        assert_eq!(dataset.day_count(), 1);
    }

    #[test]
    fn test_dataset_user_ids_sorted() {
        let mut dataset = Dataset::new();
        let day = AttendanceDay::new(time(9, 0, 0), time(17, 0, 0));
        dataset.insert(141, date("2013-09-10"), day);
        dataset.insert(10, date("2013-09-10"), day);
        dataset.insert(76, date("2013-09-10"), day);

        let ids: Vec<UserId> = dataset.user_ids().collect();
        assert_eq!(ids, vec![10, 76, 141]);
    }

    #[test]
    fn test_dataset_empty() {
        let dataset = Dataset::new();
        assert!(dataset.is_empty());
        assert_eq!(dataset.day_count(), 0);
        assert!(dataset.user(10).is_none());
    }
}

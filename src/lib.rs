//! # Presence Analyzer
//!
//! Weekday attendance statistics computed from a flat presence log.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (attendance days, datasets, weekday buckets)
//! - **storage**: Presence log parsing and dataset sources
//! - **cache**: Time-to-live cache with single-flight refresh
//! - **calculate**: Time arithmetic, weekday grouping and reports
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod cache;
pub mod calculate;
pub mod config;
pub mod models;
pub mod storage;

pub use models::*;

use chrono::Duration;

/// Parse a cache time-to-live such as "10m", "90s", "1h" or a bare number
/// of seconds. A leading `-` is accepted; a non-positive TTL disables caching.
pub fn parse_ttl(s: &str) -> Option<Duration> {
    let s = s.trim();
    let (negative, s) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };

    let (num_str, unit): (&str, fn(i64) -> Duration) = if let Some(n) = s.strip_suffix('h') {
        (n, Duration::hours)
    } else if let Some(n) = s.strip_suffix('m') {
        (n, Duration::minutes)
    } else if let Some(n) = s.strip_suffix('s') {
        (n, Duration::seconds)
    } else {
        (s, Duration::seconds)
    };

    // Bounded so the unit conversion cannot overflow.
    let num = num_str
        .parse::<i64>()
        .ok()
        .filter(|n| (0..=1_000_000).contains(n))?;
    let ttl = unit(num);
    Some(if negative { -ttl } else { ttl })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ttl_units() {
        assert_eq!(parse_ttl("1h"), Some(Duration::seconds(3600)));
        assert_eq!(parse_ttl("10m"), Some(Duration::seconds(600)));
        assert_eq!(parse_ttl("90s"), Some(Duration::seconds(90)));
    }

    #[test]
    fn test_parse_ttl_default_seconds() {
        assert_eq!(parse_ttl("120"), Some(Duration::seconds(120)));
        assert_eq!(parse_ttl(" 45 "), Some(Duration::seconds(45)));
    }

    #[test]
    fn test_parse_ttl_zero_and_negative() {
        assert_eq!(parse_ttl("0"), Some(Duration::zero()));
        assert_eq!(parse_ttl("-5s"), Some(Duration::seconds(-5)));
    }

    #[test]
    fn test_parse_ttl_invalid() {
        assert_eq!(parse_ttl(""), None);
        assert_eq!(parse_ttl("abc"), None);
        assert_eq!(parse_ttl("5d"), None);
        assert_eq!(parse_ttl("--5"), None);
        assert_eq!(parse_ttl("99999999999h"), None);
    }
}

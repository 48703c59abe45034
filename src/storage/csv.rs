//! Presence log parsing.
//!
//! The log is plain comma-separated text, one row per user and day:
//!
//! ```text
//! user_id,date,start,end
//! 10,2013-09-10,09:39:05,17:59:52
//! ```
//!
//! Rows without exactly four fields (headers, footers, blank lines) are
//! ignored. Rows with the right shape but a value that does not parse are
//! skipped with a warning; one bad row never aborts the whole file.

use std::path::{Path, PathBuf};
use std::time::Instant;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::{DatasetSource, SourceError};
use crate::models::{AttendanceDay, Dataset, UserId};

const DELIMITER: char = ',';
const FIELD_COUNT: usize = 4;
const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";

/// Why a well-shaped row was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("invalid user id {0:?}")]
    InvalidUserId(String),

    #[error("invalid date {0:?}")]
    InvalidDate(String),

    #[error("invalid start time {0:?}")]
    InvalidStart(String),

    #[error("invalid end time {0:?}")]
    InvalidEnd(String),
}

/// One accepted row of the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogRow {
    pub user_id: UserId,
    pub date: NaiveDate,
    pub day: AttendanceDay,
}

/// Counters collected while parsing, for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseSummary {
    pub rows_accepted: usize,
    pub rows_ignored: usize,
    pub rows_invalid: usize,
}

/// Parse a single line.
///
/// Returns `None` for lines that are not rows at all (wrong field count),
/// and `Some(Err(_))` for rows whose values are malformed.
pub fn parse_row(line: &str) -> Option<Result<LogRow, RowError>> {
    let fields: Vec<&str> = line.split(DELIMITER).map(str::trim).collect();
    if fields.len() != FIELD_COUNT {
        return None;
    }

    Some(parse_fields(fields[0], fields[1], fields[2], fields[3]))
}

fn parse_fields(user_id: &str, date: &str, start: &str, end: &str) -> Result<LogRow, RowError> {
    let user_id: UserId = user_id
        .parse()
        .map_err(|_| RowError::InvalidUserId(user_id.to_string()))?;
    let date = NaiveDate::parse_from_str(date, DATE_FORMAT)
        .map_err(|_| RowError::InvalidDate(date.to_string()))?;
    let start = NaiveTime::parse_from_str(start, TIME_FORMAT)
        .map_err(|_| RowError::InvalidStart(start.to_string()))?;
    let end = NaiveTime::parse_from_str(end, TIME_FORMAT)
        .map_err(|_| RowError::InvalidEnd(end.to_string()))?;

    Ok(LogRow {
        user_id,
        date,
        day: AttendanceDay::new(start, end),
    })
}

/// Build a dataset from the full text of a presence log.
pub fn parse_presence_log(content: &str) -> (Dataset, ParseSummary) {
    parse_presence_bytes(content.as_bytes())
}

/// Build a dataset from the raw bytes of a presence log.
///
/// Each line is decoded on its own, so a line that is not valid UTF-8 is
/// skipped with a warning instead of making the whole log unreadable.
pub fn parse_presence_bytes(content: &[u8]) -> (Dataset, ParseSummary) {
    let mut dataset = Dataset::new();
    let mut summary = ParseSummary::default();

    let mut lines: Vec<&[u8]> = content.split(|&b| b == b'\n').collect();
    if lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }

    for (index, raw) in lines.into_iter().enumerate() {
        let line_num = index + 1;
        let line = match std::str::from_utf8(raw) {
            Ok(line) => line,
            Err(e) => {
                warn!("Problem with line {}: not valid UTF-8 ({})", line_num, e);
                summary.rows_invalid += 1;
                continue;
            }
        };

        match parse_row(line) {
            None => {
                debug!("Ignoring line {}: not a presence row", line_num);
                summary.rows_ignored += 1;
            }
            Some(Err(e)) => {
                warn!("Problem with line {}: {}", line_num, e);
                summary.rows_invalid += 1;
            }
            Some(Ok(row)) => {
                dataset.insert(row.user_id, row.date, row.day);
                summary.rows_accepted += 1;
            }
        }
    }

    (dataset, summary)
}

/// Dataset source backed by a presence log on disk.
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DatasetSource for CsvSource {
    fn name(&self) -> &'static str {
        "csv"
    }

    async fn load(&self) -> Result<Dataset, SourceError> {
        let started = Instant::now();
        let content = tokio::fs::read(&self.path)
            .await
            .map_err(|source| SourceError::Unavailable {
                path: self.path.clone(),
                source,
            })?;

        let (dataset, summary) = parse_presence_bytes(&content);
        info!(
            "Parsed {:?}: {} users, {} days ({} rows accepted, {} ignored, {} invalid) in {:?}",
            self.path,
            dataset.user_count(),
            dataset.day_count(),
            summary.rows_accepted,
            summary.rows_ignored,
            summary.rows_invalid,
            started.elapsed()
        );

        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
user_id,date,start,end
10,2013-09-10,09:39:05,17:59:52
10,2013-09-11,09:19:52,16:07:37
10,2013-09-12,10:48:46,17:23:51
11,2013-09-09,09:00:00,17:00:00
11,2013-09-10,9:00,17:00:00
";

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn time(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn test_parse_row_valid() {
        let row = parse_row("10,2013-09-10,09:39:05,17:59:52").unwrap().unwrap();
        assert_eq!(row.user_id, 10);
        assert_eq!(row.date, date("2013-09-10"));
        assert_eq!(row.day.start, time(9, 39, 5));
        assert_eq!(row.day.end, time(17, 59, 52));
    }

    #[test]
    fn test_parse_row_wrong_field_count() {
        assert!(parse_row("").is_none());
        assert!(parse_row("footer").is_none());
        assert!(parse_row("10,2013-09-10,09:39:05").is_none());
        assert!(parse_row("10,2013-09-10,09:39:05,17:59:52,extra").is_none());
    }

    #[test]
    fn test_parse_row_invalid_values() {
        assert_eq!(
            parse_row("user_id,date,start,end"),
            Some(Err(RowError::InvalidUserId("user_id".to_string())))
        );
        assert_eq!(
            parse_row("10,2013-02-30,09:00:00,17:00:00"),
            Some(Err(RowError::InvalidDate("2013-02-30".to_string())))
        );
        assert_eq!(
            parse_row("10,2013-09-10,25:00:00,17:00:00"),
            Some(Err(RowError::InvalidStart("25:00:00".to_string())))
        );
        assert_eq!(
            parse_row("10,2013-09-10,09:00:00,noon"),
            Some(Err(RowError::InvalidEnd("noon".to_string())))
        );
    }

    #[test]
    fn test_parse_row_trims_whitespace_and_crlf() {
        let row = parse_row(" 10 , 2013-09-10 ,09:00:00,17:00:00\r").unwrap().unwrap();
        assert_eq!(row.user_id, 10);
        assert_eq!(row.day.end, time(17, 0, 0));
    }

    #[test]
    fn test_parse_presence_log() {
        let (dataset, summary) = parse_presence_log(SAMPLE);

        assert_eq!(dataset.user_ids().collect::<Vec<_>>(), vec![10, 11]);
        assert_eq!(dataset.user(10).unwrap().len(), 3);
        assert_eq!(dataset.user(11).unwrap().len(), 1);

        let day = dataset.user(10).unwrap()[&date("2013-09-10")];
        assert_eq!(day.start, time(9, 39, 5));
        assert_eq!(day.end, time(17, 59, 52));

        assert_eq!(summary.rows_accepted, 4);
        assert_eq!(summary.rows_invalid, 2);
        assert_eq!(summary.rows_ignored, 0);
    }

    #[test]
    fn test_parse_presence_log_ignores_noise() {
        let content = "presence export\n\n10,2013-09-10,09:00:00,17:00:00\n-- end --\n";
        let (dataset, summary) = parse_presence_log(content);

        assert_eq!(dataset.user_count(), 1);
        assert_eq!(summary.rows_ignored, 3);
        assert_eq!(summary.rows_invalid, 0);
    }

    #[test]
    fn test_parse_presence_log_bad_row_does_not_affect_neighbours() {
        let content = "\
10,2013-09-10,09:00:00,17:00:00
10,2013-09-10,xx:00:00,18:00:00
10,2013-09-11,08:00:00,16:00:00
";
        let (dataset, _) = parse_presence_log(content);
        let log = dataset.user(10).unwrap();

        assert_eq!(log.len(), 2);
        assert_eq!(log[&date("2013-09-10")].end, time(17, 0, 0));
    }

    #[test]
    fn test_parse_presence_log_empty() {
        let (dataset, summary) = parse_presence_log("");
        assert!(dataset.is_empty());
        assert_eq!(summary, ParseSummary::default());
    }

    #[tokio::test]
    async fn test_csv_source_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let source = CsvSource::new(file.path());
        let dataset = source.load().await.unwrap();

        assert_eq!(dataset.user_count(), 2);
        assert_eq!(dataset.day_count(), 4);
    }

    #[test]
    fn test_parse_presence_bytes_skips_non_utf8_line() {
        let mut content = b"10,2013-09-10,09:00:00,17:00:00\n".to_vec();
        content.extend_from_slice(b"\xff\xfe garbage footer\n");
        content.extend_from_slice(b"10,2013-09-11,08:00:00,16:00:00\r\n");

        let (dataset, summary) = parse_presence_bytes(&content);

        assert_eq!(dataset.user(10).unwrap().len(), 2);
        assert_eq!(summary.rows_accepted, 2);
        assert_eq!(summary.rows_invalid, 1);
    }

    #[tokio::test]
    async fn test_csv_source_load_with_non_utf8_line() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"10,2013-09-10,09:39:05,17:59:52\n").unwrap();
        file.write_all(b"\xff\xfe garbage footer\n").unwrap();
        file.write_all(b"11,2013-09-09,09:00:00,17:00:00\n").unwrap();

        let dataset = CsvSource::new(file.path()).load().await.unwrap();

        assert_eq!(dataset.user_ids().collect::<Vec<_>>(), vec![10, 11]);
        assert_eq!(dataset.day_count(), 2);
    }

    #[tokio::test]
    async fn test_csv_source_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("missing.csv");
        let source = CsvSource::new(&path);

        let err = source.load().await.unwrap_err();
        match err {
            SourceError::Unavailable { path: p, .. } => assert_eq!(p, path),
        }
    }
}

//! Presence data sources.
//!
//! A [`DatasetSource`] produces a complete [`Dataset`] in one go. The
//! cache calls it whenever its entry is missing or stale:
//! - [`CsvSource`] reads the comma-separated presence log from disk

pub mod csv;

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::Dataset;

pub use self::csv::{parse_presence_bytes, parse_presence_log, CsvSource, ParseSummary, RowError};

/// Errors that make the whole source unusable.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Presence log {path:?} is unavailable: {source}")]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Something that can produce a full presence snapshot.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// Source identifier for logging.
    fn name(&self) -> &'static str;

    /// Load and parse the whole dataset.
    async fn load(&self) -> Result<Dataset, SourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_error_display() {
        let err = SourceError::Unavailable {
            path: PathBuf::from("/data/presence.csv"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "No such file"),
        };
        let message = err.to_string();
        assert!(message.contains("/data/presence.csv"));
        assert!(message.contains("No such file"));
    }
}

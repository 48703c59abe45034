//! Time-based caching of the parsed presence log.
//!
//! Parsing the log is I/O bound, so the parsed [`Dataset`] is kept in
//! memory and only rebuilt once its time-to-live has run out. A single
//! lock guards the whole check-load-store sequence: while one refresh is
//! running every other caller waits for it and then sees its result, so
//! a burst of requests after expiry triggers exactly one parse.
//!
//! A failed refresh is returned to the caller. The expired entry is never
//! served in its place.

mod clock;

pub use clock::{Clock, ManualClock, SystemClock};

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::models::Dataset;
use crate::storage::{DatasetSource, SourceError};

/// Default cache key for the presence log.
pub const DEFAULT_CACHE_KEY: &str = "presence_data";

#[derive(Debug, Clone)]
struct CacheEntry {
    dataset: Arc<Dataset>,
    expires_at: DateTime<Utc>,
}

impl CacheEntry {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// `now + ttl`, saturating: past chrono's range the entry never expires
/// (or, for a negative TTL, is already stale).
fn expiry(now: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    now.checked_add_signed(ttl).unwrap_or(if ttl < Duration::zero() {
        now
    } else {
        DateTime::<Utc>::MAX_UTC
    })
}

/// Memoizes a [`DatasetSource`] under a time-to-live.
pub struct TimedCache {
    key: String,
    ttl: Duration,
    source: Arc<dyn DatasetSource>,
    clock: Arc<dyn Clock>,
    // One lock for every key: refreshes are serialized cache-wide.
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl TimedCache {
    /// Create a cache. A `ttl` of zero or less refreshes on every call.
    pub fn new(
        key: impl Into<String>,
        ttl: Duration,
        source: Arc<dyn DatasetSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            key: key.into(),
            ttl,
            source,
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Cache on the system clock.
    pub fn with_system_clock(
        key: impl Into<String>,
        ttl: Duration,
        source: Arc<dyn DatasetSource>,
    ) -> Self {
        Self::new(key, ttl, source, Arc::new(SystemClock))
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Current dataset, reloading it from the source if missing or expired.
    pub async fn get(&self) -> Result<Arc<Dataset>, SourceError> {
        let mut entries = self.entries.lock().await;

        if let Some(entry) = entries.get(&self.key) {
            if entry.is_fresh(self.clock.now()) {
                debug!("Cache hit for {}", self.key);
                return Ok(entry.dataset.clone());
            }
            debug!("Cache entry {} expired at {}", self.key, entry.expires_at);
        }

        let dataset = match self.source.load().await {
            Ok(dataset) => Arc::new(dataset),
            Err(e) => {
                warn!("Refreshing {} from {} failed: {}", self.key, self.source.name(), e);
                return Err(e);
            }
        };

        let expires_at = expiry(self.clock.now(), self.ttl);
        entries.insert(
            self.key.clone(),
            CacheEntry {
                dataset: dataset.clone(),
                expires_at,
            },
        );
        info!(
            "Refreshed {} from {} ({} users), valid until {}",
            self.key,
            self.source.name(),
            dataset.user_count(),
            expires_at
        );

        Ok(dataset)
    }

    /// Drop every stored entry so the next [`get`](Self::get) reloads.
    pub async fn invalidate(&self) {
        let mut entries = self.entries.lock().await;
        let dropped = entries.len();
        entries.clear();
        info!("Cache invalidated ({} entries dropped)", dropped);
    }

    /// Expiry of the current entry, if there is one.
    pub async fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.entries
            .lock()
            .await
            .get(&self.key)
            .map(|entry| entry.expires_at)
    }
}

impl std::fmt::Debug for TimedCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimedCache")
            .field("key", &self.key)
            .field("ttl", &self.ttl)
            .field("source", &self.source.name())
            .finish()
    }
}

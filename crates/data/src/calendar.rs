//! Cached IPO calendar.
//!
//! Holds the last normalized snapshot and decides when to go upstream.
//! Snapshots are swapped wholesale; readers clone an `Arc` and never see a
//! half-written state. The lock is not held across the upstream call, so two
//! concurrent cache misses may both fetch.

use crate::models::IpoRecord;
use crate::normalize::normalize_table;
use chrono::Local;
use hk_ipo_core::{CacheConfig, FetchError, IpoTableSource};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// One completed fetch.
#[derive(Debug)]
struct CalendarSnapshot {
    fetched_at: Instant,
    items: Arc<Vec<IpoRecord>>,
    source: Option<String>,
}

/// Items returned to callers. `source` is `None` when the upstream table was empty.
#[derive(Debug, Clone)]
pub struct CalendarPayload {
    pub items: Arc<Vec<IpoRecord>>,
    pub source: Option<String>,
}

pub struct IpoCalendar {
    source: Option<Arc<dyn IpoTableSource>>,
    source_label: String,
    ttl: Duration,
    snapshot: RwLock<Option<Arc<CalendarSnapshot>>>,
}

impl std::fmt::Debug for IpoCalendar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IpoCalendar")
            .field("source", &self.source.as_ref().map(|s| s.name().to_string()))
            .field("source_label", &self.source_label)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl IpoCalendar {
    /// Creates an empty calendar.
    ///
    /// `source` is `None` when no upstream is configured; every cache miss
    /// then fails with [`FetchError::UpstreamUnavailable`].
    #[must_use]
    pub fn new(
        source: Option<Arc<dyn IpoTableSource>>,
        source_label: impl Into<String>,
        cache: &CacheConfig,
    ) -> Self {
        Self {
            source,
            source_label: source_label.into(),
            ttl: Duration::from_secs(cache.ttl_secs),
            snapshot: RwLock::new(None),
        }
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    #[must_use]
    pub fn source_label(&self) -> &str {
        &self.source_label
    }

    /// Time since the last completed fetch, if any.
    #[must_use]
    pub fn snapshot_age(&self) -> Option<Duration> {
        self.snapshot.read().as_ref().map(|s| s.fetched_at.elapsed())
    }

    /// Returns cached items while fresh, otherwise fetches.
    ///
    /// An empty cached snapshot is never considered fresh.
    ///
    /// # Errors
    /// Returns [`FetchError`] when a fetch is needed and fails.
    pub async fn get_items(&self, force_refresh: bool) -> Result<CalendarPayload, FetchError> {
        if !force_refresh {
            if let Some(payload) = self.fresh_payload() {
                tracing::debug!(items = payload.items.len(), "calendar cache hit");
                return Ok(payload);
            }
        }
        self.refresh().await
    }

    fn fresh_payload(&self) -> Option<CalendarPayload> {
        let guard = self.snapshot.read();
        let snapshot = guard.as_ref()?;
        if snapshot.items.is_empty() || snapshot.fetched_at.elapsed() >= self.ttl {
            return None;
        }
        Some(CalendarPayload {
            items: Arc::clone(&snapshot.items),
            source: snapshot.source.clone(),
        })
    }

    /// Fetches from upstream unconditionally and replaces the snapshot.
    ///
    /// # Errors
    /// Returns [`FetchError::UpstreamUnavailable`] without a source, or
    /// [`FetchError::UpstreamFetch`] when the call fails. The previous
    /// snapshot is kept on failure.
    pub async fn refresh(&self) -> Result<CalendarPayload, FetchError> {
        let source = self.source.as_ref().ok_or(FetchError::UpstreamUnavailable)?;

        tracing::info!(source = source.name(), "fetching IPO calendar");
        let table = source.fetch_table().await.map_err(|e| {
            tracing::warn!(source = source.name(), "IPO calendar fetch failed: {:#}", e);
            FetchError::fetch(format!("{e:#}"))
        })?;
        let fetched_at = Instant::now();

        // Rows without any column carry no data.
        let Some(table) = table.filter(|t| !t.is_empty() && !t.columns().is_empty()) else {
            tracing::info!("upstream returned an empty IPO table");
            self.store(CalendarSnapshot {
                fetched_at,
                items: Arc::new(Vec::new()),
                source: None,
            });
            return Ok(CalendarPayload {
                items: Arc::new(Vec::new()),
                source: None,
            });
        };

        let today = Local::now().date_naive();
        let items = Arc::new(normalize_table(&table, today));
        tracing::info!(rows = table.len(), items = items.len(), "IPO calendar refreshed");

        self.store(CalendarSnapshot {
            fetched_at,
            items: Arc::clone(&items),
            source: Some(self.source_label.clone()),
        });

        Ok(CalendarPayload {
            items,
            source: Some(self.source_label.clone()),
        })
    }

    fn store(&self, snapshot: CalendarSnapshot) {
        *self.snapshot.write() = Some(Arc::new(snapshot));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use hk_ipo_core::{CellValue, RawTable};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeSource {
        calls: AtomicUsize,
        table: Option<RawTable>,
        fail: bool,
    }

    impl FakeSource {
        fn with_rows(n: usize) -> Self {
            let table = RawTable::from_records((0..n).map(|i| {
                vec![
                    ("股票代码", CellValue::from(format!("{:05}", i + 1))),
                    ("股票简称", CellValue::from(format!("公司{i}"))),
                ]
            }));
            Self {
                calls: AtomicUsize::new(0),
                table: Some(table),
                fail: false,
            }
        }

        fn with_table(table: RawTable) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                table: Some(table),
                fail: false,
            }
        }

        fn empty() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                table: None,
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                table: None,
                fail: true,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl IpoTableSource for FakeSource {
        async fn fetch_table(&self) -> anyhow::Result<Option<RawTable>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                anyhow::bail!("connection reset by peer");
            }
            Ok(self.table.clone())
        }

        fn name(&self) -> &str {
            "fake"
        }
    }

    fn calendar(source: &Arc<FakeSource>, ttl_secs: u64) -> IpoCalendar {
        let source: Arc<dyn IpoTableSource> = source.clone();
        IpoCalendar::new(Some(source), "test-source", &CacheConfig { ttl_secs })
    }

    #[tokio::test]
    async fn test_cached_within_ttl() {
        let source = Arc::new(FakeSource::with_rows(3));
        let calendar = calendar(&source, 300);

        let first = calendar.get_items(false).await.unwrap();
        let second = calendar.get_items(false).await.unwrap();

        assert_eq!(source.calls(), 1);
        assert!(Arc::ptr_eq(&first.items, &second.items));
        assert_eq!(second.source.as_deref(), Some("test-source"));
        assert_eq!(first.items.len(), 3);
        assert!(calendar.snapshot_age().is_some());
    }

    #[tokio::test]
    async fn test_force_refresh_always_fetches() {
        let source = Arc::new(FakeSource::with_rows(2));
        let calendar = calendar(&source, 300);

        let first = calendar.get_items(false).await.unwrap();
        let second = calendar.get_items(true).await.unwrap();

        assert_eq!(source.calls(), 2);
        assert!(!Arc::ptr_eq(&first.items, &second.items));
    }

    #[tokio::test]
    async fn test_expired_snapshot_refetches() {
        let source = Arc::new(FakeSource::with_rows(1));
        let calendar = calendar(&source, 0);

        calendar.get_items(false).await.unwrap();
        calendar.get_items(false).await.unwrap();

        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_empty_result_is_cached_but_not_fresh() {
        let source = Arc::new(FakeSource::empty());
        let calendar = calendar(&source, 300);

        let payload = calendar.get_items(false).await.unwrap();
        assert!(payload.items.is_empty());
        assert!(payload.source.is_none());
        assert!(calendar.snapshot_age().is_some());

        // Empty snapshots never satisfy a read.
        calendar.get_items(false).await.unwrap();
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_rows_without_columns_are_empty() {
        let mut table = RawTable::new();
        table.push_row(Vec::<(String, CellValue)>::new());
        table.push_row(Vec::<(String, CellValue)>::new());
        assert_eq!(table.len(), 2);

        let source = Arc::new(FakeSource::with_table(table));
        let calendar = calendar(&source, 300);

        let payload = calendar.get_items(false).await.unwrap();
        assert!(payload.items.is_empty());
        assert!(payload.source.is_none());
    }

    #[tokio::test]
    async fn test_unavailable_without_source() {
        let calendar = IpoCalendar::new(None, "test-source", &CacheConfig::default());
        let err = calendar.get_items(false).await.unwrap_err();
        assert!(matches!(err, FetchError::UpstreamUnavailable));
    }

    #[tokio::test]
    async fn test_fetch_failure_is_wrapped_and_keeps_snapshot() {
        let source = Arc::new(FakeSource::failing());
        let calendar = calendar(&source, 300);

        let err = calendar.get_items(false).await.unwrap_err();
        match err {
            FetchError::UpstreamFetch(message) => {
                assert!(message.contains("connection reset by peer"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(calendar.snapshot_age().is_none());
    }
}

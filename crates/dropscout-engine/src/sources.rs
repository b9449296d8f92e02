//! Collaborator traits for external data fetches, and the multi-source
//! signal collection loop.
//!
//! The engine never performs network I/O itself: concrete implementations
//! live behind these traits (see the feed crate) and are expected to apply
//! their own request timeouts. A timed-out or failed fetch surfaces as an
//! [`EngineError`] and is handled at the call site.

use futures::stream::{self, StreamExt};

use dropscout_core::{CatalogItem, RawRecord};

use crate::error::EngineError;

/// One external data source producing raw product signals.
pub trait SignalSource {
    /// Stable identifier of the source platform (e.g., `"tiktok"`).
    fn source_id(&self) -> &str;

    /// Fetch the source's current raw records.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::SourceUnavailable`] when the fetch fails or
    /// times out.
    fn fetch_signals(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<RawRecord>, EngineError>> + Send;
}

/// Fetches the current catalog of a competitor storefront.
pub trait CatalogSource {
    /// Fetch the full catalog at `store_url`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::CompetitorFetchFailed`] when the fetch fails
    /// or times out.
    fn fetch_catalog(
        &self,
        store_url: &str,
    ) -> impl std::future::Future<Output = Result<Vec<CatalogItem>, EngineError>> + Send;
}

/// Per-source outcome of a collection cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceStats {
    pub source: String,
    pub fetched: usize,
    pub failed: bool,
}

/// Collect raw records from every source, tolerating individual failures.
///
/// Up to `max_concurrent` sources are fetched at once (a value of 0 is
/// treated as 1). A source that errors is skipped for this cycle and
/// reported with `failed = true`; the remaining sources still contribute.
/// The whole collection never fails, and the stats come back in the
/// sources' declaration order regardless of completion order.
pub async fn collect_signals<S: SignalSource>(
    sources: &[S],
    max_concurrent: usize,
) -> (Vec<RawRecord>, Vec<SourceStats>) {
    let fetches = sources.iter().enumerate().map(|(index, source)| async move {
        match source.fetch_signals().await {
            Ok(fetched) => {
                tracing::debug!(
                    source = source.source_id(),
                    count = fetched.len(),
                    "source fetch succeeded"
                );
                let stat = SourceStats {
                    source: source.source_id().to_string(),
                    fetched: fetched.len(),
                    failed: false,
                };
                (index, fetched, stat)
            }
            Err(e) => {
                tracing::warn!(
                    source = source.source_id(),
                    error = %e,
                    "source unavailable, skipping for this cycle"
                );
                let stat = SourceStats {
                    source: source.source_id().to_string(),
                    fetched: 0,
                    failed: true,
                };
                (index, Vec::new(), stat)
            }
        }
    });

    let mut outcomes: Vec<(usize, Vec<RawRecord>, SourceStats)> = stream::iter(fetches)
        .buffer_unordered(max_concurrent.max(1))
        .collect()
        .await;
    outcomes.sort_by_key(|(index, _, _)| *index);

    let mut records = Vec::new();
    let mut stats = Vec::with_capacity(sources.len());
    for (_, mut fetched, stat) in outcomes {
        records.append(&mut fetched);
        stats.push(stat);
    }

    (records, stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeSource {
        id: &'static str,
        outcome: Result<usize, &'static str>,
        delay_ms: u64,
    }

    impl SignalSource for FakeSource {
        fn source_id(&self) -> &str {
            self.id
        }

        async fn fetch_signals(&self) -> Result<Vec<RawRecord>, EngineError> {
            if self.delay_ms > 0 {
                tokio::time::sleep(std::time::Duration::from_millis(self.delay_ms)).await;
            }
            match self.outcome {
                Ok(count) => Ok((0..count)
                    .map(|i| RawRecord {
                        name: Some(format!("{}-{i}", self.id)),
                        source: Some(self.id.to_string()),
                        ..RawRecord::default()
                    })
                    .collect()),
                Err(reason) => Err(EngineError::SourceUnavailable {
                    source_id: self.id.to_string(),
                    reason: reason.to_string(),
                }),
            }
        }
    }

    fn source(id: &'static str, outcome: Result<usize, &'static str>) -> FakeSource {
        FakeSource { id, outcome, delay_ms: 0 }
    }

    #[tokio::test]
    async fn all_sources_contribute_when_healthy() {
        let sources = vec![source("tiktok", Ok(3)), source("amazon", Ok(2))];
        let (records, stats) = collect_signals(&sources, 4).await;
        assert_eq!(records.len(), 5);
        assert_eq!(stats.len(), 2);
        assert!(stats.iter().all(|s| !s.failed));
    }

    #[tokio::test]
    async fn failed_source_is_skipped_not_fatal() {
        let sources = vec![
            source("tiktok", Ok(3)),
            source("amazon", Err("timeout")),
            source("aliexpress", Ok(1)),
        ];
        let (records, stats) = collect_signals(&sources, 4).await;
        assert_eq!(records.len(), 4);
        assert_eq!(stats[1].source, "amazon");
        assert!(stats[1].failed);
        assert_eq!(stats[1].fetched, 0);
        assert!(!stats[2].failed);
    }

    #[tokio::test]
    async fn all_sources_failing_yields_empty_but_ok() {
        let sources = vec![source("tiktok", Err("down")), source("amazon", Err("down"))];
        let (records, stats) = collect_signals(&sources, 4).await;
        assert!(records.is_empty());
        assert!(stats.iter().all(|s| s.failed));
    }

    #[tokio::test]
    async fn zero_concurrency_is_clamped_not_deadlocked() {
        let sources = vec![source("tiktok", Ok(2)), source("amazon", Ok(1))];
        let (records, stats) = collect_signals(&sources, 0).await;
        assert_eq!(records.len(), 3);
        assert_eq!(stats.len(), 2);
    }

    #[tokio::test]
    async fn stats_keep_declaration_order_whatever_finishes_first() {
        // The slowest source is declared first; with concurrent fetches it
        // completes last, but its stats entry must still come first.
        let sources = vec![
            FakeSource { id: "tiktok", outcome: Ok(2), delay_ms: 40 },
            FakeSource { id: "amazon", outcome: Ok(1), delay_ms: 0 },
            FakeSource { id: "aliexpress", outcome: Err("down"), delay_ms: 0 },
        ];
        let (records, stats) = collect_signals(&sources, 3).await;
        assert_eq!(records.len(), 3);
        assert_eq!(stats[0].source, "tiktok");
        assert_eq!(stats[1].source, "amazon");
        assert_eq!(stats[2].source, "aliexpress");
    }
}

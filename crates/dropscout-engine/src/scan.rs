//! Competitor scan orchestration: per-store serialization, baseline
//! seeding, diffing, and atomic commit of snapshot plus alerts.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tokio::sync::OwnedMutexGuard;
use uuid::Uuid;

use dropscout_core::{ChangeSet, CompetitorStore};

use crate::alerts::emit_alerts;
use crate::differ::diff_snapshots;
use crate::error::EngineError;
use crate::repo::{CompetitorRepo, ScanCommit};
use crate::sources::CatalogSource;

/// Serializes scans per competitor: at most one in-flight scan per store,
/// while scans of different stores proceed in parallel.
///
/// Two concurrent diffs racing to replace the same snapshot could silently
/// drop a change; the per-store guard makes that impossible.
#[derive(Default)]
pub struct ScanCoordinator {
    locks: Mutex<HashMap<Uuid, Arc<tokio::sync::Mutex<()>>>>,
}

impl ScanCoordinator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Try to acquire the scan guard for a store. Returns `None` if a scan
    /// of the same store is already in flight.
    fn try_acquire(&self, competitor_id: Uuid) -> Option<OwnedMutexGuard<()>> {
        let lock = {
            let mut locks = self.locks.lock().expect("scan lock map poisoned");
            Arc::clone(locks.entry(competitor_id).or_default())
        };
        lock.try_lock_owned().ok()
    }
}

/// Run one scan of a competitor store.
///
/// State machine: `idle → scanning` on entry, `scanning → idle` on exit —
/// for both success and failure. A failed fetch leaves the stored snapshot
/// and alerts untouched and records a failed status for display.
///
/// The first-ever successful scan only seeds the baseline: it stores the
/// catalog, sets `new_products_count = 0`, emits no alerts, and returns
/// `None`. Diffing a brand-new competitor against nothing would otherwise
/// fire an "N products added" alert storm on day one.
///
/// # Errors
///
/// - [`EngineError::ScanInProgress`] if this store is already being scanned.
/// - [`EngineError::CompetitorFetchFailed`] if the catalog fetch failed;
///   the failure has already been recorded on the store.
/// - [`EngineError::Storage`] if persistence fails.
pub async fn scan_competitor<C, R>(
    coordinator: &ScanCoordinator,
    catalog_source: &C,
    repo: &R,
    store: &CompetitorStore,
) -> Result<Option<ChangeSet>, EngineError>
where
    C: CatalogSource,
    R: CompetitorRepo,
{
    let Some(_guard) = coordinator.try_acquire(store.id) else {
        return Err(EngineError::ScanInProgress {
            competitor_id: store.id,
        });
    };

    repo.begin_scan(store.id).await?;

    let catalog = match catalog_source.fetch_catalog(&store.store_url).await {
        Ok(catalog) => catalog,
        Err(fetch_err) => {
            if let Err(record_err) = repo.record_scan_failure(store.id).await {
                tracing::warn!(
                    competitor_id = %store.id,
                    error = %record_err,
                    "failed to record scan failure"
                );
            }
            return Err(fetch_err);
        }
    };

    let scanned_at = Utc::now();

    if store.has_no_baseline() {
        tracing::info!(
            competitor_id = %store.id,
            products = catalog.len(),
            "first scan — seeding baseline snapshot"
        );
        repo.commit_scan(
            store.id,
            ScanCommit {
                snapshot: catalog,
                new_products_count: 0,
                alerts: Vec::new(),
                scanned_at,
            },
        )
        .await?;
        return Ok(None);
    }

    let changes = diff_snapshots(&store.products_snapshot, &catalog);
    let alerts = emit_alerts(&changes, store);

    tracing::info!(
        competitor_id = %store.id,
        added = changes.added.len(),
        removed = changes.removed.len(),
        price_changed = changes.price_changed.len(),
        "scan complete"
    );

    repo.commit_scan(
        store.id,
        ScanCommit {
            snapshot: catalog,
            new_products_count: changes.added.len(),
            alerts,
            scanned_at,
        },
    )
    .await?;

    Ok(Some(changes))
}

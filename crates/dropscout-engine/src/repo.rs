//! Repository trait the scan path persists through.
//!
//! Document-store CRUD semantics are all the engine needs — no relational
//! joins. The concrete implementation lives in the db crate; tests use
//! in-memory fakes.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use dropscout_core::{CatalogItem, CompetitorAlert};

use crate::error::EngineError;

/// Everything a successful scan writes, committed as one unit.
///
/// Snapshot replacement and alert insertion must be atomic with respect to
/// readers: `new_products_count` and the alert list must never disagree.
#[derive(Debug, Clone)]
pub struct ScanCommit {
    pub snapshot: Vec<CatalogItem>,
    pub new_products_count: usize,
    pub alerts: Vec<CompetitorAlert>,
    pub scanned_at: DateTime<Utc>,
}

/// Persistence for competitor stores and their alerts.
pub trait CompetitorRepo {
    /// Mark the store as scanning (`idle → scanning`).
    fn begin_scan(
        &self,
        competitor_id: Uuid,
    ) -> impl std::future::Future<Output = Result<(), EngineError>> + Send;

    /// Atomically record a successful scan: replace the snapshot, set
    /// `new_products_count` and `last_scanned`, insert the alerts, and
    /// return the store to idle with an `ok` status.
    fn commit_scan(
        &self,
        competitor_id: Uuid,
        commit: ScanCommit,
    ) -> impl std::future::Future<Output = Result<(), EngineError>> + Send;

    /// Record a failed scan: return to idle with a `failed` status, leaving
    /// the snapshot, counts, and alerts untouched.
    fn record_scan_failure(
        &self,
        competitor_id: Uuid,
    ) -> impl std::future::Future<Output = Result<(), EngineError>> + Send;
}

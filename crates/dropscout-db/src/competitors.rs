//! Database operations for `competitor_stores` and `competitor_alerts`.
//!
//! The catalog snapshot lives in a JSONB column; scan bookkeeping fields
//! are plain columns so scan-state transitions never rewrite the snapshot.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use dropscout_core::{
    AlertKind, CatalogItem, CompetitorAlert, CompetitorStore, ScanState, ScanStatus,
};
use dropscout_engine::ScanCommit;

use crate::DbError;

fn scan_state_str(state: ScanState) -> &'static str {
    match state {
        ScanState::Idle => "idle",
        ScanState::Scanning => "scanning",
    }
}

fn parse_scan_state(raw: &str) -> ScanState {
    match raw {
        "scanning" => ScanState::Scanning,
        _ => ScanState::Idle,
    }
}

fn parse_scan_status(raw: &str) -> ScanStatus {
    match raw {
        "ok" => ScanStatus::Ok,
        "failed" => ScanStatus::Failed,
        _ => ScanStatus::Never,
    }
}

fn alert_kind_str(kind: AlertKind) -> &'static str {
    match kind {
        AlertKind::ProductAdded => "product_added",
        AlertKind::ProductRemoved => "product_removed",
        AlertKind::PriceChanged => "price_changed",
    }
}

fn parse_alert_kind(raw: &str) -> AlertKind {
    match raw {
        "product_removed" => AlertKind::ProductRemoved,
        "price_changed" => AlertKind::PriceChanged,
        _ => AlertKind::ProductAdded,
    }
}

fn store_from_row(row: &sqlx::postgres::PgRow) -> Result<CompetitorStore, DbError> {
    let id: Uuid = row.get("id");
    let snapshot_doc: serde_json::Value = row.get("products_snapshot");
    let products_snapshot: Vec<CatalogItem> =
        serde_json::from_value(snapshot_doc).map_err(|e| DbError::InvalidDocument {
            context: format!("competitor_stores snapshot for {id}"),
            source: e,
        })?;

    let scan_state: String = row.get("scan_state");
    let last_scan_status: String = row.get("last_scan_status");
    let new_products_count: i32 = row.get("new_products_count");

    Ok(CompetitorStore {
        id,
        user_id: row.get("user_id"),
        store_url: row.get("store_url"),
        display_name: row.get("display_name"),
        scan_state: parse_scan_state(&scan_state),
        last_scan_status: parse_scan_status(&last_scan_status),
        last_scanned: row.get("last_scanned"),
        products_snapshot,
        new_products_count: usize::try_from(new_products_count).unwrap_or(0),
        created_at: row.get("created_at"),
    })
}

const STORE_COLUMNS: &str = "id, user_id, store_url, display_name, scan_state, \
     last_scan_status, last_scanned, products_snapshot, new_products_count, created_at";

/// Inserts a new competitor store in its initial state.
///
/// The `(user_id, store_url)` pair is unique; adding the same store twice
/// surfaces as [`DbError::Sqlx`] with a unique-violation.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn create_competitor(pool: &PgPool, store: &CompetitorStore) -> Result<(), DbError> {
    let snapshot = serde_json::to_value(&store.products_snapshot).map_err(|e| {
        DbError::InvalidDocument {
            context: format!("competitor snapshot for {}", store.id),
            source: e,
        }
    })?;

    sqlx::query(
        "INSERT INTO competitor_stores \
             (id, user_id, store_url, display_name, scan_state, last_scan_status, \
              last_scanned, products_snapshot, new_products_count, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8::jsonb, $9, $10)",
    )
    .bind(store.id)
    .bind(store.user_id)
    .bind(&store.store_url)
    .bind(&store.display_name)
    .bind(scan_state_str(store.scan_state))
    .bind(match store.last_scan_status {
        ScanStatus::Never => "never",
        ScanStatus::Ok => "ok",
        ScanStatus::Failed => "failed",
    })
    .bind(store.last_scanned)
    .bind(snapshot)
    .bind(i32::try_from(store.new_products_count).unwrap_or(i32::MAX))
    .bind(store.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Fetches one competitor store by id.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row exists.
pub async fn get_competitor(pool: &PgPool, competitor_id: Uuid) -> Result<CompetitorStore, DbError> {
    let row = sqlx::query(&format!(
        "SELECT {STORE_COLUMNS} FROM competitor_stores WHERE id = $1"
    ))
    .bind(competitor_id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)?;

    store_from_row(&row)
}

/// Lists a user's competitor stores, oldest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_competitors(pool: &PgPool, user_id: Uuid) -> Result<Vec<CompetitorStore>, DbError> {
    let rows = sqlx::query(&format!(
        "SELECT {STORE_COLUMNS} FROM competitor_stores \
         WHERE user_id = $1 ORDER BY created_at ASC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(store_from_row).collect()
}

/// Deletes a competitor store. Its alerts go with it via `ON DELETE CASCADE`.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row was deleted.
pub async fn delete_competitor(pool: &PgPool, competitor_id: Uuid) -> Result<(), DbError> {
    let result = sqlx::query("DELETE FROM competitor_stores WHERE id = $1")
        .bind(competitor_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

/// Marks a store as scanning (`idle → scanning`).
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the store does not exist.
pub async fn set_scanning(pool: &PgPool, competitor_id: Uuid) -> Result<(), DbError> {
    let result = sqlx::query("UPDATE competitor_stores SET scan_state = 'scanning' WHERE id = $1")
        .bind(competitor_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

/// Records a successful scan in one transaction: replaces the snapshot,
/// updates the scan bookkeeping, and inserts the alerts. Readers never see
/// a new snapshot with the old alerts or vice versa.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any statement fails; the transaction rolls
/// back and the previous snapshot stays intact.
pub async fn commit_scan(
    pool: &PgPool,
    competitor_id: Uuid,
    commit: &ScanCommit,
) -> Result<(), DbError> {
    let snapshot = serde_json::to_value(&commit.snapshot).map_err(|e| DbError::InvalidDocument {
        context: format!("scan snapshot for {competitor_id}"),
        source: e,
    })?;

    let mut tx = pool.begin().await?;

    sqlx::query(
        "UPDATE competitor_stores SET \
             scan_state = 'idle', \
             last_scan_status = 'ok', \
             last_scanned = $2, \
             products_snapshot = $3::jsonb, \
             new_products_count = $4 \
         WHERE id = $1",
    )
    .bind(competitor_id)
    .bind(commit.scanned_at)
    .bind(snapshot)
    .bind(i32::try_from(commit.new_products_count).unwrap_or(i32::MAX))
    .execute(&mut *tx)
    .await?;

    for alert in &commit.alerts {
        sqlx::query(
            "INSERT INTO competitor_alerts \
                 (id, user_id, competitor_id, competitor_name, kind, title, message, \
                  is_read, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(alert.id)
        .bind(alert.user_id)
        .bind(alert.competitor_id)
        .bind(&alert.competitor_name)
        .bind(alert_kind_str(alert.kind))
        .bind(&alert.title)
        .bind(&alert.message)
        .bind(alert.is_read)
        .bind(alert.created_at)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

/// Records a failed scan: back to idle with a `failed` status. The
/// snapshot, counts, and `last_scanned` are left untouched.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the store does not exist.
pub async fn record_scan_failure(pool: &PgPool, competitor_id: Uuid) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE competitor_stores SET scan_state = 'idle', last_scan_status = 'failed' \
         WHERE id = $1",
    )
    .bind(competitor_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

/// Lists a user's alerts, newest first. `unread_only` restricts to alerts
/// not yet marked read.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_alerts(
    pool: &PgPool,
    user_id: Uuid,
    unread_only: bool,
) -> Result<Vec<CompetitorAlert>, DbError> {
    let rows = sqlx::query(
        "SELECT id, user_id, competitor_id, competitor_name, kind, title, message, \
                is_read, created_at \
         FROM competitor_alerts \
         WHERE user_id = $1 AND (NOT $2 OR is_read = FALSE) \
         ORDER BY created_at DESC",
    )
    .bind(user_id)
    .bind(unread_only)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let kind: String = row.get("kind");
            CompetitorAlert {
                id: row.get("id"),
                user_id: row.get("user_id"),
                competitor_id: row.get("competitor_id"),
                competitor_name: row.get("competitor_name"),
                kind: parse_alert_kind(&kind),
                title: row.get("title"),
                message: row.get("message"),
                is_read: row.get("is_read"),
                created_at: row.get("created_at"),
            }
        })
        .collect())
}

/// Marks one alert as read. Idempotent.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the alert does not exist.
pub async fn mark_alert_read(pool: &PgPool, alert_id: Uuid) -> Result<(), DbError> {
    let result = sqlx::query("UPDATE competitor_alerts SET is_read = TRUE WHERE id = $1")
        .bind(alert_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

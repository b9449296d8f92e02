//! Database operations for the `scored_products` table.
//!
//! The full [`ScoredProduct`] is stored as a JSONB document; `name`,
//! `category`, `source`, `overall_score`, and `classification` are promoted
//! to columns for indexing and display queries.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use dropscout_core::{Classification, ScoredProduct};

use crate::DbError;

/// A row from the `scored_products` table with its document decoded.
#[derive(Debug, Clone)]
pub struct ScoredProductRow {
    pub id: i64,
    pub user_id: Uuid,
    pub product: ScoredProduct,
    pub created_at: DateTime<Utc>,
}

fn classification_str(classification: Classification) -> &'static str {
    match classification {
        Classification::Rejected => "rejected",
        Classification::PassedFilter => "passed_filter",
        Classification::ReadyToLaunch => "ready_to_launch",
    }
}

/// Inserts a batch of scored products for one user in a single transaction.
///
/// Returns the number of rows inserted. An empty batch is a no-op.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any insert fails; nothing is persisted in
/// that case.
pub async fn insert_scored_products(
    pool: &PgPool,
    user_id: Uuid,
    products: &[ScoredProduct],
) -> Result<usize, DbError> {
    if products.is_empty() {
        return Ok(0);
    }

    let mut tx = pool.begin().await?;

    for product in products {
        let doc = serde_json::to_value(product).map_err(|e| DbError::InvalidDocument {
            context: format!("scored product {}", product.signal.name),
            source: e,
        })?;

        sqlx::query(
            "INSERT INTO scored_products \
                 (user_id, name, category, source, overall_score, classification, doc, scanned_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7::jsonb, $8)",
        )
        .bind(user_id)
        .bind(&product.signal.name)
        .bind(&product.signal.category)
        .bind(&product.signal.source)
        .bind(i16::from(product.overall_score))
        .bind(classification_str(product.classification))
        .bind(doc)
        .bind(product.signal.scanned_at)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(products.len())
}

/// Lists a user's scored products, newest scan first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails, or
/// [`DbError::InvalidDocument`] if a stored document no longer decodes.
pub async fn list_scored_products(
    pool: &PgPool,
    user_id: Uuid,
    limit: i64,
) -> Result<Vec<ScoredProductRow>, DbError> {
    let rows = sqlx::query(
        "SELECT id, user_id, doc, created_at \
         FROM scored_products \
         WHERE user_id = $1 \
         ORDER BY scanned_at DESC, id DESC \
         LIMIT $2",
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|row| {
            let id: i64 = row.get("id");
            let doc: serde_json::Value = row.get("doc");
            let product =
                serde_json::from_value(doc).map_err(|e| DbError::InvalidDocument {
                    context: format!("scored_products row {id}"),
                    source: e,
                })?;
            Ok(ScoredProductRow {
                id,
                user_id: row.get("user_id"),
                product,
                created_at: row.get("created_at"),
            })
        })
        .collect()
}

/// Lists a user's scored products scanned on or after `since`, for report
/// aggregation.
///
/// # Errors
///
/// Same as [`list_scored_products`].
pub async fn list_scored_products_since(
    pool: &PgPool,
    user_id: Uuid,
    since: DateTime<Utc>,
) -> Result<Vec<ScoredProduct>, DbError> {
    let rows = sqlx::query(
        "SELECT id, doc FROM scored_products \
         WHERE user_id = $1 AND scanned_at >= $2 \
         ORDER BY scanned_at DESC, id DESC",
    )
    .bind(user_id)
    .bind(since)
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|row| {
            let id: i64 = row.get("id");
            let doc: serde_json::Value = row.get("doc");
            serde_json::from_value(doc).map_err(|e| DbError::InvalidDocument {
                context: format!("scored_products row {id}"),
                source: e,
            })
        })
        .collect()
}

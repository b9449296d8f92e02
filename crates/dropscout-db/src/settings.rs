//! Database operations for the `filter_settings` table.
//!
//! One JSONB document per user. A user with no row gets the defaults; the
//! defaults are never written back implicitly.

use sqlx::{PgPool, Row};
use uuid::Uuid;

use dropscout_core::FilterSettings;

use crate::DbError;

/// Fetches a user's filter settings, falling back to
/// [`FilterSettings::default`] when no row exists.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails, or
/// [`DbError::InvalidDocument`] if the stored document no longer decodes.
pub async fn get_filter_settings(pool: &PgPool, user_id: Uuid) -> Result<FilterSettings, DbError> {
    let row = sqlx::query("SELECT doc FROM filter_settings WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    match row {
        None => Ok(FilterSettings::default()),
        Some(row) => {
            let doc: serde_json::Value = row.get("doc");
            serde_json::from_value(doc).map_err(|e| DbError::InvalidDocument {
                context: format!("filter settings for {user_id}"),
                source: e,
            })
        }
    }
}

/// Validates and upserts a user's filter settings.
///
/// This is the settings-update boundary: out-of-range thresholds are
/// rejected here and nothing is written, so a stored document is always
/// one the scorer can safely apply.
///
/// # Errors
///
/// Returns [`DbError::InvalidSettings`] if the thresholds fail
/// [`FilterSettings::validate`], or [`DbError::Sqlx`] if the upsert fails.
pub async fn update_filter_settings(
    pool: &PgPool,
    user_id: Uuid,
    settings: &FilterSettings,
) -> Result<(), DbError> {
    settings.validate()?;

    let doc = serde_json::to_value(settings).map_err(|e| DbError::InvalidDocument {
        context: format!("filter settings for {user_id}"),
        source: e,
    })?;

    sqlx::query(
        "INSERT INTO filter_settings (user_id, doc, updated_at) \
         VALUES ($1, $2::jsonb, NOW()) \
         ON CONFLICT (user_id) DO UPDATE SET \
             doc = EXCLUDED.doc, \
             updated_at = NOW()",
    )
    .bind(user_id)
    .bind(doc)
    .execute(pool)
    .await?;

    Ok(())
}

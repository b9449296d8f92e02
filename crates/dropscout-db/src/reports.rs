//! Database operations for the `daily_reports` table.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use dropscout_core::{AlertSummary, DailyReport};
use dropscout_engine::build_daily_report;

use crate::DbError;

/// Rebuilds a user's report for the day containing `now` and upserts it.
///
/// The report is derived from the products scored since midnight UTC and
/// the user's current unread alerts; calling it again later the same day
/// overwrites the earlier row with fresher counts.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if a query fails, or
/// [`DbError::InvalidDocument`] if a stored document no longer decodes.
pub async fn refresh_daily_report(
    pool: &PgPool,
    user_id: Uuid,
    now: DateTime<Utc>,
) -> Result<DailyReport, DbError> {
    let date = now.date_naive();
    let since = date.and_time(NaiveTime::MIN).and_utc();

    let scored = crate::products::list_scored_products_since(pool, user_id, since).await?;
    let alerts = crate::competitors::list_alerts(pool, user_id, true).await?;

    let report = build_daily_report(user_id, date, &scored, &alerts);
    upsert_daily_report(pool, &report).await?;
    Ok(report)
}

/// Upserts a daily report keyed on `(user_id, report_date)`.
///
/// A second report run for the same day overwrites the counts and alert
/// summaries; it never produces a duplicate row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_daily_report(pool: &PgPool, report: &DailyReport) -> Result<(), DbError> {
    let alerts = serde_json::to_value(&report.alerts).map_err(|e| DbError::InvalidDocument {
        context: format!("report alerts for {} on {}", report.user_id, report.date),
        source: e,
    })?;

    sqlx::query(
        "INSERT INTO daily_reports \
             (user_id, report_date, products_scanned, passed_filters, fully_validated, \
              ready_to_launch, alerts, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7::jsonb, $8) \
         ON CONFLICT (user_id, report_date) DO UPDATE SET \
             products_scanned = EXCLUDED.products_scanned, \
             passed_filters   = EXCLUDED.passed_filters, \
             fully_validated  = EXCLUDED.fully_validated, \
             ready_to_launch  = EXCLUDED.ready_to_launch, \
             alerts           = EXCLUDED.alerts, \
             created_at       = EXCLUDED.created_at",
    )
    .bind(report.user_id)
    .bind(report.date)
    .bind(i32::try_from(report.products_scanned).unwrap_or(i32::MAX))
    .bind(i32::try_from(report.passed_filters).unwrap_or(i32::MAX))
    .bind(i32::try_from(report.fully_validated).unwrap_or(i32::MAX))
    .bind(i32::try_from(report.ready_to_launch).unwrap_or(i32::MAX))
    .bind(alerts)
    .bind(report.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Fetches one user's report for a given calendar day.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no report exists for that day.
pub async fn get_daily_report(
    pool: &PgPool,
    user_id: Uuid,
    date: NaiveDate,
) -> Result<DailyReport, DbError> {
    let row = sqlx::query(
        "SELECT user_id, report_date, products_scanned, passed_filters, fully_validated, \
                ready_to_launch, alerts, created_at \
         FROM daily_reports WHERE user_id = $1 AND report_date = $2",
    )
    .bind(user_id)
    .bind(date)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)?;

    let alerts_doc: serde_json::Value = row.get("alerts");
    let alerts: Vec<AlertSummary> =
        serde_json::from_value(alerts_doc).map_err(|e| DbError::InvalidDocument {
            context: format!("report alerts for {user_id} on {date}"),
            source: e,
        })?;

    let products_scanned: i32 = row.get("products_scanned");
    let passed_filters: i32 = row.get("passed_filters");
    let fully_validated: i32 = row.get("fully_validated");
    let ready_to_launch: i32 = row.get("ready_to_launch");

    Ok(DailyReport {
        user_id: row.get("user_id"),
        date: row.get("report_date"),
        products_scanned: usize::try_from(products_scanned).unwrap_or(0),
        passed_filters: usize::try_from(passed_filters).unwrap_or(0),
        fully_validated: usize::try_from(fully_validated).unwrap_or(0),
        ready_to_launch: usize::try_from(ready_to_launch).unwrap_or(0),
        alerts,
        created_at: row.get("created_at"),
    })
}

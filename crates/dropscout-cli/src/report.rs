//! Daily report generation.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

pub(crate) async fn run(pool: &PgPool, user: Uuid) -> anyhow::Result<()> {
    let report = dropscout_db::refresh_daily_report(pool, user, Utc::now()).await?;

    println!("daily report for {}", report.date);
    println!("  products scanned: {}", report.products_scanned);
    println!("  passed filters:   {}", report.passed_filters);
    println!("  fully validated:  {}", report.fully_validated);
    println!("  ready to launch:  {}", report.ready_to_launch);
    println!("  alerts included:  {}", report.alerts.len());
    Ok(())
}

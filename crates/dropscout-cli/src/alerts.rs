//! Alert listing and acknowledgement.

use sqlx::PgPool;
use uuid::Uuid;

use dropscout_core::AlertKind;

pub(crate) async fn list(pool: &PgPool, user: Uuid, all: bool) -> anyhow::Result<()> {
    let alerts = dropscout_db::list_alerts(pool, user, !all).await?;
    if alerts.is_empty() {
        println!("no alerts");
        return Ok(());
    }

    for alert in alerts {
        let kind = match alert.kind {
            AlertKind::ProductAdded => "added",
            AlertKind::ProductRemoved => "removed",
            AlertKind::PriceChanged => "price",
        };
        let read = if alert.is_read { " (read)" } else { "" };
        println!(
            "{}  [{kind}] {} — {}{read}",
            alert.created_at.format("%Y-%m-%d %H:%M"),
            alert.competitor_name,
            alert.message,
        );
        println!("    id: {}", alert.id);
    }
    Ok(())
}

pub(crate) async fn read(pool: &PgPool, id: Uuid) -> anyhow::Result<()> {
    dropscout_db::mark_alert_read(pool, id).await?;
    println!("marked alert {id} as read");
    Ok(())
}

//! Turns a change-set into persisted alert records.

use chrono::Utc;
use uuid::Uuid;

use dropscout_core::{AlertKind, ChangeSet, CompetitorAlert, CompetitorStore};

/// Emit at most one alert per category of change — one "3 products added"
/// alert, never three "product added" alerts — so a busy competitor cannot
/// flood the alert feed.
///
/// An empty change-set emits nothing.
#[must_use]
pub fn emit_alerts(changes: &ChangeSet, store: &CompetitorStore) -> Vec<CompetitorAlert> {
    let mut alerts = Vec::with_capacity(3);

    if !changes.added.is_empty() {
        alerts.push(build_alert(
            store,
            AlertKind::ProductAdded,
            format!("New products at {}", store.display_name),
            format!("{} new product(s) detected", changes.added.len()),
        ));
    }

    if !changes.removed.is_empty() {
        alerts.push(build_alert(
            store,
            AlertKind::ProductRemoved,
            format!("Products removed at {}", store.display_name),
            format!("{} product(s) no longer listed", changes.removed.len()),
        ));
    }

    if !changes.price_changed.is_empty() {
        alerts.push(build_alert(
            store,
            AlertKind::PriceChanged,
            format!("Price changes at {}", store.display_name),
            format!("{} product(s) changed price", changes.price_changed.len()),
        ));
    }

    alerts
}

fn build_alert(
    store: &CompetitorStore,
    kind: AlertKind,
    title: String,
    message: String,
) -> CompetitorAlert {
    CompetitorAlert {
        id: Uuid::new_v4(),
        user_id: store.user_id,
        competitor_id: store.id,
        competitor_name: store.display_name.clone(),
        kind,
        title,
        message,
        is_read: false,
        created_at: Utc::now(),
    }
}

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One product in a competitor catalog snapshot, keyed by the store's own
/// `external_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub external_id: String,
    pub name: String,
    /// Price in discrete currency units; compared exactly, never with an
    /// epsilon.
    pub price: Decimal,
}

/// Scan lifecycle of a monitored store: `Idle` (holds a snapshot, awaiting
/// the next scan) or `Scanning` (fetch in flight).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanState {
    Idle,
    Scanning,
}

/// Result of the most recent scan attempt, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanStatus {
    /// No scan has ever been attempted.
    Never,
    Ok,
    Failed,
}

/// A competitor storefront monitored for catalog changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitorStore {
    pub id: Uuid,
    pub user_id: Uuid,
    pub store_url: String,
    pub display_name: String,

    pub scan_state: ScanState,
    pub last_scan_status: ScanStatus,
    /// Timestamp of the last *successful* scan. `None` until the baseline
    /// snapshot has been seeded; failed scans never set it.
    pub last_scanned: Option<DateTime<Utc>>,

    /// Catalog captured by the last successful scan, in storefront order.
    pub products_snapshot: Vec<CatalogItem>,
    /// `added.len()` from the most recent diff that ran; 0 after a first
    /// (baseline-seeding) scan.
    pub new_products_count: usize,

    pub created_at: DateTime<Utc>,
}

impl CompetitorStore {
    /// Creates a store in its initial state: idle, never scanned, empty
    /// snapshot.
    #[must_use]
    pub fn new(user_id: Uuid, store_url: String, display_name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            store_url,
            display_name,
            scan_state: ScanState::Idle,
            last_scan_status: ScanStatus::Never,
            last_scanned: None,
            products_snapshot: Vec::new(),
            new_products_count: 0,
            created_at: Utc::now(),
        }
    }

    /// `true` until the first successful scan has seeded the baseline.
    #[must_use]
    pub fn has_no_baseline(&self) -> bool {
        self.last_scanned.is_none()
    }
}

/// A price movement detected between two snapshots of the same item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceChange {
    pub external_id: String,
    pub name: String,
    pub old_price: Decimal,
    pub new_price: Decimal,
}

/// Structured result of comparing two catalog snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    pub added: Vec<CatalogItem>,
    pub removed: Vec<CatalogItem>,
    pub price_changed: Vec<PriceChange>,
}

impl ChangeSet {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.price_changed.is_empty()
    }
}

/// Category of change a competitor alert reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    ProductAdded,
    ProductRemoved,
    PriceChanged,
}

/// One detected change event on a monitored store.
///
/// Created only by the alert emitter; mutated only to flip `is_read`;
/// never auto-deleted (removal of the owning store cascades).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitorAlert {
    pub id: Uuid,
    pub user_id: Uuid,
    pub competitor_id: Uuid,
    pub competitor_name: String,
    pub kind: AlertKind,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn item(id: &str, price: &str) -> CatalogItem {
        CatalogItem {
            external_id: id.to_string(),
            name: format!("Product {id}"),
            price: Decimal::from_str(price).unwrap(),
        }
    }

    #[test]
    fn new_store_starts_idle_with_no_baseline() {
        let store = CompetitorStore::new(
            Uuid::new_v4(),
            "https://example-store.com".to_string(),
            "Example Store".to_string(),
        );
        assert_eq!(store.scan_state, ScanState::Idle);
        assert_eq!(store.last_scan_status, ScanStatus::Never);
        assert!(store.has_no_baseline());
        assert!(store.products_snapshot.is_empty());
        assert_eq!(store.new_products_count, 0);
    }

    #[test]
    fn empty_change_set_is_empty() {
        assert!(ChangeSet::default().is_empty());
    }

    #[test]
    fn change_set_with_any_entry_is_not_empty() {
        let with_added = ChangeSet {
            added: vec![item("a", "10.00")],
            ..ChangeSet::default()
        };
        assert!(!with_added.is_empty());

        let with_price = ChangeSet {
            price_changed: vec![PriceChange {
                external_id: "a".to_string(),
                name: "Product a".to_string(),
                old_price: Decimal::from(10),
                new_price: Decimal::from(12),
            }],
            ..ChangeSet::default()
        };
        assert!(!with_price.is_empty());
    }

    #[test]
    fn alert_kind_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&AlertKind::PriceChanged).unwrap(),
            "\"price_changed\""
        );
    }

    #[test]
    fn catalog_item_price_is_exact() {
        // 10.00 and 10 are equal as decimals; 10.00 and 10.01 are not.
        assert_eq!(item("a", "10.00").price, Decimal::from(10));
        assert_ne!(item("a", "10.00").price, item("a", "10.01").price);
    }
}

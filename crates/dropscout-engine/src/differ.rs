//! Snapshot comparison for competitor catalogs.

use std::collections::HashMap;

use dropscout_core::{CatalogItem, ChangeSet, PriceChange};

/// Compare two catalog snapshots keyed by `external_id`.
///
/// Added items keep new-catalog order, removed items keep old-catalog
/// order, and price changes compare [`rust_decimal::Decimal`] values
/// exactly — prices are discrete currency units, so an epsilon would only
/// hide real changes.
#[must_use]
pub fn diff_snapshots(old: &[CatalogItem], new: &[CatalogItem]) -> ChangeSet {
    let old_by_id: HashMap<&str, &CatalogItem> = old
        .iter()
        .map(|item| (item.external_id.as_str(), item))
        .collect();
    let new_by_id: HashMap<&str, &CatalogItem> = new
        .iter()
        .map(|item| (item.external_id.as_str(), item))
        .collect();

    let mut changes = ChangeSet::default();

    for item in new {
        match old_by_id.get(item.external_id.as_str()) {
            None => changes.added.push(item.clone()),
            Some(previous) if previous.price != item.price => {
                changes.price_changed.push(PriceChange {
                    external_id: item.external_id.clone(),
                    name: item.name.clone(),
                    old_price: previous.price,
                    new_price: item.price,
                });
            }
            Some(_) => {}
        }
    }

    for item in old {
        if !new_by_id.contains_key(item.external_id.as_str()) {
            changes.removed.push(item.clone());
        }
    }

    changes
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use std::str::FromStr;

    use super::*;

    fn item(id: &str, price: &str) -> CatalogItem {
        CatalogItem {
            external_id: id.to_string(),
            name: format!("Product {id}"),
            price: Decimal::from_str(price).unwrap(),
        }
    }

    #[test]
    fn identical_snapshots_produce_an_empty_change_set() {
        let catalog = vec![item("a", "10.00"), item("b", "5.00")];
        let changes = diff_snapshots(&catalog, &catalog);
        assert!(changes.is_empty());
    }

    #[test]
    fn worked_example_added_and_price_changed() {
        // v1 = [{a, 10}], v2 = [{a, 12}, {b, 5}]
        let v1 = vec![item("a", "10")];
        let v2 = vec![item("a", "12"), item("b", "5")];
        let changes = diff_snapshots(&v1, &v2);

        assert_eq!(changes.added.len(), 1);
        assert_eq!(changes.added[0].external_id, "b");
        assert!(changes.removed.is_empty());
        assert_eq!(changes.price_changed.len(), 1);
        let change = &changes.price_changed[0];
        assert_eq!(change.external_id, "a");
        assert_eq!(change.old_price, Decimal::from(10));
        assert_eq!(change.new_price, Decimal::from(12));
    }

    #[test]
    fn removed_items_are_detected() {
        let v1 = vec![item("a", "10"), item("b", "5")];
        let v2 = vec![item("a", "10")];
        let changes = diff_snapshots(&v1, &v2);
        assert!(changes.added.is_empty());
        assert_eq!(changes.removed.len(), 1);
        assert_eq!(changes.removed[0].external_id, "b");
        assert!(changes.price_changed.is_empty());
    }

    #[test]
    fn price_comparison_is_exact_not_epsilon() {
        let v1 = vec![item("a", "19.99")];
        let v2 = vec![item("a", "19.98")];
        let changes = diff_snapshots(&v1, &v2);
        assert_eq!(changes.price_changed.len(), 1);

        // Trailing zeros do not make a change.
        let v3 = vec![item("a", "19.990")];
        assert!(diff_snapshots(&v1, &v3).is_empty());
    }

    #[test]
    fn rename_without_id_change_is_not_a_change() {
        // Identity is external_id; display names may be edited freely.
        let v1 = vec![item("a", "10")];
        let mut renamed = item("a", "10");
        renamed.name = "Product a (2nd edition)".to_string();
        let changes = diff_snapshots(&v1, &[renamed]);
        assert!(changes.is_empty());
    }

    #[test]
    fn diff_against_empty_old_snapshot_adds_everything() {
        let v2 = vec![item("a", "10"), item("b", "5")];
        let changes = diff_snapshots(&[], &v2);
        assert_eq!(changes.added.len(), 2);
        assert!(changes.removed.is_empty());
    }

    #[test]
    fn added_preserves_new_catalog_order() {
        let v2 = vec![item("z", "1"), item("m", "2"), item("a", "3")];
        let changes = diff_snapshots(&[], &v2);
        let order: Vec<&str> = changes
            .added
            .iter()
            .map(|i| i.external_id.as_str())
            .collect();
        assert_eq!(order, vec!["z", "m", "a"]);
    }
}

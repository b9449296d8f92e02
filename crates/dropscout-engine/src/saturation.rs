//! Per-niche saturation aggregation over the scored population.

use std::collections::BTreeMap;

use dropscout_core::{NicheSaturation, SaturationLevel, ScoredProduct};

/// Average ad counts are capped here before normalizing so one heavily
/// advertised product cannot dominate the niche metric.
pub const ADS_CAP: f64 = 150.0;
/// Same cap for storefront counts.
pub const STORES_CAP: f64 = 300.0;

/// Weights for combining normalized ad and store density into one score.
const ADS_WEIGHT: f64 = 0.6;
const STORES_WEIGHT: f64 = 0.4;

/// Bucket boundaries: `< LOW_MAX` is low, `< MEDIUM_MAX` is medium,
/// everything else high. Both boundaries belong to the upper bucket.
const LOW_MAX: u8 = 30;
const MEDIUM_MAX: u8 = 60;

/// Bucket a saturation score. Exactly 30 is medium; exactly 60 is high.
#[must_use]
pub fn bucket(score: u8) -> SaturationLevel {
    if score < LOW_MAX {
        SaturationLevel::Low
    } else if score < MEDIUM_MAX {
        SaturationLevel::Medium
    } else {
        SaturationLevel::High
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn saturation_score(avg_fb_ads: f64, avg_store_count: f64) -> u8 {
    let ads_norm = (avg_fb_ads.min(ADS_CAP) / ADS_CAP) * 100.0;
    let stores_norm = (avg_store_count.min(STORES_CAP) / STORES_CAP) * 100.0;
    (ads_norm * ADS_WEIGHT + stores_norm * STORES_WEIGHT).round() as u8
}

/// Saturation level for one product from its own ad/store density, using
/// the same scale as the niche aggregate.
#[must_use]
pub fn product_saturation_level(active_fb_ads: u32, store_count: u32) -> SaturationLevel {
    bucket(saturation_score(
        f64::from(active_fb_ads),
        f64::from(store_count),
    ))
}

/// Aggregate the current scored population into one [`NicheSaturation`] per
/// category.
///
/// Pure and repeatable: recomputed wholesale on every call, no side
/// effects. Categories with zero products simply do not appear — an
/// unobserved niche must not masquerade as an unsaturated one.
#[must_use]
pub fn compute_saturation(products: &[ScoredProduct]) -> BTreeMap<String, NicheSaturation> {
    let mut grouped: BTreeMap<&str, Vec<&ScoredProduct>> = BTreeMap::new();
    for product in products {
        grouped
            .entry(product.signal.category.as_str())
            .or_default()
            .push(product);
    }

    grouped
        .into_iter()
        .map(|(category, members)| {
            #[allow(clippy::cast_precision_loss)]
            let count = members.len() as f64;
            let avg_fb_ads = members
                .iter()
                .map(|p| f64::from(p.signal.active_fb_ads))
                .sum::<f64>()
                / count;
            let avg_store_count = members
                .iter()
                .map(|p| f64::from(p.signal.store_count))
                .sum::<f64>()
                / count;
            let score = saturation_score(avg_fb_ads, avg_store_count);

            (
                category.to_string(),
                NicheSaturation {
                    category: category.to_string(),
                    total_products: members.len(),
                    avg_fb_ads,
                    avg_store_count,
                    saturation_score: score,
                    level: bucket(score),
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use dropscout_core::{Classification, ProductSignal, TrendDirection};

    use super::*;

    fn product(category: &str, ads: u32, stores: u32) -> ScoredProduct {
        let signal = ProductSignal {
            name: format!("{category} product"),
            source: "tiktok".to_string(),
            category: category.to_string(),
            source_cost: Decimal::from(5),
            shipping_cost: Decimal::from(2),
            sell_price: Decimal::from(35),
            active_fb_ads: ads,
            store_count: stores,
            trend: TrendDirection::Up,
            trend_percent: 100.0,
            search_volume: 10_000,
            trademark_risk: false,
            shipping_days: 10,
            scanned_at: Utc::now(),
        };
        crate::scorer::score_signal(signal, &dropscout_core::FilterSettings::default())
    }

    #[test]
    fn empty_population_yields_no_niches() {
        assert!(compute_saturation(&[]).is_empty());
    }

    #[test]
    fn one_niche_per_observed_category_only() {
        let products = vec![
            product("Electronics", 10, 20),
            product("Electronics", 30, 40),
            product("Home", 5, 10),
        ];
        let niches = compute_saturation(&products);
        assert_eq!(niches.len(), 2);
        assert!(niches.contains_key("Electronics"));
        assert!(niches.contains_key("Home"));
    }

    #[test]
    fn averages_are_computed_per_category() {
        let products = vec![
            product("Electronics", 10, 20),
            product("Electronics", 30, 40),
        ];
        let niches = compute_saturation(&products);
        let electronics = &niches["Electronics"];
        assert_eq!(electronics.total_products, 2);
        assert!((electronics.avg_fb_ads - 20.0).abs() < f64::EPSILON);
        assert!((electronics.avg_store_count - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn score_exactly_30_is_medium_and_60_is_high() {
        assert_eq!(bucket(29), SaturationLevel::Low);
        assert_eq!(bucket(30), SaturationLevel::Medium);
        assert_eq!(bucket(59), SaturationLevel::Medium);
        assert_eq!(bucket(60), SaturationLevel::High);
        assert_eq!(bucket(100), SaturationLevel::High);
    }

    #[test]
    fn capped_inputs_bound_the_score_at_100() {
        let products = vec![product("Outlier", 100_000, 100_000)];
        let niches = compute_saturation(&products);
        assert_eq!(niches["Outlier"].saturation_score, 100);
        assert_eq!(niches["Outlier"].level, SaturationLevel::High);
    }

    #[test]
    fn quiet_niche_scores_low() {
        let products = vec![product("Sleepy", 3, 5)];
        let niches = compute_saturation(&products);
        assert_eq!(niches["Sleepy"].level, SaturationLevel::Low);
    }

    #[test]
    fn recomputation_is_stable() {
        let products = vec![
            product("Electronics", 60, 90),
            product("Home", 12, 30),
        ];
        let first = compute_saturation(&products);
        let second = compute_saturation(&products);
        assert_eq!(first, second);
    }

    #[test]
    fn product_level_uses_the_same_scale() {
        assert_eq!(product_saturation_level(0, 0), SaturationLevel::Low);
        assert_eq!(product_saturation_level(150, 300), SaturationLevel::High);
    }

    #[test]
    fn classification_does_not_affect_aggregation() {
        // The analyzer reads density fields only.
        let mut a = product("Mixed", 40, 80);
        a.classification = Classification::Rejected;
        let b = product("Mixed", 40, 80);
        let niches = compute_saturation(&[a, b]);
        assert_eq!(niches["Mixed"].total_products, 2);
    }
}

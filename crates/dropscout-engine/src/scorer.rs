//! Pure scoring and classification of canonical product signals.
//!
//! Every function here is total and deterministic: the same signal and the
//! same filter settings always produce the same scores and classification.
//! No I/O, no hidden state.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use dropscout_core::{
    Classification, FilterSettings, ProductSignal, ScoredProduct, TrendDirection,
};

use crate::saturation::product_saturation_level;

/// Published weights for the overall score. They sum to 1.0 and are not
/// user-configurable.
pub const TREND_WEIGHT: f64 = 0.4;
pub const COMPETITION_WEIGHT: f64 = 0.3;
pub const PROFIT_WEIGHT: f64 = 0.3;

/// Overall score at or above which a passing product is upgraded to
/// ready-to-launch.
pub const READY_SCORE_MIN: u8 = 85;

/// Trend midpoint for a flat trend; up/down trends move away from it by a
/// quarter point per percent of change.
const TREND_MIDPOINT: f64 = 50.0;
const TREND_SLOPE: f64 = 0.25;

/// Ad and store counts beyond these caps stop hurting the competition
/// score; one giant outlier should not zero out the dimension.
const COMPETITION_ADS_CAP: f64 = 120.0;
const COMPETITION_STORES_CAP: f64 = 200.0;
const COMPETITION_ADS_SLOPE: f64 = 0.5;
const COMPETITION_STORES_SLOPE: f64 = 0.2;

/// A margin of 80% or better earns a full profit score.
const PROFIT_SLOPE: f64 = 1.25;

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_score(raw: f64) -> u8 {
    raw.clamp(0.0, 100.0).round() as u8
}

/// Score the demand trend: flat sits at the midpoint, up trends climb with
/// percent change, down trends fall with it. Clamped to [0, 100].
#[must_use]
pub fn trend_score(trend: TrendDirection, trend_percent: f64) -> u8 {
    let magnitude = trend_percent.abs() * TREND_SLOPE;
    let raw = match trend {
        TrendDirection::Up => TREND_MIDPOINT + magnitude,
        TrendDirection::Down => TREND_MIDPOINT - magnitude,
        TrendDirection::Flat => TREND_MIDPOINT,
    };
    clamp_score(raw)
}

/// Score market competition: more visible ads and storefronts mean a lower
/// score. Monotone non-increasing in both inputs; each input is capped so a
/// single outlier cannot dominate.
#[must_use]
pub fn competition_score(active_fb_ads: u32, store_count: u32) -> u8 {
    let ads_penalty = f64::from(active_fb_ads).min(COMPETITION_ADS_CAP) * COMPETITION_ADS_SLOPE;
    let store_penalty =
        f64::from(store_count).min(COMPETITION_STORES_CAP) * COMPETITION_STORES_SLOPE;
    clamp_score(100.0 - ads_penalty - store_penalty)
}

/// Gross margin as a percentage of sell price, rounded to 2dp.
///
/// Returns zero for a non-positive sell price: an unpriced signal has no
/// margin, not an error.
#[must_use]
pub fn margin_percent(source_cost: Decimal, shipping_cost: Decimal, sell_price: Decimal) -> Decimal {
    if sell_price <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    ((sell_price - source_cost - shipping_cost) / sell_price * Decimal::from(100)).round_dp(2)
}

/// Score profitability: monotone increasing in margin, full marks at 80%.
#[must_use]
pub fn profit_score(margin: Decimal) -> u8 {
    let margin = margin.to_f64().unwrap_or(0.0);
    clamp_score(margin * PROFIT_SLOPE)
}

/// Weighted combination of the three sub-scores, rounded to the nearest
/// integer.
#[must_use]
pub fn overall_score(trend: u8, competition: u8, profit: u8) -> u8 {
    let raw = f64::from(trend) * TREND_WEIGHT
        + f64::from(competition) * COMPETITION_WEIGHT
        + f64::from(profit) * PROFIT_WEIGHT;
    clamp_score(raw)
}

/// The filter decision table, evaluated in order; the first failing rule
/// rejects. A pass with `overall >= READY_SCORE_MIN` upgrades to
/// ready-to-launch.
#[must_use]
pub fn classify(
    signal: &ProductSignal,
    margin: Decimal,
    overall: u8,
    settings: &FilterSettings,
) -> Classification {
    if signal.source_cost > settings.max_source_cost {
        return Classification::Rejected;
    }
    if signal.sell_price < settings.min_sell_price {
        return Classification::Rejected;
    }
    if margin < settings.min_margin_percent {
        return Classification::Rejected;
    }
    if signal.active_fb_ads > settings.max_fb_ads {
        return Classification::Rejected;
    }
    if signal.shipping_days > settings.max_shipping_days {
        return Classification::Rejected;
    }
    if settings.exclude_trademark_risk && signal.trademark_risk {
        return Classification::Rejected;
    }
    if overall >= READY_SCORE_MIN {
        Classification::ReadyToLaunch
    } else {
        Classification::PassedFilter
    }
}

/// Score and classify one signal against the given settings.
#[must_use]
pub fn score_signal(signal: ProductSignal, settings: &FilterSettings) -> ScoredProduct {
    let trend = trend_score(signal.trend, signal.trend_percent);
    let competition = competition_score(signal.active_fb_ads, signal.store_count);
    let margin = margin_percent(signal.source_cost, signal.shipping_cost, signal.sell_price);
    let profit = profit_score(margin);
    let overall = overall_score(trend, competition, profit);
    let classification = classify(&signal, margin, overall, settings);
    let saturation_level = product_saturation_level(signal.active_fb_ads, signal.store_count);

    ScoredProduct {
        signal,
        trend_score: trend,
        competition_score: competition,
        profit_score: profit,
        overall_score: overall,
        margin_percent: margin,
        saturation_level,
        classification,
    }
}

/// Score and classify a batch of signals. Each signal is scored
/// independently; order is preserved.
#[must_use]
pub fn score_and_classify(
    signals: Vec<ProductSignal>,
    settings: &FilterSettings,
) -> Vec<ScoredProduct> {
    signals
        .into_iter()
        .map(|signal| score_signal(signal, settings))
        .collect()
}

#[cfg(test)]
#[path = "scorer_test.rs"]
mod tests;

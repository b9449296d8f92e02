use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::signal::ProductSignal;

/// How crowded the niche around a product or category looks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaturationLevel {
    Low,
    Medium,
    High,
}

/// Outcome of evaluating a scored product against a user's filter settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Rejected,
    PassedFilter,
    ReadyToLaunch,
}

impl Classification {
    /// `true` for anything that cleared the filter rules.
    #[must_use]
    pub fn passed(self) -> bool {
        !matches!(self, Classification::Rejected)
    }
}

/// A [`ProductSignal`] with its computed scores and classification.
///
/// Invariant: `overall_score` is a deterministic function of the three
/// sub-scores and the published weights, and `classification` is a
/// deterministic function of the signal plus the owning user's filter
/// settings. There is no hidden state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredProduct {
    #[serde(flatten)]
    pub signal: ProductSignal,

    pub trend_score: u8,
    pub competition_score: u8,
    pub profit_score: u8,
    pub overall_score: u8,

    /// Gross margin as a percentage of the sell price, rounded to 2dp.
    pub margin_percent: Decimal,
    pub saturation_level: SaturationLevel,
    pub classification: Classification,
}

/// Per-category saturation aggregate.
///
/// A view recomputed wholesale from the current scored population on every
/// request; it has no lifecycle of its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NicheSaturation {
    pub category: String,
    pub total_products: usize,
    pub avg_fb_ads: f64,
    pub avg_store_count: f64,
    pub saturation_score: u8,
    pub level: SaturationLevel,
}

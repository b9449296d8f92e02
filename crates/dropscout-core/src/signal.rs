use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A raw per-source observation about a candidate product, exactly as the
/// upstream feed reported it.
///
/// Sources are heterogeneous: a social feed reports view counts, a
/// marketplace feed reports order counts and prices, a search feed reports
/// volume and growth. Every field is therefore optional; the normalizer is
/// the only place allowed to decide what a missing field means.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRecord {
    pub name: Option<String>,
    /// Platform the record came from (e.g., `"tiktok"`, `"aliexpress"`).
    pub source: Option<String>,
    pub category: Option<String>,

    // Cost fields
    pub source_cost: Option<Decimal>,
    pub shipping_cost: Option<Decimal>,
    /// Recommended sell price as reported or estimated by the source.
    pub sell_price: Option<Decimal>,

    // Competition fields
    pub active_fb_ads: Option<u32>,
    /// Number of storefronts observed carrying the product.
    pub store_count: Option<u32>,

    // Trend fields
    /// Raw direction string (`"up"`, `"down"`, `"flat"`, legacy `"stable"`).
    pub trend_direction: Option<String>,
    pub trend_percent: Option<f64>,
    /// Monthly search or view volume, whichever the source measures.
    pub search_volume: Option<u64>,

    pub trademark_risk: Option<bool>,
    pub shipping_days: Option<u32>,
}

/// Direction of a product's demand trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Flat,
}

impl TrendDirection {
    /// Parse a source-reported direction string.
    ///
    /// Unknown strings (including the legacy `"stable"`) map to `Flat` —
    /// the neutral default, never an error.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "up" | "rising" => TrendDirection::Up,
            "down" | "falling" => TrendDirection::Down,
            _ => TrendDirection::Flat,
        }
    }
}

/// One scanned candidate product in canonical shape.
///
/// Produced by the normalizer from a [`RawRecord`]; immutable once scored.
/// A re-scan of the same product creates a new signal dated to that scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSignal {
    pub name: String,
    pub source: String,
    pub category: String,

    pub source_cost: Decimal,
    pub shipping_cost: Decimal,
    pub sell_price: Decimal,

    pub active_fb_ads: u32,
    pub store_count: u32,

    pub trend: TrendDirection,
    pub trend_percent: f64,
    pub search_volume: u64,

    pub trademark_risk: bool,
    pub shipping_days: u32,

    pub scanned_at: DateTime<Utc>,
}

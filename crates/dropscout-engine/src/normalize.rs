//! Boundary between loosely-shaped source records and the canonical
//! [`ProductSignal`] the scorer consumes.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use dropscout_core::{ProductSignal, RawRecord, TrendDirection};

/// Category assigned when a source reports none.
pub const DEFAULT_CATEGORY: &str = "General";

/// Result of normalizing one batch of raw records.
#[derive(Debug, Clone)]
pub struct NormalizeOutcome {
    pub signals: Vec<ProductSignal>,
    /// Records dropped for missing mandatory identity fields.
    pub skipped: usize,
}

/// Convert a batch of heterogeneous raw records into canonical signals.
///
/// A record missing `name` or `source` is dropped and counted in
/// `skipped`; this never fails the whole batch — sources are unreliable
/// and partial results are expected. Every other absent field defaults to
/// its neutral value: zero counts and costs, a flat trend, no trademark
/// risk.
#[must_use]
pub fn normalize_records(records: Vec<RawRecord>, scanned_at: DateTime<Utc>) -> NormalizeOutcome {
    let mut signals = Vec::with_capacity(records.len());
    let mut skipped = 0usize;

    for record in records {
        match normalize_record(record, scanned_at) {
            Some(signal) => signals.push(signal),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        tracing::warn!(skipped, kept = signals.len(), "dropped malformed records");
    }

    NormalizeOutcome { signals, skipped }
}

/// Normalize one record, or `None` if it lacks mandatory identity fields.
fn normalize_record(record: RawRecord, scanned_at: DateTime<Utc>) -> Option<ProductSignal> {
    let name = record.name.filter(|n| !n.trim().is_empty())?;
    let source = record.source.filter(|s| !s.trim().is_empty())?;

    let category = record
        .category
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

    let trend = record
        .trend_direction
        .as_deref()
        .map_or(TrendDirection::Flat, TrendDirection::parse);

    Some(ProductSignal {
        name,
        source,
        category,
        source_cost: record.source_cost.unwrap_or(Decimal::ZERO),
        shipping_cost: record.shipping_cost.unwrap_or(Decimal::ZERO),
        sell_price: record.sell_price.unwrap_or(Decimal::ZERO),
        active_fb_ads: record.active_fb_ads.unwrap_or(0),
        store_count: record.store_count.unwrap_or(0),
        trend,
        trend_percent: record.trend_percent.unwrap_or(0.0),
        search_volume: record.search_volume.unwrap_or(0),
        trademark_risk: record.trademark_risk.unwrap_or(false),
        shipping_days: record.shipping_days.unwrap_or(0),
        scanned_at,
    })
}

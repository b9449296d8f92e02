//! Daily report aggregation over the scored population and open alerts.

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use dropscout_core::{AlertSummary, CompetitorAlert, DailyReport, ScoredProduct, MAX_REPORT_ALERTS};

/// Minimum overall score for a product that passed the filters to count as
/// fully validated.
pub const VALIDATED_SCORE_MIN: u8 = 70;

/// Roll up one day of scanning into a [`DailyReport`].
///
/// Every count is derived from the population handed in:
/// `products_scanned` is its size, `passed_filters` counts non-rejected
/// classifications, `fully_validated` additionally requires an overall
/// score of at least [`VALIDATED_SCORE_MIN`], and `ready_to_launch` counts
/// the top classification. The counts are monotone by construction:
/// `ready_to_launch <= fully_validated <= passed_filters <= products_scanned`.
///
/// `alerts` should be the user's unread alerts; the newest
/// [`MAX_REPORT_ALERTS`] are summarized.
#[must_use]
pub fn build_daily_report(
    user_id: Uuid,
    date: NaiveDate,
    scored: &[ScoredProduct],
    alerts: &[CompetitorAlert],
) -> DailyReport {
    let passed_filters = scored.iter().filter(|p| p.classification.passed()).count();
    let fully_validated = scored
        .iter()
        .filter(|p| p.classification.passed() && p.overall_score >= VALIDATED_SCORE_MIN)
        .count();
    let ready_to_launch = scored
        .iter()
        .filter(|p| p.classification == dropscout_core::Classification::ReadyToLaunch)
        .count();

    let mut recent: Vec<&CompetitorAlert> = alerts.iter().collect();
    recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let alerts = recent
        .into_iter()
        .take(MAX_REPORT_ALERTS)
        .map(|alert| AlertSummary {
            competitor_name: alert.competitor_name.clone(),
            kind: alert.kind,
            message: alert.message.clone(),
        })
        .collect();

    DailyReport {
        user_id,
        date,
        products_scanned: scored.len(),
        passed_filters,
        fully_validated,
        ready_to_launch,
        alerts,
        created_at: Utc::now(),
    }
}

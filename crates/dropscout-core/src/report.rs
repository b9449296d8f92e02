use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::competitor::AlertKind;

/// Maximum number of alert summaries carried on a daily report.
pub const MAX_REPORT_ALERTS: usize = 10;

/// A condensed view of one competitor alert for inclusion in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertSummary {
    pub competitor_name: String,
    pub kind: AlertKind,
    pub message: String,
}

/// Per-user, per-calendar-day rollup of the pipeline stages.
///
/// Upserted once per report cycle keyed on `(user_id, date)`; read-only
/// afterward. Every count is derived from the actual scored population —
/// never a constant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyReport {
    pub user_id: Uuid,
    pub date: NaiveDate,

    pub products_scanned: usize,
    pub passed_filters: usize,
    pub fully_validated: usize,
    pub ready_to_launch: usize,

    /// Up to [`MAX_REPORT_ALERTS`] summaries, newest first.
    pub alerts: Vec<AlertSummary>,

    pub created_at: DateTime<Utc>,
}

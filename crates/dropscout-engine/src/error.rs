use thiserror::Error;
use uuid::Uuid;

/// Failure taxonomy of the intelligence engine.
///
/// Scoring, saturation, diffing, and report building are total for
/// well-formed input and never produce these; only I/O-adjacent boundaries
/// (fetch collaborators, repositories) can fail, and their failures are
/// converted to these variants at the call site.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A raw-signal fetch failed or timed out. The source is skipped for
    /// this cycle; other sources continue.
    #[error("source {source_id} unavailable: {reason}")]
    SourceUnavailable { source_id: String, reason: String },

    /// A competitor catalog fetch failed or timed out. The stored snapshot
    /// and alerts are left untouched.
    #[error("competitor fetch failed for {store_url}: {reason}")]
    CompetitorFetchFailed { store_url: String, reason: String },

    /// A scan was requested while another scan of the same store was in
    /// flight. Scans are serialized per store.
    #[error("scan already in progress for competitor {competitor_id}")]
    ScanInProgress { competitor_id: Uuid },

    /// A repository operation failed.
    #[error("storage error during {context}: {reason}")]
    Storage { context: String, reason: String },
}

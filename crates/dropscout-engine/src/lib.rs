pub mod alerts;
pub mod differ;
pub mod error;
pub mod normalize;
pub mod repo;
pub mod report;
pub mod saturation;
pub mod scan;
pub mod scorer;
pub mod sources;

pub use alerts::emit_alerts;
pub use differ::diff_snapshots;
pub use error::EngineError;
pub use normalize::{normalize_records, NormalizeOutcome};
pub use repo::{CompetitorRepo, ScanCommit};
pub use report::build_daily_report;
pub use saturation::compute_saturation;
pub use scan::{scan_competitor, ScanCoordinator};
pub use scorer::score_and_classify;
pub use sources::{collect_signals, CatalogSource, SignalSource, SourceStats};

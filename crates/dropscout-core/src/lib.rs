pub mod app_config;
pub mod competitor;
pub mod config;
pub mod report;
pub mod scored;
pub mod settings;
pub mod signal;

pub use app_config::{AppConfig, Environment};
pub use competitor::{
    AlertKind, CatalogItem, ChangeSet, CompetitorAlert, CompetitorStore, PriceChange, ScanState,
    ScanStatus,
};
pub use config::{load_app_config, load_app_config_from_env, ConfigError};
pub use report::{AlertSummary, DailyReport, MAX_REPORT_ALERTS};
pub use scored::{Classification, NicheSaturation, SaturationLevel, ScoredProduct};
pub use settings::{FilterSettings, SettingsError};
pub use signal::{ProductSignal, RawRecord, TrendDirection};

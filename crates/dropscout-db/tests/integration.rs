//! Offline unit tests for dropscout-db pool configuration and row types.
//! These tests do not require a live database connection.

use chrono::Utc;
use uuid::Uuid;

use dropscout_core::{AppConfig, Classification, Environment, SaturationLevel};
use dropscout_db::{PoolConfig, ScoredProductRow};

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let app_config = AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        log_level: "info".to_string(),
        feed_base_url: None,
        feed_timeout_secs: 30,
        feed_user_agent: "ua".to_string(),
        feed_max_retries: 3,
        feed_retry_backoff_base_secs: 5,
        sources: vec!["tiktok".to_string()],
        max_concurrent_scans: 4,
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
    };

    let pool_config = PoolConfig::from_app_config(&app_config);
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

/// Compile-time smoke test: confirm that [`ScoredProductRow`] has all
/// expected fields with the correct types. No database required.
#[test]
fn scored_product_row_has_expected_fields() {
    use rust_decimal::Decimal;

    use dropscout_core::{ProductSignal, ScoredProduct, TrendDirection};

    let row = ScoredProductRow {
        id: 42_i64,
        user_id: Uuid::new_v4(),
        product: ScoredProduct {
            signal: ProductSignal {
                name: "Posture Corrector".to_string(),
                source: "tiktok".to_string(),
                category: "Health".to_string(),
                source_cost: Decimal::from(5),
                shipping_cost: Decimal::from(2),
                sell_price: Decimal::from(40),
                active_fb_ads: 10,
                store_count: 0,
                trend: TrendDirection::Up,
                trend_percent: 150.0,
                search_volume: 40_000,
                trademark_risk: false,
                shipping_days: 3,
                scanned_at: Utc::now(),
            },
            trend_score: 88,
            competition_score: 95,
            profit_score: 100,
            overall_score: 94,
            margin_percent: Decimal::from(80),
            saturation_level: SaturationLevel::Low,
            classification: Classification::ReadyToLaunch,
        },
        created_at: Utc::now(),
    };

    assert_eq!(row.id, 42);
    assert_eq!(row.product.signal.name, "Posture Corrector");
    assert_eq!(row.product.overall_score, 94);
    assert_eq!(row.product.classification, Classification::ReadyToLaunch);
}

//! Live integration tests for dropscout-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. The `migrations` path is relative to the crate root
//! (`crates/dropscout-db/`), so `"../../migrations"` resolves to the
//! workspace migration directory.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use dropscout_core::{
    AlertKind, AlertSummary, CatalogItem, Classification, CompetitorAlert, CompetitorStore,
    DailyReport, FilterSettings, ProductSignal, SaturationLevel, ScanState, ScanStatus,
    ScoredProduct, TrendDirection,
};
use dropscout_db::{
    commit_scan, create_competitor, delete_competitor, get_competitor, get_daily_report,
    get_filter_settings, insert_scored_products, list_alerts, list_competitors,
    list_scored_products, mark_alert_read, record_scan_failure, refresh_daily_report,
    set_scanning, update_filter_settings, upsert_daily_report, DbError,
};
use dropscout_engine::ScanCommit;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn test_store(user_id: Uuid, url: &str) -> CompetitorStore {
    CompetitorStore::new(user_id, url.to_string(), format!("Store at {url}"))
}

fn item(id: &str, price: i64) -> CatalogItem {
    CatalogItem {
        external_id: id.to_string(),
        name: format!("Product {id}"),
        price: Decimal::from(price),
    }
}

fn test_alert(store: &CompetitorStore) -> CompetitorAlert {
    CompetitorAlert {
        id: Uuid::new_v4(),
        user_id: store.user_id,
        competitor_id: store.id,
        competitor_name: store.display_name.clone(),
        kind: AlertKind::ProductAdded,
        title: format!("New products at {}", store.display_name),
        message: "1 new product(s) detected".to_string(),
        is_read: false,
        created_at: Utc::now(),
    }
}

fn test_scored(name: &str, classification: Classification) -> ScoredProduct {
    ScoredProduct {
        signal: ProductSignal {
            name: name.to_string(),
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
        classification,
    }
}

// ---------------------------------------------------------------------------
// Section 1: Competitor store lifecycle
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn competitor_roundtrips_through_create_and_get(pool: sqlx::PgPool) {
    let user_id = Uuid::new_v4();
    let store = test_store(user_id, "https://gadgetstore.com");

    create_competitor(&pool, &store).await.expect("create failed");
    let fetched = get_competitor(&pool, store.id).await.expect("get failed");

    assert_eq!(fetched.store_url, "https://gadgetstore.com");
    assert_eq!(fetched.scan_state, ScanState::Idle);
    assert_eq!(fetched.last_scan_status, ScanStatus::Never);
    assert!(fetched.has_no_baseline());
    assert!(fetched.products_snapshot.is_empty());
}

#[sqlx::test(migrations = "../../migrations")]
async fn list_competitors_is_scoped_to_the_user(pool: sqlx::PgPool) {
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    create_competitor(&pool, &test_store(alice, "https://a1.example.com"))
        .await
        .unwrap();
    create_competitor(&pool, &test_store(alice, "https://a2.example.com"))
        .await
        .unwrap();
    create_competitor(&pool, &test_store(bob, "https://b1.example.com"))
        .await
        .unwrap();

    let stores = list_competitors(&pool, alice).await.unwrap();
    assert_eq!(stores.len(), 2);
    assert!(stores.iter().all(|s| s.user_id == alice));
}

#[sqlx::test(migrations = "../../migrations")]
async fn duplicate_store_url_for_same_user_is_rejected(pool: sqlx::PgPool) {
    let user_id = Uuid::new_v4();
    create_competitor(&pool, &test_store(user_id, "https://dup.example.com"))
        .await
        .unwrap();

    let result = create_competitor(&pool, &test_store(user_id, "https://dup.example.com")).await;
    assert!(matches!(result, Err(DbError::Sqlx(_))));
}

#[sqlx::test(migrations = "../../migrations")]
async fn delete_competitor_cascades_to_its_alerts(pool: sqlx::PgPool) {
    let store = test_store(Uuid::new_v4(), "https://gone.example.com");
    create_competitor(&pool, &store).await.unwrap();

    commit_scan(
        &pool,
        store.id,
        &ScanCommit {
            snapshot: vec![item("a", 10)],
            new_products_count: 1,
            alerts: vec![test_alert(&store)],
            scanned_at: Utc::now(),
        },
    )
    .await
    .unwrap();

    assert_eq!(list_alerts(&pool, store.user_id, false).await.unwrap().len(), 1);

    delete_competitor(&pool, store.id).await.unwrap();

    assert!(matches!(
        get_competitor(&pool, store.id).await,
        Err(DbError::NotFound)
    ));
    assert!(list_alerts(&pool, store.user_id, false).await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Section 2: Scan transitions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn commit_scan_replaces_snapshot_and_inserts_alerts_atomically(pool: sqlx::PgPool) {
    let store = test_store(Uuid::new_v4(), "https://scan.example.com");
    create_competitor(&pool, &store).await.unwrap();

    set_scanning(&pool, store.id).await.unwrap();
    let mid_scan = get_competitor(&pool, store.id).await.unwrap();
    assert_eq!(mid_scan.scan_state, ScanState::Scanning);

    let scanned_at = Utc::now();
    commit_scan(
        &pool,
        store.id,
        &ScanCommit {
            snapshot: vec![item("a", 10), item("b", 5)],
            new_products_count: 2,
            alerts: vec![test_alert(&store)],
            scanned_at,
        },
    )
    .await
    .unwrap();

    let after = get_competitor(&pool, store.id).await.unwrap();
    assert_eq!(after.scan_state, ScanState::Idle);
    assert_eq!(after.last_scan_status, ScanStatus::Ok);
    assert_eq!(after.products_snapshot.len(), 2);
    assert_eq!(after.new_products_count, 2);
    assert!(!after.has_no_baseline());

    let alerts = list_alerts(&pool, store.user_id, true).await.unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].kind, AlertKind::ProductAdded);
}

#[sqlx::test(migrations = "../../migrations")]
async fn record_scan_failure_leaves_snapshot_and_last_scanned_untouched(pool: sqlx::PgPool) {
    let store = test_store(Uuid::new_v4(), "https://flaky.example.com");
    create_competitor(&pool, &store).await.unwrap();

    let scanned_at = Utc::now();
    commit_scan(
        &pool,
        store.id,
        &ScanCommit {
            snapshot: vec![item("a", 10)],
            new_products_count: 0,
            alerts: vec![],
            scanned_at,
        },
    )
    .await
    .unwrap();

    set_scanning(&pool, store.id).await.unwrap();
    record_scan_failure(&pool, store.id).await.unwrap();

    let after = get_competitor(&pool, store.id).await.unwrap();
    assert_eq!(after.scan_state, ScanState::Idle);
    assert_eq!(after.last_scan_status, ScanStatus::Failed);
    // The successful baseline survives the failure.
    assert_eq!(after.products_snapshot.len(), 1);
    assert!(after.last_scanned.is_some());
}

#[sqlx::test(migrations = "../../migrations")]
async fn failed_first_scan_still_has_no_baseline(pool: sqlx::PgPool) {
    let store = test_store(Uuid::new_v4(), "https://neverup.example.com");
    create_competitor(&pool, &store).await.unwrap();

    set_scanning(&pool, store.id).await.unwrap();
    record_scan_failure(&pool, store.id).await.unwrap();

    let after = get_competitor(&pool, store.id).await.unwrap();
    assert_eq!(after.last_scan_status, ScanStatus::Failed);
    assert!(after.has_no_baseline(), "a failed scan must not seed the baseline");
}

// ---------------------------------------------------------------------------
// Section 3: Alerts
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn mark_alert_read_removes_it_from_the_unread_list(pool: sqlx::PgPool) {
    let store = test_store(Uuid::new_v4(), "https://alerts.example.com");
    create_competitor(&pool, &store).await.unwrap();

    let alert = test_alert(&store);
    commit_scan(
        &pool,
        store.id,
        &ScanCommit {
            snapshot: vec![item("a", 10)],
            new_products_count: 1,
            alerts: vec![alert.clone()],
            scanned_at: Utc::now(),
        },
    )
    .await
    .unwrap();

    assert_eq!(list_alerts(&pool, store.user_id, true).await.unwrap().len(), 1);

    mark_alert_read(&pool, alert.id).await.unwrap();
    // Idempotent.
    mark_alert_read(&pool, alert.id).await.unwrap();

    assert!(list_alerts(&pool, store.user_id, true).await.unwrap().is_empty());
    let all = list_alerts(&pool, store.user_id, false).await.unwrap();
    assert_eq!(all.len(), 1);
    assert!(all[0].is_read);
}

// ---------------------------------------------------------------------------
// Section 4: Scored products
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn scored_products_roundtrip_through_jsonb(pool: sqlx::PgPool) {
    let user_id = Uuid::new_v4();
    let products = vec![
        test_scored("Posture Corrector", Classification::ReadyToLaunch),
        test_scored("Mini Blender", Classification::Rejected),
    ];

    let inserted = insert_scored_products(&pool, user_id, &products).await.unwrap();
    assert_eq!(inserted, 2);

    let rows = list_scored_products(&pool, user_id, 50).await.unwrap();
    assert_eq!(rows.len(), 2);

    let ready = rows
        .iter()
        .find(|r| r.product.signal.name == "Posture Corrector")
        .unwrap();
    assert_eq!(ready.product.overall_score, 94);
    assert_eq!(ready.product.margin_percent, Decimal::from(80));
    assert_eq!(ready.product.classification, Classification::ReadyToLaunch);
}

#[sqlx::test(migrations = "../../migrations")]
async fn empty_scored_batch_is_a_noop(pool: sqlx::PgPool) {
    let inserted = insert_scored_products(&pool, Uuid::new_v4(), &[]).await.unwrap();
    assert_eq!(inserted, 0);
}

// ---------------------------------------------------------------------------
// Section 5: Daily reports
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn daily_report_upsert_overwrites_instead_of_duplicating(pool: sqlx::PgPool) {
    let user_id = Uuid::new_v4();
    let date = NaiveDate::from_ymd_opt(2026, 8, 23).unwrap();

    let mut report = DailyReport {
        user_id,
        date,
        products_scanned: 10,
        passed_filters: 4,
        fully_validated: 2,
        ready_to_launch: 1,
        alerts: vec![],
        created_at: Utc::now(),
    };
    upsert_daily_report(&pool, &report).await.unwrap();

    report.products_scanned = 25;
    report.alerts = vec![AlertSummary {
        competitor_name: "Example Store".to_string(),
        kind: AlertKind::PriceChanged,
        message: "2 product(s) changed price".to_string(),
    }];
    upsert_daily_report(&pool, &report).await.unwrap();

    let fetched = get_daily_report(&pool, user_id, date).await.unwrap();
    assert_eq!(fetched.products_scanned, 25);
    assert_eq!(fetched.alerts.len(), 1);
    assert_eq!(fetched.alerts[0].kind, AlertKind::PriceChanged);
}

#[sqlx::test(migrations = "../../migrations")]
async fn missing_report_is_not_found(pool: sqlx::PgPool) {
    let result = get_daily_report(
        &pool,
        Uuid::new_v4(),
        NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
    )
    .await;
    assert!(matches!(result, Err(DbError::NotFound)));
}

// ---------------------------------------------------------------------------
// Section 6: Filter settings
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn missing_settings_fall_back_to_defaults(pool: sqlx::PgPool) {
    let settings = get_filter_settings(&pool, Uuid::new_v4()).await.unwrap();
    assert_eq!(settings, FilterSettings::default());
}

#[sqlx::test(migrations = "../../migrations")]
async fn updated_settings_roundtrip(pool: sqlx::PgPool) {
    let user_id = Uuid::new_v4();
    let settings = FilterSettings {
        max_fb_ads: 25,
        ..FilterSettings::default()
    };

    update_filter_settings(&pool, user_id, &settings).await.unwrap();
    let fetched = get_filter_settings(&pool, user_id).await.unwrap();
    assert_eq!(fetched.max_fb_ads, 25);

    // Second update overwrites in place.
    let tightened = FilterSettings {
        max_fb_ads: 10,
        ..FilterSettings::default()
    };
    update_filter_settings(&pool, user_id, &tightened).await.unwrap();
    let fetched = get_filter_settings(&pool, user_id).await.unwrap();
    assert_eq!(fetched.max_fb_ads, 10);
}

#[sqlx::test(migrations = "../../migrations")]
async fn out_of_range_settings_are_rejected_before_write(pool: sqlx::PgPool) {
    let user_id = Uuid::new_v4();
    let bad = FilterSettings {
        min_margin_percent: Decimal::from(200),
        ..FilterSettings::default()
    };

    let result = update_filter_settings(&pool, user_id, &bad).await;
    assert!(matches!(result, Err(DbError::InvalidSettings(_))));

    // Nothing was written; reads still see the defaults, so the scorer
    // never picks up a threshold that would reject everything.
    let fetched = get_filter_settings(&pool, user_id).await.unwrap();
    assert_eq!(fetched, FilterSettings::default());
}

#[sqlx::test(migrations = "../../migrations")]
async fn out_of_range_settings_never_clobber_an_existing_row(pool: sqlx::PgPool) {
    let user_id = Uuid::new_v4();
    let good = FilterSettings {
        max_fb_ads: 25,
        ..FilterSettings::default()
    };
    update_filter_settings(&pool, user_id, &good).await.unwrap();

    let bad = FilterSettings {
        max_source_cost: Decimal::from(-1),
        ..FilterSettings::default()
    };
    assert!(update_filter_settings(&pool, user_id, &bad).await.is_err());

    let fetched = get_filter_settings(&pool, user_id).await.unwrap();
    assert_eq!(fetched, good);
}

// ---------------------------------------------------------------------------
// Section 7: Report refresh
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn refresh_builds_report_from_todays_scored_products(pool: sqlx::PgPool) {
    let user_id = Uuid::new_v4();
    let scored = vec![
        test_scored("Portable Neck Fan", Classification::ReadyToLaunch),
        test_scored("LED Book Lamp", Classification::PassedFilter),
        test_scored("Knockoff Plush", Classification::Rejected),
    ];
    insert_scored_products(&pool, user_id, &scored).await.unwrap();

    let now = Utc::now();
    let report = refresh_daily_report(&pool, user_id, now).await.unwrap();
    assert_eq!(report.products_scanned, 3);
    assert_eq!(report.passed_filters, 2);
    assert_eq!(report.ready_to_launch, 1);

    let stored = get_daily_report(&pool, user_id, now.date_naive())
        .await
        .unwrap();
    assert_eq!(stored.products_scanned, 3);
    assert_eq!(stored.ready_to_launch, 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn second_refresh_on_the_same_day_overwrites(pool: sqlx::PgPool) {
    let user_id = Uuid::new_v4();
    let now = Utc::now();

    let first = refresh_daily_report(&pool, user_id, now).await.unwrap();
    assert_eq!(first.products_scanned, 0);

    insert_scored_products(
        &pool,
        user_id,
        &[test_scored("Sunset Lamp", Classification::PassedFilter)],
    )
    .await
    .unwrap();

    let second = refresh_daily_report(&pool, user_id, now).await.unwrap();
    assert_eq!(second.products_scanned, 1);

    let stored = get_daily_report(&pool, user_id, now.date_naive())
        .await
        .unwrap();
    assert_eq!(stored.products_scanned, 1);
}

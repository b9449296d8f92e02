//! Discovery scan: collect raw signals from every configured source,
//! normalize, score against the user's filter settings, persist, and
//! refresh the day's report.

use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use dropscout_core::AppConfig;
use dropscout_engine::{collect_signals, compute_saturation, normalize_records, score_and_classify};
use dropscout_feed::FeedClient;

pub(crate) async fn run(pool: &PgPool, config: &AppConfig, user: Uuid) -> anyhow::Result<()> {
    let Some(feed_base_url) = config.feed_base_url.as_deref() else {
        anyhow::bail!("DROPSCOUT_FEED_BASE_URL is not set; discovery scans need the signal feed");
    };

    let client = Arc::new(FeedClient::new(
        feed_base_url,
        config.feed_timeout_secs,
        &config.feed_user_agent,
        config.feed_max_retries,
        config.feed_retry_backoff_base_secs,
    )?);
    let feeds = client.source_feeds(&config.sources);

    let (records, stats) = collect_signals(&feeds, config.max_concurrent_scans).await;
    for stat in &stats {
        if stat.failed {
            tracing::warn!(source = %stat.source, "source contributed nothing this cycle");
        } else {
            tracing::info!(source = %stat.source, fetched = stat.fetched, "source collected");
        }
    }

    let outcome = normalize_records(records, chrono::Utc::now());
    if outcome.skipped > 0 {
        tracing::warn!(skipped = outcome.skipped, "records dropped during normalization");
    }

    let settings = dropscout_db::get_filter_settings(pool, user).await?;
    let scored = score_and_classify(outcome.signals, &settings);

    let saturation = compute_saturation(&scored);
    for niche in saturation.values() {
        tracing::info!(
            category = %niche.category,
            products = niche.total_products,
            score = niche.saturation_score,
            level = ?niche.level,
            "niche saturation"
        );
    }

    let passed = scored.iter().filter(|p| p.classification.passed()).count();
    let inserted = dropscout_db::insert_scored_products(pool, user, &scored).await?;

    let report = dropscout_db::refresh_daily_report(pool, user, chrono::Utc::now()).await?;

    println!(
        "scanned {inserted} product(s): {passed} passed filters, {} rejected",
        inserted.saturating_sub(passed)
    );
    println!(
        "daily report for {}: {} validated, {} ready to launch",
        report.date, report.fully_validated, report.ready_to_launch
    );
    Ok(())
}

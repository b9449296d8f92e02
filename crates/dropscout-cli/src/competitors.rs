//! Competitor store management and scan orchestration.

use futures::stream::{self, StreamExt};
use sqlx::PgPool;
use uuid::Uuid;

use dropscout_core::{AppConfig, CompetitorStore, ScanStatus};
use dropscout_db::PgCompetitorRepo;
use dropscout_engine::{scan_competitor, EngineError, ScanCoordinator};
use dropscout_feed::StorefrontClient;

pub(crate) async fn add(
    pool: &PgPool,
    user: Uuid,
    url: &str,
    name: Option<String>,
) -> anyhow::Result<()> {
    let display_name = name.unwrap_or_else(|| hostname_of(url));
    let store = CompetitorStore::new(user, url.to_owned(), display_name);
    dropscout_db::create_competitor(pool, &store).await?;
    println!("monitoring {} ({})", store.display_name, store.id);
    Ok(())
}

pub(crate) async fn list(pool: &PgPool, user: Uuid) -> anyhow::Result<()> {
    let stores = dropscout_db::list_competitors(pool, user).await?;
    if stores.is_empty() {
        println!("no competitors monitored");
        return Ok(());
    }

    for store in stores {
        let status = match store.last_scan_status {
            ScanStatus::Never => "never scanned".to_owned(),
            ScanStatus::Ok => match store.last_scanned {
                Some(at) => format!("ok at {}", at.format("%Y-%m-%d %H:%M UTC")),
                None => "ok".to_owned(),
            },
            ScanStatus::Failed => "last scan failed".to_owned(),
        };
        println!(
            "{}  {}  {} product(s), {} new  [{status}]",
            store.id,
            store.display_name,
            store.products_snapshot.len(),
            store.new_products_count,
        );
    }
    Ok(())
}

pub(crate) async fn scan(
    pool: &PgPool,
    config: &AppConfig,
    user: Uuid,
    id: Option<Uuid>,
) -> anyhow::Result<()> {
    let stores = match id {
        Some(id) => vec![dropscout_db::get_competitor(pool, id).await?],
        None => dropscout_db::list_competitors(pool, user).await?,
    };
    if stores.is_empty() {
        println!("no competitors to scan");
        return Ok(());
    }

    let client = StorefrontClient::new(
        config.feed_timeout_secs,
        &config.feed_user_agent,
        config.feed_max_retries,
        config.feed_retry_backoff_base_secs,
        // Polite default between catalog pages.
        250,
    )?;
    let coordinator = ScanCoordinator::new();
    let repo = PgCompetitorRepo::new(pool.clone());

    let max_concurrent = config.max_concurrent_scans.max(1);

    let results: Vec<(CompetitorStore, Result<_, EngineError>)> = stream::iter(stores)
        .map(|store| {
            let client = &client;
            let coordinator = &coordinator;
            let repo = &repo;
            async move {
                let outcome = scan_competitor(coordinator, client, repo, &store).await;
                (store, outcome)
            }
        })
        .buffer_unordered(max_concurrent)
        .collect()
        .await;

    let mut failed = 0usize;
    for (store, outcome) in &results {
        match outcome {
            Ok(None) => println!("{}: baseline captured", store.display_name),
            Ok(Some(changes)) if changes.is_empty() => {
                println!("{}: no changes", store.display_name);
            }
            Ok(Some(changes)) => println!(
                "{}: +{} added, -{} removed, {} price change(s)",
                store.display_name,
                changes.added.len(),
                changes.removed.len(),
                changes.price_changed.len()
            ),
            Err(e) => {
                tracing::error!(store = %store.display_name, error = %e, "scan failed");
                failed += 1;
            }
        }
    }

    if failed == results.len() {
        anyhow::bail!("all {failed} competitor scan(s) failed");
    }
    Ok(())
}

pub(crate) async fn remove(pool: &PgPool, id: Uuid) -> anyhow::Result<()> {
    dropscout_db::delete_competitor(pool, id).await?;
    println!("removed competitor {id}");
    Ok(())
}

/// Hostname of a store URL, used as the default display name.
fn hostname_of(url: &str) -> String {
    let without_scheme = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    without_scheme
        .split('/')
        .next()
        .unwrap_or(url)
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hostname_strips_scheme_and_path() {
        assert_eq!(
            hostname_of("https://gadgetstore.com/collections/all"),
            "gadgetstore.com"
        );
        assert_eq!(hostname_of("gadgetstore.com"), "gadgetstore.com");
    }
}

//! HTTP client for competitor storefront catalogs.

use std::str::FromStr;
use std::time::Duration;

use reqwest::Client;
use rust_decimal::Decimal;

use dropscout_core::CatalogItem;
use dropscout_engine::{CatalogSource, EngineError};

use crate::error::FeedError;
use crate::feed::extract_domain;
use crate::retry::retry_with_backoff;
use crate::types::{StoreProduct, StoreProductsResponse};

/// Maximum number of catalog pages to fetch from one store. Prevents
/// runaway loops against a storefront that keeps returning full pages.
const MAX_PAGES: usize = 50;

/// Page size requested from the storefront. 250 is the platform maximum.
const PAGE_LIMIT: usize = 250;

/// HTTP client for a storefront's public `products.json` endpoint.
///
/// Pages through the catalog with numbered pages (`?page=N`), stopping at
/// the first short page. Transient errors are retried with exponential
/// backoff; a failure on any page fails the whole fetch so a scan never
/// diffs against a partial catalog.
pub struct StorefrontClient {
    client: Client,
    max_retries: u32,
    backoff_base_secs: u64,
    /// Delay between page requests, applied after every page except the
    /// first. Keeps multi-page fetches polite to small stores.
    inter_request_delay_ms: u64,
}

impl StorefrontClient {
    /// Creates a `StorefrontClient` with configured timeout, `User-Agent`,
    /// and retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
        inter_request_delay_ms: u64,
    ) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            max_retries,
            backoff_base_secs,
            inter_request_delay_ms,
        })
    }

    /// Fetches the full catalog of a storefront as [`CatalogItem`]s.
    ///
    /// Listings without a purchasable variant or with an unparseable price
    /// are skipped with a warning; they cannot participate in price diffs.
    ///
    /// # Errors
    ///
    /// - [`FeedError::PaginationLimit`] — more than [`MAX_PAGES`] full pages.
    /// - Any error from the per-page fetch, after retries.
    pub async fn fetch_all_items(&self, store_url: &str) -> Result<Vec<CatalogItem>, FeedError> {
        let origin = extract_store_origin(store_url);
        let mut items = Vec::new();
        let mut page = 1usize;

        loop {
            if page > MAX_PAGES {
                return Err(FeedError::PaginationLimit {
                    store_url: store_url.to_owned(),
                    max_pages: MAX_PAGES,
                });
            }

            if page > 1 && self.inter_request_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.inter_request_delay_ms)).await;
            }

            let response = self.fetch_page(&origin, page).await?;
            let fetched = response.products.len();

            items.extend(response.products.iter().filter_map(to_catalog_item));

            // A short page is the last page.
            if fetched < PAGE_LIMIT {
                break;
            }
            page += 1;
        }

        Ok(items)
    }

    /// Fetches one numbered page of the catalog, with automatic retry on
    /// transient errors.
    async fn fetch_page(&self, origin: &str, page: usize) -> Result<StoreProductsResponse, FeedError> {
        let url = format!("{origin}/products.json?limit={PAGE_LIMIT}&page={page}");

        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.clone();
            async move {
                let response = self.client.get(&url).send().await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(60);
                    return Err(FeedError::RateLimited {
                        domain: extract_domain(&url),
                        retry_after_secs,
                    });
                }

                if status == reqwest::StatusCode::NOT_FOUND {
                    return Err(FeedError::NotFound { url });
                }

                if !status.is_success() {
                    return Err(FeedError::UnexpectedStatus {
                        status: status.as_u16(),
                        url,
                    });
                }

                let body = response.text().await?;
                serde_json::from_str::<StoreProductsResponse>(&body).map_err(|e| {
                    FeedError::Deserialize {
                        context: format!("catalog page {page} from {origin}"),
                        source: e,
                    }
                })
            }
        })
        .await
    }
}

impl CatalogSource for StorefrontClient {
    async fn fetch_catalog(&self, store_url: &str) -> Result<Vec<CatalogItem>, EngineError> {
        self.fetch_all_items(store_url)
            .await
            .map_err(|e| EngineError::CompetitorFetchFailed {
                store_url: store_url.to_owned(),
                reason: e.to_string(),
            })
    }
}

/// Converts a wire product to a [`CatalogItem`], taking the default
/// variant's price. Returns `None` for listings that cannot be priced.
fn to_catalog_item(product: &StoreProduct) -> Option<CatalogItem> {
    let variant = product
        .variants
        .iter()
        .find(|v| v.position == Some(1))
        .or_else(|| product.variants.first());

    let Some(variant) = variant else {
        tracing::warn!(product_id = product.id, "listing has no variants — skipping");
        return None;
    };

    match Decimal::from_str(&variant.price) {
        Ok(price) => Some(CatalogItem {
            external_id: product.id.to_string(),
            name: product.title.clone(),
            price,
        }),
        Err(_) => {
            tracing::warn!(
                product_id = product.id,
                price = %variant.price,
                "unparseable variant price — skipping listing"
            );
            None
        }
    }
}

/// Extracts the scheme+host origin from a store URL.
///
/// Given `"https://gadgetstore.com/collections/all"`, returns
/// `"https://gadgetstore.com"` so `products.json` is always fetched from
/// the store root.
fn extract_store_origin(store_url: &str) -> String {
    reqwest::Url::parse(store_url).map_or_else(
        |_| {
            // Fallback: take "scheme://host" by keeping the first 3 parts.
            store_url
                .trim_end_matches('/')
                .splitn(4, '/')
                .take(3)
                .collect::<Vec<_>>()
                .join("/")
        },
        |u| u.origin().ascii_serialization(),
    )
}

//! HTTP client for the signal aggregation feed.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use dropscout_core::RawRecord;
use dropscout_engine::{EngineError, SignalSource};

use crate::error::FeedError;
use crate::retry::retry_with_backoff;
use crate::types::FeedRecordsResponse;

/// Client for the aggregation feed's `GET /v1/signals/{source}` endpoint.
///
/// Rate limiting (429), not-found (404), and other non-2xx responses
/// surface as typed errors. Transient errors are retried with exponential
/// backoff up to `max_retries` additional attempts.
pub struct FeedClient {
    client: Client,
    /// Base URL without a trailing slash.
    base_url: String,
    max_retries: u32,
    /// Base delay in seconds for exponential backoff: `backoff_base_secs * 2^attempt`.
    backoff_base_secs: u64,
}

impl FeedClient {
    /// Creates a `FeedClient` with configured timeout, `User-Agent`, and
    /// retry policy. Set `max_retries` to `0` to disable retries.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            max_retries,
            backoff_base_secs,
        })
    }

    /// Fetches the current raw records for one source platform, with
    /// automatic retry on transient errors.
    ///
    /// # Errors
    ///
    /// - [`FeedError::RateLimited`] — HTTP 429 after all retries exhausted.
    /// - [`FeedError::NotFound`] — HTTP 404; the source is not offered.
    /// - [`FeedError::UnexpectedStatus`] — any other non-2xx status.
    /// - [`FeedError::Http`] — network or TLS failure after all retries.
    /// - [`FeedError::Deserialize`] — body is not the expected JSON shape.
    pub async fn fetch_records(&self, source: &str) -> Result<Vec<RawRecord>, FeedError> {
        let url = format!("{}/v1/signals/{source}", self.base_url);

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
                let parsed = serde_json::from_str::<FeedRecordsResponse>(&body).map_err(|e| {
                    FeedError::Deserialize {
                        context: format!("signal records for {source}"),
                        source: e,
                    }
                })?;

                Ok(parsed.records)
            }
        })
        .await
    }

    /// Builds per-source [`SourceFeed`] handles sharing this client.
    #[must_use]
    pub fn source_feeds(self: &Arc<Self>, sources: &[String]) -> Vec<SourceFeed> {
        sources
            .iter()
            .map(|source| SourceFeed {
                client: Arc::clone(self),
                source: source.clone(),
            })
            .collect()
    }
}

/// One source platform viewed through a shared [`FeedClient`].
pub struct SourceFeed {
    client: Arc<FeedClient>,
    source: String,
}

impl SignalSource for SourceFeed {
    fn source_id(&self) -> &str {
        &self.source
    }

    async fn fetch_signals(&self) -> Result<Vec<RawRecord>, EngineError> {
        self.client
            .fetch_records(&self.source)
            .await
            .map_err(|e| EngineError::SourceUnavailable {
                source_id: self.source.clone(),
                reason: e.to_string(),
            })
    }
}

/// Extracts the hostname from a URL for use in error messages.
///
/// Falls back to the full URL string if it has no recognizable scheme.
pub(crate) fn extract_domain(url: &str) -> String {
    let without_scheme = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    without_scheme.split('/').next().unwrap_or(url).to_owned()
}

use crate::config::ArchiveConfig;
use crate::error::FetchError;
use std::time::Duration;
use tracing::{debug, warn};

/// Source of raw snapshot markup. The scheduler and the index fetcher only
/// see this seam, so tests can run the whole pipeline against an in-memory
/// fake.
#[async_trait::async_trait]
pub trait PageSource: Send + Sync {
    /// Fetches the raw markup for one snapshot id. All failures come back
    /// as values; this never panics or aborts the batch.
    async fn fetch(&self, snapshot_id: &str) -> std::result::Result<String, FetchError>;
}

/// HTTP-backed fetcher for the live archive. Connection pooling is the
/// `reqwest::Client`'s concern.
pub struct HttpPageFetcher {
    client: reqwest::Client,
    base_url: String,
    max_retries: u32,
    retry_backoff: Duration,
}

impl HttpPageFetcher {
    pub fn new(config: &ArchiveConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_retries: config.max_retries,
            retry_backoff: Duration::from_millis(config.retry_backoff_ms),
        }
    }

    fn url_for(&self, snapshot_id: &str) -> String {
        format!("{}/{}/", self.base_url, snapshot_id)
    }

    async fn fetch_once(&self, url: &str) -> std::result::Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))
    }
}

#[async_trait::async_trait]
impl PageSource for HttpPageFetcher {
    async fn fetch(&self, snapshot_id: &str) -> std::result::Result<String, FetchError> {
        let url = self.url_for(snapshot_id);
        let mut attempt = 0;

        loop {
            match self.fetch_once(&url).await {
                Ok(body) => return Ok(body),
                // Only transient network failures are worth a retry; a bad
                // status or changed schema will not improve on its own.
                Err(FetchError::Network(reason)) if attempt < self.max_retries => {
                    attempt += 1;
                    warn!(
                        "Network error fetching {} (attempt {}/{}): {}",
                        url, attempt, self.max_retries, reason
                    );
                    tokio::time::sleep(self.retry_backoff * attempt).await;
                }
                Err(e) => {
                    debug!("Fetch failed for {}: {}", url, e);
                    return Err(e);
                }
            }
        }
    }
}

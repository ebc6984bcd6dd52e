use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio_retry::{strategy::ExponentialBackoff, RetryIf};

use super::error::SourceError;
use super::types::{Reading, SourcePayload};
use crate::config::{Config, HttpMethod, SourceEndpoint};
use crate::scoring::Category;

/// One independently reachable scoring source.
#[async_trait]
pub trait ScoreSource: Send + Sync {
    fn category(&self) -> Category;

    async fn read(&self) -> Result<Reading, SourceError>;
}

/// Inference service reached over HTTP
#[derive(Clone)]
pub struct HttpSource {
    client: Client,
    category: Category,
    url: String,
    method: HttpMethod,
    retries: u32,
}

impl HttpSource {
    pub fn new(
        client: Client,
        category: Category,
        host: &str,
        endpoint: &SourceEndpoint,
        retries: u32,
    ) -> Self {
        Self {
            client,
            category,
            url: endpoint_url(host, endpoint),
            method: endpoint.method,
            retries,
        }
    }

    async fn request_once(&self) -> Result<Reading, SourceError> {
        let request = match self.method {
            HttpMethod::Get => self.client.get(&self.url),
            HttpMethod::Post => self.client.post(&self.url).json(&serde_json::json!({})),
        };

        let response = request.send().await.map_err(|e| {
            if e.is_connect() {
                SourceError::Unreachable {
                    url: self.url.clone(),
                }
            } else {
                SourceError::Http(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let payload: SourcePayload = response
            .json()
            .await
            .map_err(|e| SourceError::InvalidResponse(e.to_string()))?;

        payload.into_reading()
    }
}

#[async_trait]
impl ScoreSource for HttpSource {
    fn category(&self) -> Category {
        self.category
    }

    async fn read(&self) -> Result<Reading, SourceError> {
        // Connection failures only; the caller's timeout bounds the whole loop
        RetryIf::start(
            retry_delays(self.retries),
            || self.request_once(),
            |e: &SourceError| {
                if e.is_retryable() {
                    tracing::debug!(category = %self.category, error = %e, "Retrying source");
                }
                e.is_retryable()
            },
        )
        .await
    }
}

/// Backoff between attempts: 100ms, 200ms, 400ms, ... capped at 2s
fn retry_delays(retries: u32) -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(2)
        .factor(50)
        .max_delay(Duration::from_secs(2))
        .take(retries as usize)
}

/// Build "{host}:{port}{path}", tolerating a trailing slash on the host
pub fn endpoint_url(host: &str, endpoint: &SourceEndpoint) -> String {
    format!(
        "{}:{}{}",
        host.trim().trim_end_matches('/'),
        endpoint.port,
        endpoint.path
    )
}

/// Build one HTTP source per category from configuration, in reporting order.
pub fn build_sources(config: &Config, client: &Client) -> Vec<Arc<dyn ScoreSource>> {
    let inference = &config.inference;
    Category::ALL
        .into_iter()
        .map(|category| {
            Arc::new(HttpSource::new(
                client.clone(),
                category,
                &inference.host,
                inference.sources.get(category),
                inference.retries,
            )) as Arc<dyn ScoreSource>
        })
        .collect()
}

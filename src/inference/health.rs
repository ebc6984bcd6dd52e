use anyhow::Result;
use futures::future::join_all;
use reqwest::Client;
use serde::Serialize;

use super::source::endpoint_url;
use crate::config::{Config, HttpMethod, SourceEndpoint};
use crate::scoring::Category;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceHealth {
    pub category: Category,
    pub url: String,
    pub healthy: bool,
    pub detail: Option<String>, // Why it is unhealthy
}

/// Probe `GET /health` on every enabled inference source concurrently.
///
/// Thermal is only probed when the sensor is enabled. A service is healthy
/// only if it answers 200 within `inference.health_timeout`. Results follow
/// the fixed category order.
pub async fn health_check(config: &Config, client: &Client) -> Result<Vec<ServiceHealth>> {
    let timeout = config.inference.health_timeout()?;
    let host = &config.inference.host;

    let probes = Category::ALL
        .into_iter()
        .filter(|c| *c != Category::Thermal || config.thermal_enabled)
        .map(|category| {
            let health_endpoint = SourceEndpoint {
                port: config.inference.sources.get(category).port,
                path: "/health".to_string(),
                method: HttpMethod::Get,
            };
            let url = endpoint_url(host, &health_endpoint);
            async move {
                let outcome = client.get(&url).timeout(timeout).send().await;
                let (healthy, detail) = match outcome {
                    Ok(response) if response.status() == reqwest::StatusCode::OK => (true, None),
                    Ok(response) => (false, Some(format!("HTTP {}", response.status().as_u16()))),
                    Err(e) if e.is_timeout() => (false, Some(format!("timeout after {:?}", timeout))),
                    Err(e) if e.is_connect() => (false, Some("connection refused".to_string())),
                    Err(e) => (false, Some(e.to_string())),
                };
                if !healthy {
                    tracing::warn!(%category, %url, detail = ?detail, "Health check failed");
                }
                ServiceHealth {
                    category,
                    url,
                    healthy,
                    detail,
                }
            }
        });

    Ok(join_all(probes).await)
}

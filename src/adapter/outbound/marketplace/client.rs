//! HTTP client for the marketplace adapter service.
//!
//! Routes are `POST {base_url}/{endpoint}/{buy-shares|sell-shares|get-prices}`.
//! Buy and sell replies are returned with their status untouched; only the
//! price read treats a non-2xx status as an error.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::Serialize;
use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, warn};

use super::dto::{BuySharesRequest, GetPricesRequest, PricesResponse, SellSharesRequest};
use super::settings::MarketplaceConfig;
use crate::domain::MarketId;
use crate::error::{ExecutionError, Result};
use crate::port::outbound::marketplace::{BuyOrder, MarketplaceClient, MarketplaceReply, SellOrder};

pub struct HttpMarketplaceClient {
    http: HttpClient,
    base_url: String,
    max_retries: u32,
    retry_delay: Duration,
}

impl HttpMarketplaceClient {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::from_config(&MarketplaceConfig {
            base_url: base_url.into(),
            ..MarketplaceConfig::default()
        })
    }

    #[must_use]
    pub fn from_config(config: &MarketplaceConfig) -> Self {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_retries: config.max_retries,
            retry_delay: Duration::from_millis(config.retry_delay_ms),
        }
    }

    fn url(&self, endpoint: &str, route: &str) -> String {
        format!("{}/{}/{route}", self.base_url, endpoint.trim_matches('/'))
    }

    async fn post<B: Serialize + Sync>(&self, url: &str, body: &B) -> Result<MarketplaceReply> {
        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| ExecutionError::Request(describe(&e)))?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ExecutionError::Request(describe(&e)))?;
        // Non-JSON bodies are kept verbatim as a string.
        let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
        debug!(url, status, "Adapter replied");
        Ok(MarketplaceReply { status, body })
    }
}

fn describe(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("timed out: {err}")
    } else if err.is_connect() {
        format!("connection failed: {err}")
    } else {
        err.to_string()
    }
}

#[async_trait]
impl MarketplaceClient for HttpMarketplaceClient {
    async fn buy_shares(&self, endpoint: &str, order: &BuyOrder) -> Result<MarketplaceReply> {
        let url = self.url(endpoint, "buy-shares");
        self.post(&url, &BuySharesRequest::from(order)).await
    }

    async fn sell_shares(&self, endpoint: &str, order: &SellOrder) -> Result<MarketplaceReply> {
        let url = self.url(endpoint, "sell-shares");
        self.post(&url, &SellSharesRequest::from(order)).await
    }

    async fn get_prices(&self, endpoint: &str, market_id: MarketId) -> Result<Vec<f64>> {
        let url = self.url(endpoint, "get-prices");
        let body = GetPricesRequest {
            market_id: market_id.value(),
        };
        let max_attempts = self.max_retries + 1;
        let mut attempt = 0;

        loop {
            attempt += 1;
            let result = self.post(&url, &body).await;
            let retryable = match result {
                Ok(reply) if reply.is_success() => {
                    let prices: PricesResponse = serde_json::from_value(reply.body)?;
                    return Ok(prices.into_prices());
                }
                Ok(reply) => {
                    let err = ExecutionError::Request(format!("HTTP {}: {}", reply.status, reply.body));
                    if reply.status < 500 || attempt >= max_attempts {
                        return Err(err.into());
                    }
                    err
                }
                Err(e) if attempt >= max_attempts => return Err(e),
                Err(e) => ExecutionError::Request(e.to_string()),
            };
            warn!(attempt, max_attempts, error = %retryable, url, "Price request failed, retrying");
            sleep(self.retry_delay).await;
        }
    }
}

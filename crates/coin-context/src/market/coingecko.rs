//! CoinGecko Market Data Client
//!
//! Reads market summaries, the coin catalog and coin descriptions from the
//! CoinGecko v3 REST API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;

use super::MarketDataClient;
use crate::error::{MarketError, Result};
use crate::model::{CoinListing, MarketEntry};

const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";
const API_KEY_HEADER: &str = "x-cg-demo-api-key";

/// CoinGecko client configuration
#[derive(Clone, Debug)]
pub struct CoinGeckoConfig {
    /// API root, without trailing slash
    pub base_url: String,

    /// Optional demo API key for higher rate limits
    pub api_key: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for CoinGeckoConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            api_key: None,
            timeout_secs: 10,
        }
    }
}

impl CoinGeckoConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let base_url = std::env::var("COINGECKO_BASE_URL").unwrap_or(defaults.base_url);
        let api_key = std::env::var("COINGECKO_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());
        let timeout_secs = std::env::var("COINGECKO_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.timeout_secs);

        Self {
            base_url,
            api_key,
            timeout_secs,
        }
    }
}

#[derive(Deserialize)]
struct CoinDetail {
    #[serde(default)]
    description: Option<LocalizedText>,
}

#[derive(Deserialize)]
struct LocalizedText {
    #[serde(default)]
    en: Option<String>,
}

/// CoinGecko-backed market data client
pub struct CoinGeckoClient {
    client: Client,
    config: CoinGeckoConfig,
}

impl CoinGeckoClient {
    pub fn new(config: CoinGeckoConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(CoinGeckoConfig::from_env())
    }

    fn get(&self, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);
        let request = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json");

        match &self.config.api_key {
            Some(key) => request.header(API_KEY_HEADER, key),
            None => request,
        }
    }

    /// 429 is rate limiting, anything else non-2xx is a provider error
    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketError::RateLimited);
        }

        let message = response.text().await.unwrap_or_default();
        Err(MarketError::Provider {
            status: status.as_u16(),
            message,
        })
    }

    async fn fetch<T: serde::de::DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = Self::check_status(request.send().await?).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl MarketDataClient for CoinGeckoClient {
    async fn markets(&self, ids: &[&str]) -> Result<Vec<MarketEntry>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids_param = ids.join(",");
        let per_page = ids.len().to_string();
        let request = self.get("/coins/markets").query(&[
            ("vs_currency", "usd"),
            ("ids", ids_param.as_str()),
            ("order", "market_cap_desc"),
            ("per_page", per_page.as_str()),
            ("page", "1"),
            ("sparkline", "false"),
        ]);

        self.fetch(request).await
    }

    async fn coin_list(&self) -> Result<Vec<CoinListing>> {
        self.fetch(self.get("/coins/list")).await
    }

    async fn description(&self, id: &str) -> Result<Option<String>> {
        let request = self.get(&format!("/coins/{id}")).query(&[
            ("localization", "false"),
            ("tickers", "false"),
            ("market_data", "false"),
            ("community_data", "false"),
            ("developer_data", "false"),
        ]);

        let detail: CoinDetail = self.fetch(request).await?;
        Ok(detail.description.and_then(|d| d.en))
    }

    fn name(&self) -> &str {
        "CoinGecko"
    }
}

//! Mock Market Data
//!
//! For testing and offline demo runs. Serves a small static catalog with
//! realistic figures and records every provider call it receives.

use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tokio::sync::Mutex;

use super::MarketDataClient;
use crate::error::{MarketError, Result};
use crate::model::{CoinListing, MarketEntry};

/// A provider read observed by the mock
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MarketCall {
    Markets(Vec<String>),
    CoinList,
    Description(String),
}

/// Mock market data source with static prices
pub struct MockMarketData {
    catalog: Vec<CoinListing>,
    markets: HashMap<String, MarketEntry>,
    descriptions: HashMap<String, String>,
    rate_limited: bool,
    failing_descriptions: bool,
    calls: Mutex<Vec<MarketCall>>,
}

impl Default for MockMarketData {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMarketData {
    /// Mock seeded with a handful of well-known coins
    pub fn new() -> Self {
        // (id, symbol, name, price, 24h change %, market cap, volume)
        let seed: [(&str, &str, &str, Decimal, Decimal, Decimal, Decimal); 8] = [
            ("bitcoin", "btc", "Bitcoin", dec!(97500), dec!(2.5), dec!(1_930_000_000_000), dec!(25_000_000_000)),
            ("ethereum", "eth", "Ethereum", dec!(3450), dec!(1.8), dec!(415_000_000_000), dec!(15_000_000_000)),
            ("solana", "sol", "Solana", dec!(195), dec!(4.2), dec!(93_000_000_000), dec!(3_000_000_000)),
            ("cardano", "ada", "Cardano", dec!(0.95), dec!(-1.2), dec!(33_000_000_000), dec!(900_000_000)),
            ("chainlink", "link", "Chainlink", dec!(24.50), dec!(3.1), dec!(15_400_000_000), dec!(700_000_000)),
            ("avalanche-2", "avax", "Avalanche", dec!(42.00), dec!(5.5), dec!(17_200_000_000), dec!(600_000_000)),
            ("dogecoin", "doge", "Dogecoin", dec!(0.38), dec!(12.0), dec!(56_000_000_000), dec!(4_000_000_000)),
            ("uniswap", "uni", "Uniswap", dec!(14.20), dec!(2.2), dec!(8_500_000_000), dec!(300_000_000)),
        ];

        let mut mock = Self::empty();
        for (rank, (id, symbol, name, price, change, cap, volume)) in (1_u32..).zip(seed) {
            mock = mock.with_coin(MarketEntry {
                id: id.into(),
                symbol: symbol.into(),
                name: name.into(),
                current_price: Some(price),
                price_change_percentage_24h: Some(change),
                market_cap: Some(cap),
                market_cap_rank: Some(rank),
                total_volume: Some(volume),
                last_updated: None,
            });
        }

        mock.with_description(
            "bitcoin",
            "Bitcoin is the first successful internet money based on peer-to-peer technology.",
        )
        .with_description(
            "ethereum",
            "Ethereum is a global, open-source platform for decentralized applications.",
        )
    }

    /// Mock with no coins at all
    pub fn empty() -> Self {
        Self {
            catalog: Vec::new(),
            markets: HashMap::new(),
            descriptions: HashMap::new(),
            rate_limited: false,
            failing_descriptions: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Add a coin to both the catalog and the market table
    pub fn with_coin(mut self, entry: MarketEntry) -> Self {
        self.catalog
            .push(CoinListing::new(&entry.id, &entry.symbol, &entry.name));
        self.markets.insert(entry.id.clone(), entry);
        self
    }

    pub fn with_description(mut self, id: &str, description: &str) -> Self {
        self.descriptions.insert(id.into(), description.into());
        self
    }

    /// Answer market and catalog reads with HTTP 429
    pub fn rate_limited(mut self) -> Self {
        self.rate_limited = true;
        self
    }

    /// Fail every description read
    pub fn failing_descriptions(mut self) -> Self {
        self.failing_descriptions = true;
        self
    }

    /// Provider reads received so far, oldest first
    pub async fn calls(&self) -> Vec<MarketCall> {
        self.calls.lock().await.clone()
    }

    async fn record(&self, call: MarketCall) {
        self.calls.lock().await.push(call);
    }
}

#[async_trait]
impl MarketDataClient for MockMarketData {
    async fn markets(&self, ids: &[&str]) -> Result<Vec<MarketEntry>> {
        self.record(MarketCall::Markets(
            ids.iter().map(|id| (*id).to_owned()).collect(),
        ))
        .await;

        if self.rate_limited {
            return Err(MarketError::RateLimited);
        }

        Ok(ids
            .iter()
            .filter_map(|id| self.markets.get(*id).cloned())
            .collect())
    }

    async fn coin_list(&self) -> Result<Vec<CoinListing>> {
        self.record(MarketCall::CoinList).await;

        if self.rate_limited {
            return Err(MarketError::RateLimited);
        }
        Ok(self.catalog.clone())
    }

    async fn description(&self, id: &str) -> Result<Option<String>> {
        self.record(MarketCall::Description(id.to_owned())).await;

        if self.failing_descriptions {
            return Err(MarketError::Provider {
                status: 503,
                message: "description service unavailable".into(),
            });
        }
        Ok(self.descriptions.get(id).cloned())
    }

    fn name(&self) -> &str {
        "MockMarketData"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_snapshot() {
        let market = MockMarketData::new();

        let btc = market.fetch_snapshot("bitcoin").await.unwrap().unwrap();
        assert_eq!(btc.symbol, "btc");
        assert!(btc.current_price.unwrap() > Decimal::ZERO);
        assert_eq!(btc.market_cap_rank, Some(1));
        assert!(btc.description.is_some());

        let sol = market.fetch_snapshot("solana").await.unwrap().unwrap();
        assert!(sol.description.is_none());
    }

    #[tokio::test]
    async fn test_unknown_coin_is_not_found() {
        let market = MockMarketData::new();
        assert!(market.fetch_snapshot("doesnotexist").await.unwrap().is_none());
        assert_eq!(
            market.calls().await,
            vec![MarketCall::Markets(vec!["doesnotexist".into()])]
        );
    }

    #[tokio::test]
    async fn test_failing_description_still_returns_snapshot() {
        let market = MockMarketData::new().failing_descriptions();
        let btc = market.fetch_snapshot("bitcoin").await.unwrap().unwrap();
        assert_eq!(btc.name, "Bitcoin");
        assert!(btc.description.is_none());
    }

    #[tokio::test]
    async fn test_rate_limited_primary_call_fails() {
        let market = MockMarketData::new().rate_limited();
        let err = market.fetch_snapshot("bitcoin").await.unwrap_err();
        assert!(matches!(err, MarketError::RateLimited));
    }

    #[tokio::test]
    async fn test_resolve_through_mock_catalog() {
        let market = MockMarketData::new();
        assert_eq!(market.resolve_id("avax").await.unwrap().as_deref(), Some("avalanche-2"));
        assert_eq!(market.resolve_id("Uniswap").await.unwrap().as_deref(), Some("uniswap"));
        assert_eq!(market.calls().await, vec![MarketCall::CoinList, MarketCall::CoinList]);
    }
}

//! Coin Extraction
//!
//! Works out which coin (if any) a free-text message is about. A fixed alias
//! table is consulted first; only when no alias appears does it fall back to
//! resolving individual words against the provider catalog.

use std::sync::Arc;

use crate::error::Result;
use crate::market::MarketDataClient;
use crate::model::CoinSnapshot;

/// Colloquial names and tickers mapped to provider ids. Order is priority.
pub const COIN_ALIASES: &[(&str, &str)] = &[
    ("bitcoin", "bitcoin"),
    ("btc", "bitcoin"),
    ("ethereum", "ethereum"),
    ("eth", "ethereum"),
    ("binance", "binancecoin"),
    ("bnb", "binancecoin"),
    ("cardano", "cardano"),
    ("ada", "cardano"),
    ("solana", "solana"),
    ("sol", "solana"),
    ("polkadot", "polkadot"),
    ("dot", "polkadot"),
    ("dogecoin", "dogecoin"),
    ("doge", "dogecoin"),
    ("ripple", "ripple"),
    ("xrp", "ripple"),
    ("litecoin", "litecoin"),
    ("ltc", "litecoin"),
];

/// Shortest word worth a catalog lookup is this plus one
const MIN_TOKEN_CHARS: usize = 2;

/// First alias key found anywhere in an already lower-cased message
pub fn match_alias(message_lower: &str) -> Option<&'static str> {
    COIN_ALIASES
        .iter()
        .find(|(alias, _)| message_lower.contains(alias))
        .map(|(_, id)| *id)
}

/// Word tokens longer than two characters, in order of appearance
pub fn candidate_tokens(message: &str) -> impl Iterator<Item = &str> {
    message
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| token.chars().count() > MIN_TOKEN_CHARS)
}

/// Extraction tuning
#[derive(Clone, Debug, Default)]
pub struct ExtractorConfig {
    /// Cap on catalog lookups per message; `None` tries every candidate word
    pub max_lookup_tokens: Option<usize>,
}

impl ExtractorConfig {
    pub fn from_env() -> Self {
        Self {
            max_lookup_tokens: std::env::var("MAX_LOOKUP_TOKENS")
                .ok()
                .and_then(|v| v.parse().ok()),
        }
    }
}

/// Finds the coin a message refers to and fetches its snapshot
pub struct CoinExtractor {
    market: Arc<dyn MarketDataClient>,
    config: ExtractorConfig,
}

impl CoinExtractor {
    pub fn new(market: Arc<dyn MarketDataClient>, config: ExtractorConfig) -> Self {
        Self { market, config }
    }

    /// Snapshot of the coin the message mentions, if any.
    ///
    /// An alias hit is final: if its fetch finds nothing the result is
    /// `None` and no catalog search happens.
    pub async fn extract(&self, message: &str) -> Result<Option<CoinSnapshot>> {
        let lowered = message.to_lowercase();

        if let Some(id) = match_alias(&lowered) {
            tracing::debug!(coin = id, "Alias match");
            return self.market.fetch_snapshot(id).await;
        }

        let limit = self.config.max_lookup_tokens.unwrap_or(usize::MAX);
        for token in candidate_tokens(&lowered).take(limit) {
            if let Some(id) = self.market.resolve_id(token).await? {
                tracing::debug!(token, coin = %id, "Catalog match");
                return self.market.fetch_snapshot(&id).await;
            }
        }

        tracing::debug!("No coin mentioned");
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MarketError;
    use crate::market::{MarketCall, MockMarketData};

    fn extractor(market: &Arc<MockMarketData>) -> CoinExtractor {
        CoinExtractor::new(market.clone(), ExtractorConfig::default())
    }

    #[test]
    fn test_match_alias_table_order() {
        assert_eq!(match_alias("what's up with btc today?"), Some("bitcoin"));
        assert_eq!(match_alias("ethereum or bitcoin?"), Some("bitcoin"));
        assert_eq!(match_alias("xrp news"), Some("ripple"));
        assert_eq!(match_alias("tell me a joke"), None);
    }

    #[test]
    fn test_candidate_tokens() {
        let tokens: Vec<_> = candidate_tokens("what's up with btc-2 to_the moon?").collect();
        assert_eq!(tokens, vec!["what", "with", "btc", "to_the", "moon"]);
    }

    #[tokio::test]
    async fn test_btc_alias_fetches_bitcoin() {
        let market = Arc::new(MockMarketData::new());
        let snapshot = extractor(&market)
            .extract("What's up with BTC today?")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(snapshot.id, "bitcoin");
        assert_eq!(
            market.calls().await,
            vec![
                MarketCall::Markets(vec!["bitcoin".into()]),
                MarketCall::Description("bitcoin".into()),
            ]
        );
    }

    #[tokio::test]
    async fn test_alias_beats_catalog_words() {
        let market = Arc::new(MockMarketData::new());
        let snapshot = extractor(&market)
            .extract("Compare Avalanche with Ethereum")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(snapshot.id, "ethereum");
        assert!(!market.calls().await.contains(&MarketCall::CoinList));
    }

    #[tokio::test]
    async fn test_alias_without_data_does_not_fall_through() {
        let market = Arc::new(MockMarketData::new());
        let snapshot = extractor(&market).extract("Polkadot price?").await.unwrap();

        assert!(snapshot.is_none());
        assert_eq!(
            market.calls().await,
            vec![MarketCall::Markets(vec!["polkadot".into()])]
        );
    }

    #[tokio::test]
    async fn test_catalog_fallback_first_success_wins() {
        let market = Arc::new(MockMarketData::new());
        let snapshot = extractor(&market)
            .extract("How is Avalanche doing?")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(snapshot.id, "avalanche-2");
        assert_eq!(
            market.calls().await,
            vec![
                MarketCall::CoinList,
                MarketCall::CoinList,
                MarketCall::Markets(vec!["avalanche-2".into()]),
                MarketCall::Description("avalanche-2".into()),
            ]
        );
    }

    #[tokio::test]
    async fn test_unrecognized_message_is_absent() {
        let market = Arc::new(MockMarketData::new());
        let snapshot = extractor(&market).extract("Tell me a joke").await.unwrap();

        assert!(snapshot.is_none());
        assert_eq!(market.calls().await, vec![MarketCall::CoinList, MarketCall::CoinList]);
    }

    #[tokio::test]
    async fn test_lookup_cap_limits_catalog_calls() {
        let market = Arc::new(MockMarketData::new());
        let extractor = CoinExtractor::new(
            market.clone(),
            ExtractorConfig {
                max_lookup_tokens: Some(1),
            },
        );

        let snapshot = extractor.extract("How is Avalanche doing?").await.unwrap();
        assert!(snapshot.is_none());
        assert_eq!(market.calls().await, vec![MarketCall::CoinList]);
    }

    #[tokio::test]
    async fn test_catalog_errors_propagate() {
        let market = Arc::new(MockMarketData::new().rate_limited());
        let err = extractor(&market).extract("Tell me a joke").await.unwrap_err();
        assert!(matches!(err, MarketError::RateLimited));
    }
}

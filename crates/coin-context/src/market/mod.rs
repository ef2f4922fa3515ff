//! Market Data Integration
//!
//! Abstraction over cryptocurrency market-data providers plus the lookups the
//! chat pipeline builds on top of it.

mod coingecko;
mod mock;

pub use coingecko::{CoinGeckoClient, CoinGeckoConfig};
pub use mock::{MarketCall, MockMarketData};

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{CoinListing, CoinSnapshot, MarketEntry};

/// Market-data client trait (Strategy pattern)
///
/// Implementors supply the three raw provider reads; snapshot assembly and
/// id resolution are shared.
#[async_trait]
pub trait MarketDataClient: Send + Sync {
    /// Market summary rows for the given provider ids
    async fn markets(&self, ids: &[&str]) -> Result<Vec<MarketEntry>>;

    /// Full coin catalog
    async fn coin_list(&self) -> Result<Vec<CoinListing>>;

    /// English long-form description of a coin
    async fn description(&self, id: &str) -> Result<Option<String>>;

    /// Provider name
    fn name(&self) -> &str;

    /// Market snapshot for a single coin, `None` if the provider has no data.
    ///
    /// The description is best-effort: a failed description fetch still
    /// yields the snapshot.
    async fn fetch_snapshot(&self, id: &str) -> Result<Option<CoinSnapshot>> {
        let Some(entry) = self.markets(&[id]).await?.into_iter().next() else {
            tracing::debug!(coin = id, "No market data");
            return Ok(None);
        };

        let description = match self.description(id).await {
            Ok(description) => description,
            Err(e) => {
                tracing::warn!(coin = id, "Description unavailable: {}", e);
                None
            }
        };

        Ok(Some(entry.into_snapshot(description)))
    }

    /// Resolve a free-text name or symbol to a provider id
    async fn resolve_id(&self, query: &str) -> Result<Option<String>> {
        let catalog = self.coin_list().await?;
        Ok(resolve_in_catalog(&catalog, query).map(str::to_owned))
    }
}

/// Find a coin id in a catalog.
///
/// Exact (case-insensitive) matches on id, symbol or name win over substring
/// matches on symbol or name, wherever they sit in the catalog.
pub fn resolve_in_catalog<'a>(catalog: &'a [CoinListing], query: &str) -> Option<&'a str> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return None;
    }

    let exact = catalog.iter().find(|coin| {
        coin.id.to_lowercase() == query
            || coin.symbol.to_lowercase() == query
            || coin.name.to_lowercase() == query
    });

    exact
        .or_else(|| {
            catalog.iter().find(|coin| {
                coin.name.to_lowercase().contains(&query)
                    || coin.symbol.to_lowercase().contains(&query)
            })
        })
        .map(|coin| coin.id.as_str())
}

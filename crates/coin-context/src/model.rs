//! Domain Models
//!
//! Market-data types as delivered by the provider, the snapshot handed to the
//! chat layer, and the request/response pair of the chat endpoint.
//! Uses `rust_decimal` for all market figures.

use agent_core::Message;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One entry of the provider's coin catalog
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinListing {
    /// Canonical provider identifier (e.g., "bitcoin")
    pub id: String,

    /// Ticker symbol as listed (e.g., "btc")
    pub symbol: String,

    /// Display name (e.g., "Bitcoin")
    pub name: String,
}

impl CoinListing {
    pub fn new(id: impl Into<String>, symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            symbol: symbol.into(),
            name: name.into(),
        }
    }
}

/// Market summary row for a single coin, as returned by `/coins/markets`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MarketEntry {
    pub id: String,
    pub symbol: String,
    pub name: String,

    /// Price in USD
    #[serde(default)]
    pub current_price: Option<Decimal>,

    /// 24-hour price change, in percent
    #[serde(default)]
    pub price_change_percentage_24h: Option<Decimal>,

    #[serde(default)]
    pub market_cap: Option<Decimal>,

    #[serde(default)]
    pub market_cap_rank: Option<u32>,

    /// 24-hour traded volume in USD
    #[serde(default)]
    pub total_volume: Option<Decimal>,

    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

impl MarketEntry {
    /// Attach a (possibly missing) description and produce a snapshot
    pub fn into_snapshot(self, description: Option<String>) -> CoinSnapshot {
        CoinSnapshot {
            id: self.id,
            name: self.name,
            symbol: self.symbol,
            current_price: self.current_price,
            price_change_24h: self.price_change_percentage_24h,
            market_cap: self.market_cap,
            volume: self.total_volume,
            market_cap_rank: self.market_cap_rank,
            last_updated: self.last_updated,
            description: description.filter(|d| !d.trim().is_empty()),
        }
    }
}

/// Point-in-time market data for one coin, fetched fresh per request
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoinSnapshot {
    pub id: String,
    pub name: String,
    pub symbol: String,

    #[serde(serialize_with = "rust_decimal::serde::float_option::serialize")]
    pub current_price: Option<Decimal>,

    /// 24-hour price change, in percent
    #[serde(serialize_with = "rust_decimal::serde::float_option::serialize")]
    pub price_change_24h: Option<Decimal>,

    #[serde(serialize_with = "rust_decimal::serde::float_option::serialize")]
    pub market_cap: Option<Decimal>,

    /// 24-hour traded volume in USD
    #[serde(serialize_with = "rust_decimal::serde::float_option::serialize")]
    pub volume: Option<Decimal>,

    pub market_cap_rank: Option<u32>,

    pub last_updated: Option<DateTime<Utc>>,

    /// Long-form description; best-effort
    pub description: Option<String>,
}

/// Inbound chat request
#[derive(Clone, Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,

    /// Coin to discuss; skips extraction from the message when set
    #[serde(default, alias = "coinId")]
    pub coin_id: Option<String>,

    /// Prior turns, oldest first
    #[serde(default, alias = "history")]
    pub conversation_history: Option<Vec<Message>>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            coin_id: None,
            conversation_history: None,
        }
    }

    pub fn with_coin_id(mut self, coin_id: impl Into<String>) -> Self {
        self.coin_id = Some(coin_id.into());
        self
    }

    pub fn with_history(mut self, history: Vec<Message>) -> Self {
        self.conversation_history = Some(history);
        self
    }

    /// Explicit coin id, ignoring blank values
    pub fn explicit_coin_id(&self) -> Option<&str> {
        self.coin_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    pub fn history(&self) -> &[Message] {
        self.conversation_history.as_deref().unwrap_or_default()
    }
}

/// Chat reply with the coin data that informed it
#[derive(Clone, Debug, Serialize)]
pub struct ChatResponse {
    #[serde(rename = "response")]
    pub reply: String,

    pub coin_data: Option<CoinSnapshot>,
}

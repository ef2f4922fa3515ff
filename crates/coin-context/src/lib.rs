//! # coin-context
//!
//! Market-data context for cryptocurrency chat: figures out which coin a
//! message is about, pulls a live snapshot for it and frames the model
//! conversation around that data.
//!
//! ## Request Flow
//!
//! ```text
//! ┌───────────────┐   ┌────────────────┐   ┌──────────────────┐   ┌─────────────┐
//! │  ChatRequest  │──▶│ CoinExtractor  │──▶│  build_messages  │──▶│ LlmProvider │
//! │ (msg, coin_id)│   │ alias │ search │   │ persona/context/ │   │  complete   │
//! └───────────────┘   └───────┬────────┘   │ history/user     │   └──────┬──────┘
//!                             ▼            └──────────────────┘          ▼
//!                    MarketDataClient                              ChatResponse
//!                 (CoinGecko │ Mock)                             (reply, coin_data)
//! ```
//!
//! Coin identification is a heuristic. A message that names no coin simply
//! produces a reply without market context.

pub mod error;
pub mod market;
pub mod model;
pub mod svckit;

pub use error::{ChatError, MarketError, Result};
pub use market::{CoinGeckoClient, CoinGeckoConfig, MarketDataClient, MockMarketData};
pub use model::{ChatRequest, ChatResponse, CoinListing, CoinSnapshot, MarketEntry};
pub use svckit::{
    build_messages, format_coin_context, ChatConfig, ChatService, CoinExtractor, ExtractorConfig,
};

/// Persona for the crypto chat assistant
pub const CRYPTO_ASSISTANT_PROMPT: &str = r"You are a knowledgeable cryptocurrency and blockchain expert assistant.
You help users understand cryptocurrencies, analyze market trends, explain technical concepts,
and provide insights about specific coins and tokens.

Key guidelines:
- Provide accurate, helpful information about cryptocurrencies
- Use the provided coin data when available to give current, real-time information
- Explain complex concepts in an accessible way
- Be honest about market risks and volatility
- If you don't know something, say so rather than guessing
- Focus on education and analysis, not financial advice";

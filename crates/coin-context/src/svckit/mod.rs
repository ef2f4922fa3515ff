//! Service Kit - Chat Pipeline
//!
//! Coin extraction, conversation assembly and the chat orchestrator built on
//! top of `MarketDataClient` and `agent_core::LlmProvider`.

mod chat_service;
mod coin_extractor;
mod conversation;

pub use chat_service::{ChatConfig, ChatService};
pub use coin_extractor::{candidate_tokens, match_alias, CoinExtractor, ExtractorConfig, COIN_ALIASES};
pub use conversation::{build_messages, format_coin_context, DESCRIPTION_PREVIEW_CHARS, MISSING_FIELD};

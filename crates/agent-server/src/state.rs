//! Application State

use std::sync::Arc;

use coin_context::ChatService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Chat orchestrator (market data + LLM provider)
    pub chat: Arc<ChatService>,
}

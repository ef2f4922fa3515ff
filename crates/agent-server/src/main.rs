//! Coin chat HTTP server
//!
//! Axum server exposing the coin-aware chat endpoint. Market data comes from
//! CoinGecko (or the built-in mock), replies from the configured LLM backend.

mod handlers;
mod state;

use std::sync::Arc;

use axum::{routing::post, Router};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agent_runtime::{build_provider, ProviderKind};
use coin_context::{ChatConfig, ChatService, CoinGeckoClient, MarketDataClient, MockMarketData};

use crate::handlers::chat_handler;
use crate::state::AppState;

/// Build the router over shared state
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/chat", post(chat_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Market data source selected by `MARKET_DATA_SOURCE`
fn market_from_env() -> anyhow::Result<Arc<dyn MarketDataClient>> {
    let source = std::env::var("MARKET_DATA_SOURCE").unwrap_or_else(|_| "coingecko".into());
    match source.to_ascii_lowercase().as_str() {
        "mock" => Ok(Arc::new(MockMarketData::new())),
        "coingecko" => Ok(Arc::new(CoinGeckoClient::from_env()?)),
        other => anyhow::bail!("unknown MARKET_DATA_SOURCE '{other}'"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Initialize LLM provider
    let kind = ProviderKind::from_env()?;
    let provider = build_provider(kind)?;

    match provider.health_check().await {
        Ok(true) => {
            tracing::info!("✓ Connected to {}", provider.name());
            if let Ok(models) = provider.list_models().await {
                tracing::debug!("  {} models available", models.len());
            }
        }
        Ok(false) | Err(_) => {
            tracing::warn!("⚠ {} not reachable - chat requests will fail", provider.name());
        }
    }

    // Initialize market data
    let market = market_from_env()?;
    tracing::info!("✓ Market data from {}", market.name());

    let config = ChatConfig::from_env(kind.model_from_env());
    tracing::info!("  Model: {}", config.generation.model);

    let state = AppState {
        chat: Arc::new(ChatService::new(market, provider, config)),
    };

    // Start server
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("🚀 coin chat server running on http://{}", addr);
    tracing::info!("  POST /api/chat - Send message");

    axum::serve(listener, app(state)).await?;

    Ok(())
}

//! Error Types for Coin Context

use agent_core::AgentError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MarketError>;

/// Failures talking to the market-data provider.
///
/// A coin that simply does not exist is not an error: lookups return
/// `Ok(None)` for that case.
#[derive(Error, Debug)]
pub enum MarketError {
    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("Market data provider error: HTTP {status}: {message}")]
    Provider { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Failure of a whole chat request.
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("{0}")]
    MarketData(#[from] MarketError),

    #[error("Error calling LLM API: {0}")]
    ModelInvocation(#[from] AgentError),
}

impl ChatError {
    /// Uniform failure text reported to the caller
    pub fn detail(&self) -> String {
        format!("Error processing chat request: {self}")
    }
}

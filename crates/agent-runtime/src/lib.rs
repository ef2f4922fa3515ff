//! # agent-runtime
//!
//! Runtime providers for the coin chat proxy.
//!
//! ## Providers
//!
//! - **OpenAI** (default): any OpenAI-compatible `/chat/completions` endpoint
//! - **Ollama**: local LLM inference via Ollama
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_runtime::{build_provider, ProviderKind};
//!
//! // LLM_PROVIDER=openai|ollama
//! let provider = build_provider(ProviderKind::from_env()?)?;
//! let completion = provider.complete(messages, &options).await?;
//! ```

use std::sync::Arc;

#[cfg(feature = "ollama")]
pub mod ollama;
#[cfg(feature = "openai")]
pub mod openai;

#[cfg(feature = "ollama")]
pub use ollama::{OllamaConfig, OllamaProvider};
#[cfg(feature = "openai")]
pub use openai::{OpenAiConfig, OpenAiProvider};

// Re-export core types for convenience
pub use agent_core::{AgentError, LlmProvider, Message, Result, Role};

/// Default request deadline for model calls
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 60;

/// Read `LLM_TIMEOUT_SECS`, falling back to the default deadline
pub(crate) fn llm_timeout_from_env() -> u64 {
    std::env::var("LLM_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_LLM_TIMEOUT_SECS)
}

/// Supported model backends
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAi,
    Ollama,
}

impl ProviderKind {
    /// Parse a backend name, case-insensitively
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "openai" => Some(Self::OpenAi),
            "ollama" => Some(Self::Ollama),
            _ => None,
        }
    }

    /// Model used when none is configured
    pub const fn default_model(self) -> &'static str {
        match self {
            Self::OpenAi => "gpt-3.5-turbo",
            Self::Ollama => "llama3.2",
        }
    }

    /// Model to request: `LLM_MODEL`, then `OPENAI_MODEL` for the OpenAI
    /// backend only, then the backend default
    pub fn model_from_env(self) -> String {
        self.resolve_model(|var| std::env::var(var).ok())
    }

    fn resolve_model(self, lookup: impl Fn(&str) -> Option<String>) -> String {
        let configured = lookup("LLM_MODEL").or_else(|| match self {
            Self::OpenAi => lookup("OPENAI_MODEL"),
            Self::Ollama => None,
        });

        configured
            .filter(|model| !model.trim().is_empty())
            .unwrap_or_else(|| self.default_model().into())
    }

    /// Backend selected by `LLM_PROVIDER` (defaults to OpenAI)
    pub fn from_env() -> Result<Self> {
        match std::env::var("LLM_PROVIDER") {
            Ok(name) => Self::parse(&name)
                .ok_or_else(|| AgentError::Config(format!("unknown LLM_PROVIDER '{name}'"))),
            Err(_) => Ok(Self::OpenAi),
        }
    }
}

/// Build a provider of the given kind from its environment configuration
pub fn build_provider(kind: ProviderKind) -> Result<Arc<dyn LlmProvider>> {
    match kind {
        #[cfg(feature = "openai")]
        ProviderKind::OpenAi => Ok(Arc::new(OpenAiProvider::from_env()?)),
        #[cfg(feature = "ollama")]
        ProviderKind::Ollama => Ok(Arc::new(OllamaProvider::from_env())),
        #[allow(unreachable_patterns)]
        other => Err(AgentError::Config(format!(
            "provider {other:?} is not compiled into this build"
        ))),
    }
}

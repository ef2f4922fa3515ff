//! OpenAI-compatible LLM Provider
//!
//! Talks to any endpoint that implements the OpenAI `chat/completions`
//! contract (OpenAI itself, Azure-style gateways, vLLM, LM Studio, ...).

use std::time::Duration;

use agent_core::{
    error::{AgentError, Result},
    message::Message,
    provider::{Completion, FinishReason, GenerationOptions, LlmProvider, ModelInfo, TokenUsage},
};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI provider configuration
#[derive(Clone, Debug)]
pub struct OpenAiConfig {
    /// API root, without trailing slash
    pub base_url: String,

    /// Bearer token
    pub api_key: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            api_key: api_key.into(),
            timeout_secs: crate::DEFAULT_LLM_TIMEOUT_SECS,
        }
    }

    /// Read `OPENAI_API_KEY`, `OPENAI_BASE_URL` and `LLM_TIMEOUT_SECS`
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| AgentError::Config("OPENAI_API_KEY is not set".into()))?;
        let base_url =
            std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());

        Ok(Self {
            base_url,
            api_key,
            timeout_secs: crate::llm_timeout_from_env(),
        })
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    model: Option<String>,
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<TokenUsage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ModelList {
    data: Vec<ModelEntry>,
}

#[derive(Deserialize)]
struct ModelEntry {
    id: String,
}

/// OpenAI-compatible LLM provider
pub struct OpenAiProvider {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiProvider {
    /// Create from configuration
    pub fn from_config(config: OpenAiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AgentError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_config(OpenAiConfig::from_env()?)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn transport_error(&self, err: &reqwest::Error) -> AgentError {
        if err.is_timeout() {
            AgentError::Timeout(self.config.timeout_secs)
        } else if err.is_connect() {
            AgentError::ProviderUnavailable(err.to_string())
        } else {
            AgentError::Provider(err.to_string())
        }
    }

    /// Map non-success statuses onto the agent error taxonomy
    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(match status {
            StatusCode::TOO_MANY_REQUESTS => AgentError::RateLimited(body),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AgentError::Auth(body),
            _ => AgentError::Provider(format!("HTTP {}: {}", status.as_u16(), body)),
        })
    }

    async fn fetch_models(&self) -> Result<Vec<ModelInfo>> {
        let response = self
            .client
            .get(self.endpoint("models"))
            .bearer_auth(&self.config.api_key)
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;

        let list: ModelList = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| AgentError::Provider(e.to_string()))?;

        Ok(list
            .data
            .into_iter()
            .map(|m| ModelInfo {
                name: m.id.clone(),
                id: m.id,
            })
            .collect())
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "OpenAI"
    }

    async fn health_check(&self) -> Result<bool> {
        match self.fetch_models().await {
            Ok(_) => Ok(true),
            Err(e) => {
                tracing::warn!("OpenAI health check failed: {}", e);
                Ok(false)
            }
        }
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        let body = ChatCompletionRequest {
            model: &options.model,
            messages,
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        };

        tracing::debug!(model = %options.model, turns = messages.len(), "Calling chat completion");

        let response = self
            .client
            .post(self.endpoint("chat/completions"))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;

        let parsed: ChatCompletionResponse = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| AgentError::Provider(format!("invalid completion payload: {e}")))?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AgentError::Provider("completion returned no choices".into()))?;

        // Refusals and filtered replies come back with null content
        let content = choice.message.content.ok_or_else(|| {
            AgentError::Provider(format!(
                "completion returned no content (finish_reason: {})",
                choice.finish_reason.as_deref().unwrap_or("unknown")
            ))
        })?;

        Ok(Completion {
            content,
            model: parsed.model.unwrap_or_else(|| options.model.clone()),
            usage: parsed.usage,
            finish_reason: choice.finish_reason.as_deref().map(FinishReason::from_provider),
        })
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        self.fetch_models().await
    }
}

//! Chat Orchestrator
//!
//! One request, start to finish: identify the coin, fetch its snapshot,
//! assemble the conversation, call the model and shape the reply. Holds no
//! per-request state, so a single instance serves every request.

use std::sync::Arc;

use agent_core::{GenerationOptions, LlmProvider};

use super::coin_extractor::{CoinExtractor, ExtractorConfig};
use super::conversation::build_messages;
use crate::error::{ChatError, MarketError};
use crate::market::MarketDataClient;
use crate::model::{ChatRequest, ChatResponse, CoinSnapshot};
use crate::CRYPTO_ASSISTANT_PROMPT;

/// Chat pipeline configuration
#[derive(Clone, Debug)]
pub struct ChatConfig {
    /// Persona sent as the first system turn
    pub system_prompt: String,

    /// Model and sampling parameters
    pub generation: GenerationOptions,

    pub extractor: ExtractorConfig,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            system_prompt: CRYPTO_ASSISTANT_PROMPT.into(),
            generation: GenerationOptions::default(),
            extractor: ExtractorConfig::default(),
        }
    }
}

impl ChatConfig {
    /// Use `model` with `LLM_TEMPERATURE`, `LLM_MAX_TOKENS` and
    /// `MAX_LOOKUP_TOKENS` read from the environment
    pub fn from_env(model: impl Into<String>) -> Self {
        let defaults = GenerationOptions::default();
        let model = model.into();
        let temperature = std::env::var("LLM_TEMPERATURE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.temperature);
        let max_tokens = std::env::var("LLM_MAX_TOKENS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.max_tokens);

        Self {
            system_prompt: CRYPTO_ASSISTANT_PROMPT.into(),
            generation: GenerationOptions {
                model,
                temperature,
                max_tokens,
            },
            extractor: ExtractorConfig::from_env(),
        }
    }
}

/// Coin-aware chat orchestrator
pub struct ChatService {
    market: Arc<dyn MarketDataClient>,
    provider: Arc<dyn LlmProvider>,
    extractor: CoinExtractor,
    config: ChatConfig,
}

impl ChatService {
    pub fn new(
        market: Arc<dyn MarketDataClient>,
        provider: Arc<dyn LlmProvider>,
        config: ChatConfig,
    ) -> Self {
        let extractor = CoinExtractor::new(market.clone(), config.extractor.clone());
        Self {
            market,
            provider,
            extractor,
            config,
        }
    }

    /// Answer a chat request, enriched with market data when a coin is found.
    ///
    /// Any failure along the way fails the whole request; nothing partial is
    /// returned.
    pub async fn respond(&self, request: &ChatRequest) -> Result<ChatResponse, ChatError> {
        let coin_data = self.identify_coin(request).await?;

        match &coin_data {
            Some(coin) => tracing::info!(coin = %coin.id, "Coin context attached"),
            None => tracing::debug!("No coin context"),
        }

        let conversation = build_messages(
            &self.config.system_prompt,
            coin_data.as_ref(),
            request.history(),
            &request.message,
        );

        let completion = self
            .provider
            .complete(conversation.messages(), &self.config.generation)
            .await?;

        tracing::debug!(
            provider = self.provider.name(),
            model = %completion.model,
            "Model replied"
        );

        Ok(ChatResponse {
            reply: completion.content,
            coin_data,
        })
    }

    /// An explicit coin id wins over extraction; an unknown id means no context
    async fn identify_coin(
        &self,
        request: &ChatRequest,
    ) -> Result<Option<CoinSnapshot>, MarketError> {
        match request.explicit_coin_id() {
            Some(id) => self.market.fetch_snapshot(id).await,
            None => self.extractor.extract(&request.message).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_core::provider::ModelInfo;
    use agent_core::{AgentError, Completion, Message, Role};
    use async_trait::async_trait;
    use tokio::sync::Mutex;

    use crate::market::{MarketCall, MockMarketData};

    /// Provider that records every conversation it is asked to complete
    struct RecordingProvider {
        reply: Option<String>,
        seen: Mutex<Vec<(Vec<Message>, GenerationOptions)>>,
    }

    impl RecordingProvider {
        fn replying(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Some(reply.into()),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                reply: None,
                seen: Mutex::new(Vec::new()),
            })
        }

        async fn calls(&self) -> Vec<(Vec<Message>, GenerationOptions)> {
            self.seen.lock().await.clone()
        }
    }

    #[async_trait]
    impl LlmProvider for RecordingProvider {
        fn name(&self) -> &str {
            "Recording"
        }

        async fn health_check(&self) -> agent_core::Result<bool> {
            Ok(true)
        }

        async fn complete(
            &self,
            messages: &[Message],
            options: &GenerationOptions,
        ) -> agent_core::Result<Completion> {
            self.seen
                .lock()
                .await
                .push((messages.to_vec(), options.clone()));

            let content = self
                .reply
                .clone()
                .ok_or_else(|| AgentError::Provider("model exploded".into()))?;
            Ok(Completion {
                content,
                model: options.model.clone(),
                usage: None,
                finish_reason: None,
            })
        }

        async fn list_models(&self) -> agent_core::Result<Vec<ModelInfo>> {
            Ok(Vec::new())
        }
    }

    fn service(market: &Arc<MockMarketData>, provider: &Arc<RecordingProvider>) -> ChatService {
        ChatService::new(market.clone(), provider.clone(), ChatConfig::default())
    }

    #[tokio::test]
    async fn test_btc_message_gets_market_context() {
        let market = Arc::new(MockMarketData::new());
        let provider = RecordingProvider::replying("BTC is up today.");

        let response = service(&market, &provider)
            .respond(&ChatRequest::new("What's up with BTC today?"))
            .await
            .unwrap();

        assert_eq!(response.reply, "BTC is up today.");
        assert_eq!(response.coin_data.unwrap().id, "bitcoin");

        let calls = provider.calls().await;
        assert_eq!(calls.len(), 1);
        let (messages, options) = &calls[0];
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].content, CRYPTO_ASSISTANT_PROMPT);
        assert!(messages[1].content.contains("Symbol: BTC"));
        assert_eq!(messages[2], Message::user("What's up with BTC today?"));
        assert_eq!(options.max_tokens, 500);
    }

    #[tokio::test]
    async fn test_no_coin_replies_from_persona_and_history() {
        let market = Arc::new(MockMarketData::empty());
        let provider = RecordingProvider::replying("Here is a joke.");
        let request = ChatRequest::new("Tell me a joke").with_history(vec![
            Message::user("hi"),
            Message::assistant("hello, ask me about crypto"),
        ]);

        let response = service(&market, &provider).respond(&request).await.unwrap();

        assert_eq!(response.reply, "Here is a joke.");
        assert!(response.coin_data.is_none());

        let (messages, _) = &provider.calls().await[0];
        let roles: Vec<Role> = messages.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::System, Role::User, Role::Assistant, Role::User]);
    }

    #[tokio::test]
    async fn test_unknown_explicit_coin_is_soft_failure() {
        let market = Arc::new(MockMarketData::new());
        let provider = RecordingProvider::replying("I could not find that coin.");
        let request = ChatRequest::new("What about BTC?").with_coin_id("doesnotexist");

        let response = service(&market, &provider).respond(&request).await.unwrap();

        assert_eq!(response.reply, "I could not find that coin.");
        assert!(response.coin_data.is_none());
        assert_eq!(
            market.calls().await,
            vec![MarketCall::Markets(vec!["doesnotexist".into()])]
        );
        assert_eq!(provider.calls().await[0].0.len(), 2);
    }

    #[tokio::test]
    async fn test_explicit_coin_skips_extraction() {
        let market = Arc::new(MockMarketData::new());
        let provider = RecordingProvider::replying("Solana is fast.");
        let request = ChatRequest::new("Tell me about bitcoin").with_coin_id("solana");

        let response = service(&market, &provider).respond(&request).await.unwrap();

        assert_eq!(response.coin_data.unwrap().id, "solana");
    }

    #[tokio::test]
    async fn test_rate_limited_snapshot_fails_without_model_call() {
        let market = Arc::new(MockMarketData::new().rate_limited());
        let provider = RecordingProvider::replying("never sent");

        let err = service(&market, &provider)
            .respond(&ChatRequest::new("What's up with BTC today?"))
            .await
            .unwrap_err();

        assert!(matches!(err, ChatError::MarketData(MarketError::RateLimited)));
        assert!(err.detail().starts_with("Error processing chat request: Rate limit"));
        assert!(provider.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_description_failure_keeps_coin_data() {
        let market = Arc::new(MockMarketData::new().failing_descriptions());
        let provider = RecordingProvider::replying("ok");

        let response = service(&market, &provider)
            .respond(&ChatRequest::new("bitcoin?"))
            .await
            .unwrap();

        let coin = response.coin_data.unwrap();
        assert_eq!(coin.id, "bitcoin");
        assert!(coin.description.is_none());
        assert!(provider.calls().await[0].0[1].content.contains("- Description: N/A"));
    }

    #[tokio::test]
    async fn test_model_failure_surfaces_as_chat_error() {
        let market = Arc::new(MockMarketData::new());
        let provider = RecordingProvider::failing();

        let err = service(&market, &provider)
            .respond(&ChatRequest::new("Tell me a joke"))
            .await
            .unwrap_err();

        assert!(matches!(err, ChatError::ModelInvocation(_)));
        assert!(err.detail().contains("model exploded"));
    }

    #[tokio::test]
    async fn test_configured_generation_options_reach_provider() {
        let market = Arc::new(MockMarketData::empty());
        let provider = RecordingProvider::replying("ok");
        let config = ChatConfig {
            generation: GenerationOptions {
                model: "llama3.2".into(),
                temperature: 0.2,
                max_tokens: 128,
            },
            ..ChatConfig::default()
        };

        ChatService::new(market, provider.clone(), config)
            .respond(&ChatRequest::new("hello"))
            .await
            .unwrap();

        let (_, options) = &provider.calls().await[0];
        assert_eq!(options.model, "llama3.2");
        assert_eq!(options.max_tokens, 128);
    }
}

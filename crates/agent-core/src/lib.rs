//! # agent-core
//!
//! Conversation model and provider-agnostic LLM abstraction shared by the
//! coin chat workspace.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       Conversation                            │
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────────────────┐  │
//! │  │   persona    │──▶│   context    │──▶│  history + user  │  │
//! │  └──────────────┘   └──────────────┘   └──────────────────┘  │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                ▼
//!                    LlmProvider (Strategy)
//!               OpenAI-compatible │ Ollama │ ...
//! ```
//!
//! The `LlmProvider` trait lets the chat pipeline swap model backends
//! without touching orchestration code.

pub mod error;
pub mod message;
pub mod provider;

pub use error::{AgentError, Result};
pub use message::{Conversation, Message, Role};
pub use provider::{Completion, GenerationOptions, LlmProvider};

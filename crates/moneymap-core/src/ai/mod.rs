//! Pluggable LLM backend abstraction
//!
//! Every decision of substance in MoneyMap (conversation flow, goal
//! extraction, card recommendations, mission content, PDF statement
//! extraction) is delegated to a remote LLM. This module keeps that
//! collaborator behind a trait so handlers and agents never care which
//! backend is answering.
//!
//! # Architecture
//!
//! - `LlmBackend` trait: chat-completion interface all backends implement
//! - `LlmClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `OllamaBackend`, `MockBackend`
//!
//! # Configuration
//!
//! Environment variables:
//! - `LLM_BACKEND`: Backend to use (ollama, mock). Default: ollama
//! - `OLLAMA_HOST`: Ollama server URL (required for ollama backend)
//! - `OLLAMA_MODEL`: Model name (default: llama3.2)

mod mock;
mod ollama;
pub mod parsing;

pub use mock::MockBackend;
pub use ollama::OllamaBackend;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::ChatMessage;

/// Trait defining the chat interface for all LLM backends
///
/// Backends must be Send + Sync to allow use across async tasks.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Run one chat completion: system prompt + message history -> free text.
    ///
    /// The reply is expected (but not guaranteed) to contain JSON when the
    /// prompt asks for it; callers extract it via [`parsing`].
    async fn chat(&self, system: &str, messages: &[ChatMessage]) -> Result<String>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> bool;

    /// Get the model name (for logging)
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete LLM client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum LlmClient {
    /// Ollama backend (HTTP chat API)
    Ollama(OllamaBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl LlmClient {
    /// Create an LLM client from environment variables
    ///
    /// Checks `LLM_BACKEND` to determine which backend to use:
    /// - `ollama` (default): Uses OLLAMA_HOST and OLLAMA_MODEL
    /// - `mock`: Creates a mock backend for testing
    ///
    /// Returns None if the required environment variables are not set.
    pub fn from_env() -> Option<Self> {
        let backend = std::env::var("LLM_BACKEND").unwrap_or_else(|_| "ollama".to_string());

        match backend.to_lowercase().as_str() {
            "ollama" => OllamaBackend::from_env().map(LlmClient::Ollama),
            "mock" => Some(LlmClient::Mock(MockBackend::new())),
            _ => {
                tracing::warn!(backend = %backend, "Unknown LLM_BACKEND, falling back to ollama");
                OllamaBackend::from_env().map(LlmClient::Ollama)
            }
        }
    }

    /// Create an Ollama backend directly
    pub fn ollama(host: &str, model: &str) -> Self {
        LlmClient::Ollama(OllamaBackend::new(host, model))
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        LlmClient::Mock(MockBackend::new())
    }
}

#[async_trait]
impl LlmBackend for LlmClient {
    async fn chat(&self, system: &str, messages: &[ChatMessage]) -> Result<String> {
        match self {
            LlmClient::Ollama(b) => b.chat(system, messages).await,
            LlmClient::Mock(b) => b.chat(system, messages).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            LlmClient::Ollama(b) => b.health_check().await,
            LlmClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            LlmClient::Ollama(b) => b.model(),
            LlmClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            LlmClient::Ollama(b) => b.host(),
            LlmClient::Mock(b) => b.host(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_llm_client_mock() {
        let client = LlmClient::mock();
        assert_eq!(client.model(), "mock");
        assert_eq!(client.host(), "mock://localhost");
    }

    #[tokio::test]
    async fn test_mock_health_check() {
        let client = LlmClient::mock();
        assert!(client.health_check().await);
    }
}

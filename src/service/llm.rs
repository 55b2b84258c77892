//! Shared generative-model client
//!
//! Provides a common interface for Gemini interactions used across services.

use async_trait::async_trait;
use rig::client::CompletionClient;
use rig::completion::Prompt;
use rig::providers::gemini;

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Failed to create Gemini client: {0}")]
    ClientInit(String),

    #[error("Completion request failed: {0}")]
    Completion(String),
}

/// Single-turn text completion against a named model
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        model: &str,
        preamble: &str,
        prompt: &str,
        temperature: f64,
    ) -> Result<String, LlmError>;
}

/// Shared LLM client wrapper
#[derive(Clone)]
pub struct LlmClient {
    client: gemini::Client,
}

impl LlmClient {
    /// Create a new LLM client with the provided API key
    pub fn new(api_key: &str) -> Result<Self, LlmError> {
        let client = gemini::Client::new(api_key).map_err(|e| LlmError::ClientInit(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl TextGenerator for LlmClient {
    async fn generate(
        &self,
        model: &str,
        preamble: &str,
        prompt: &str,
        temperature: f64,
    ) -> Result<String, LlmError> {
        let agent = self
            .client
            .agent(model)
            .preamble(preamble)
            .temperature(temperature)
            .build();

        agent
            .prompt(prompt)
            .await
            .map_err(|e| LlmError::Completion(e.to_string()))
    }
}

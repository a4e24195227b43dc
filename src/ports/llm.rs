/// LLM service port trait
///
/// Defines the single narrow interface through which every analysis stage
/// reaches a language model. Implementations: OpenAI, Anthropic, and a
/// deterministic heuristic model.
use crate::domain::models::AnalysisStage;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A single model call issued by a pipeline stage
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletionRequest {
    /// Which stage is asking
    pub stage: AnalysisStage,

    /// System message
    pub system: String,

    /// Fully rendered user prompt
    pub prompt: String,

    /// The structured stage input the prompt was rendered from
    pub payload: serde_json::Value,
}

/// Configuration for LLM requests
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LlmConfig {
    /// Model name (e.g., "gpt-4o", "claude-3-5-sonnet-latest")
    pub model: String,

    /// Temperature for generation (0.0 to 1.0)
    pub temperature: Option<f32>,

    /// Maximum tokens in response
    pub max_tokens: Option<u32>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            temperature: Some(0.1),
            max_tokens: Some(2000),
        }
    }
}

/// Port trait for LLM services
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LlmServicePort: Send + Sync {
    /// Run one completion and return the raw text of the answer
    async fn complete(&self, request: &CompletionRequest, config: &LlmConfig) -> Result<String>;

    /// Get the provider name
    fn provider_name(&self) -> &str;

    /// Check if the service is configured (has API key)
    fn is_configured(&self) -> bool;
}

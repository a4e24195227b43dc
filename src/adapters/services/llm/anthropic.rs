//! Anthropic LLM service adapter
//!
//! Implements the LlmServicePort for Anthropic's messages API (Claude models).
//! The stage's system message goes in the top-level `system` field.

use crate::error::{AppError, Result};
use crate::ports::llm::{CompletionRequest, LlmConfig, LlmServicePort};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const ANTHROPIC_API_BASE: &str = "https://api.anthropic.com/v1";
const ANTHROPIC_API_VERSION: &str = "2023-06-01";

/// Anthropic service implementation
pub struct AnthropicService {
    client: Client,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    system: String,
    messages: Vec<Message>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    #[serde(default)]
    stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: String,
}

impl AnthropicService {
    /// Create a new Anthropic service with the given API key
    pub fn new(api_key: String) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(120)).build()?;
        Ok(Self { client, api_key })
    }

    fn build_body(request: &CompletionRequest, config: &LlmConfig) -> MessagesRequest {
        MessagesRequest {
            model: config.model.clone(),
            system: request.system.clone(),
            messages: vec![Message {
                role: "user".to_string(),
                content: request.prompt.clone(),
            }],
            // Anthropic requires max_tokens to be specified
            max_tokens: config.max_tokens.unwrap_or(4096),
            temperature: config.temperature,
        }
    }
}

#[async_trait]
impl LlmServicePort for AnthropicService {
    async fn complete(&self, request: &CompletionRequest, config: &LlmConfig) -> Result<String> {
        let body = Self::build_body(request, config);

        log::info!(
            "Calling Anthropic messages API for {} with model: {}",
            request.stage,
            config.model
        );

        let response = self
            .client
            .post(format!("{}/messages", ANTHROPIC_API_BASE))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_API_VERSION)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Llm(format!("Messages request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::Llm(format!(
                "Messages request failed ({}): {}",
                status, error_text
            )));
        }

        let messages_response: MessagesResponse = response
            .json()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to parse messages response: {}", e)))?;

        if messages_response.stop_reason.as_deref() == Some("max_tokens") {
            log::warn!("Anthropic response for {} was truncated at max_tokens", request.stage);
        }

        let content = join_text_blocks(messages_response.content)
            .ok_or_else(|| AppError::Llm("No text content returned".to_string()))?;

        log::info!(
            "Anthropic completion successful, generated {} characters",
            content.len()
        );
        Ok(content)
    }

    fn provider_name(&self) -> &str {
        "anthropic"
    }

    fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

fn join_text_blocks(blocks: Vec<ContentBlock>) -> Option<String> {
    let text: Vec<String> = blocks
        .into_iter()
        .filter(|b| b.block_type == "text")
        .map(|b| b.text)
        .collect();
    if text.is_empty() {
        None
    } else {
        Some(text.concat())
    }
}

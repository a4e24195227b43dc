//! OpenAI LLM service adapter
//!
//! Implements the LlmServicePort for OpenAI's chat completions API and any
//! gateway that speaks the same protocol (set `OPENAI_API_BASE`).
//! Requests JSON-object output so stage responses parse directly.

use crate::error::{AppError, Result};
use crate::ports::llm::{CompletionRequest, LlmConfig, LlmServicePort};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// OpenAI service implementation
pub struct OpenAIService {
    client: Client,
    api_key: String,
    api_base: String,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

impl OpenAIService {
    /// Create a new OpenAI service with the given API key and optional base URL
    pub fn new(api_key: String, api_base: Option<String>) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(120)).build()?;
        let api_base = api_base
            .map(|base| base.trim_end_matches('/').to_string())
            .unwrap_or_else(|| OPENAI_API_BASE.to_string());

        Ok(Self {
            client,
            api_key,
            api_base,
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base)
    }

    fn build_body(request: &CompletionRequest, config: &LlmConfig) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: request.system.clone(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: request.prompt.clone(),
                },
            ],
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            response_format: ResponseFormat {
                format_type: "json_object",
            },
        }
    }
}

#[async_trait]
impl LlmServicePort for OpenAIService {
    async fn complete(&self, request: &CompletionRequest, config: &LlmConfig) -> Result<String> {
        let body = Self::build_body(request, config);

        log::info!(
            "Calling OpenAI chat completion for {} with model: {}",
            request.stage,
            config.model
        );

        let response = self
            .client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Llm(format!("Chat completion request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::Llm(format!(
                "Chat completion failed ({}): {}",
                status, error_text
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to parse completion response: {}", e)))?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Llm("No completion choices returned".to_string()))?;

        if choice.finish_reason.as_deref() == Some("length") {
            log::warn!("OpenAI response for {} was truncated at max_tokens", request.stage);
        }

        log::info!(
            "OpenAI completion successful, generated {} characters",
            choice.message.content.len()
        );
        Ok(choice.message.content)
    }

    fn provider_name(&self) -> &str {
        "openai"
    }

    fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

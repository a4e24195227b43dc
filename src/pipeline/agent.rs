//! Shared model-calling plumbing for the analysis stages
//!
//! An `Agent` renders a stage's prompt from its structured payload, sends it
//! through the `LlmServicePort`, and parses the answer into a typed record.

use crate::domain::models::AnalysisStage;
use crate::domain::PromptTemplates;
use crate::error::{AppError, Result};
use crate::ports::llm::{CompletionRequest, LlmConfig, LlmServicePort};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// Model handle plus request settings, owned by each stage
#[derive(Clone)]
pub struct Agent {
    llm: Arc<dyn LlmServicePort>,
    config: LlmConfig,
}

impl Agent {
    pub fn new(llm: Arc<dyn LlmServicePort>, config: LlmConfig) -> Self {
        Self { llm, config }
    }

    /// Ask the model for one stage and parse its JSON answer into `T`
    pub async fn ask<P, T>(&self, stage: AnalysisStage, payload: &P) -> Result<T>
    where
        P: Serialize,
        T: DeserializeOwned,
    {
        let payload = serde_json::to_value(payload)?;
        let input = serde_json::to_string_pretty(&payload)?;
        let request = CompletionRequest {
            stage,
            system: PromptTemplates::system(&stage).to_string(),
            prompt: PromptTemplates::render(&stage, &input),
            payload,
        };

        log::debug!("{} prompt is {} characters", stage, request.prompt.len());
        let raw = self.llm.complete(&request, &self.config).await?;
        parse_model_json(stage, &raw)
    }
}

/// Parse a model answer, tolerating a surrounding Markdown code fence
pub fn parse_model_json<T: DeserializeOwned>(stage: AnalysisStage, raw: &str) -> Result<T> {
    let body = strip_code_fence(raw);
    serde_json::from_str(body)
        .map_err(|e| AppError::MalformedResponse(format!("{} response: {}", stage, e)))
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening fence line
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::llm::MockLlmServicePort;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Steps {
        next_steps: Vec<String>,
    }

    #[test]
    fn test_parse_plain_json() {
        let steps: Steps =
            parse_model_json(AnalysisStage::NextSteps, r#"{"next_steps": ["Call"]}"#).unwrap();
        assert_eq!(steps.next_steps, vec!["Call"]);
    }

    #[test]
    fn test_parse_fenced_json() {
        let raw = "```json\n{\"next_steps\": []}\n```";
        let steps: Steps = parse_model_json(AnalysisStage::NextSteps, raw).unwrap();
        assert!(steps.next_steps.is_empty());
    }

    #[test]
    fn test_parse_rejects_prose() {
        let result: Result<Steps> =
            parse_model_json(AnalysisStage::NextSteps, "Here are the next steps: call.");
        assert!(matches!(result, Err(AppError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn test_ask_sends_stage_prompt_and_payload() {
        let mut llm = MockLlmServicePort::new();
        llm.expect_complete()
            .withf(|request, config| {
                request.stage == AnalysisStage::NextSteps
                    && request.prompt.contains("\"action_items\"")
                    && request.payload["action_items"][0] == "Open 529 plan"
                    && config.model == "gpt-4o"
            })
            .times(1)
            .returning(|_, _| Ok(r#"{"next_steps": ["ACTION: Open 529 plan"]}"#.to_string()));

        let agent = Agent::new(Arc::new(llm), LlmConfig::default());
        let payload = serde_json::json!({ "action_items": ["Open 529 plan"] });
        let steps: Steps = agent.ask(AnalysisStage::NextSteps, &payload).await.unwrap();

        assert_eq!(steps.next_steps, vec!["ACTION: Open 529 plan"]);
    }

    #[tokio::test]
    async fn test_ask_propagates_service_errors() {
        let mut llm = MockLlmServicePort::new();
        llm.expect_complete()
            .returning(|_, _| Err(AppError::Llm("rate limited".to_string())));

        let agent = Agent::new(Arc::new(llm), LlmConfig::default());
        let result: Result<Steps> = agent
            .ask(AnalysisStage::NextSteps, &serde_json::json!({}))
            .await;

        assert!(matches!(result, Err(AppError::Llm(_))));
    }
}

//! LLM service adapters
//!
//! Implementations of the LlmServicePort trait:
//! - OpenAI (GPT-4o and compatible gateways)
//! - Anthropic (Claude)
//! - Heuristic (deterministic keyword rules, offline)

pub mod anthropic;
pub mod heuristic;
pub mod openai;

pub use anthropic::AnthropicService;
pub use heuristic::HeuristicService;
pub use openai::OpenAIService;

use crate::config::{AppConfig, LlmProvider};
use crate::error::{AppError, Result};
use crate::ports::llm::LlmServicePort;
use std::sync::Arc;

/// Build the configured LLM service
pub fn create_service(config: &AppConfig) -> Result<Arc<dyn LlmServicePort>> {
    let service: Arc<dyn LlmServicePort> = match config.provider {
        LlmProvider::OpenAI => Arc::new(OpenAIService::new(
            config.api_key.clone(),
            config.api_base.clone(),
        )?),
        LlmProvider::Anthropic => Arc::new(AnthropicService::new(config.api_key.clone())?),
        LlmProvider::Heuristic => Arc::new(HeuristicService::new()),
    };

    if !service.is_configured() {
        return Err(AppError::Config(format!(
            "{} provider has no API key",
            service.provider_name()
        )));
    }

    log::info!("Using {} LLM provider", service.provider_name());
    Ok(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::keychain::MockKeychain;

    fn config(vars: &[(&str, &str)]) -> AppConfig {
        let vars: Vec<(String, String)> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(
            |name| vars.iter().find(|(k, _)| k == name).map(|(_, v)| v.clone()),
            &MockKeychain::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_create_each_provider() {
        let openai = create_service(&config(&[("OPENAI_API_KEY", "sk-test")])).unwrap();
        assert_eq!(openai.provider_name(), "openai");

        let anthropic = create_service(&config(&[
            ("LLM_PROVIDER", "anthropic"),
            ("ANTHROPIC_API_KEY", "sk-ant"),
        ]))
        .unwrap();
        assert_eq!(anthropic.provider_name(), "anthropic");

        let heuristic = create_service(&config(&[("LLM_PROVIDER", "heuristic")])).unwrap();
        assert_eq!(heuristic.provider_name(), "heuristic");
    }
}

//! Application configuration
//!
//! Read once at startup from the environment (a `.env` file is loaded first
//! by the binary). API keys fall back to the OS keychain.

use crate::error::{AppError, Result};
use crate::ports::llm::LlmConfig;
use crate::utils::keychain::KeychainPort;
use std::path::PathBuf;
use std::str::FromStr;

/// Which LLM adapter to build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    OpenAI,
    Anthropic,
    /// Deterministic rule-based model, needs no credentials
    Heuristic,
}

impl LlmProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            LlmProvider::OpenAI => "openai",
            LlmProvider::Anthropic => "anthropic",
            LlmProvider::Heuristic => "heuristic",
        }
    }

    /// Environment variable holding this provider's API key
    pub fn api_key_var(&self) -> Option<&'static str> {
        match self {
            LlmProvider::OpenAI => Some("OPENAI_API_KEY"),
            LlmProvider::Anthropic => Some("ANTHROPIC_API_KEY"),
            LlmProvider::Heuristic => None,
        }
    }

    /// Model used when `LLM_MODEL` is not set
    pub fn default_model(&self) -> &'static str {
        match self {
            LlmProvider::OpenAI => "gpt-4o",
            LlmProvider::Anthropic => "claude-3-5-sonnet-latest",
            LlmProvider::Heuristic => "keyword-rules",
        }
    }
}

impl FromStr for LlmProvider {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "anthropic" => Ok(Self::Anthropic),
            "heuristic" => Ok(Self::Heuristic),
            other => Err(AppError::Config(format!("Unsupported LLM provider: {}", other))),
        }
    }
}

/// How simulated data may stand in for real sources
///
/// `Fallback` is the degraded-production mode: real sources are used when
/// present and every substitution is logged as a warning. `Always` is the
/// demo/test mode and ignores real sources entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulatedData {
    Off,
    Fallback,
    Always,
}

impl FromStr for SimulatedData {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "off" | "false" | "0" => Ok(Self::Off),
            "fallback" => Ok(Self::Fallback),
            "always" | "true" | "1" => Ok(Self::Always),
            other => Err(AppError::Config(format!(
                "SIMULATED_DATA must be off, fallback or always, got '{}'",
                other
            ))),
        }
    }
}

impl SimulatedData {
    /// Settle the outcome of loading one source.
    ///
    /// Empty or unavailable sources are replaced by `simulated()` when the
    /// mode allows it; any other error propagates unchanged.
    pub fn settle<T>(
        &self,
        kind: &str,
        loaded: Result<Vec<T>>,
        simulated: impl FnOnce() -> Vec<T>,
    ) -> Result<Vec<T>> {
        if *self == SimulatedData::Always {
            log::info!("Simulated data mode: using built-in {} data", kind);
            return Ok(simulated());
        }

        let reason = match loaded {
            Ok(records) if !records.is_empty() => return Ok(records),
            Ok(_) => format!("{} source is empty", kind),
            Err(AppError::SourceUnavailable(reason)) => reason,
            Err(other) => return Err(other),
        };

        match self {
            SimulatedData::Fallback => {
                log::warn!(
                    "{} data unavailable ({}), substituting built-in simulated data",
                    kind,
                    reason
                );
                Ok(simulated())
            }
            _ => Err(AppError::SourceUnavailable(reason)),
        }
    }
}

/// Settings that shape the pipeline itself
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSettings {
    pub simulated_data: SimulatedData,
    /// Products kept per need
    pub top_k: usize,
    /// A product counts as a match only when its similarity is strictly
    /// above this value, in `[0, 1]`
    pub similarity_threshold: f32,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            simulated_data: SimulatedData::Fallback,
            top_k: 3,
            similarity_threshold: 0.2,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub provider: LlmProvider,
    pub api_key: String,
    pub api_base: Option<String>,
    pub llm: LlmConfig,
    pub pipeline: PipelineSettings,
    pub client_data_path: PathBuf,
    pub product_catalog_path: PathBuf,
    pub transcript_path: PathBuf,
    pub output_dir: PathBuf,
}

impl AppConfig {
    /// Loads configuration from process environment variables
    pub fn from_env(keychain: &dyn KeychainPort) -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok(), keychain)
    }

    /// Loads configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F, keychain: &dyn KeychainPort) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let provider = var("LLM_PROVIDER")
            .map(|v| v.parse::<LlmProvider>())
            .transpose()?
            .unwrap_or(LlmProvider::OpenAI);

        let api_key = match provider.api_key_var() {
            Some(name) => match var(name) {
                Some(key) => key,
                None => keychain.get_api_key(provider.as_str()).map_err(|_| {
                    AppError::Config(format!(
                        "{} is not set and no key for '{}' is stored in the keychain",
                        name,
                        provider.as_str()
                    ))
                })?,
            },
            None => String::new(),
        };

        let llm = LlmConfig {
            model: var("LLM_MODEL").unwrap_or_else(|| provider.default_model().to_string()),
            temperature: Some(parse_var(&var, "LLM_TEMPERATURE", 0.1f32)?),
            max_tokens: Some(parse_var(&var, "LLM_MAX_TOKENS", 2000u32)?),
        };

        let settings = PipelineSettings::default();
        let pipeline = PipelineSettings {
            simulated_data: var("SIMULATED_DATA")
                .map(|v| v.parse::<SimulatedData>())
                .transpose()?
                .unwrap_or(settings.simulated_data),
            top_k: parse_var(&var, "SEARCH_TOP_K", settings.top_k)?,
            similarity_threshold: parse_var(
                &var,
                "SIMILARITY_THRESHOLD",
                settings.similarity_threshold,
            )?,
        };

        if pipeline.top_k == 0 {
            return Err(AppError::Config("SEARCH_TOP_K must be at least 1".to_string()));
        }
        if !(0.0..=1.0).contains(&pipeline.similarity_threshold) {
            return Err(AppError::Config(format!(
                "SIMILARITY_THRESHOLD must be between 0 and 1, got {}",
                pipeline.similarity_threshold
            )));
        }

        let path = |name: &str, default: &str| {
            PathBuf::from(var(name).unwrap_or_else(|| default.to_string()))
        };

        Ok(Self {
            provider,
            api_key,
            api_base: var("OPENAI_API_BASE"),
            llm,
            pipeline,
            client_data_path: path("CLIENT_DATA_PATH", "data/client_state.csv"),
            product_catalog_path: path("PRODUCT_CATALOG_PATH", "data/product_portfolio.csv"),
            transcript_path: path("TRANSCRIPT_PATH", "data/transcript.txt"),
            output_dir: path("OUTPUT_DIR", "output"),
        })
    }
}

fn parse_var<T, F>(var: &F, name: &str, default: T) -> Result<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match var(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} has an invalid value: '{}'", name, raw))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::keychain::MockKeychain;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)], keychain: &MockKeychain) -> Result<AppConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned(), keychain)
    }

    #[test]
    fn test_defaults_with_env_key() {
        let config = load(&[("OPENAI_API_KEY", "sk-test")], &MockKeychain::new()).unwrap();

        assert_eq!(config.provider, LlmProvider::OpenAI);
        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.llm.model, "gpt-4o");
        assert_eq!(config.llm.temperature, Some(0.1));
        assert_eq!(config.pipeline, PipelineSettings::default());
        assert_eq!(config.transcript_path, PathBuf::from("data/transcript.txt"));
        assert_eq!(config.output_dir, PathBuf::from("output"));
    }

    #[test]
    fn test_api_key_falls_back_to_keychain() {
        let keychain = MockKeychain::new();
        keychain.save_api_key("anthropic", "sk-ant-stored").unwrap();

        let config = load(&[("LLM_PROVIDER", "Anthropic")], &keychain).unwrap();
        assert_eq!(config.provider, LlmProvider::Anthropic);
        assert_eq!(config.api_key, "sk-ant-stored");
        assert_eq!(config.llm.model, "claude-3-5-sonnet-latest");
    }

    #[test]
    fn test_missing_api_key_is_config_error() {
        let result = load(&[], &MockKeychain::new());
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_heuristic_provider_needs_no_key() {
        let config = load(
            &[("LLM_PROVIDER", "heuristic"), ("SIMULATED_DATA", "always")],
            &MockKeychain::new(),
        )
        .unwrap();
        assert_eq!(config.provider, LlmProvider::Heuristic);
        assert!(config.api_key.is_empty());
        assert_eq!(config.pipeline.simulated_data, SimulatedData::Always);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let keychain = MockKeychain::new();
        let base = ("LLM_PROVIDER", "heuristic");

        assert!(matches!(
            load(&[base, ("SEARCH_TOP_K", "many")], &keychain),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            load(&[base, ("SEARCH_TOP_K", "0")], &keychain),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            load(&[base, ("SIMULATED_DATA", "sometimes")], &keychain),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            load(&[("LLM_PROVIDER", "cohere")], &keychain),
            Err(AppError::Config(_))
        ));
        for threshold in ["NaN", "-1", "1.5", "inf"] {
            assert!(
                matches!(
                    load(&[base, ("SIMILARITY_THRESHOLD", threshold)], &keychain),
                    Err(AppError::Config(_))
                ),
                "threshold {} accepted",
                threshold
            );
        }
        let config = load(&[base, ("SIMILARITY_THRESHOLD", "0.35")], &keychain).unwrap();
        assert_eq!(config.pipeline.similarity_threshold, 0.35);
    }

    #[test]
    fn test_settle_fallback_substitutes_unavailable() {
        let loaded: Result<Vec<u8>> = Err(AppError::SourceUnavailable("missing".into()));
        assert_eq!(
            SimulatedData::Fallback
                .settle("client", loaded, || vec![1, 2])
                .unwrap(),
            vec![1, 2]
        );
    }

    #[test]
    fn test_settle_off_reports_unavailable() {
        let result = SimulatedData::Off.settle("product", Ok(Vec::<u8>::new()), || vec![1]);
        assert!(matches!(result, Err(AppError::SourceUnavailable(_))));
    }

    #[test]
    fn test_settle_propagates_other_errors() {
        let loaded: Result<Vec<u8>> = Err(AppError::InvalidInput("bad row".into()));
        let result = SimulatedData::Fallback.settle("client", loaded, || vec![1]);
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_settle_always_ignores_real_records() {
        assert_eq!(
            SimulatedData::Always
                .settle("client", Ok(vec![9]), || vec![1])
                .unwrap(),
            vec![1]
        );
    }
}

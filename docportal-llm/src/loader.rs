//! Environment-driven model loading.
//!
//! Selects and configures a provider from the process environment:
//!
//! - `DOCPORTAL_PROVIDER`: `openai` (default), `anthropic`, or `local`
//! - `DOCPORTAL_MODEL`: overrides the provider's default model
//! - `DOCPORTAL_BASE_URL`: endpoint for `local` (default Ollama port)
//! - `OPENAI_API_KEY` / `ANTHROPIC_API_KEY`: credentials

use crate::provider::{AnthropicProvider, AnyProvider, OpenAiProvider, ProviderConfig};
use docportal_error::TracedError;
use std::env;
use tracing::info;

/// Builds a configured provider from the environment.
#[derive(Debug, Clone, Default)]
pub struct ModelLoader {
    provider: Option<String>,
    model: Option<String>,
}

impl ModelLoader {
    /// Read the provider/model selection from the environment
    pub fn from_env() -> Self {
        Self {
            provider: env::var("DOCPORTAL_PROVIDER").ok(),
            model: env::var("DOCPORTAL_MODEL").ok(),
        }
    }

    /// Force a provider name, ignoring `DOCPORTAL_PROVIDER`
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Force a model name, ignoring `DOCPORTAL_MODEL`
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Build the configured provider
    pub fn load(&self) -> Result<AnyProvider, TracedError> {
        let name = self.provider.as_deref().unwrap_or("openai");

        let provider = match name {
            "openai" => {
                let api_key = env::var("OPENAI_API_KEY")
                    .map_err(|_| TracedError::new("OPENAI_API_KEY is not set"))?;
                let mut config = ProviderConfig::openai(api_key);
                if let Some(model) = &self.model {
                    config = config.with_model(model.as_str());
                }
                AnyProvider::OpenAi(OpenAiProvider::new(config))
            }
            "anthropic" => {
                let api_key = env::var("ANTHROPIC_API_KEY")
                    .map_err(|_| TracedError::new("ANTHROPIC_API_KEY is not set"))?;
                let mut config = ProviderConfig::anthropic(api_key);
                if let Some(model) = &self.model {
                    config = config.with_model(model.as_str());
                }
                AnyProvider::Anthropic(AnthropicProvider::new(config))
            }
            "local" => {
                let base_url = env::var("DOCPORTAL_BASE_URL")
                    .unwrap_or_else(|_| "http://localhost:11434/v1".to_string());
                let model = self
                    .model
                    .clone()
                    .ok_or_else(|| TracedError::new("DOCPORTAL_MODEL is required for local provider"))?;
                AnyProvider::OpenAi(OpenAiProvider::new(ProviderConfig::local(base_url, model)))
            }
            other => {
                return Err(TracedError::new(format!(
                    "unknown provider '{}' (expected openai, anthropic, or local)",
                    other
                )))
            }
        };

        info!(provider = name, "model provider loaded");
        Ok(provider)
    }
}

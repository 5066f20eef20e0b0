//! Model provider trait and implementations.

pub mod cached;
pub mod format;
pub mod http;

#[cfg(feature = "openai")]
pub mod openai;

#[cfg(feature = "ollama")]
pub mod ollama;

#[cfg(feature = "openai-compatible")]
pub mod openai_compatible;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::ToolwrightConfig;
use crate::error::ToolwrightError;
use crate::models::{capabilities::ModelCapabilities, LanguageModel};
use crate::types::{
    message::AgentToolCall, FinishReason, GenerationSettings, ModelMessage, ResponseFormat, Usage,
};

/// A request sent to a model provider.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderRequest {
    pub messages: Vec<ModelMessage>,
    pub settings: GenerationSettings,
    pub tools: Option<Vec<ToolDefinition>>,
    pub response_format: Option<ResponseFormat>,
}

impl ProviderRequest {
    /// A plain request: messages and settings, no tools.
    pub fn new(messages: Vec<ModelMessage>, settings: GenerationSettings) -> Self {
        let response_format = settings.response_format.clone();
        Self {
            messages,
            settings,
            tools: None,
            response_format,
        }
    }

    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = if tools.is_empty() { None } else { Some(tools) };
        self
    }
}

/// Tool definition sent to the provider API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// Response from a provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderResponse {
    pub text: String,
    pub usage: Usage,
    pub tool_calls: Vec<AgentToolCall>,
    pub finish_reason: Option<FinishReason>,
}

/// Core trait implemented by all model providers.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Provider name (e.g., "openai", "ollama").
    fn provider_name(&self) -> &str;

    /// The model ID this provider instance serves.
    fn model_id(&self) -> &str;

    /// Capabilities of the model.
    fn capabilities(&self) -> &ModelCapabilities;

    /// Generate a single (non-streaming) response.
    async fn generate_text(&self, request: &ProviderRequest)
        -> Result<ProviderResponse, ToolwrightError>;
}

/// Create a provider for the given model, using the provided config.
#[allow(unused_variables)]
pub fn create_provider(
    model: &LanguageModel,
    config: &ToolwrightConfig,
) -> Result<Box<dyn ModelProvider>, ToolwrightError> {
    match model {
        #[cfg(feature = "openai")]
        LanguageModel::OpenAi(m) => {
            let api_key = config.get_api_key("openai").ok_or_else(|| {
                ToolwrightError::Authentication("Missing OPENAI_API_KEY".into())
            })?;
            Ok(Box::new(openai::OpenAiProvider::new(
                m.clone(),
                api_key,
                config.get_base_url("openai"),
            )))
        }
        #[cfg(feature = "ollama")]
        LanguageModel::Ollama(m) => {
            let base_url = config
                .get_base_url("ollama")
                .unwrap_or_else(|| ollama::DEFAULT_BASE_URL.to_string());
            Ok(Box::new(ollama::OllamaProvider::new(m.clone(), base_url)))
        }
        #[cfg(feature = "openai-compatible")]
        LanguageModel::OpenAiCompatible(m) => {
            let api_key = config
                .get_api_key("openai-compatible")
                .or_else(|| config.get_api_key("openai"))
                .unwrap_or_default();
            let base_url = m
                .base_url
                .clone()
                .or_else(|| config.get_base_url("openai-compatible"))
                .ok_or_else(|| {
                    ToolwrightError::Configuration("Missing OPENAI_COMPAT_BASE_URL".into())
                })?;
            Ok(Box::new(openai_compatible::OpenAiCompatibleProvider::new(
                m.model_id.clone(),
                api_key,
                base_url,
            )))
        }
        LanguageModel::Custom { provider, .. } => Err(ToolwrightError::ModelNotFound(format!(
            "No built-in provider for '{provider}'. Use ollama, openai or openai-compatible."
        ))),
        #[allow(unreachable_patterns)]
        _ => Err(ToolwrightError::ModelNotFound(format!(
            "Provider for model '{model}' not enabled via feature flags"
        ))),
    }
}

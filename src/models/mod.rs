//! Model definitions and selection.

pub mod capabilities;
pub mod selector;

#[cfg(feature = "ollama")]
pub mod ollama;
#[cfg(feature = "openai")]
pub mod openai;
#[cfg(feature = "openai-compatible")]
pub mod openai_compatible;

pub use capabilities::ModelCapabilities;
pub use selector::ModelSelector;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Top-level language model enum, dispatching to provider-specific variants.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "provider", content = "model")]
pub enum LanguageModel {
    #[cfg(feature = "openai")]
    OpenAi(openai::OpenAiModel),
    #[cfg(feature = "ollama")]
    Ollama(ollama::OllamaModel),
    #[cfg(feature = "openai-compatible")]
    OpenAiCompatible(openai_compatible::OpenAiCompatibleModel),
    /// Custom model with explicit provider and model ID.
    Custom { provider: String, model_id: String },
}

impl LanguageModel {
    /// Get the model's API identifier string.
    pub fn model_id(&self) -> &str {
        match self {
            #[cfg(feature = "openai")]
            Self::OpenAi(m) => m.as_str(),
            #[cfg(feature = "ollama")]
            Self::Ollama(m) => m.as_str(),
            #[cfg(feature = "openai-compatible")]
            Self::OpenAiCompatible(m) => m.model_id.as_str(),
            Self::Custom { model_id, .. } => model_id,
        }
    }

    /// Get the provider name.
    pub fn provider_name(&self) -> &str {
        match self {
            #[cfg(feature = "openai")]
            Self::OpenAi(_) => "openai",
            #[cfg(feature = "ollama")]
            Self::Ollama(_) => "ollama",
            #[cfg(feature = "openai-compatible")]
            Self::OpenAiCompatible(_) => "openai-compatible",
            Self::Custom { provider, .. } => provider,
        }
    }

    /// Get capabilities for this model.
    pub fn capabilities(&self) -> ModelCapabilities {
        match self {
            #[cfg(feature = "openai")]
            Self::OpenAi(m) => m.capabilities(),
            #[cfg(feature = "ollama")]
            Self::Ollama(m) => m.capabilities(),
            #[cfg(feature = "openai-compatible")]
            Self::OpenAiCompatible(m) => m.capabilities(),
            Self::Custom { .. } => ModelCapabilities::default(),
        }
    }
}

impl fmt::Display for LanguageModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.provider_name(), self.model_id())
    }
}

//! Ollama local model definitions.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::capabilities::ModelCapabilities;

/// Ollama models with tool calling support.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumString)]
pub enum OllamaModel {
    #[strum(serialize = "llama3.2")]
    Llama32,
    #[strum(serialize = "llama3.2:3b-instruct-fp16")]
    Llama32Instruct3b,
    #[strum(serialize = "llama3.1")]
    Llama31,
    #[strum(serialize = "qwen2.5")]
    Qwen25,
    #[strum(serialize = "mistral")]
    Mistral,
    #[strum(default)]
    Custom(String),
}

impl OllamaModel {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Llama32 => "llama3.2",
            Self::Llama32Instruct3b => "llama3.2:3b-instruct-fp16",
            Self::Llama31 => "llama3.1",
            Self::Qwen25 => "qwen2.5",
            Self::Mistral => "mistral",
            Self::Custom(s) => s,
        }
    }

    /// Ollama accepts `response_format` JSON schemas on its OpenAI-compatible
    /// endpoint, so structured output is enforced server-side.
    pub fn capabilities(&self) -> ModelCapabilities {
        ModelCapabilities::full()
    }
}

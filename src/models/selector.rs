//! Model selection and parsing.

use std::str::FromStr;

use super::LanguageModel;
use crate::error::ToolwrightError;

/// Parse a "provider:model" string into a LanguageModel.
pub struct ModelSelector;

impl ModelSelector {
    /// Parse "provider:model_id" into a LanguageModel.
    ///
    /// Examples: "ollama:llama3.2", "openai:gpt-4o-mini", "openai-compatible:my-model"
    pub fn parse(s: &str) -> Result<LanguageModel, ToolwrightError> {
        let (provider, model_id) = s.split_once(':').ok_or_else(|| {
            ToolwrightError::InvalidArgument(format!(
                "Invalid model selector '{s}': expected 'provider:model_id'"
            ))
        })?;
        if model_id.is_empty() {
            return Err(ToolwrightError::InvalidArgument(format!(
                "Invalid model selector '{s}': empty model id"
            )));
        }

        match provider {
            #[cfg(feature = "openai")]
            "openai" => {
                use super::openai::OpenAiModel;
                let m = OpenAiModel::from_str(model_id)
                    .unwrap_or(OpenAiModel::Custom(model_id.to_string()));
                Ok(LanguageModel::OpenAi(m))
            }
            #[cfg(feature = "ollama")]
            "ollama" => {
                use super::ollama::OllamaModel;
                let m = OllamaModel::from_str(model_id)
                    .unwrap_or(OllamaModel::Custom(model_id.to_string()));
                Ok(LanguageModel::Ollama(m))
            }
            #[cfg(feature = "openai-compatible")]
            "openai-compatible" | "openai_compatible" => {
                use super::openai_compatible::OpenAiCompatibleModel;
                Ok(LanguageModel::OpenAiCompatible(OpenAiCompatibleModel::new(
                    model_id, None,
                )))
            }
            _ => Ok(LanguageModel::Custom {
                provider: provider.to_string(),
                model_id: model_id.to_string(),
            }),
        }
    }
}

impl FromStr for LanguageModel {
    type Err = ToolwrightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelSelector::parse(s)
    }
}

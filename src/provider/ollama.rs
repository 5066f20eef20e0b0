//! Ollama local provider (OpenAI-compatible endpoint).

use async_trait::async_trait;

use crate::error::ToolwrightError;
use crate::models::capabilities::ModelCapabilities;
use crate::models::ollama::OllamaModel;

use super::openai::OpenAiProvider;
use super::{ModelProvider, ProviderRequest, ProviderResponse};

/// Default local Ollama address.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

pub struct OllamaProvider {
    inner: OpenAiProvider,
}

impl OllamaProvider {
    pub fn new(model: OllamaModel, base_url: String) -> Self {
        let capabilities = model.capabilities();
        let openai_model = crate::models::openai::OpenAiModel::Custom(model.as_str().to_string());
        Self {
            inner: OpenAiProvider::new(
                openai_model,
                String::new(),
                Some(format!("{}/v1", base_url.trim_end_matches('/'))),
            )
            .with_capabilities(capabilities),
        }
    }
}

#[async_trait]
impl ModelProvider for OllamaProvider {
    fn provider_name(&self) -> &str {
        "ollama"
    }

    fn model_id(&self) -> &str {
        self.inner.model_id()
    }

    fn capabilities(&self) -> &ModelCapabilities {
        self.inner.capabilities()
    }

    async fn generate_text(
        &self,
        request: &ProviderRequest,
    ) -> Result<ProviderResponse, ToolwrightError> {
        self.inner.generate_text(request).await
    }
}

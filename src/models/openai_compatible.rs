//! Generic OpenAI-compatible model definitions.

use serde::{Deserialize, Serialize};

use super::capabilities::ModelCapabilities;

/// A model served by any endpoint speaking the Chat Completions protocol.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct OpenAiCompatibleModel {
    pub model_id: String,
    pub base_url: Option<String>,
}

impl OpenAiCompatibleModel {
    pub fn new(model_id: impl Into<String>, base_url: Option<String>) -> Self {
        Self {
            model_id: model_id.into(),
            base_url,
        }
    }

    pub fn capabilities(&self) -> ModelCapabilities {
        ModelCapabilities {
            supports_json_schema: false,
            ..ModelCapabilities::full()
        }
    }
}

//! Structured output: generate typed objects from model responses.

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ToolwrightError;
use crate::models::capabilities::ModelCapabilities;
use crate::provider::ModelProvider;
use crate::types::*;

/// A parsed object plus the raw model output it came from.
#[derive(Debug, Clone)]
pub struct GenerateObjectResult<T> {
    pub object: T,
    pub raw_text: String,
    pub usage: Usage,
    pub finish_reason: Option<FinishReason>,
}

/// Generate a typed object by asking the model to produce JSON.
///
/// Uses JSON Schema response format if the model supports it,
/// otherwise uses system prompt instructions.
pub async fn generate_object<T: DeserializeOwned>(
    provider: &dyn ModelProvider,
    mut messages: Vec<ModelMessage>,
    mut settings: GenerationSettings,
    schema: serde_json::Value,
    type_name: &str,
) -> Result<GenerateObjectResult<T>, ToolwrightError> {
    let capabilities = provider.capabilities();
    let pretty_schema = serde_json::to_string_pretty(&schema).unwrap_or_default();

    if capabilities.supports_json_schema {
        settings.response_format = Some(ResponseFormat::JsonSchema {
            schema,
            name: type_name.to_string(),
        });
    } else if capabilities.supports_json_mode {
        settings.response_format = Some(ResponseFormat::JsonObject);
        messages.insert(
            0,
            instruction(
                capabilities,
                format!(
                    "You must respond with valid JSON matching this schema:\n```json\n{pretty_schema}\n```"
                ),
            ),
        );
    } else {
        messages.insert(
            0,
            instruction(
                capabilities,
                format!(
                    "You must respond with ONLY valid JSON (no markdown, no explanation) matching this schema:\n```json\n{pretty_schema}\n```"
                ),
            ),
        );
    }

    let result = super::text::generate_text(provider, messages, settings, &[]).await?;

    let raw_text = result.text.trim().to_string();
    let json_text = strip_code_fences(&raw_text);
    debug!(type_name, raw = %json_text, "generate_object: parsing response");

    let object: T = serde_json::from_str(&json_text)?;

    Ok(GenerateObjectResult {
        object,
        raw_text,
        usage: result.usage,
        finish_reason: result.finish_reason,
    })
}

fn instruction(capabilities: &ModelCapabilities, text: String) -> ModelMessage {
    if capabilities.supports_system_messages {
        ModelMessage::system(text)
    } else {
        ModelMessage::user(text)
    }
}

/// Strip markdown code fences from JSON response.
pub(crate) fn strip_code_fences(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.starts_with("```") {
        let without_opening = if let Some(rest) = trimmed.strip_prefix("```json") {
            rest
        } else if let Some(rest) = trimmed.strip_prefix("```") {
            rest
        } else {
            trimmed
        };
        if let Some(stripped) = without_opening.strip_suffix("```") {
            return stripped.trim().to_string();
        }
        return without_opening.trim().to_string();
    }
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{ProviderRequest, ProviderResponse};
    use async_trait::async_trait;
    use serde::Deserialize;
    use std::sync::Mutex;

    #[test]
    fn strip_code_fences_plain_json() {
        assert_eq!(strip_code_fences(r#"{"key": "value"}"#), r#"{"key": "value"}"#);
    }

    #[test]
    fn strip_code_fences_with_json_fence() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_code_fences(input), r#"{"key": "value"}"#);
    }

    #[test]
    fn strip_code_fences_with_bare_fence() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_code_fences(input), r#"{"key": "value"}"#);
    }

    struct FixedProvider {
        reply: String,
        capabilities: ModelCapabilities,
        seen: Mutex<Vec<ProviderRequest>>,
    }

    #[async_trait]
    impl ModelProvider for FixedProvider {
        fn provider_name(&self) -> &str {
            "fixed"
        }

        fn model_id(&self) -> &str {
            "fixed-1"
        }

        fn capabilities(&self) -> &ModelCapabilities {
            &self.capabilities
        }

        async fn generate_text(
            &self,
            request: &ProviderRequest,
        ) -> Result<ProviderResponse, ToolwrightError> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(ProviderResponse {
                text: self.reply.clone(),
                ..Default::default()
            })
        }
    }

    #[derive(Debug, Deserialize)]
    struct Flag {
        presence: bool,
    }

    fn flag_schema() -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {"presence": {"type": "boolean"}},
            "required": ["presence"],
        })
    }

    #[tokio::test]
    async fn uses_json_schema_format_when_supported() {
        let provider = FixedProvider {
            reply: r#"{"presence": true}"#.into(),
            capabilities: ModelCapabilities::full(),
            seen: Mutex::new(Vec::new()),
        };

        let result: GenerateObjectResult<Flag> = generate_object(
            &provider,
            vec![ModelMessage::user("check")],
            GenerationSettings::deterministic(),
            flag_schema(),
            "FieldPresence",
        )
        .await
        .unwrap();

        assert!(result.object.presence);
        let seen = provider.seen.lock().unwrap();
        assert!(matches!(
            seen[0].response_format,
            Some(ResponseFormat::JsonSchema { ref name, .. }) if name == "FieldPresence"
        ));
        assert_eq!(seen[0].messages.len(), 1);
    }

    #[tokio::test]
    async fn falls_back_to_instructions_and_strips_fences() {
        let provider = FixedProvider {
            reply: "```json\n{\"presence\": false}\n```".into(),
            capabilities: ModelCapabilities::default(),
            seen: Mutex::new(Vec::new()),
        };

        let result: GenerateObjectResult<Flag> = generate_object(
            &provider,
            vec![ModelMessage::user("check")],
            GenerationSettings::deterministic(),
            flag_schema(),
            "FieldPresence",
        )
        .await
        .unwrap();

        assert!(!result.object.presence);
        let seen = provider.seen.lock().unwrap();
        assert!(seen[0].response_format.is_none());
        assert!(seen[0].messages[0].text().contains("ONLY valid JSON"));
    }

    #[tokio::test]
    async fn instructions_go_in_a_user_message_without_system_support() {
        let provider = FixedProvider {
            reply: r#"{"presence": true}"#.into(),
            capabilities: ModelCapabilities {
                supports_json_mode: true,
                supports_system_messages: false,
                ..ModelCapabilities::default()
            },
            seen: Mutex::new(Vec::new()),
        };

        generate_object::<Flag>(
            &provider,
            vec![ModelMessage::user("check")],
            GenerationSettings::deterministic(),
            flag_schema(),
            "FieldPresence",
        )
        .await
        .unwrap();

        let seen = provider.seen.lock().unwrap();
        assert!(matches!(seen[0].response_format, Some(ResponseFormat::JsonObject)));
        assert_eq!(seen[0].messages[0].role, Role::User);
        assert!(seen[0].messages[0].text().contains("\"presence\""));
        assert_eq!(seen[0].messages.len(), 2);
    }

    #[tokio::test]
    async fn unparseable_output_is_serialization_error() {
        let provider = FixedProvider {
            reply: "yes, it is present".into(),
            capabilities: ModelCapabilities::default(),
            seen: Mutex::new(Vec::new()),
        };

        let err = generate_object::<Flag>(
            &provider,
            vec![ModelMessage::user("check")],
            GenerationSettings::deterministic(),
            flag_schema(),
            "FieldPresence",
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ToolwrightError::Serialization(_)));
    }
}

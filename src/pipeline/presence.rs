//! Argument presence checks: is a proposed value actually in the query?

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::ToolwrightError;
use crate::generation::generate_object;
use crate::provider::ModelProvider;
use crate::tools::types::ArgumentKind;
use crate::types::{GenerationSettings, ModelMessage};

use super::policy::OutboundPolicy;

/// Judges whether one proposed argument value is supported by the query.
#[async_trait]
pub trait PresenceChecker: Send + Sync {
    async fn check(
        &self,
        user_query: &str,
        argument_name: &str,
        argument_description: &str,
        argument_type: ArgumentKind,
        proposed_value: &Value,
    ) -> Result<bool, ToolwrightError>;
}

/// Structured verdict returned by the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct FieldPresence {
    pub presence: bool,
}

impl FieldPresence {
    pub fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "presence": {
                    "type": "boolean",
                    "description": "Defines if the field is present in the user query."
                }
            },
            "required": ["presence"],
            "additionalProperties": false,
        })
    }
}

/// Render the presence prompt for one argument.
pub fn presence_prompt(
    user_query: &str,
    argument_name: &str,
    argument_description: &str,
    argument_type: ArgumentKind,
    proposed_value: &Value,
) -> String {
    let value = match proposed_value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    format!(
        "User asked this question:\n{user_query}\n\n\
         Here is the field name:\n{argument_name}\n\n\
         Here is the field description:\n{argument_description}\n\n\
         Here is the field type:\n{argument_type}\n\n\
         Here is the field value:\n{value}\n\n\
         You check whether a field is present in a user query.\n\
         Decide if the field, with the specified type and value, is present in the user query.\n\n\
         If the field type doesn't match, return false.\n\
         If the field is not present, return false.\n\
         Otherwise return true."
    )
}

/// Presence checker that asks a model for a `FieldPresence` object.
pub struct ModelPresenceChecker {
    provider: Arc<dyn ModelProvider>,
    settings: GenerationSettings,
    policy: OutboundPolicy,
}

impl ModelPresenceChecker {
    pub fn new(provider: Arc<dyn ModelProvider>, policy: OutboundPolicy) -> Self {
        Self {
            provider,
            settings: GenerationSettings::deterministic(),
            policy,
        }
    }
}

#[async_trait]
impl PresenceChecker for ModelPresenceChecker {
    async fn check(
        &self,
        user_query: &str,
        argument_name: &str,
        argument_description: &str,
        argument_type: ArgumentKind,
        proposed_value: &Value,
    ) -> Result<bool, ToolwrightError> {
        let prompt = presence_prompt(
            user_query,
            argument_name,
            argument_description,
            argument_type,
            proposed_value,
        );

        let verdict = self
            .policy
            .run(|| {
                generate_object::<FieldPresence>(
                    self.provider.as_ref(),
                    vec![ModelMessage::user(prompt.clone())],
                    self.settings.clone(),
                    FieldPresence::schema(),
                    "FieldPresence",
                )
            })
            .await
            .map_err(|e| ToolwrightError::ValidationCheck {
                argument: argument_name.to_string(),
                message: e.to_string(),
            })?;

        debug!(
            argument = argument_name,
            presence = verdict.object.presence,
            "presence check"
        );
        Ok(verdict.object.presence)
    }
}

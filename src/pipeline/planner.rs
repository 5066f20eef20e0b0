//! Tool-call planning: ask the model which tools to call.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::error::ToolwrightError;
use crate::generation::generate_text;
use crate::provider::{ModelProvider, ToolDefinition};
use crate::types::{GenerationSettings, ModelMessage};

use super::call::PlannedCall;
use super::policy::OutboundPolicy;

/// Turns a user query into zero or more proposed tool calls.
#[async_trait]
pub trait Planner: Send + Sync {
    async fn plan(
        &self,
        user_query: &str,
        tools: &[ToolDefinition],
    ) -> Result<Vec<PlannedCall>, ToolwrightError>;
}

/// Planner backed by a model provider's native tool calling.
///
/// Calls are mapped 1:1 from the response; whether the named tools exist is
/// checked later, at execution.
pub struct ModelPlanner {
    provider: Arc<dyn ModelProvider>,
    settings: GenerationSettings,
    policy: OutboundPolicy,
}

impl ModelPlanner {
    pub fn new(provider: Arc<dyn ModelProvider>, policy: OutboundPolicy) -> Self {
        Self {
            provider,
            settings: GenerationSettings::deterministic(),
            policy,
        }
    }

    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }
}

#[async_trait]
impl Planner for ModelPlanner {
    async fn plan(
        &self,
        user_query: &str,
        tools: &[ToolDefinition],
    ) -> Result<Vec<PlannedCall>, ToolwrightError> {
        if !tools.is_empty() && !self.provider.capabilities().supports_tools {
            return Err(ToolwrightError::Planning(format!(
                "model '{}' does not support tool calling",
                self.provider.model_id()
            )));
        }

        let result = self
            .policy
            .run(|| {
                generate_text(
                    self.provider.as_ref(),
                    vec![ModelMessage::user(user_query)],
                    self.settings.clone(),
                    tools,
                )
            })
            .await
            .map_err(|e| ToolwrightError::Planning(e.to_string()))?;

        let calls = result
            .tool_calls
            .into_iter()
            .map(|call| {
                let arguments = normalize_arguments(&call.name, call.arguments)?;
                Ok(PlannedCall::new(call.id, call.name, arguments))
            })
            .collect::<Result<Vec<_>, ToolwrightError>>()?;

        debug!(
            calls = calls.len(),
            names = ?calls.iter().map(|c| c.tool_name.as_str()).collect::<Vec<_>>(),
            "planner proposed tool calls"
        );
        Ok(calls)
    }
}

/// Arguments must form a JSON object. A JSON-encoded string is decoded
/// first; `null` means no arguments.
fn normalize_arguments(tool_name: &str, arguments: Value) -> Result<Value, ToolwrightError> {
    let arguments = match arguments {
        Value::String(raw) if raw.trim().is_empty() => Value::Null,
        Value::String(raw) => serde_json::from_str(&raw).map_err(|e| {
            ToolwrightError::Planning(format!("malformed arguments for '{tool_name}': {e}"))
        })?,
        other => other,
    };
    match arguments {
        Value::Null => Ok(Value::Object(Default::default())),
        Value::Object(_) => Ok(arguments),
        other => Err(ToolwrightError::Planning(format!(
            "arguments for '{tool_name}' must be an object, got {other}"
        ))),
    }
}

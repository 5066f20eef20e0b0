//! Single-turn text generation.

use tracing::debug;

use crate::error::ToolwrightError;
use crate::provider::{ModelProvider, ProviderRequest, ToolDefinition};
use crate::types::message::AgentToolCall;
use crate::types::*;

/// Result of one model turn.
#[derive(Debug, Clone, Default)]
pub struct GenerateTextResult {
    pub text: String,
    pub tool_calls: Vec<AgentToolCall>,
    pub usage: Usage,
    pub finish_reason: Option<FinishReason>,
}

/// Send `messages` to the provider once, offering `tools` when non-empty.
///
/// Tool calls in the response are returned, not executed; the caller decides
/// what to do with them.
pub async fn generate_text(
    provider: &dyn ModelProvider,
    messages: Vec<ModelMessage>,
    settings: GenerationSettings,
    tools: &[ToolDefinition],
) -> Result<GenerateTextResult, ToolwrightError> {
    let request = ProviderRequest::new(messages, settings).with_tools(tools.to_vec());

    debug!(
        provider = provider.provider_name(),
        model = provider.model_id(),
        messages = request.messages.len(),
        tools = tools.len(),
        "generate_text: calling provider"
    );
    let response = provider.generate_text(&request).await?;
    debug!(
        tool_calls = response.tool_calls.len(),
        output_tokens = response.usage.output_tokens,
        "generate_text: provider responded"
    );

    Ok(GenerateTextResult {
        text: response.text,
        tool_calls: response.tool_calls,
        usage: response.usage,
        finish_reason: response.finish_reason,
    })
}

/// Convenience: one user prompt in, response text out.
pub async fn complete(
    provider: &dyn ModelProvider,
    prompt: impl Into<String>,
    settings: GenerationSettings,
) -> Result<String, ToolwrightError> {
    let result = generate_text(provider, vec![ModelMessage::user(prompt)], settings, &[]).await?;
    Ok(result.text)
}

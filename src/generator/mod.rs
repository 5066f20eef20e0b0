//! One-off tool generator: turn an API reference page into tool source code
//! with the help of a language model.

pub mod fetch;

pub use fetch::{default_output_path, fetch_reference};

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::ToolwrightError;
use crate::generation::complete;
use crate::provider::ModelProvider;
use crate::types::GenerationSettings;

/// Placeholder replaced by the API reference contents.
pub const API_REF_PLACEHOLDER: &str = "[api_ref.html]";
/// Placeholder replaced by the example tool source.
pub const EXAMPLE_PLACEHOLDER: &str = "[tool_example.py]";

/// Fill the template's placeholders.
pub fn render_prompt(template: &str, api_ref: &str, example: &str) -> String {
    template
        .replace(API_REF_PLACEHOLDER, api_ref)
        .replace(EXAMPLE_PLACEHOLDER, example)
}

/// Input files and destination for [`generate_tool`].
#[derive(Debug, Clone)]
pub struct GenerateToolRequest {
    pub template: PathBuf,
    pub api_ref: PathBuf,
    pub example: PathBuf,
    pub output: PathBuf,
}

async fn read(path: &Path) -> Result<String, ToolwrightError> {
    tokio::fs::read_to_string(path).await.map_err(|e| {
        ToolwrightError::InvalidArgument(format!("cannot read {}: {e}", path.display()))
    })
}

/// Render the prompt from the request's files, ask the model, and write the
/// response text verbatim to `request.output`.
pub async fn generate_tool(
    provider: &dyn ModelProvider,
    request: &GenerateToolRequest,
) -> Result<PathBuf, ToolwrightError> {
    let template = read(&request.template).await?;
    let api_ref = read(&request.api_ref).await?;
    let example = read(&request.example).await?;

    let prompt = render_prompt(&template, &api_ref, &example);
    info!(
        model = provider.model_id(),
        prompt_chars = prompt.len(),
        "generating tool source"
    );
    let code = complete(provider, prompt, GenerationSettings::deterministic()).await?;

    if let Some(parent) = request.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&request.output, code).await?;
    info!(path = %request.output.display(), "wrote generated tool");
    Ok(request.output.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_replaces_every_placeholder() {
        let template = "Docs:\n[api_ref.html]\nExample:\n[tool_example.py]\nAgain: [api_ref.html]";
        let prompt = render_prompt(template, "<html/>", "class Tool: pass");

        assert_eq!(
            prompt,
            "Docs:\n<html/>\nExample:\nclass Tool: pass\nAgain: <html/>"
        );
    }

    #[test]
    fn render_leaves_template_without_placeholders() {
        assert_eq!(render_prompt("plain", "a", "b"), "plain");
    }
}

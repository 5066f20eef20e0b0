//! Convenience re-exports for common use.

pub use crate::config::ToolwrightConfig;
pub use crate::error::{Result, ToolwrightError};
pub use crate::models::LanguageModel;
pub use crate::pipeline::{
    Pipeline, PipelineOutcome, PipelineState, PlannedCall, Presence, ValidationPolicy,
};
pub use crate::provider::ModelProvider;
pub use crate::tools::{AgentTool, Tool, ToolArguments, ToolRegistry, ToolSchema};
pub use crate::types::{ContentPart, GenerationSettings, ModelMessage, Role, Usage};

//! Model capabilities descriptor.

use serde::{Deserialize, Serialize};

/// Describes what a model can do.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelCapabilities {
    /// Native tool calling; required for planning.
    pub supports_tools: bool,
    pub supports_json_mode: bool,
    pub supports_json_schema: bool,
    /// When false, instructions are sent as a leading user message.
    pub supports_system_messages: bool,
}

impl Default for ModelCapabilities {
    fn default() -> Self {
        Self {
            supports_tools: false,
            supports_json_mode: false,
            supports_json_schema: false,
            supports_system_messages: true,
        }
    }
}

impl ModelCapabilities {
    /// Full-featured model capabilities.
    pub fn full() -> Self {
        Self {
            supports_tools: true,
            supports_json_mode: true,
            supports_json_schema: true,
            supports_system_messages: true,
        }
    }
}

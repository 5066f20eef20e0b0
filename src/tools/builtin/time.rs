use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::tools::tool::{AgentTool, Tool, ToolExecutionContext};
use crate::tools::types::ToolSchema;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

pub(crate) fn format_utc(now: DateTime<Utc>) -> String {
    now.format(TIME_FORMAT).to_string()
}

/// Create the `current_time` tool.
///
/// Takes no meaningful input; the optional `dummy` argument exists because
/// some models refuse to call a tool with an empty parameter object.
pub fn current_time_tool() -> Arc<dyn Tool> {
    Arc::new(AgentTool::new(
        "current_time",
        "Get the current time in UTC",
        ToolSchema::object().string("dummy", "Not used", false).build(),
        |_args, _ctx: ToolExecutionContext| async move { Ok(json!(format_utc(Utc::now()))) },
    ))
}

use std::sync::Arc;

use serde_json::json;

use crate::error::ToolwrightError;
use crate::tools::tool::{AgentTool, Tool, ToolExecutionContext};
use crate::tools::types::ToolSchema;

/// Create the `multiply` tool: integer product of `a` and `b`.
pub fn multiply_tool() -> Arc<dyn Tool> {
    Arc::new(AgentTool::new(
        "multiply",
        "Multiply two numbers",
        ToolSchema::object()
            .integer("a", "The first number to multiply", true)
            .integer("b", "The second number to multiply", true)
            .build(),
        |args, _ctx: ToolExecutionContext| async move {
            let a = args.get_i64("a")?;
            let b = args.get_i64("b")?;
            let product = a
                .checked_mul(b)
                .ok_or_else(|| ToolwrightError::tool("multiply", format!("{a} * {b} overflows")))?;
            Ok(json!(product))
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::arguments::ToolArguments;

    async fn run(args: serde_json::Value) -> Result<serde_json::Value, ToolwrightError> {
        multiply_tool()
            .execute(&ToolArguments::new(args), &ToolExecutionContext::default())
            .await
    }

    #[tokio::test]
    async fn multiplies_integers() {
        assert_eq!(run(json!({"a": 4, "b": 2})).await.unwrap(), json!(8));
        assert_eq!(run(json!({"a": 34, "b": 12})).await.unwrap(), json!(408));
        assert_eq!(run(json!({"a": "2", "b": "3"})).await.unwrap(), json!(6));
    }

    #[tokio::test]
    async fn rejects_missing_argument_and_overflow() {
        assert!(run(json!({"a": 4})).await.is_err());
        let err = run(json!({"a": i64::MAX, "b": 2})).await.unwrap_err();
        assert!(err.to_string().contains("overflows"));
    }

    #[tokio::test]
    async fn rejects_floats_beyond_i64() {
        let err = run(json!({"a": 1e20, "b": 1})).await.unwrap_err();
        assert!(matches!(err, ToolwrightError::ToolInvocation { .. }));
    }
}

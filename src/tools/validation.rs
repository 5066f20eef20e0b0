//! Validate tool call arguments against a [`ToolSchema`] before execution.

use regex::Regex;
use serde_json::Value;

use super::types::{ArgumentKind, ToolSchema};

/// Validate tool arguments against a schema.
///
/// Checks, in order: the arguments form an object, every required argument
/// is present, no undeclared argument is supplied, every value has its
/// declared kind and matches its pattern. Returns `Err(message)` describing
/// the first violation found.
pub fn validate_arguments(args: &Value, schema: &ToolSchema) -> Result<(), String> {
    let obj = match args {
        Value::Object(obj) => obj,
        Value::Null if schema.arguments().iter().all(|a| !a.required) => return Ok(()),
        other => {
            return Err(format!(
                "expected object arguments, got {}",
                json_type_name(other)
            ))
        }
    };

    for spec in schema.arguments().iter().filter(|a| a.required) {
        if matches!(obj.get(&spec.name), None | Some(Value::Null)) {
            return Err(format!("missing required field '{}'", spec.name));
        }
    }

    if let Some(name) = schema.undeclared(args).first() {
        return Err(format!("unexpected field '{name}'"));
    }

    for (key, value) in obj {
        let Some(spec) = schema.get(key) else {
            continue;
        };
        if value.is_null() && !spec.required {
            continue;
        }
        if !value_matches_kind(value, spec.kind) {
            return Err(format!(
                "field '{}' expected type '{}', got {}",
                key,
                spec.kind,
                json_type_name(value)
            ));
        }
        if let (Some(pattern), Some(text)) = (spec.pattern.as_deref(), value.as_str()) {
            let re = Regex::new(pattern)
                .map_err(|e| format!("field '{key}' has an invalid pattern: {e}"))?;
            if !re.is_match(text) {
                return Err(format!(
                    "field '{key}' value '{text}' does not match pattern '{pattern}'"
                ));
            }
        }
    }

    Ok(())
}

fn value_matches_kind(value: &Value, kind: ArgumentKind) -> bool {
    match kind {
        ArgumentKind::String => value.is_string(),
        ArgumentKind::Number => value.is_number(),
        ArgumentKind::Integer => value.is_i64() || value.is_u64(),
        ArgumentKind::Boolean => value.is_boolean(),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

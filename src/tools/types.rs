//! Declarative argument schemas shared by planning and validation.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use strum::{Display, EnumString};

/// Primitive type of a tool argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ArgumentKind {
    String,
    Integer,
    Number,
    Boolean,
}

/// One declared argument of a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgumentSpec {
    pub name: String,
    pub kind: ArgumentKind,
    pub description: String,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Regex the value must match (string arguments only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl ArgumentSpec {
    pub fn new(name: impl Into<String>, kind: ArgumentKind, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            description: description.into(),
            required: false,
            default: None,
            pattern: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    fn to_json_schema(&self) -> Value {
        let mut prop = Map::new();
        prop.insert("type".into(), self.kind.to_string().into());
        prop.insert("description".into(), self.description.clone().into());
        if let Some(ref default) = self.default {
            prop.insert("default".into(), default.clone());
        }
        if let Some(ref pattern) = self.pattern {
            prop.insert("pattern".into(), pattern.clone().into());
        }
        Value::Object(prop)
    }

    /// Convert loosely-typed model output (`"4"`, `"true"`) to this
    /// argument's kind. Values that do not convert are returned unchanged.
    fn coerce(&self, value: &Value) -> Value {
        match (self.kind, value) {
            (ArgumentKind::Integer, Value::String(s)) => s
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .unwrap_or_else(|_| value.clone()),
            (ArgumentKind::Integer, Value::Number(n)) => match n.as_f64() {
                // Upper bound is exclusive: `i64::MAX as f64` rounds up to 2^63.
                Some(f)
                    if n.as_i64().is_none()
                        && f.fract() == 0.0
                        && (i64::MIN as f64..i64::MAX as f64).contains(&f) =>
                {
                    Value::from(f as i64)
                }
                _ => value.clone(),
            },
            (ArgumentKind::Number, Value::String(s)) => s
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
                .unwrap_or_else(|| value.clone()),
            (ArgumentKind::Boolean, Value::String(s)) => match s.trim() {
                "true" | "True" => Value::Bool(true),
                "false" | "False" => Value::Bool(false),
                _ => value.clone(),
            },
            (ArgumentKind::String, Value::Number(n)) => Value::String(n.to_string()),
            _ => value.clone(),
        }
    }
}

/// Ordered argument schema for one tool.
///
/// The same structure renders the JSON Schema offered to the model and drives
/// local validation, so the two cannot drift.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolSchema {
    arguments: Vec<ArgumentSpec>,
}

impl ToolSchema {
    /// A schema with no arguments.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builder: create an object schema with arguments.
    pub fn object() -> SchemaBuilder {
        SchemaBuilder {
            arguments: Vec::new(),
        }
    }

    pub fn arguments(&self) -> &[ArgumentSpec] {
        &self.arguments
    }

    pub fn get(&self, name: &str) -> Option<&ArgumentSpec> {
        self.arguments.iter().find(|a| a.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }

    /// Names in `args` that this schema does not declare, in `args` order.
    pub fn undeclared(&self, args: &Value) -> Vec<String> {
        args.as_object()
            .map(|obj| {
                obj.keys()
                    .filter(|key| self.get(key).is_none())
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Apply defaults for absent optional arguments and coerce declared ones.
    pub fn normalize(&self, args: &Value) -> Value {
        let mut out = match args {
            Value::Object(obj) => obj.clone(),
            _ => return args.clone(),
        };
        for spec in &self.arguments {
            match out.get(&spec.name) {
                Some(Value::Null) | None => {
                    if let Some(ref default) = spec.default {
                        out.insert(spec.name.clone(), default.clone());
                    }
                }
                Some(value) => {
                    let coerced = spec.coerce(value);
                    out.insert(spec.name.clone(), coerced);
                }
            }
        }
        Value::Object(out)
    }

    /// Render as a JSON Schema object.
    pub fn to_json_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .arguments
            .iter()
            .map(|a| (a.name.clone(), a.to_json_schema()))
            .collect();
        let required: Vec<&str> = self
            .arguments
            .iter()
            .filter(|a| a.required)
            .map(|a| a.name.as_str())
            .collect();
        json!({
            "type": "object",
            "properties": properties,
            "required": required,
            "additionalProperties": false,
        })
    }
}

/// Builder for constructing tool argument schemas.
pub struct SchemaBuilder {
    arguments: Vec<ArgumentSpec>,
}

impl SchemaBuilder {
    fn push(mut self, spec: ArgumentSpec, required: bool) -> Self {
        self.arguments.push(if required { spec.required() } else { spec });
        self
    }

    /// Add a string argument.
    pub fn string(self, name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        self.push(ArgumentSpec::new(name, ArgumentKind::String, description), required)
    }

    /// Add an integer argument.
    pub fn integer(self, name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        self.push(ArgumentSpec::new(name, ArgumentKind::Integer, description), required)
    }

    /// Add a number argument.
    pub fn number(self, name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        self.push(ArgumentSpec::new(name, ArgumentKind::Number, description), required)
    }

    /// Add a boolean argument.
    pub fn boolean(self, name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        self.push(ArgumentSpec::new(name, ArgumentKind::Boolean, description), required)
    }

    /// Add a fully specified argument.
    pub fn argument(mut self, spec: ArgumentSpec) -> Self {
        self.arguments.push(spec);
        self
    }

    pub fn build(self) -> ToolSchema {
        ToolSchema {
            arguments: self.arguments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dividends_like() -> ToolSchema {
        ToolSchema::object()
            .argument(
                ArgumentSpec::new("ticker", ArgumentKind::String, "Ticker symbol")
                    .with_pattern("^[A-Z]{1,5}$"),
            )
            .argument(
                ArgumentSpec::new("limit", ArgumentKind::Integer, "Max results").with_default(10),
            )
            .number("cash_amount", "Cash amount", false)
            .boolean("adjusted", "Adjusted", false)
            .build()
    }

    #[test]
    fn json_schema_keeps_declaration_details() {
        let schema = ToolSchema::object()
            .integer("a", "The first number to multiply", true)
            .integer("b", "The second number to multiply", true)
            .build()
            .to_json_schema();

        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["a"]["type"], "integer");
        assert_eq!(schema["required"], json!(["a", "b"]));
        assert_eq!(schema["additionalProperties"], false);

        let rich = dividends_like().to_json_schema();
        assert_eq!(rich["properties"]["limit"]["default"], 10);
        assert_eq!(rich["properties"]["ticker"]["pattern"], "^[A-Z]{1,5}$");
    }

    #[test]
    fn normalize_applies_defaults_and_coerces_strings() {
        let normalized = dividends_like().normalize(&json!({
            "ticker": "AAPL",
            "cash_amount": "0.25",
            "adjusted": "true",
        }));

        assert_eq!(normalized["limit"], 10);
        assert_eq!(normalized["cash_amount"], 0.25);
        assert_eq!(normalized["adjusted"], true);
        assert_eq!(normalized["ticker"], "AAPL");
    }

    #[test]
    fn normalize_leaves_unconvertible_values_for_validation() {
        let schema = ToolSchema::object().integer("a", "A", true).build();

        assert_eq!(schema.normalize(&json!({"a": "four"}))["a"], "four");
        assert_eq!(schema.normalize(&json!({"a": "4"}))["a"], 4);
        assert_eq!(schema.normalize(&json!({"a": 4.0}))["a"], 4);
    }

    #[test]
    fn out_of_range_whole_floats_stay_floats() {
        let schema = ToolSchema::object().integer("a", "A", true).build();

        let normalized = schema.normalize(&json!({"a": 1e20}));
        assert_eq!(normalized["a"], 1e20);
        assert!(normalized["a"].as_i64().is_none());
        assert!(schema.normalize(&json!({"a": -1e20}))["a"].as_i64().is_none());
        assert!(
            crate::tools::validation::validate_arguments(&normalized, &schema).is_err()
        );
    }

    #[test]
    fn undeclared_lists_unknown_keys() {
        let schema = ToolSchema::object().integer("a", "A", true).build();

        assert_eq!(
            schema.undeclared(&json!({"a": 1, "ticker": "AAPL"})),
            vec!["ticker".to_string()]
        );
        assert!(schema.undeclared(&json!({"a": 1})).is_empty());
        assert!(ToolSchema::empty().undeclared(&json!(null)).is_empty());
    }
}

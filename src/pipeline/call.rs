//! Planned tool calls and their validation annotations.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use strum::Display;

use crate::types::message::AgentToolCall;

/// Presence verdict for one argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Presence {
    /// The query supports the proposed value.
    Present,
    /// The checker judged the value unsupported by the query.
    Absent,
    /// The check itself failed; treated as passing.
    Unknown,
}

impl From<bool> for Presence {
    fn from(present: bool) -> Self {
        if present {
            Presence::Present
        } else {
            Presence::Absent
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgumentCheck {
    pub name: String,
    pub presence: Presence,
}

/// A tool call proposed by the planner.
///
/// `argument_presence` is empty until the validating stage fills it, one
/// entry per supplied argument in argument order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedCall {
    pub id: String,
    pub tool_name: String,
    pub arguments: Value,
    #[serde(default)]
    pub argument_presence: Vec<ArgumentCheck>,
}

impl PlannedCall {
    pub fn new(id: impl Into<String>, tool_name: impl Into<String>, arguments: Value) -> Self {
        Self {
            id: id.into(),
            tool_name: tool_name.into(),
            arguments,
            argument_presence: Vec::new(),
        }
    }

    pub fn presence_of(&self, argument: &str) -> Option<Presence> {
        self.argument_presence
            .iter()
            .find(|check| check.name == argument)
            .map(|check| check.presence)
    }

    /// Arguments judged absent by the presence checker.
    pub fn absent_arguments(&self) -> Vec<&str> {
        self.argument_presence
            .iter()
            .filter(|check| check.presence == Presence::Absent)
            .map(|check| check.name.as_str())
            .collect()
    }

    pub fn to_tool_call(&self) -> AgentToolCall {
        AgentToolCall {
            id: self.id.clone(),
            name: self.tool_name.clone(),
            arguments: self.arguments.clone(),
        }
    }
}

/// How a planned call ended up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CallDisposition {
    /// The tool ran and returned a value.
    Executed,
    /// The tool ran and failed; `result` holds the error payload.
    Failed,
    /// Local validation stopped the call before execution.
    Rejected { reason: String },
}

/// The transcript entry recorded for one planned call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallResult {
    pub call_id: String,
    pub tool_name: String,
    pub result: Value,
    pub is_error: bool,
    pub disposition: CallDisposition,
}

impl CallResult {
    pub fn executed(call: &PlannedCall, result: Value) -> Self {
        Self {
            call_id: call.id.clone(),
            tool_name: call.tool_name.clone(),
            result,
            is_error: false,
            disposition: CallDisposition::Executed,
        }
    }

    pub fn failed(call: &PlannedCall, error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            call_id: call.id.clone(),
            tool_name: call.tool_name.clone(),
            result: error_payload(error, details),
            is_error: true,
            disposition: CallDisposition::Failed,
        }
    }

    pub fn rejected(call: &PlannedCall, reason: impl Into<String>, details: impl Into<String>) -> Self {
        let reason = reason.into();
        Self {
            call_id: call.id.clone(),
            tool_name: call.tool_name.clone(),
            result: error_payload(reason.clone(), details),
            is_error: true,
            disposition: CallDisposition::Rejected { reason },
        }
    }
}

/// `{"error": ..., "details": ...}`, the shape every failed call takes in the
/// transcript.
pub fn error_payload(error: impl Into<String>, details: impl Into<String>) -> Value {
    json!({
        "error": error.into(),
        "details": details.into(),
    })
}

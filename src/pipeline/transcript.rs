//! Per-query conversation transcript.

use crate::types::message::{ModelMessage, Role};

use super::call::{CallResult, PlannedCall};

/// Append-only record of one query: the user turn, the assistant's proposed
/// calls, one tool result per call in planning order, and the final answer.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    messages: Vec<ModelMessage>,
}

impl Transcript {
    pub fn new(user_query: impl Into<String>) -> Self {
        Self {
            messages: vec![ModelMessage::user(user_query)],
        }
    }

    /// Record the assistant turn proposing `calls`. No-op for an empty plan.
    pub fn push_proposals(&mut self, calls: &[PlannedCall]) {
        if calls.is_empty() {
            return;
        }
        let tool_calls = calls.iter().map(PlannedCall::to_tool_call).collect();
        self.messages
            .push(ModelMessage::assistant_tool_calls(String::new(), tool_calls));
    }

    pub fn push_result(&mut self, result: &CallResult) {
        self.messages.push(ModelMessage::tool_result(
            result.call_id.clone(),
            result.result.clone(),
            result.is_error,
        ));
    }

    pub fn push_answer(&mut self, answer: impl Into<String>) {
        self.messages.push(ModelMessage::assistant(answer));
    }

    pub fn messages(&self) -> &[ModelMessage] {
        &self.messages
    }

    pub fn user_query(&self) -> String {
        self.messages
            .first()
            .map(ModelMessage::text)
            .unwrap_or_default()
    }

    /// The final answer, once recorded.
    pub fn answer(&self) -> Option<String> {
        self.messages
            .last()
            .filter(|m| m.role == Role::Assistant && m.tool_calls().is_empty())
            .map(ModelMessage::text)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_plan_leaves_only_the_query() {
        let mut transcript = Transcript::new("Hello there");
        transcript.push_proposals(&[]);

        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.user_query(), "Hello there");
        assert!(transcript.answer().is_none());
    }

    #[test]
    fn records_calls_results_and_answer_in_order() {
        let calls = vec![
            PlannedCall::new("c1", "multiply", json!({"a": 2, "b": 3})),
            PlannedCall::new("c2", "multiply", json!({"a": 34, "b": 12})),
        ];
        let mut transcript = Transcript::new("What is 2*3 and 34*12?");
        transcript.push_proposals(&calls);
        transcript.push_result(&CallResult::executed(&calls[0], json!(6)));
        transcript.push_result(&CallResult::executed(&calls[1], json!(408)));
        transcript.push_answer("6 and 408");

        let messages = transcript.messages();
        assert_eq!(messages.len(), 5);
        assert_eq!(messages[1].tool_calls().len(), 2);
        assert_eq!(messages[2].tool_result_part().unwrap().tool_call_id, "c1");
        assert_eq!(messages[3].tool_result_part().unwrap().result, json!(408));
        assert_eq!(transcript.answer().as_deref(), Some("6 and 408"));
    }
}

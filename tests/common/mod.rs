//! Shared test helpers: a scriptable provider, a scripted presence checker,
//! and instrumented tools.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use toolwright::error::ToolwrightError;
use toolwright::models::capabilities::ModelCapabilities;
use toolwright::pipeline::PresenceChecker;
use toolwright::provider::{ModelProvider, ProviderRequest, ProviderResponse};
use toolwright::tools::types::ArgumentKind;
use toolwright::tools::{AgentTool, Tool, ToolSchema};
use toolwright::types::*;

type Handler = dyn Fn(&ProviderRequest) -> Result<ProviderResponse, ToolwrightError> + Send + Sync;

/// A mock provider that returns canned responses.
///
/// Responses come from a handler when one is set, otherwise from the queue;
/// an empty queue answers "Mock response". Every request is recorded.
pub struct MockProvider {
    model_id: String,
    capabilities: ModelCapabilities,
    responses: Mutex<VecDeque<Result<ProviderResponse, ToolwrightError>>>,
    requests: Mutex<Vec<ProviderRequest>>,
    handler: Option<Box<Handler>>,
}

impl MockProvider {
    pub fn new(model_id: &str) -> Self {
        Self {
            model_id: model_id.to_string(),
            capabilities: ModelCapabilities::full(),
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            handler: None,
        }
    }

    /// Answer every request by inspecting it.
    pub fn with_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&ProviderRequest) -> Result<ProviderResponse, ToolwrightError> + Send + Sync + 'static,
    {
        self.handler = Some(Box::new(handler));
        self
    }

    pub fn with_capabilities(mut self, capabilities: ModelCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Queue a text response.
    pub fn queue_response(&self, text: &str) {
        self.responses.lock().unwrap().push_back(Ok(text_response(text)));
    }

    /// Queue a response proposing `(id, name, arguments)` tool calls.
    pub fn queue_tool_calls(&self, calls: &[(&str, &str, Value)]) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(tool_call_response(calls)));
    }

    pub fn queue_error(&self, error: ToolwrightError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Option<ProviderRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

pub fn text_response(text: &str) -> ProviderResponse {
    ProviderResponse {
        text: text.to_string(),
        usage: Usage {
            input_tokens: 10,
            output_tokens: 20,
            total_tokens: 30,
        },
        tool_calls: vec![],
        finish_reason: Some(FinishReason::Stop),
    }
}

pub fn tool_call_response(calls: &[(&str, &str, Value)]) -> ProviderResponse {
    ProviderResponse {
        text: String::new(),
        usage: Usage {
            input_tokens: 10,
            output_tokens: 5,
            total_tokens: 15,
        },
        tool_calls: calls
            .iter()
            .map(|(id, name, args)| AgentToolCall {
                id: id.to_string(),
                name: name.to_string(),
                arguments: args.clone(),
            })
            .collect(),
        finish_reason: Some(FinishReason::ToolCalls),
    }
}

#[async_trait]
impl ModelProvider for MockProvider {
    fn provider_name(&self) -> &str {
        "mock"
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn capabilities(&self) -> &ModelCapabilities {
        &self.capabilities
    }

    async fn generate_text(
        &self,
        request: &ProviderRequest,
    ) -> Result<ProviderResponse, ToolwrightError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(ref handler) = self.handler {
            return handler(request);
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(text_response("Mock response")))
    }
}

/// Scripted verdict for one argument name.
#[derive(Debug, Clone, Copy)]
pub enum Verdict {
    Present,
    Absent,
    Fail,
}

/// Presence checker answering from a fixed table; unknown names are present.
#[derive(Default)]
pub struct ScriptedChecker {
    verdicts: HashMap<String, Verdict>,
    calls: AtomicUsize,
}

impl ScriptedChecker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, argument: &str, verdict: Verdict) -> Self {
        self.verdicts.insert(argument.to_string(), verdict);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PresenceChecker for ScriptedChecker {
    async fn check(
        &self,
        _user_query: &str,
        argument_name: &str,
        _argument_description: &str,
        _argument_type: ArgumentKind,
        _proposed_value: &Value,
    ) -> Result<bool, ToolwrightError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.verdicts.get(argument_name).copied() {
            None | Some(Verdict::Present) => Ok(true),
            Some(Verdict::Absent) => Ok(false),
            Some(Verdict::Fail) => Err(ToolwrightError::Timeout(60_000)),
        }
    }
}

/// A tool that sleeps for `delay`, then logs its name and returns it.
pub fn delayed_tool(name: &str, delay: Duration, finished: Arc<Mutex<Vec<String>>>) -> Arc<dyn Tool> {
    let tool_name = name.to_string();
    Arc::new(AgentTool::new(
        name,
        format!("Sleeps then returns {name}"),
        ToolSchema::empty(),
        move |_args, _ctx| {
            let tool_name = tool_name.clone();
            let finished = finished.clone();
            async move {
                tokio::time::sleep(delay).await;
                finished.lock().unwrap().push(tool_name.clone());
                Ok(json!(tool_name))
            }
        },
    ))
}

/// A `multiply`-shaped tool that counts its executions.
pub fn counting_multiply(executions: Arc<AtomicUsize>) -> Arc<dyn Tool> {
    Arc::new(AgentTool::new(
        "multiply",
        "Multiply two numbers",
        ToolSchema::object()
            .integer("a", "The first number to multiply", true)
            .integer("b", "The second number to multiply", true)
            .build(),
        move |args, _ctx| {
            let executions = executions.clone();
            async move {
                executions.fetch_add(1, Ordering::SeqCst);
                Ok(json!(args.get_i64("a")? * args.get_i64("b")?))
            }
        },
    ))
}

/// A provider whose requests never complete.
pub struct StalledProvider {
    capabilities: ModelCapabilities,
}

impl StalledProvider {
    pub fn new() -> Self {
        Self {
            capabilities: ModelCapabilities::full(),
        }
    }
}

#[async_trait]
impl ModelProvider for StalledProvider {
    fn provider_name(&self) -> &str {
        "stalled"
    }

    fn model_id(&self) -> &str {
        "stalled"
    }

    fn capabilities(&self) -> &ModelCapabilities {
        &self.capabilities
    }

    async fn generate_text(
        &self,
        _request: &ProviderRequest,
    ) -> Result<ProviderResponse, ToolwrightError> {
        std::future::pending::<Result<ProviderResponse, ToolwrightError>>().await
    }
}

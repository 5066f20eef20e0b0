//! Plan → validate → execute → answer.

use std::sync::Arc;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::{debug, info, warn};

use crate::config::ToolwrightConfig;
use crate::error::ToolwrightError;
use crate::generation::generate_text;
use crate::models::LanguageModel;
use crate::provider::cached::CachedProvider;
use crate::provider::{create_provider, ModelProvider};
use crate::tools::{Tool, ToolArguments, ToolExecutionContext, ToolRegistry};
use crate::types::GenerationSettings;
use crate::util::cache::ResponseCache;

use super::call::{ArgumentCheck, CallResult, PlannedCall, Presence};
use super::planner::{ModelPlanner, Planner};
use super::policy::{OutboundPolicies, ValidationPolicy};
use super::presence::{ModelPresenceChecker, PresenceChecker};
use super::transcript::Transcript;

/// Pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PipelineState {
    Planning,
    Validating,
    Executing,
    Done,
    Failed,
}

/// Everything one query produced.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub answer: String,
    pub transcript: Transcript,
    /// Planned calls with their presence annotations, in planning order.
    pub calls: Vec<PlannedCall>,
    /// One result per call, in planning order.
    pub results: Vec<CallResult>,
    /// States visited, ending in `Done`.
    pub states: Vec<PipelineState>,
}

struct StateTrace {
    states: Vec<PipelineState>,
}

impl StateTrace {
    fn new() -> Self {
        Self { states: Vec::new() }
    }

    fn enter(&mut self, state: PipelineState) {
        info!(state = %state, "pipeline transition");
        self.states.push(state);
    }

    fn current(&self) -> Option<PipelineState> {
        self.states.last().copied()
    }

    fn fail(&mut self, error: ToolwrightError) -> ToolwrightError {
        warn!(
            from = ?self.current(),
            error = %error,
            "pipeline failed"
        );
        self.states.push(PipelineState::Failed);
        error
    }
}

/// The query pipeline.
///
/// Holds the shared registry plus the planning, presence and answering
/// collaborators; `run` is safe to call concurrently for different queries.
pub struct Pipeline {
    registry: Arc<ToolRegistry>,
    planner: Arc<dyn Planner>,
    checker: Arc<dyn PresenceChecker>,
    answerer: Arc<dyn ModelProvider>,
    policy: ValidationPolicy,
    outbound: OutboundPolicies,
    settings: GenerationSettings,
}

impl Pipeline {
    pub fn new(
        registry: Arc<ToolRegistry>,
        planner: Arc<dyn Planner>,
        checker: Arc<dyn PresenceChecker>,
        answerer: Arc<dyn ModelProvider>,
    ) -> Self {
        Self {
            registry,
            planner,
            checker,
            answerer,
            policy: ValidationPolicy::default(),
            outbound: OutboundPolicies::default(),
            settings: GenerationSettings::deterministic(),
        }
    }

    /// Wire a pipeline from configuration: one provider for the configured
    /// model serves planning, presence checks and answering.
    pub fn from_config(config: &ToolwrightConfig) -> Result<Self, ToolwrightError> {
        let model: LanguageModel = config.model().parse()?;
        let provider = create_provider(&model, config)?;
        let provider: Arc<dyn ModelProvider> = if config.cache() {
            debug!("response cache enabled");
            Arc::new(CachedProvider::new(provider, ResponseCache::default()))
        } else {
            Arc::from(provider)
        };
        let outbound = config.outbound().clone();
        let registry = Arc::new(ToolRegistry::with_defaults(config)?);

        info!(model = %model, tools = registry.len(), policy = %config.validation_policy(), "pipeline ready");

        Ok(Self::new(
            registry,
            Arc::new(ModelPlanner::new(provider.clone(), outbound.planning.clone())),
            Arc::new(ModelPresenceChecker::new(provider.clone(), outbound.presence.clone())),
            provider,
        )
        .with_policy(config.validation_policy())
        .with_outbound(outbound))
    }

    pub fn with_policy(mut self, policy: ValidationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_outbound(mut self, outbound: OutboundPolicies) -> Self {
        self.outbound = outbound;
        self
    }

    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn policy(&self) -> ValidationPolicy {
        self.policy
    }

    /// Answer one query.
    pub async fn run(&self, query: &str) -> Result<PipelineOutcome, ToolwrightError> {
        let mut trace = StateTrace::new();
        let mut transcript = Transcript::new(query);

        trace.enter(PipelineState::Planning);
        let mut calls = match self.planner.plan(query, &self.registry.definitions()).await {
            Ok(calls) => calls,
            Err(e) => return Err(trace.fail(e)),
        };
        transcript.push_proposals(&calls);

        trace.enter(PipelineState::Validating);
        let rejections = self.validate(query, &mut calls).await;

        trace.enter(PipelineState::Executing);
        let tools = match self.resolve(&calls) {
            Ok(tools) => tools,
            Err(e) => return Err(trace.fail(e)),
        };
        let results = self.execute(query, &calls, &tools, &rejections).await;
        for result in &results {
            transcript.push_result(result);
        }

        let answer = match self.answer(&transcript).await {
            Ok(answer) => answer,
            Err(e) => return Err(trace.fail(e)),
        };
        transcript.push_answer(answer.clone());
        trace.enter(PipelineState::Done);

        Ok(PipelineOutcome {
            answer,
            transcript,
            calls,
            results,
            states: trace.states,
        })
    }

    /// Annotate every call; returns the rejection reason per call, if any.
    async fn validate(&self, query: &str, calls: &mut [PlannedCall]) -> Vec<Option<String>> {
        let checks = join_all(calls.iter().map(|call| self.validate_call(query, call))).await;

        calls
            .iter_mut()
            .zip(checks)
            .map(|(call, (annotations, rejection))| {
                call.argument_presence = annotations;
                rejection.or_else(|| self.enforce(call))
            })
            .collect()
    }

    async fn validate_call(
        &self,
        query: &str,
        call: &PlannedCall,
    ) -> (Vec<ArgumentCheck>, Option<String>) {
        // Unknown tools are reported at execution.
        let Ok(tool) = self.registry.lookup(&call.tool_name) else {
            return (Vec::new(), None);
        };
        let schema = tool.schema();

        let undeclared = schema.undeclared(&call.arguments);
        if !undeclared.is_empty() {
            warn!(
                tool = %call.tool_name,
                undeclared = ?undeclared,
                "rejecting call with undeclared arguments"
            );
            return (
                Vec::new(),
                Some(format!("undeclared argument(s): {}", undeclared.join(", "))),
            );
        }

        // A null optional is an omitted argument, not a value to look for.
        let supplied: Vec<_> = schema
            .arguments()
            .iter()
            .filter_map(|spec| {
                call.arguments
                    .get(&spec.name)
                    .filter(|value| !value.is_null())
                    .map(|value| (spec, value))
            })
            .collect();

        let verdicts = join_all(supplied.iter().map(|(spec, value)| {
            self.checker
                .check(query, &spec.name, &spec.description, spec.kind, value)
        }))
        .await;

        let annotations = supplied
            .iter()
            .zip(verdicts)
            .map(|((spec, _), verdict)| ArgumentCheck {
                name: spec.name.clone(),
                presence: match verdict {
                    Ok(present) => Presence::from(present),
                    Err(e) => {
                        warn!(
                            tool = %call.tool_name,
                            argument = %spec.name,
                            error = %e,
                            "presence check failed; treating as unknown"
                        );
                        Presence::Unknown
                    }
                },
            })
            .collect();

        (annotations, None)
    }

    fn enforce(&self, call: &PlannedCall) -> Option<String> {
        let absent = call.absent_arguments();
        if absent.is_empty() {
            return None;
        }
        match self.policy {
            ValidationPolicy::Advisory => {
                info!(
                    tool = %call.tool_name,
                    absent = ?absent,
                    "arguments not found in query (advisory)"
                );
                None
            }
            ValidationPolicy::Enforcing => {
                warn!(
                    tool = %call.tool_name,
                    absent = ?absent,
                    "rejecting call: arguments not found in query"
                );
                Some(format!(
                    "argument(s) not supported by the query: {}",
                    absent.join(", ")
                ))
            }
        }
    }

    /// Look up every planned tool, in planning order.
    fn resolve(&self, calls: &[PlannedCall]) -> Result<Vec<Arc<dyn Tool>>, ToolwrightError> {
        calls
            .iter()
            .map(|call| self.registry.lookup(&call.tool_name))
            .collect()
    }

    async fn execute(
        &self,
        query: &str,
        calls: &[PlannedCall],
        tools: &[Arc<dyn Tool>],
        rejections: &[Option<String>],
    ) -> Vec<CallResult> {
        let runs = calls
            .iter()
            .zip(tools)
            .zip(rejections)
            .map(|((call, tool), rejection)| async move {
                if let Some(reason) = rejection {
                    return CallResult::rejected(
                        call,
                        format!("Call to '{}' was rejected", call.tool_name),
                        reason.clone(),
                    );
                }
                self.execute_call(query, call, tool.as_ref()).await
            });
        join_all(runs).await
    }

    async fn execute_call(&self, query: &str, call: &PlannedCall, tool: &dyn Tool) -> CallResult {
        let args = ToolArguments::new(call.arguments.clone());
        let ctx = ToolExecutionContext {
            call_id: call.id.clone(),
            query: query.to_string(),
        };

        debug!(tool = %call.tool_name, call_id = %call.id, "executing tool");
        match self.outbound.tool.run(|| tool.execute(&args, &ctx)).await {
            Ok(value) => CallResult::executed(call, value),
            Err(e) => {
                warn!(tool = %call.tool_name, error = %e, "tool call failed");
                CallResult::failed(
                    call,
                    format!("Tool '{}' failed", call.tool_name),
                    e.to_string(),
                )
            }
        }
    }

    async fn answer(&self, transcript: &Transcript) -> Result<String, ToolwrightError> {
        let result = self
            .outbound
            .answer
            .run(|| {
                generate_text(
                    self.answerer.as_ref(),
                    transcript.messages().to_vec(),
                    self.settings.clone(),
                    &[],
                )
            })
            .await?;
        Ok(result.text)
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("registry", &self.registry)
            .field("policy", &self.policy)
            .field("outbound", &self.outbound)
            .finish()
    }
}

//! The query pipeline: planning, argument validation, execution, answer.

pub mod call;
pub mod orchestrator;
pub mod planner;
pub mod policy;
pub mod presence;
pub mod transcript;

pub use call::{ArgumentCheck, CallDisposition, CallResult, PlannedCall, Presence};
pub use orchestrator::{Pipeline, PipelineOutcome, PipelineState};
pub use planner::{ModelPlanner, Planner};
pub use policy::{CallKind, OutboundPolicies, OutboundPolicy, ValidationPolicy};
pub use presence::{FieldPresence, ModelPresenceChecker, PresenceChecker};
pub use transcript::Transcript;

//! Validation and outbound-call policies.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::ToolwrightError;
use crate::util::retry::RetryPolicy;
use crate::util::timeout::with_timeout;

/// What the pipeline does with argument presence verdicts.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ValidationPolicy {
    /// Record verdicts on each call; always execute.
    #[default]
    Advisory,
    /// Do not execute calls with an argument judged absent.
    Enforcing,
}

/// The kinds of outbound call the pipeline makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum CallKind {
    Planning,
    Presence,
    Tool,
    Answer,
}

impl CallKind {
    pub const ALL: [CallKind; 4] = [
        CallKind::Planning,
        CallKind::Presence,
        CallKind::Tool,
        CallKind::Answer,
    ];
}

/// Deadline and retry behaviour for one kind of outbound call.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundPolicy {
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl OutboundPolicy {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            retry: RetryPolicy::none(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Run `operation` with this policy: each attempt gets the full timeout.
    pub async fn run<F, Fut, T>(&self, mut operation: F) -> Result<T, ToolwrightError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ToolwrightError>>,
    {
        let timeout = self.timeout;
        self.retry
            .execute(|| with_timeout(timeout, operation()))
            .await
    }
}

/// One [`OutboundPolicy`] per [`CallKind`].
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundPolicies {
    pub planning: OutboundPolicy,
    pub presence: OutboundPolicy,
    pub tool: OutboundPolicy,
    pub answer: OutboundPolicy,
}

impl Default for OutboundPolicies {
    fn default() -> Self {
        Self {
            planning: OutboundPolicy::new(Duration::from_secs(120)),
            presence: OutboundPolicy::new(Duration::from_secs(60)),
            tool: OutboundPolicy::new(Duration::from_secs(30)),
            answer: OutboundPolicy::new(Duration::from_secs(120)),
        }
    }
}

impl OutboundPolicies {
    pub fn get(&self, kind: CallKind) -> &OutboundPolicy {
        match kind {
            CallKind::Planning => &self.planning,
            CallKind::Presence => &self.presence,
            CallKind::Tool => &self.tool,
            CallKind::Answer => &self.answer,
        }
    }

    pub fn get_mut(&mut self, kind: CallKind) -> &mut OutboundPolicy {
        match kind {
            CallKind::Planning => &mut self.planning,
            CallKind::Presence => &mut self.presence,
            CallKind::Tool => &mut self.tool,
            CallKind::Answer => &mut self.answer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn validation_policy_parses_case_insensitively() {
        assert_eq!(
            ValidationPolicy::from_str("Enforcing").unwrap(),
            ValidationPolicy::Enforcing
        );
        assert_eq!(
            ValidationPolicy::from_str("advisory").unwrap(),
            ValidationPolicy::Advisory
        );
        assert!(ValidationPolicy::from_str("strict").is_err());
        assert_eq!(ValidationPolicy::default().to_string(), "advisory");
    }

    #[test]
    fn call_kinds_round_trip_through_names() {
        for kind in CallKind::ALL {
            assert_eq!(CallKind::from_str(&kind.to_string()).unwrap(), kind);
        }
    }

    #[tokio::test]
    async fn run_times_out_slow_operations() {
        let policy = OutboundPolicy::new(Duration::from_millis(10));

        let result: Result<(), _> = policy
            .run(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            })
            .await;

        assert!(matches!(result, Err(ToolwrightError::Timeout(10))));
    }
}

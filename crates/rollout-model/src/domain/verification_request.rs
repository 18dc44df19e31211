use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::DurationMs;

/// Input of one default-version verification.
///
/// Durations are optional; the activity substitutes its configured defaults when they are absent.
/// `rollout_id` is carried for correlation only and never affects the decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRequest {
    /// Image repository of the actor definition.
    pub docker_repository: String,
    /// Tag the rollout is expected to have promoted; may carry a `-rc.N` suffix.
    #[serde(alias = "dockerImageTag")]
    pub expected_tag: String,
    /// Actor definition whose default version is queried.
    pub actor_definition_id: Uuid,
    /// Rollout that triggered this verification.
    pub rollout_id: Uuid,
    /// Total time allowed for convergence.
    #[serde(default, alias = "limit", skip_serializing_if = "Option::is_none")]
    pub deadline_budget_ms: Option<DurationMs>,
    /// Spacing between registry observations.
    #[serde(
        default,
        alias = "timeBetweenPolls",
        skip_serializing_if = "Option::is_none"
    )]
    pub poll_interval_ms: Option<DurationMs>,
}

impl VerificationRequest {
    /// Create a request that relies on the default deadline budget and poll interval.
    pub fn new(
        docker_repository: impl Into<String>,
        expected_tag: impl Into<String>,
        actor_definition_id: Uuid,
        rollout_id: Uuid,
    ) -> Self {
        Self {
            docker_repository: docker_repository.into(),
            expected_tag: expected_tag.into(),
            actor_definition_id,
            rollout_id,
            deadline_budget_ms: None,
            poll_interval_ms: None,
        }
    }

    pub fn with_deadline_budget_ms(mut self, ms: DurationMs) -> Self {
        self.deadline_budget_ms = Some(ms);
        self
    }

    pub fn with_poll_interval_ms(mut self, ms: DurationMs) -> Self {
        self.poll_interval_ms = Some(ms);
        self
    }
}

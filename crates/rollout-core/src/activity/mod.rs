use std::sync::Arc;

use rollout_model::{
    DEFAULT_DEADLINE_BUDGET_MS, DEFAULT_POLL_INTERVAL_MS, PollOutcome, VerificationRequest,
    VerificationStatus,
};
use tokio::time::Instant;
use tracing::{error, info, instrument, warn};

use crate::{
    error::{PollError, VerificationError},
    heartbeat::Heartbeat,
    metrics::{MetricsHandle, noop_metrics},
    poller::{BoundedPoller, PollBudget},
    registry::RegistryHandle,
};

/// Defaults applied to requests that omit their durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifyConfig {
    pub default_deadline_budget_ms: u64,
    pub default_poll_interval_ms: u64,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            default_deadline_budget_ms: DEFAULT_DEADLINE_BUDGET_MS,
            default_poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl VerifyConfig {
    /// Validate `request` and resolve its poll budget.
    ///
    /// An omitted interval is clamped to the deadline budget; an explicit interval larger than the budget
    /// is rejected.
    pub fn budget_for(&self, request: &VerificationRequest) -> Result<PollBudget, VerificationError> {
        if request.docker_repository.trim().is_empty() {
            return Err(invalid("docker repository is empty"));
        }
        if request.expected_tag.trim().is_empty() {
            return Err(invalid("expected tag is empty"));
        }
        if request.actor_definition_id.is_nil() {
            return Err(invalid("actor definition id is nil"));
        }
        if request.rollout_id.is_nil() {
            return Err(invalid("rollout id is nil"));
        }

        let deadline_ms = request
            .deadline_budget_ms
            .unwrap_or(self.default_deadline_budget_ms);
        if deadline_ms == 0 {
            return Err(invalid("deadline budget must be positive"));
        }

        let interval_ms = match request.poll_interval_ms {
            Some(ms) if ms > deadline_ms => {
                return Err(invalid(format!(
                    "poll interval {ms}ms exceeds deadline budget {deadline_ms}ms"
                )));
            }
            Some(ms) => ms,
            None => self.default_poll_interval_ms.min(deadline_ms),
        };
        if interval_ms == 0 {
            return Err(invalid("poll interval must be positive"));
        }

        Ok(PollBudget::from_millis(deadline_ms, interval_ms))
    }
}

fn invalid(reason: impl Into<String>) -> VerificationError {
    VerificationError::InvalidRequest(reason.into())
}

/// Verifies that an actor definition's default version has converged to the tag promoted by a rollout.
///
/// The activity is read-only and keeps no state between invocations, so an orchestrator may re-run it
/// freely after a crash or a failed attempt.
pub struct VerifyDefaultVersionActivity {
    registry: RegistryHandle,
    config: VerifyConfig,
    metrics: MetricsHandle,
}

impl VerifyDefaultVersionActivity {
    pub fn new(registry: RegistryHandle) -> Self {
        Self {
            registry,
            config: VerifyConfig::default(),
            metrics: noop_metrics(),
        }
    }

    pub fn with_config(mut self, config: VerifyConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_metrics(mut self, metrics: MetricsHandle) -> Self {
        self.metrics = metrics;
        self
    }

    /// Poll the registry until the default version matches `request.expected_tag`.
    ///
    /// `heartbeat` is signalled before every wait and is the only place cancellation is observed.
    #[instrument(
        level = "info",
        skip_all,
        fields(
            rollout_id = %request.rollout_id,
            actor_definition_id = %request.actor_definition_id,
            expected_tag = %request.expected_tag,
        )
    )]
    pub async fn verify_default_version<H>(
        &self,
        request: &VerificationRequest,
        heartbeat: &H,
    ) -> Result<(), VerificationError>
    where
        H: Heartbeat + ?Sized,
    {
        let started = Instant::now();
        self.metrics.verification_started();

        let result = self.verify(request, heartbeat).await;

        let status = match &result {
            Ok(()) => VerificationStatus::Converged,
            Err(e) => e.status(),
        };
        self.metrics.verification_completed(status, started.elapsed());
        result
    }

    async fn verify<H>(
        &self,
        request: &VerificationRequest,
        heartbeat: &H,
    ) -> Result<(), VerificationError>
    where
        H: Heartbeat + ?Sized,
    {
        let budget = self.config.budget_for(request).inspect_err(|e| {
            warn!(error = %e, "rejecting verification request");
        })?;

        let rollout_id = request.rollout_id;
        let actor_definition_id = request.actor_definition_id;
        let registry = Arc::clone(&self.registry);

        let outcome = BoundedPoller::new(budget)
            .with_metrics(Arc::clone(&self.metrics))
            .poll(
                &request.expected_tag,
                || registry.fetch_default_version(actor_definition_id),
                heartbeat,
            )
            .await
            .map_err(|e| match e {
                PollError::Registry(source) => {
                    error!(error = %source, "registry lookup failed");
                    VerificationError::RegistryUnavailable {
                        rollout_id,
                        actor_definition_id,
                        source,
                    }
                }
                PollError::Cancelled(_) => {
                    warn!("verification cancelled by orchestrator");
                    VerificationError::Cancelled {
                        rollout_id,
                        actor_definition_id,
                    }
                }
            })?;

        match outcome {
            PollOutcome::Converged {
                snapshot,
                attempts,
                elapsed,
            } => {
                info!(
                    image = %snapshot.image(),
                    support_state = %snapshot.support_state,
                    version_override = snapshot.is_version_override_applied,
                    attempts,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "default version converged"
                );
                Ok(())
            }
            PollOutcome::DeadlineExceeded {
                last_observed,
                attempts,
                elapsed,
            } => {
                let err = VerificationError::DeadlineExceeded {
                    rollout_id,
                    actor_definition_id,
                    expected_tag: request.expected_tag.clone(),
                    last_observed_tag: last_observed.map(|s| s.docker_image_tag),
                    attempts,
                    budget_ms: budget.deadline.as_millis() as u64,
                    elapsed_ms: elapsed.as_millis() as u64,
                };
                warn!(error = %err, "default version did not converge");
                Err(err)
            }
        }
    }
}

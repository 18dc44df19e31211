use thiserror::Error;
use uuid::Uuid;

use rollout_model::VerificationStatus;

/// Failure of a single version-registry lookup.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("registry request failed: {0}")]
    Transport(String),

    #[error("registry returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("actor definition not found: {0}")]
    NotFound(Uuid),

    #[error("invalid registry response: {0}")]
    InvalidResponse(String),
}

/// The orchestrator asked the running verification to stop.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("cancellation requested by orchestrator")]
pub struct Cancelled;

/// Terminal failures of the bounded poll loop.
///
/// Running out of budget is not an error here: it is reported as [`rollout_model::PollOutcome::DeadlineExceeded`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PollError {
    #[error("registry unavailable: {0}")]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Cancelled(#[from] Cancelled),
}

#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("invalid verification request: {0}")]
    InvalidRequest(String),

    #[error(
        "registry unavailable while verifying rollout {rollout_id} (actor definition {actor_definition_id}): {source}"
    )]
    RegistryUnavailable {
        rollout_id: Uuid,
        actor_definition_id: Uuid,
        #[source]
        source: RegistryError,
    },

    #[error(
        "timed out after polling: default version of actor definition {actor_definition_id} did not converge to {expected_tag} for rollout {rollout_id}; poll window of {budget_ms}ms exhausted after {attempts} attempts (last observed tag: {})",
        .last_observed_tag.as_deref().unwrap_or("none")
    )]
    DeadlineExceeded {
        rollout_id: Uuid,
        actor_definition_id: Uuid,
        expected_tag: String,
        last_observed_tag: Option<String>,
        attempts: u32,
        budget_ms: u64,
        elapsed_ms: u64,
    },

    #[error(
        "verification of rollout {rollout_id} (actor definition {actor_definition_id}) cancelled by orchestrator"
    )]
    Cancelled {
        rollout_id: Uuid,
        actor_definition_id: Uuid,
    },
}

impl VerificationError {
    pub fn status(&self) -> VerificationStatus {
        match self {
            VerificationError::InvalidRequest(_) => VerificationStatus::InvalidRequest,
            VerificationError::RegistryUnavailable { .. } => VerificationStatus::RegistryUnavailable,
            VerificationError::DeadlineExceeded { .. } => VerificationStatus::DeadlineExceeded,
            VerificationError::Cancelled { .. } => VerificationStatus::Cancelled,
        }
    }

    /// Returns `true` when re-running the verification may succeed.
    ///
    /// `InvalidRequest` is a caller defect and never is.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, VerificationError::InvalidRequest(_))
    }
}

use serde::{Deserialize, Serialize};

/// Final status of one verification attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VerificationStatus {
    /// Default version matched the expected tag.
    Converged,
    /// Poll window exhausted without a match.
    DeadlineExceeded,
    /// A registry lookup failed.
    RegistryUnavailable,
    /// The orchestrator cancelled the wait.
    Cancelled,
    /// The request was rejected before polling.
    InvalidRequest,
}

impl VerificationStatus {
    /// Short label used in logs and metric labels.
    pub fn as_label(&self) -> &'static str {
        match self {
            VerificationStatus::Converged => "converged",
            VerificationStatus::DeadlineExceeded => "deadline_exceeded",
            VerificationStatus::RegistryUnavailable => "registry_unavailable",
            VerificationStatus::Cancelled => "cancelled",
            VerificationStatus::InvalidRequest => "invalid_request",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, VerificationStatus::Converged)
    }
}

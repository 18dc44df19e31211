mod constants;
pub use constants::{DEFAULT_DEADLINE_BUDGET_MS, DEFAULT_POLL_INTERVAL_MS};

mod error;
pub use error::ModelError;

mod support_state;
pub use support_state::SupportState;

mod version_snapshot;
pub use version_snapshot::VersionSnapshot;

mod verification_request;
pub use verification_request::VerificationRequest;

mod poll_outcome;
pub use poll_outcome::PollOutcome;

mod verification_status;
pub use verification_status::VerificationStatus;

/// Duration value in milliseconds.
///
/// Used for the deadline budget and the poll interval of a verification request.
pub type DurationMs = u64;

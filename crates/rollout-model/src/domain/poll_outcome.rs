use std::time::Duration;

use crate::VersionSnapshot;

/// Result of one bounded poll.
///
/// `attempts` counts registry fetches, `elapsed` is measured from the first fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// The registry reported the expected tag.
    Converged {
        snapshot: VersionSnapshot,
        attempts: u32,
        elapsed: Duration,
    },
    /// The deadline budget ran out before the registry converged.
    DeadlineExceeded {
        last_observed: Option<VersionSnapshot>,
        attempts: u32,
        elapsed: Duration,
    },
}

impl PollOutcome {
    pub fn is_converged(&self) -> bool {
        matches!(self, PollOutcome::Converged { .. })
    }

    pub fn attempts(&self) -> u32 {
        match self {
            PollOutcome::Converged { attempts, .. } => *attempts,
            PollOutcome::DeadlineExceeded { attempts, .. } => *attempts,
        }
    }

    pub fn elapsed(&self) -> Duration {
        match self {
            PollOutcome::Converged { elapsed, .. } => *elapsed,
            PollOutcome::DeadlineExceeded { elapsed, .. } => *elapsed,
        }
    }
}

/// Deadline budget applied when a request does not carry one (10 minutes).
pub const DEFAULT_DEADLINE_BUDGET_MS: u64 = 10 * 60 * 1000;

/// Spacing between registry observations when a request does not carry one (30 seconds).
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 30 * 1000;

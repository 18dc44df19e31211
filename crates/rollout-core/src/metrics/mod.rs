use std::{sync::Arc, time::Duration};

use rollout_model::VerificationStatus;

/// Sink for verification metrics.
///
/// Implementations must be cheap and non-blocking: they are called from inside the poll loop.
pub trait MetricsBackend: Send + Sync + 'static {
    /// A verification invocation began.
    fn verification_started(&self);

    /// One registry observation was compared against the expected tag.
    fn observation(&self, matched: bool);

    /// A verification finished with the given status.
    fn verification_completed(&self, status: VerificationStatus, duration: Duration);
}

pub type MetricsHandle = Arc<dyn MetricsBackend>;

/// Metrics backend that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpMetrics;

impl MetricsBackend for NoOpMetrics {
    fn verification_started(&self) {}
    fn observation(&self, _matched: bool) {}
    fn verification_completed(&self, _status: VerificationStatus, _duration: Duration) {}
}

pub fn noop_metrics() -> MetricsHandle {
    Arc::new(NoOpMetrics)
}

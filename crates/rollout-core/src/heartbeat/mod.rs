use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::error::Cancelled;

/// Progress reported with every heartbeat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeartbeatDetails {
    /// Registry fetches performed so far.
    pub attempts: u32,
    /// Time since the first fetch.
    pub elapsed: Duration,
    /// Tag seen by the latest fetch.
    pub observed_tag: String,
}

/// Liveness and cancellation checkpoint provided by the supervising orchestrator.
///
/// The poller calls [`Heartbeat::beat`] once before every wait and races the wait itself against
/// [`Heartbeat::until_cancelled`].
#[async_trait]
pub trait Heartbeat: Send + Sync {
    /// Signal liveness. Returns `Err(Cancelled)` once the orchestrator has asked to stop.
    async fn beat(&self, details: &HeartbeatDetails) -> Result<(), Cancelled>;

    /// Resolves when cancellation has been requested.
    async fn until_cancelled(&self);
}

#[async_trait]
impl Heartbeat for CancellationToken {
    async fn beat(&self, details: &HeartbeatDetails) -> Result<(), Cancelled> {
        if self.is_cancelled() {
            return Err(Cancelled);
        }
        trace!(
            attempts = details.attempts,
            elapsed_ms = details.elapsed.as_millis() as u64,
            observed_tag = %details.observed_tag,
            "heartbeat"
        );
        Ok(())
    }

    async fn until_cancelled(&self) {
        CancellationToken::cancelled(self).await
    }
}

//! Bounded polling of the version registry.
//!
//! The loop is strictly sequential: fetch, compare, check the deadline, then heartbeat and wait.
//! The deadline check runs after the comparison, so an observation that matches is never discarded
//! even when it arrives exactly at the end of the budget.
use std::{future::Future, time::Duration};

use rollout_model::{PollOutcome, VersionSnapshot};
use tokio::time::{Instant, sleep};
use tracing::debug;

use crate::{
    error::{Cancelled, PollError, RegistryError},
    heartbeat::{Heartbeat, HeartbeatDetails},
    metrics::{MetricsHandle, noop_metrics},
    tag::tag_matches,
};

/// Time allowed for convergence and spacing between observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollBudget {
    pub deadline: Duration,
    pub interval: Duration,
}

impl PollBudget {
    pub fn from_millis(deadline_ms: u64, interval_ms: u64) -> Self {
        Self {
            deadline: Duration::from_millis(deadline_ms),
            interval: Duration::from_millis(interval_ms),
        }
    }
}

pub struct BoundedPoller {
    budget: PollBudget,
    metrics: MetricsHandle,
}

impl BoundedPoller {
    pub fn new(budget: PollBudget) -> Self {
        Self {
            budget,
            metrics: noop_metrics(),
        }
    }

    pub fn with_metrics(mut self, metrics: MetricsHandle) -> Self {
        self.metrics = metrics;
        self
    }

    /// Poll `fetch` until it reports `expected_tag` or the deadline budget is spent.
    ///
    /// Registry errors end the loop immediately. Cancellation is observed at the heartbeat and during
    /// the wait that follows it; in both cases no further fetch is issued.
    pub async fn poll<F, Fut, H>(
        &self,
        expected_tag: &str,
        mut fetch: F,
        heartbeat: &H,
    ) -> Result<PollOutcome, PollError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<VersionSnapshot, RegistryError>>,
        H: Heartbeat + ?Sized,
    {
        let start = Instant::now();
        let mut attempts: u32 = 0;

        loop {
            let snapshot = fetch().await?;
            attempts = next_attempt(attempts);

            let matched = tag_matches(&snapshot.docker_image_tag, expected_tag);
            self.metrics.observation(matched);

            let elapsed = start.elapsed();
            if matched {
                return Ok(PollOutcome::Converged {
                    snapshot,
                    attempts,
                    elapsed,
                });
            }
            if elapsed >= self.budget.deadline {
                return Ok(PollOutcome::DeadlineExceeded {
                    last_observed: Some(snapshot),
                    attempts,
                    elapsed,
                });
            }

            debug!(
                attempt = attempts,
                observed_tag = %snapshot.docker_image_tag,
                expected_tag,
                elapsed_ms = elapsed.as_millis() as u64,
                "default version not converged yet"
            );

            let details = HeartbeatDetails {
                attempts,
                elapsed,
                observed_tag: snapshot.docker_image_tag,
            };
            self.suspend(heartbeat, &details).await?;
        }
    }

    async fn suspend<H>(&self, heartbeat: &H, details: &HeartbeatDetails) -> Result<(), Cancelled>
    where
        H: Heartbeat + ?Sized,
    {
        heartbeat.beat(details).await?;

        tokio::select! {
            biased;
            _ = heartbeat.until_cancelled() => Err(Cancelled),
            _ = sleep(self.budget.interval) => Ok(()),
        }
    }
}

/// Attempt counter that pins at `u32::MAX` instead of wrapping on very long budgets.
fn next_attempt(attempts: u32) -> u32 {
    attempts.saturating_add(1)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, atomic::Ordering};

    use tokio_util::sync::CancellationToken;
    use uuid::Uuid;

    use super::*;
    use crate::{
        registry::VersionRegistry,
        testing::{CountingHeartbeat, RecordingMetrics, ScriptedRegistry, snapshot},
    };

    async fn run(
        registry: &Arc<ScriptedRegistry>,
        heartbeat: &CountingHeartbeat,
        expected: &str,
        budget: PollBudget,
    ) -> Result<PollOutcome, PollError> {
        let id = Uuid::new_v4();
        BoundedPoller::new(budget)
            .poll(expected, || registry.fetch_default_version(id), heartbeat)
            .await
    }

    #[tokio::test(start_paused = true)]
    async fn converges_on_first_fetch_without_waiting() {
        let registry = ScriptedRegistry::tags(&["0.1"]);
        let heartbeat = CountingHeartbeat::new();

        let outcome = run(&registry, &heartbeat, "0.1", PollBudget::from_millis(1_000, 500))
            .await
            .unwrap();

        assert!(outcome.is_converged());
        assert_eq!(outcome.attempts(), 1);
        assert_eq!(outcome.elapsed(), Duration::ZERO);
        assert_eq!(registry.calls(), 1);
        assert_eq!(heartbeat.beats(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn converges_with_rc_suffix_on_expected_tag() {
        let registry = ScriptedRegistry::tags(&["0.1"]);
        let heartbeat = CountingHeartbeat::new();

        let outcome = run(&registry, &heartbeat, "0.1-rc.1", PollBudget::from_millis(1_000, 500))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            PollOutcome::Converged {
                snapshot: snapshot("0.1"),
                attempts: 1,
                elapsed: Duration::ZERO,
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn converges_after_k_fetches_and_k_minus_one_waits() {
        let registry = ScriptedRegistry::tags(&["0.0", "0.0", "0.0", "0.1"]);
        let heartbeat = CountingHeartbeat::new();

        let outcome = run(&registry, &heartbeat, "0.1", PollBudget::from_millis(10_000, 500))
            .await
            .unwrap();

        assert!(outcome.is_converged());
        assert_eq!(outcome.attempts(), 4);
        assert_eq!(registry.calls(), 4);
        assert_eq!(heartbeat.beats(), 3);
        assert!(outcome.elapsed() >= Duration::from_millis(1_500));
        assert!(outcome.elapsed() < Duration::from_millis(1_510));
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_exceeded_after_three_fetches() {
        let registry = ScriptedRegistry::tags(&["0.2"]);
        let heartbeat = CountingHeartbeat::new();

        let outcome = run(&registry, &heartbeat, "0.1", PollBudget::from_millis(1_000, 500))
            .await
            .unwrap();

        match outcome {
            PollOutcome::DeadlineExceeded {
                last_observed,
                attempts,
                elapsed,
            } => {
                assert_eq!(attempts, 3);
                assert_eq!(last_observed, Some(snapshot("0.2")));
                assert!(elapsed >= Duration::from_millis(1_000));
            }
            other => panic!("expected deadline exceeded, got {other:?}"),
        }
        assert_eq!(registry.calls(), 3);
        assert_eq!(heartbeat.beats(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn fetch_count_follows_budget_over_interval() {
        for (deadline_ms, interval_ms) in [(2_000, 250), (3_000, 1_000), (500, 500), (1_000, 300)] {
            let registry = ScriptedRegistry::tags(&["0.2"]);
            let heartbeat = CountingHeartbeat::new();

            let outcome = run(
                &registry,
                &heartbeat,
                "0.1",
                PollBudget::from_millis(deadline_ms, interval_ms),
            )
            .await
            .unwrap();

            let expected = deadline_ms.div_ceil(interval_ms) as u32 + 1;
            assert!(!outcome.is_converged());
            assert_eq!(outcome.attempts(), expected, "budget {deadline_ms}/{interval_ms}");
            assert_eq!(registry.calls(), expected);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn uneven_interval_overshoots_deadline_by_one_wait() {
        let registry = ScriptedRegistry::tags(&["0.2"]);
        let heartbeat = CountingHeartbeat::new();

        let outcome = run(&registry, &heartbeat, "0.1", PollBudget::from_millis(1_000, 300))
            .await
            .unwrap();

        // fetches at 0, 300, 600, 900 and 1200ms
        assert!(!outcome.is_converged());
        assert_eq!(outcome.attempts(), 5);
        assert_eq!(heartbeat.beats(), 4);
        assert!(outcome.elapsed() >= Duration::from_millis(1_200));
        assert!(outcome.elapsed() < Duration::from_millis(1_210));
    }

    #[tokio::test(start_paused = true)]
    async fn match_at_deadline_is_reported_as_converged() {
        let registry = ScriptedRegistry::tags(&["0.2", "0.2", "0.1"]);
        let heartbeat = CountingHeartbeat::new();

        let outcome = run(&registry, &heartbeat, "0.1", PollBudget::from_millis(1_000, 500))
            .await
            .unwrap();

        assert!(outcome.is_converged());
        assert_eq!(outcome.attempts(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn registry_error_is_not_retried() {
        let registry = ScriptedRegistry::new(vec![
            Ok(snapshot("0.2")),
            Err(RegistryError::Transport("connection reset".into())),
            Ok(snapshot("0.1")),
        ]);
        let heartbeat = CountingHeartbeat::new();

        let err = run(&registry, &heartbeat, "0.1", PollBudget::from_millis(10_000, 500))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            PollError::Registry(RegistryError::Transport("connection reset".into()))
        );
        assert_eq!(registry.calls(), 2);
        assert_eq!(heartbeat.beats(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_at_heartbeat_skips_next_fetch() {
        let registry = ScriptedRegistry::tags(&["0.2"]);
        let heartbeat = CountingHeartbeat::cancelling_on(2);

        let err = run(&registry, &heartbeat, "0.1", PollBudget::from_millis(10_000, 500))
            .await
            .unwrap_err();

        assert_eq!(err, PollError::Cancelled(Cancelled));
        assert_eq!(registry.calls(), 2);
        assert_eq!(heartbeat.beats(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_during_wait_interrupts_sleep() {
        let registry = ScriptedRegistry::tags(&["0.2"]);
        let heartbeat = CountingHeartbeat::new();
        let token = heartbeat.token();

        tokio::spawn(async move {
            sleep(Duration::from_millis(750)).await;
            token.cancel();
        });

        let started = Instant::now();
        let err = run(&registry, &heartbeat, "0.1", PollBudget::from_millis(10_000, 500))
            .await
            .unwrap_err();

        assert_eq!(err, PollError::Cancelled(Cancelled));
        assert_eq!(registry.calls(), 2);
        assert!(started.elapsed() < Duration::from_millis(1_000));
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_token_still_allows_first_observation() {
        let registry = ScriptedRegistry::tags(&["0.1"]);
        let token = CancellationToken::new();
        token.cancel();

        let id = Uuid::new_v4();
        let outcome = BoundedPoller::new(PollBudget::from_millis(1_000, 500))
            .poll("0.1", || registry.fetch_default_version(id), &token)
            .await
            .unwrap();

        assert!(outcome.is_converged());
    }

    #[test]
    fn attempt_counter_saturates() {
        assert_eq!(next_attempt(0), 1);
        assert_eq!(next_attempt(u32::MAX - 1), u32::MAX);
        assert_eq!(next_attempt(u32::MAX), u32::MAX);
    }

    #[tokio::test(start_paused = true)]
    async fn records_each_observation() {
        let registry = ScriptedRegistry::tags(&["0.2", "0.2", "0.1"]);
        let heartbeat = CountingHeartbeat::new();
        let metrics = Arc::new(RecordingMetrics::default());

        let id = Uuid::new_v4();
        BoundedPoller::new(PollBudget::from_millis(10_000, 100))
            .with_metrics(metrics.clone())
            .poll("0.1", || registry.fetch_default_version(id), &heartbeat)
            .await
            .unwrap();

        assert_eq!(metrics.mismatched.load(Ordering::SeqCst), 2);
        assert_eq!(metrics.matched.load(Ordering::SeqCst), 1);
    }
}

use std::sync::Arc;

use taskvisor::{TaskError, TaskFn, TaskRef};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};
use uuid::Uuid;

use rollout_core::{VerificationError, VerifyDefaultVersionActivity};
use rollout_model::VerificationRequest;

pub const SLOT: &str = "rollout-verify-default-version";

/// Build a supervisor task that runs one verification per start.
///
/// Re-running the task is safe: the verification is read-only and keeps no state between attempts.
pub fn verify_default_version_task(
    activity: Arc<VerifyDefaultVersionActivity>,
    request: VerificationRequest,
) -> TaskRef {
    let request = Arc::new(request);

    TaskFn::arc(SLOT, move |ctx: CancellationToken| {
        let activity = Arc::clone(&activity);
        let request = Arc::clone(&request);

        async move { run_verification(&activity, &request, &ctx).await }
    })
}

/// Run one verification with `ctx` as the heartbeat and map its failure for the supervisor.
pub async fn run_verification(
    activity: &VerifyDefaultVersionActivity,
    request: &VerificationRequest,
    ctx: &CancellationToken,
) -> Result<(), TaskError> {
    debug!(
        rollout_id = %request.rollout_id,
        actor_definition_id = %request.actor_definition_id,
        "starting default version verification"
    );

    match activity.verify_default_version(request, ctx).await {
        Ok(()) => {
            debug!(rollout_id = %request.rollout_id, "verification completed successfully");
            Ok(())
        }
        Err(e) => {
            warn!(rollout_id = %request.rollout_id, "verification failed: {}", e);
            Err(to_task_error(e))
        }
    }
}

/// Map a verification failure onto the supervisor's error kinds.
///
/// Invalid requests are fatal; timeouts and registry outages may be restarted by the supervisor's policy.
pub fn to_task_error(err: VerificationError) -> TaskError {
    match &err {
        VerificationError::Cancelled { .. } => TaskError::Canceled,
        VerificationError::InvalidRequest(_) => TaskError::Fatal {
            reason: err.to_string(),
        },
        VerificationError::DeadlineExceeded { .. }
        | VerificationError::RegistryUnavailable { .. } => TaskError::Fail {
            reason: err.to_string(),
        },
    }
}

#[derive(Debug)]
pub struct VerificationReport {
    pub rollout_id: Uuid,
    pub actor_definition_id: Uuid,
    pub result: Result<(), TaskError>,
}

/// Run independent verifications concurrently, one tokio task each.
///
/// Every verification gets a child of `ctx`, so cancelling `ctx` stops all of them.
/// Reports come back in request order; a task that panicked is reported as fatal.
pub async fn verify_many(
    activity: Arc<VerifyDefaultVersionActivity>,
    requests: Vec<VerificationRequest>,
    ctx: &CancellationToken,
) -> Vec<VerificationReport> {
    let joins: Vec<(Uuid, Uuid, JoinHandle<Result<(), TaskError>>)> = requests
        .into_iter()
        .map(|request| {
            let activity = Arc::clone(&activity);
            let token = ctx.child_token();
            let (rollout_id, actor_definition_id) = (request.rollout_id, request.actor_definition_id);

            let join = tokio::spawn(async move {
                run_verification(&activity, &request, &token).await
            });
            (rollout_id, actor_definition_id, join)
        })
        .collect();

    let mut reports = Vec::with_capacity(joins.len());
    for (rollout_id, actor_definition_id, join) in joins {
        let result = join.await.unwrap_or_else(|e| {
            error!(%rollout_id, %actor_definition_id, "verification task aborted: {}", e);
            Err(TaskError::Fatal {
                reason: format!("verification task aborted: {e}"),
            })
        });
        reports.push(VerificationReport {
            rollout_id,
            actor_definition_id,
            result,
        });
    }
    reports
}

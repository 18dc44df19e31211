use std::{env, net::SocketAddr, sync::Arc};

use anyhow::{Context, bail};
use axum::{Router, http::header, response::IntoResponse, routing::get};
use taskvisor::Task;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use uuid::Uuid;

use rollout_core::{VerifyConfig, VerifyDefaultVersionActivity};
use rollout_model::VerificationRequest;
use rollout_observe::{LoggerConfig, logger_init};
use rollout_prometheus::{Encoder, PrometheusMetrics, TextEncoder};
use rollout_registry::{HttpVersionRegistry, RegistryConfig};
use rollout_worker::verify_default_version_task;

const USAGE: &str = "usage: verify-default-version <docker-repository> <expected-tag> <actor-definition-id> <rollout-id> [deadline-ms] [interval-ms]";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1) Logger
    logger_init(&LoggerConfig::from_env()?)?;

    // 2) Request
    let request = parse_request(env::args().skip(1).collect())?;

    // 3) Registry + metrics + activity
    let mut registry_cfg = RegistryConfig::default();
    if let Ok(endpoint) = env::var("ROLLOUT_REGISTRY_ENDPOINT") {
        registry_cfg.endpoint = endpoint;
    }
    if let Ok(timeout) = env::var("ROLLOUT_REGISTRY_TIMEOUT_MS") {
        registry_cfg.request_timeout_ms = timeout
            .parse()
            .context("ROLLOUT_REGISTRY_TIMEOUT_MS must be a number of milliseconds")?;
    }
    let registry = HttpVersionRegistry::new(&registry_cfg)?;
    info!(endpoint = %registry_cfg.endpoint, "registry client ready");

    let metrics = PrometheusMetrics::new()?;
    if let Ok(addr) = env::var("ROLLOUT_METRICS_ADDR") {
        let addr: SocketAddr = addr.parse().context("ROLLOUT_METRICS_ADDR must be host:port")?;
        serve_metrics(addr, metrics.clone()).await?;
    }

    let activity = VerifyDefaultVersionActivity::new(Arc::new(registry))
        .with_config(VerifyConfig::default())
        .with_metrics(Arc::new(metrics));
    let task = verify_default_version_task(Arc::new(activity), request);

    // 4) Ctrl+C cancels the running verification
    let token = CancellationToken::new();
    let on_signal = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown requested, cancelling verification");
            on_signal.cancel();
        }
    });

    // 5) Verify
    match task.spawn(token).await {
        Ok(()) => {
            info!(task = task.name(), "default version converged");
            Ok(())
        }
        Err(e) => {
            error!(task = task.name(), kind = e.as_label(), "verification failed: {}", e);
            Err(e.into())
        }
    }
}

fn parse_request(args: Vec<String>) -> anyhow::Result<VerificationRequest> {
    let [repository, tag, actor_definition_id, rollout_id, rest @ ..] = args.as_slice() else {
        bail!(USAGE);
    };

    let actor_definition_id: Uuid = actor_definition_id
        .parse()
        .context("actor-definition-id must be a UUID")?;
    let rollout_id: Uuid = rollout_id.parse().context("rollout-id must be a UUID")?;

    let mut request =
        VerificationRequest::new(repository.as_str(), tag.as_str(), actor_definition_id, rollout_id);
    match rest {
        [] => {}
        [deadline] => {
            request = request.with_deadline_budget_ms(deadline.parse().context("deadline-ms")?);
        }
        [deadline, interval] => {
            request = request
                .with_deadline_budget_ms(deadline.parse().context("deadline-ms")?)
                .with_poll_interval_ms(interval.parse().context("interval-ms")?);
        }
        _ => bail!(USAGE),
    }
    Ok(request)
}

async fn serve_metrics(addr: SocketAddr, metrics: PrometheusMetrics) -> anyhow::Result<()> {
    let app = Router::new().route(
        "/metrics",
        get(move || {
            let metrics = metrics.clone();
            async move {
                let mut buf = Vec::new();
                match TextEncoder::new().encode(&metrics.gather(), &mut buf) {
                    Ok(()) => ([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], buf).into_response(),
                    Err(e) => {
                        error!("failed to encode metrics: {}", e);
                        axum::http::StatusCode::INTERNAL_SERVER_ERROR.into_response()
                    }
                }
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "serving metrics");
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!("metrics server stopped: {}", e);
        }
    });
    Ok(())
}

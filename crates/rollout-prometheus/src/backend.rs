use std::time::Duration;

use prometheus::{
    HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, proto::MetricFamily,
};
use rollout_core::MetricsBackend;
use rollout_model::VerificationStatus;

const DURATION_BUCKETS: &[f64] = &[1.0, 5.0, 15.0, 30.0, 60.0, 120.0, 300.0, 600.0, 1800.0];

/// Prometheus-backed [`MetricsBackend`].
///
/// Clones share the same registry and collectors.
#[derive(Clone)]
pub struct PrometheusMetrics {
    registry: Registry,
    started: IntCounter,
    completed: IntCounterVec,
    duration: HistogramVec,
    observations: IntCounterVec,
}

impl PrometheusMetrics {
    /// Create collectors in a fresh registry.
    pub fn new() -> Result<Self, prometheus::Error> {
        Self::with_registry(Registry::new())
    }

    /// Register collectors in an existing registry.
    pub fn with_registry(registry: Registry) -> Result<Self, prometheus::Error> {
        let started = IntCounter::new(
            "rollout_verifications_started_total",
            "Total default-version verifications started",
        )?;
        registry.register(Box::new(started.clone()))?;

        let completed = IntCounterVec::new(
            Opts::new(
                "rollout_verifications_completed_total",
                "Total default-version verifications completed",
            ),
            &["outcome"],
        )?;
        registry.register(Box::new(completed.clone()))?;

        let duration = HistogramVec::new(
            HistogramOpts::new(
                "rollout_verification_duration_seconds",
                "Default-version verification duration",
            )
            .buckets(DURATION_BUCKETS.to_vec()),
            &["outcome"],
        )?;
        registry.register(Box::new(duration.clone()))?;

        let observations = IntCounterVec::new(
            Opts::new(
                "rollout_registry_observations_total",
                "Registry observations compared against the expected tag",
            ),
            &["result"],
        )?;
        registry.register(Box::new(observations.clone()))?;

        Ok(Self {
            registry,
            started,
            completed,
            duration,
            observations,
        })
    }

    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }
}

impl MetricsBackend for PrometheusMetrics {
    fn verification_started(&self) {
        self.started.inc();
    }

    fn observation(&self, matched: bool) {
        let result = if matched { "match" } else { "mismatch" };
        self.observations.with_label_values(&[result]).inc();
    }

    fn verification_completed(&self, status: VerificationStatus, duration: Duration) {
        let outcome = status.as_label();
        self.completed.with_label_values(&[outcome]).inc();
        self.duration
            .with_label_values(&[outcome])
            .observe(duration.as_secs_f64());
    }
}

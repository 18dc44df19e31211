//! Prometheus metrics backend for default-version verification.
//!
//! This crate provides a [`PrometheusMetrics`] implementation of [`rollout_core::MetricsBackend`].
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use rollout_prometheus::PrometheusMetrics;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let metrics = PrometheusMetrics::new()?;
//! let handle: rollout_core::MetricsHandle = Arc::new(metrics.clone());
//!
//! // Pass `handle` to `VerifyDefaultVersionActivity::with_metrics`, then expose:
//! let families = metrics.gather();
//! # assert!(!families.is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! ## Metrics
//! - `rollout_verifications_started_total` - Counter
//! - `rollout_verifications_completed_total{outcome}` - Counter
//! - `rollout_verification_duration_seconds{outcome}` - Histogram
//! - `rollout_registry_observations_total{result}` - Counter (`match` / `mismatch`)
//!
//! ## HTTP Server
//! This crate does NOT provide an HTTP server for the `/metrics` endpoint.
//! Encode [`PrometheusMetrics::gather`] output with [`TextEncoder`] from your own HTTP stack.

mod backend;
pub use backend::PrometheusMetrics;

pub use prometheus::{Encoder, Registry, TextEncoder};

//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gatekeeper_requests_total` (counter): gate decisions by `decision`
//!   (`exempt`, `authenticated`, `rejected`)
//! - `gatekeeper_rejections_total` (counter): rejections by `reason`
//!   (`missing`, `expired`, `invalid`)

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_decision(decision: &'static str) {
    metrics::counter!("gatekeeper_requests_total", "decision" => decision).increment(1);
}

pub fn record_rejection(reason: &'static str) {
    metrics::counter!("gatekeeper_rejections_total", "reason" => reason).increment(1);
}

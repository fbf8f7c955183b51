//! Metrics collection and exposition.
//!
//! # Metrics
//! - `ics_relay_requests_total` (counter): relay requests by `outcome`
//! - `ics_relay_upstream_duration_seconds` (histogram): upstream fetch latency
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

pub const REQUESTS_TOTAL: &str = "ics_relay_requests_total";
pub const UPSTREAM_DURATION: &str = "ics_relay_upstream_duration_seconds";

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Count one relay request.
pub fn record_request(outcome: &'static str) {
    metrics::counter!(REQUESTS_TOTAL, "outcome" => outcome).increment(1);
}

/// Record how long an upstream fetch took.
pub fn record_upstream(start: Instant) {
    metrics::histogram!(UPSTREAM_DURATION).record(start.elapsed().as_secs_f64());
}

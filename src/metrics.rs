//! Prometheus metrics & middleware helper.

use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use once_cell::sync::Lazy;
use prometheus::{IntCounterVec, Opts};

/// Request middleware; serves HTTP and roster metrics on `/metrics`.
pub static METRICS: Lazy<PrometheusMetrics> = Lazy::new(|| {
    PrometheusMetricsBuilder::new("api")
        .endpoint("/metrics")
        .build()
        .expect("metrics builder")
});

/// `roster_operations_total{op, outcome}`, on the middleware's registry.
pub static ROSTER_OPS: Lazy<IntCounterVec> = Lazy::new(|| {
    let counter = IntCounterVec::new(
        Opts::new("roster_operations_total", "Roster operations by outcome"),
        &["op", "outcome"],
    )
    .expect("roster counter");
    METRICS
        .registry
        .register(Box::new(counter.clone()))
        .expect("register roster counter");
    counter
});

/// Count one roster operation. `outcome` is `ok` or an error label.
pub fn record(op: &str, outcome: &str) {
    ROSTER_OPS.with_label_values(&[op, outcome]).inc();
}

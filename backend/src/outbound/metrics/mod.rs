//! Prometheus-backed metrics adapters (enabled with the `metrics` feature).

mod prometheus_lifecycle;

pub use prometheus_lifecycle::PrometheusLifecycleMetrics;

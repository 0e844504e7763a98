//! Prometheus adapter for the reception lifecycle counters.
//!
//! Counters are registered with the same registry the HTTP metrics
//! middleware exposes on `/metrics`.

use async_trait::async_trait;
use prometheus::{CounterVec, IntCounter, Opts, Registry};

use crate::domain::ports::{LifecycleMetrics, LifecycleMetricsError};
use crate::domain::{City, ItemType};

/// Prometheus-backed lifecycle counters.
///
/// - `pvz_pickup_points_created_total{city}`
/// - `pvz_receptions_created_total`
/// - `pvz_items_added_total{type}`
pub struct PrometheusLifecycleMetrics {
    pickup_points_created: CounterVec,
    receptions_created: IntCounter,
    items_added: CounterVec,
}

impl PrometheusLifecycleMetrics {
    /// Create and register the counters with `registry`.
    ///
    /// # Errors
    ///
    /// Returns an error if a counter with the same name is already
    /// registered.
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        let pickup_points_created = CounterVec::new(
            Opts::new(
                "pvz_pickup_points_created_total",
                "Pickup points registered, by city",
            ),
            &["city"],
        )?;
        let receptions_created = IntCounter::new(
            "pvz_receptions_created_total",
            "Receptions opened",
        )?;
        let items_added = CounterVec::new(
            Opts::new("pvz_items_added_total", "Items received, by type"),
            &["type"],
        )?;
        registry.register(Box::new(pickup_points_created.clone()))?;
        registry.register(Box::new(receptions_created.clone()))?;
        registry.register(Box::new(items_added.clone()))?;
        Ok(Self {
            pickup_points_created,
            receptions_created,
            items_added,
        })
    }
}

#[async_trait]
impl LifecycleMetrics for PrometheusLifecycleMetrics {
    async fn pickup_point_created(&self, city: City) -> Result<(), LifecycleMetricsError> {
        self.pickup_points_created
            .get_metric_with_label_values(&[city.as_str()])
            .map_err(|err| LifecycleMetricsError::export(err.to_string()))?
            .inc();
        Ok(())
    }

    async fn reception_created(&self) -> Result<(), LifecycleMetricsError> {
        self.receptions_created.inc();
        Ok(())
    }

    async fn item_added(&self, item_type: ItemType) -> Result<(), LifecycleMetricsError> {
        self.items_added
            .get_metric_with_label_values(&[item_type.as_str()])
            .map_err(|err| LifecycleMetricsError::export(err.to_string()))?
            .inc();
        Ok(())
    }
}

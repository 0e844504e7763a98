//! Domain port for recording lifecycle counters.
//!
//! Services receive the observer by injection, so the lifecycle engine stays
//! testable without a metrics backend. Implementations may export to
//! Prometheus or discard events.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{City, ItemType};

define_port_error! {
    /// Errors exposed when recording lifecycle metrics.
    pub enum LifecycleMetricsError {
        /// Metric exporter rejected the write.
        Export { message: String } => "lifecycle metrics exporter failed: {message}",
    }
}

/// Observer notified after successful lifecycle mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LifecycleMetrics: Send + Sync {
    /// A pickup point was registered in `city`.
    async fn pickup_point_created(&self, city: City) -> Result<(), LifecycleMetricsError>;

    /// A reception was opened.
    async fn reception_created(&self) -> Result<(), LifecycleMetricsError>;

    /// An item of `item_type` was added to an open reception.
    async fn item_added(&self, item_type: ItemType) -> Result<(), LifecycleMetricsError>;
}

/// No-op implementation for when metrics are disabled or in tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpLifecycleMetrics;

#[async_trait]
impl LifecycleMetrics for NoOpLifecycleMetrics {
    async fn pickup_point_created(&self, _city: City) -> Result<(), LifecycleMetricsError> {
        Ok(())
    }

    async fn reception_created(&self) -> Result<(), LifecycleMetricsError> {
        Ok(())
    }

    async fn item_added(&self, _item_type: ItemType) -> Result<(), LifecycleMetricsError> {
        Ok(())
    }
}

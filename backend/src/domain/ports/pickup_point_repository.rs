//! Driven port for pickup point persistence and id-page queries.

use async_trait::async_trait;
use uuid::Uuid;

use super::define_port_error;
use crate::domain::{PickupPoint, PickupPointIdPage, TimeWindow};

define_port_error! {
    /// Errors raised by pickup point persistence adapters.
    pub enum PickupPointRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "pickup point repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "pickup point repository query failed: {message}",
        /// No pickup point carries the requested id.
        NotFound { id: Uuid } => "pickup point {id} not found",
    }
}

/// Port for storing and reading pickup points.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PickupPointRepository: Send + Sync {
    /// Insert a new pickup point.
    async fn create(&self, pickup_point: &PickupPoint) -> Result<(), PickupPointRepositoryError>;

    /// Fetch a pickup point, failing with `NotFound` when absent.
    async fn get_by_id(&self, id: Uuid) -> Result<PickupPoint, PickupPointRepositoryError>;

    /// Fetch every pickup point whose id is in `ids` with a single lookup.
    ///
    /// Result order is unspecified; missing ids are silently absent.
    async fn get_by_ids(&self, ids: &[Uuid])
    -> Result<Vec<PickupPoint>, PickupPointRepositoryError>;

    /// Return one page of distinct pickup point ids, newest registration
    /// first, plus the total number of matches.
    ///
    /// A bounded `window` restricts matches to pickup points with at least
    /// one reception whose start time lies inside it.
    async fn list_ids_and_total(
        &self,
        limit: u32,
        offset: u64,
        window: TimeWindow,
    ) -> Result<PickupPointIdPage, PickupPointRepositoryError>;

    /// Every pickup point, newest registration first.
    async fn list_all(&self) -> Result<Vec<PickupPoint>, PickupPointRepositoryError>;
}

//! Driven port for reception persistence.
//!
//! Adapters must guarantee that at most one reception per pickup point is
//! open at any instant. A `create` that would break that rule fails with
//! [`ReceptionRepositoryError::OpenConflict`] instead of inserting.

use std::collections::HashMap;

use async_trait::async_trait;
use uuid::Uuid;

use super::define_port_error;
use crate::domain::{Reception, ReceptionStatus, TimeWindow};

define_port_error! {
    /// Errors raised by reception persistence adapters.
    pub enum ReceptionRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "reception repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "reception repository query failed: {message}",
        /// No reception carries the requested id.
        NotFound { id: Uuid } => "reception {id} not found",
        /// The pickup point has no open reception.
        NoOpen { pvz_id: Uuid } => "pickup point {pvz_id} has no open reception",
        /// Another reception is already open for the pickup point.
        OpenConflict { pvz_id: Uuid } =>
            "pickup point {pvz_id} already has an open reception",
        /// The owning pickup point does not exist.
        UnknownPickupPoint { pvz_id: Uuid } => "pickup point {pvz_id} not found",
    }
}

/// Port for storing and reading receptions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReceptionRepository: Send + Sync {
    /// Insert a reception, enforcing the one-open-per-pickup-point rule.
    async fn create(&self, reception: &Reception) -> Result<(), ReceptionRepositoryError>;

    /// Fetch a reception by id.
    async fn get_by_id(&self, id: Uuid) -> Result<Reception, ReceptionRepositoryError>;

    /// Fetch the open reception for a pickup point, failing with `NoOpen`
    /// when none exists.
    async fn find_open(&self, pvz_id: Uuid) -> Result<Reception, ReceptionRepositoryError>;

    /// Move a reception into `status`, failing with `NotFound` when no row
    /// with that id holds a different status.
    async fn update_status(
        &self,
        id: Uuid,
        status: ReceptionStatus,
    ) -> Result<(), ReceptionRepositoryError>;

    /// Fetch every reception owned by `pvz_ids` whose start time lies in
    /// `window`, grouped by pickup point id.
    ///
    /// Each group is ordered by start time, newest first. Pickup points with
    /// no matching receptions are absent from the map.
    async fn list_by_pickup_points(
        &self,
        pvz_ids: &[Uuid],
        window: TimeWindow,
    ) -> Result<HashMap<Uuid, Vec<Reception>>, ReceptionRepositoryError>;
}

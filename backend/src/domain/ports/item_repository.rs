//! Driven port for item persistence.
//!
//! Adapters only mutate items whose reception is still open: inserts and
//! deletes against a closed reception fail with
//! [`ItemRepositoryError::ReceptionNotOpen`] or `NotFound` respectively.

use std::collections::HashMap;

use async_trait::async_trait;
use uuid::Uuid;

use super::define_port_error;
use crate::domain::Item;

define_port_error! {
    /// Errors raised by item persistence adapters.
    pub enum ItemRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "item repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "item repository query failed: {message}",
        /// No removable item carries the requested id.
        NotFound { id: Uuid } => "item {id} not found",
        /// The reception holds no items.
        Empty { reception_id: Uuid } => "reception {reception_id} has no items",
        /// The reception was closed or removed before the write landed.
        ReceptionNotOpen { reception_id: Uuid } =>
            "reception {reception_id} is not open",
    }
}

/// Port for storing and reading items.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Insert an item into its (open) reception.
    async fn create(&self, item: &Item) -> Result<(), ItemRepositoryError>;

    /// Fetch the most recently created item of a reception, failing with
    /// `Empty` when it has none.
    async fn find_last(&self, reception_id: Uuid) -> Result<Item, ItemRepositoryError>;

    /// Delete an item from an open reception, failing with `NotFound` when
    /// no row was removed.
    async fn delete(&self, id: Uuid) -> Result<(), ItemRepositoryError>;

    /// Fetch every item of `reception_ids`, grouped by reception id and
    /// ordered oldest first within each group.
    async fn list_by_receptions(
        &self,
        reception_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<Item>>, ItemRepositoryError>;
}

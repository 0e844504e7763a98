//! Driving port for the reception lifecycle.
//!
//! Per pickup point the lifecycle is `none -> open -> closed`; items may be
//! added and removed (last in, first out) only while a reception is open.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Error, Item, ItemType, Reception, RequestContext};

/// Lifecycle operations exposed to inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReceptionCommand: Send + Sync {
    /// Open a reception for `pvz_id`.
    ///
    /// Fails with `NotFound` for an unknown pickup point and
    /// `ConflictInProgress` when a reception is already open.
    async fn open_reception(&self, ctx: &RequestContext, pvz_id: Uuid)
    -> Result<Reception, Error>;

    /// Close the open reception for `pvz_id`.
    ///
    /// Fails with `AlreadyClosed` when nothing is open.
    async fn close_reception(
        &self,
        ctx: &RequestContext,
        pvz_id: Uuid,
    ) -> Result<Reception, Error>;

    /// Add an item to the open reception for `pvz_id`.
    ///
    /// Fails with `NoOpenReception` when nothing is open.
    async fn add_item(
        &self,
        ctx: &RequestContext,
        pvz_id: Uuid,
        item_type: ItemType,
    ) -> Result<Item, Error>;

    /// Remove the most recently added item from the open reception.
    ///
    /// Fails with `NoOpenReception` when nothing is open and
    /// `EmptyReception` when the reception has no items.
    async fn remove_last_item(&self, ctx: &RequestContext, pvz_id: Uuid) -> Result<(), Error>;
}

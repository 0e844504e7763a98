//! Reception lifecycle service.
//!
//! Enforces the per-pickup-point state machine (`none -> open -> closed`)
//! and the last-in-first-out removal rule. The at-most-one-open invariant is
//! guaranteed by the [`ReceptionRepository`] adapter; this service performs
//! a fast-path check first and still classifies a lost insert race as
//! `ConflictInProgress`.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::ports::{
    ItemRepository, ItemRepositoryError, LifecycleMetrics, LifecycleMetricsError,
    PickupPointRepository, PickupPointRepositoryError, ReceptionCommand, ReceptionRepository,
    ReceptionRepositoryError,
};
use crate::domain::{
    Error, Item, ItemType, Reception, ReceptionStatus, RequestContext, store_precision,
};

const OPEN_RECEPTION: &str = "open reception";
const CLOSE_RECEPTION: &str = "close reception";
const ADD_ITEM: &str = "add item";
const REMOVE_LAST_ITEM: &str = "remove last item";

pub(crate) fn map_pickup_point_error(op: &str, err: PickupPointRepositoryError) -> Error {
    match err {
        PickupPointRepositoryError::NotFound { .. } => Error::not_found(err.to_string()),
        PickupPointRepositoryError::Connection { .. }
        | PickupPointRepositoryError::Query { .. } => {
            error!(op, error = %err, "pickup point store failure");
            Error::storage_failure(err.to_string())
        }
    }
    .in_operation(op)
}

pub(crate) fn map_reception_error(op: &str, err: ReceptionRepositoryError) -> Error {
    match err {
        ReceptionRepositoryError::NotFound { .. }
        | ReceptionRepositoryError::UnknownPickupPoint { .. } => Error::not_found(err.to_string()),
        ReceptionRepositoryError::NoOpen { .. } => Error::no_open_reception(err.to_string()),
        ReceptionRepositoryError::OpenConflict { .. } => {
            Error::conflict_in_progress(err.to_string())
        }
        ReceptionRepositoryError::Connection { .. } | ReceptionRepositoryError::Query { .. } => {
            error!(op, error = %err, "reception store failure");
            Error::storage_failure(err.to_string())
        }
    }
    .in_operation(op)
}

pub(crate) fn map_item_error(op: &str, err: ItemRepositoryError) -> Error {
    match err {
        ItemRepositoryError::NotFound { .. } => Error::not_found(err.to_string()),
        ItemRepositoryError::Empty { .. } => Error::empty_reception(err.to_string()),
        ItemRepositoryError::ReceptionNotOpen { .. } => Error::no_open_reception(err.to_string()),
        ItemRepositoryError::Connection { .. } | ItemRepositoryError::Query { .. } => {
            error!(op, error = %err, "item store failure");
            Error::storage_failure(err.to_string())
        }
    }
    .in_operation(op)
}

fn log_metrics_failure(op: &str, result: Result<(), LifecycleMetricsError>) {
    if let Err(err) = result {
        warn!(op, error = %err, "lifecycle metrics write failed");
    }
}

/// Lifecycle engine implementing [`ReceptionCommand`].
#[derive(Clone)]
pub struct ReceptionLifecycleService<P, R, I> {
    pickup_points: Arc<P>,
    receptions: Arc<R>,
    items: Arc<I>,
    metrics: Arc<dyn LifecycleMetrics>,
    clock: Arc<dyn Clock>,
}

impl<P, R, I> ReceptionLifecycleService<P, R, I>
where
    P: PickupPointRepository,
    R: ReceptionRepository,
    I: ItemRepository,
{
    /// Create the service over its repositories, metrics observer and clock.
    pub fn new(
        pickup_points: Arc<P>,
        receptions: Arc<R>,
        items: Arc<I>,
        metrics: Arc<dyn LifecycleMetrics>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            pickup_points,
            receptions,
            items,
            metrics,
            clock,
        }
    }

    fn now(&self) -> DateTime<Utc> {
        store_precision(self.clock.utc())
    }

    /// Find the open reception, translating "none open" with `on_missing`.
    async fn open_reception_for(
        &self,
        ctx: &RequestContext,
        op: &str,
        pvz_id: Uuid,
        on_missing: fn(String) -> Error,
    ) -> Result<Reception, Error> {
        match ctx.bounded(op, self.receptions.find_open(pvz_id)).await? {
            Ok(reception) => Ok(reception),
            Err(err @ ReceptionRepositoryError::NoOpen { .. }) => {
                Err(on_missing(err.to_string()).in_operation(op))
            }
            Err(err) => Err(map_reception_error(op, err)),
        }
    }

    async fn open(&self, ctx: &RequestContext, pvz_id: Uuid) -> Result<Reception, Error> {
        ctx.bounded(OPEN_RECEPTION, self.pickup_points.get_by_id(pvz_id))
            .await?
            .map_err(|err| map_pickup_point_error(OPEN_RECEPTION, err))?;

        match ctx
            .bounded(OPEN_RECEPTION, self.receptions.find_open(pvz_id))
            .await?
        {
            Ok(existing) => {
                return Err(Error::conflict_in_progress(format!(
                    "reception {} is already in progress",
                    existing.id
                ))
                .in_operation(OPEN_RECEPTION));
            }
            Err(ReceptionRepositoryError::NoOpen { .. }) => {}
            Err(err) => return Err(map_reception_error(OPEN_RECEPTION, err)),
        }

        let reception = Reception::open(pvz_id, self.now());
        ctx.bounded(OPEN_RECEPTION, self.receptions.create(&reception))
            .await?
            .map_err(|err| map_reception_error(OPEN_RECEPTION, err))?;

        log_metrics_failure(OPEN_RECEPTION, self.metrics.reception_created().await);
        info!(
            trace_id = %ctx.trace_id(),
            %pvz_id,
            reception_id = %reception.id,
            "reception opened"
        );
        Ok(reception)
    }

    async fn close(&self, ctx: &RequestContext, pvz_id: Uuid) -> Result<Reception, Error> {
        let open = self
            .open_reception_for(ctx, CLOSE_RECEPTION, pvz_id, Error::already_closed)
            .await?;

        ctx.bounded(
            CLOSE_RECEPTION,
            self.receptions
                .update_status(open.id, ReceptionStatus::Closed),
        )
        .await?
        .map_err(|err| map_reception_error(CLOSE_RECEPTION, err))?;

        info!(
            trace_id = %ctx.trace_id(),
            %pvz_id,
            reception_id = %open.id,
            "reception closed"
        );
        Ok(open.closed())
    }

    async fn add(
        &self,
        ctx: &RequestContext,
        pvz_id: Uuid,
        item_type: ItemType,
    ) -> Result<Item, Error> {
        let open = self
            .open_reception_for(ctx, ADD_ITEM, pvz_id, Error::no_open_reception)
            .await?;

        let item = Item::receive(open.id, item_type, self.now());
        ctx.bounded(ADD_ITEM, self.items.create(&item))
            .await?
            .map_err(|err| map_item_error(ADD_ITEM, err))?;

        log_metrics_failure(ADD_ITEM, self.metrics.item_added(item_type).await);
        Ok(item)
    }

    async fn remove_last(&self, ctx: &RequestContext, pvz_id: Uuid) -> Result<(), Error> {
        let open = self
            .open_reception_for(ctx, REMOVE_LAST_ITEM, pvz_id, Error::no_open_reception)
            .await?;

        let last = ctx
            .bounded(REMOVE_LAST_ITEM, self.items.find_last(open.id))
            .await?
            .map_err(|err| map_item_error(REMOVE_LAST_ITEM, err))?;

        ctx.bounded(REMOVE_LAST_ITEM, self.items.delete(last.id))
            .await?
            .map_err(|err| map_item_error(REMOVE_LAST_ITEM, err))
    }
}

#[async_trait]
impl<P, R, I> ReceptionCommand for ReceptionLifecycleService<P, R, I>
where
    P: PickupPointRepository,
    R: ReceptionRepository,
    I: ItemRepository,
{
    async fn open_reception(
        &self,
        ctx: &RequestContext,
        pvz_id: Uuid,
    ) -> Result<Reception, Error> {
        self.open(ctx, pvz_id)
            .await
            .map_err(|err| ctx.annotate(err))
    }

    async fn close_reception(
        &self,
        ctx: &RequestContext,
        pvz_id: Uuid,
    ) -> Result<Reception, Error> {
        self.close(ctx, pvz_id)
            .await
            .map_err(|err| ctx.annotate(err))
    }

    async fn add_item(
        &self,
        ctx: &RequestContext,
        pvz_id: Uuid,
        item_type: ItemType,
    ) -> Result<Item, Error> {
        self.add(ctx, pvz_id, item_type)
            .await
            .map_err(|err| ctx.annotate(err))
    }

    async fn remove_last_item(&self, ctx: &RequestContext, pvz_id: Uuid) -> Result<(), Error> {
        self.remove_last(ctx, pvz_id)
            .await
            .map_err(|err| ctx.annotate(err))
    }
}

#[cfg(test)]
#[path = "reception_service_tests.rs"]
mod tests;

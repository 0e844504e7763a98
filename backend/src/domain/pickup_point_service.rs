//! Pickup point registration and the paginated aggregation read model.
//!
//! Listing runs a fixed number of store round trips regardless of page
//! size: one id page, one batch of pickup points, one batch of receptions,
//! and one batch of items. Results are reassembled in memory by walking the
//! ordered id page.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::{Page, PageParams};
use tracing::{info, warn};
use uuid::Uuid;

use super::reception_service::{map_item_error, map_pickup_point_error, map_reception_error};
use crate::domain::ports::{
    ItemRepository, LifecycleMetrics, ListPickupPointsRequest, PickupPointCommand,
    PickupPointQuery, PickupPointRepository, ReceptionRepository,
};
use crate::domain::{
    City, Error, PickupPoint, PickupPointDetails, ReceptionWithItems, RequestContext,
    store_precision,
};

const CREATE_PICKUP_POINT: &str = "create pickup point";
const LIST_PICKUP_POINTS: &str = "list pickup points";
const LIST_ALL_PICKUP_POINTS: &str = "list all pickup points";

/// Registration and listing service for pickup points.
#[derive(Clone)]
pub struct PickupPointService<P, R, I> {
    pickup_points: Arc<P>,
    receptions: Arc<R>,
    items: Arc<I>,
    metrics: Arc<dyn LifecycleMetrics>,
    clock: Arc<dyn Clock>,
}

impl<P, R, I> PickupPointService<P, R, I>
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

    async fn create(&self, ctx: &RequestContext, city: City) -> Result<PickupPoint, Error> {
        let pickup_point = PickupPoint::register(city, store_precision(self.clock.utc()));
        ctx.bounded(CREATE_PICKUP_POINT, self.pickup_points.create(&pickup_point))
            .await?
            .map_err(|err| map_pickup_point_error(CREATE_PICKUP_POINT, err))?;

        if let Err(err) = self.metrics.pickup_point_created(city).await {
            warn!(op = CREATE_PICKUP_POINT, error = %err, "lifecycle metrics write failed");
        }
        info!(
            trace_id = %ctx.trace_id(),
            pvz_id = %pickup_point.id,
            %city,
            "pickup point registered"
        );
        Ok(pickup_point)
    }

    async fn list(
        &self,
        ctx: &RequestContext,
        request: ListPickupPointsRequest,
    ) -> Result<Page<PickupPointDetails>, Error> {
        let params = PageParams::new(request.page, request.page_size).map_err(|err| {
            Error::internal(format!("invalid page parameters: {err}"))
                .in_operation(LIST_PICKUP_POINTS)
        })?;

        let id_page = ctx
            .bounded(
                LIST_PICKUP_POINTS,
                self.pickup_points.list_ids_and_total(
                    params.limit(),
                    params.offset(),
                    request.window,
                ),
            )
            .await?
            .map_err(|err| map_pickup_point_error(LIST_PICKUP_POINTS, err))?;

        if id_page.ids.is_empty() {
            return Ok(Page::new(Vec::new(), id_page.total, params));
        }

        let mut points: HashMap<Uuid, PickupPoint> = ctx
            .bounded(LIST_PICKUP_POINTS, self.pickup_points.get_by_ids(&id_page.ids))
            .await?
            .map_err(|err| map_pickup_point_error(LIST_PICKUP_POINTS, err))?
            .into_iter()
            .map(|point| (point.id, point))
            .collect();

        let mut receptions = ctx
            .bounded(
                LIST_PICKUP_POINTS,
                self.receptions
                    .list_by_pickup_points(&id_page.ids, request.window),
            )
            .await?
            .map_err(|err| map_reception_error(LIST_PICKUP_POINTS, err))?;

        let reception_ids: Vec<Uuid> = receptions
            .values()
            .flat_map(|group| group.iter().map(|reception| reception.id))
            .collect();
        let mut items = if reception_ids.is_empty() {
            HashMap::new()
        } else {
            ctx.bounded(
                LIST_PICKUP_POINTS,
                self.items.list_by_receptions(&reception_ids),
            )
            .await?
            .map_err(|err| map_item_error(LIST_PICKUP_POINTS, err))?
        };

        let mut details = Vec::with_capacity(id_page.ids.len());
        for id in &id_page.ids {
            let Some(pickup_point) = points.remove(id) else {
                warn!(
                    trace_id = %ctx.trace_id(),
                    pvz_id = %id,
                    "pickup point vanished between id page and batch fetch"
                );
                continue;
            };
            let receptions = receptions
                .remove(id)
                .unwrap_or_default()
                .into_iter()
                .map(|reception| ReceptionWithItems {
                    items: items.remove(&reception.id).unwrap_or_default(),
                    reception,
                })
                .collect();
            details.push(PickupPointDetails {
                pickup_point,
                receptions,
            });
        }

        Ok(Page::new(details, id_page.total, params))
    }

    async fn list_all(&self, ctx: &RequestContext) -> Result<Vec<PickupPoint>, Error> {
        ctx.bounded(LIST_ALL_PICKUP_POINTS, self.pickup_points.list_all())
            .await?
            .map_err(|err| map_pickup_point_error(LIST_ALL_PICKUP_POINTS, err))
    }
}

#[async_trait]
impl<P, R, I> PickupPointCommand for PickupPointService<P, R, I>
where
    P: PickupPointRepository,
    R: ReceptionRepository,
    I: ItemRepository,
{
    async fn create_pickup_point(
        &self,
        ctx: &RequestContext,
        city: City,
    ) -> Result<PickupPoint, Error> {
        self.create(ctx, city)
            .await
            .map_err(|err| ctx.annotate(err))
    }
}

#[async_trait]
impl<P, R, I> PickupPointQuery for PickupPointService<P, R, I>
where
    P: PickupPointRepository,
    R: ReceptionRepository,
    I: ItemRepository,
{
    async fn list_pickup_points(
        &self,
        ctx: &RequestContext,
        request: ListPickupPointsRequest,
    ) -> Result<Page<PickupPointDetails>, Error> {
        self.list(ctx, request)
            .await
            .map_err(|err| ctx.annotate(err))
    }

    async fn list_all_pickup_points(
        &self,
        ctx: &RequestContext,
    ) -> Result<Vec<PickupPoint>, Error> {
        self.list_all(ctx)
            .await
            .map_err(|err| ctx.annotate(err))
    }
}

#[cfg(test)]
#[path = "pickup_point_service_tests.rs"]
mod tests;

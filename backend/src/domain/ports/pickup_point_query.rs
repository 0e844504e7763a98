//! Driving ports for pickup point registration and listings.

use async_trait::async_trait;
use pagination::Page;

use crate::domain::{City, Error, PickupPoint, PickupPointDetails, RequestContext, TimeWindow};

/// Parameters for the paginated pickup point listing.
///
/// `page_size` and `page` must both be at least one; inbound adapters clamp
/// caller input before building this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListPickupPointsRequest {
    pub page_size: u32,
    pub page: u32,
    pub window: TimeWindow,
}

/// Write side: register pickup points.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PickupPointCommand: Send + Sync {
    /// Register a new pickup point in `city`.
    async fn create_pickup_point(
        &self,
        ctx: &RequestContext,
        city: City,
    ) -> Result<PickupPoint, Error>;
}

/// Read side: listings assembled from pickup points, receptions and items.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PickupPointQuery: Send + Sync {
    /// One page of pickup points with their receptions and items, newest
    /// registration first.
    async fn list_pickup_points(
        &self,
        ctx: &RequestContext,
        request: ListPickupPointsRequest,
    ) -> Result<Page<PickupPointDetails>, Error>;

    /// Every pickup point without nested data.
    async fn list_all_pickup_points(&self, ctx: &RequestContext)
    -> Result<Vec<PickupPoint>, Error>;
}

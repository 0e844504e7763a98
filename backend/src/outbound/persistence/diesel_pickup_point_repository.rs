//! PostgreSQL-backed `PickupPointRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{PickupPointRepository, PickupPointRepositoryError};
use crate::domain::{PickupPoint, PickupPointIdPage, TimeWindow};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::PickupPointRow;
use super::pool::{DbPool, PoolError};
use super::schema::{pickup_points, receptions};

/// Diesel-backed implementation of the pickup point repository port.
#[derive(Clone)]
pub struct DieselPickupPointRepository {
    pool: DbPool,
}

impl DieselPickupPointRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PickupPointRepositoryError {
    map_basic_pool_error(error, |message| {
        PickupPointRepositoryError::connection(message)
    })
}

fn map_diesel_error(error: diesel::result::Error) -> PickupPointRepositoryError {
    map_basic_diesel_error(
        error,
        PickupPointRepositoryError::query,
        PickupPointRepositoryError::connection,
    )
}

fn row_to_pickup_point(row: PickupPointRow) -> Result<PickupPoint, PickupPointRepositoryError> {
    PickupPoint::try_from(row).map_err(PickupPointRepositoryError::query)
}

/// Pickup points matching `window`: every point when unbounded, otherwise
/// those with at least one reception starting inside it.
fn matching(window: TimeWindow) -> pickup_points::BoxedQuery<'static, Pg> {
    let query = pickup_points::table.into_boxed();
    if !window.is_bounded() {
        return query;
    }

    let mut in_window = receptions::table.select(receptions::pvz_id).into_boxed();
    if let Some(start) = window.start {
        in_window = in_window.filter(receptions::date_time.ge(start));
    }
    if let Some(end) = window.end {
        in_window = in_window.filter(receptions::date_time.le(end));
    }
    query.filter(pickup_points::id.eq_any(in_window))
}

#[async_trait]
impl PickupPointRepository for DieselPickupPointRepository {
    async fn create(&self, pickup_point: &PickupPoint) -> Result<(), PickupPointRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(pickup_points::table)
            .values(PickupPointRow::from(pickup_point))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<PickupPoint, PickupPointRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = pickup_points::table
            .find(id)
            .select(PickupPointRow::as_select())
            .first::<PickupPointRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .ok_or_else(|| PickupPointRepositoryError::not_found(id))?;

        row_to_pickup_point(row)
    }

    async fn get_by_ids(
        &self,
        ids: &[Uuid],
    ) -> Result<Vec<PickupPoint>, PickupPointRepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        pickup_points::table
            .filter(pickup_points::id.eq_any(ids.to_vec()))
            .select(PickupPointRow::as_select())
            .load::<PickupPointRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?
            .into_iter()
            .map(row_to_pickup_point)
            .collect()
    }

    async fn list_ids_and_total(
        &self,
        limit: u32,
        offset: u64,
        window: TimeWindow,
    ) -> Result<PickupPointIdPage, PickupPointRepositoryError> {
        let offset = i64::try_from(offset)
            .map_err(|_| PickupPointRepositoryError::query("offset exceeds i64 range"))?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let total: i64 = matching(window)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let ids = matching(window)
            .select(pickup_points::id)
            .order((
                pickup_points::registration_date.desc(),
                pickup_points::id.desc(),
            ))
            .limit(i64::from(limit))
            .offset(offset)
            .load::<Uuid>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(PickupPointIdPage {
            ids,
            total: u64::try_from(total).unwrap_or_default(),
        })
    }

    async fn list_all(&self) -> Result<Vec<PickupPoint>, PickupPointRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        pickup_points::table
            .select(PickupPointRow::as_select())
            .order((
                pickup_points::registration_date.desc(),
                pickup_points::id.desc(),
            ))
            .load::<PickupPointRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?
            .into_iter()
            .map(row_to_pickup_point)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use chrono::{TimeZone, Utc};
    use diesel::debug_query;

    #[test]
    fn unbounded_window_has_no_reception_filter() {
        let query = matching(TimeWindow::default()).select(pickup_points::id);
        let sql = debug_query::<Pg, _>(&query).to_string();
        assert!(!sql.contains("receptions"));
    }

    #[test]
    fn bounded_window_filters_through_receptions() {
        let start = Utc
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("valid timestamp");
        let query = matching(TimeWindow::new(Some(start), None)).select(pickup_points::id);
        let sql = debug_query::<Pg, _>(&query).to_string();
        assert!(sql.contains("\"receptions\".\"date_time\" >="));
        assert!(!sql.contains("\"receptions\".\"date_time\" <="));
    }
}

//! PostgreSQL-backed `ReceptionRepository` implementation using Diesel ORM.
//!
//! The one-open-reception rule lives in the database as the partial unique
//! index `receptions_one_open_per_pvz`; a losing concurrent insert surfaces
//! as [`ReceptionRepositoryError::OpenConflict`].

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{ReceptionRepository, ReceptionRepositoryError};
use crate::domain::{Reception, ReceptionStatus, TimeWindow};

use super::diesel_basic_error_mapping::{
    ONE_OPEN_RECEPTION_INDEX, is_foreign_key_violation, map_basic_diesel_error,
    map_basic_pool_error, unique_violation_constraint,
};
use super::models::ReceptionRow;
use super::pool::{DbPool, PoolError};
use super::schema::receptions;

/// Diesel-backed implementation of the reception repository port.
#[derive(Clone)]
pub struct DieselReceptionRepository {
    pool: DbPool,
}

impl DieselReceptionRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ReceptionRepositoryError {
    map_basic_pool_error(error, |message| ReceptionRepositoryError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> ReceptionRepositoryError {
    map_basic_diesel_error(
        error,
        ReceptionRepositoryError::query,
        ReceptionRepositoryError::connection,
    )
}

/// Classify insert failures, recognising the open-reception index and the
/// pickup point foreign key.
fn map_insert_error(error: diesel::result::Error, pvz_id: Uuid) -> ReceptionRepositoryError {
    if unique_violation_constraint(&error) == Some(ONE_OPEN_RECEPTION_INDEX) {
        return ReceptionRepositoryError::open_conflict(pvz_id);
    }
    if is_foreign_key_violation(&error) {
        return ReceptionRepositoryError::unknown_pickup_point(pvz_id);
    }
    map_diesel_error(error)
}

fn row_to_reception(row: ReceptionRow) -> Result<Reception, ReceptionRepositoryError> {
    Reception::try_from(row).map_err(ReceptionRepositoryError::query)
}

#[async_trait]
impl ReceptionRepository for DieselReceptionRepository {
    async fn create(&self, reception: &Reception) -> Result<(), ReceptionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(receptions::table)
            .values(ReceptionRow::from(reception))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_insert_error(err, reception.pvz_id))
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Reception, ReceptionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = receptions::table
            .find(id)
            .select(ReceptionRow::as_select())
            .first::<ReceptionRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .ok_or_else(|| ReceptionRepositoryError::not_found(id))?;

        row_to_reception(row)
    }

    async fn find_open(&self, pvz_id: Uuid) -> Result<Reception, ReceptionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = receptions::table
            .filter(receptions::pvz_id.eq(pvz_id))
            .filter(receptions::status.eq(ReceptionStatus::InProgress.as_str()))
            .select(ReceptionRow::as_select())
            .first::<ReceptionRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .ok_or_else(|| ReceptionRepositoryError::no_open(pvz_id))?;

        row_to_reception(row)
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: ReceptionStatus,
    ) -> Result<(), ReceptionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated = diesel::update(
            receptions::table
                .filter(receptions::id.eq(id))
                .filter(receptions::status.ne(status.as_str())),
        )
        .set(receptions::status.eq(status.as_str()))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        if updated == 0 {
            return Err(ReceptionRepositoryError::not_found(id));
        }
        Ok(())
    }

    async fn list_by_pickup_points(
        &self,
        pvz_ids: &[Uuid],
        window: TimeWindow,
    ) -> Result<HashMap<Uuid, Vec<Reception>>, ReceptionRepositoryError> {
        if pvz_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = receptions::table
            .filter(receptions::pvz_id.eq_any(pvz_ids.to_vec()))
            .select(ReceptionRow::as_select())
            .order((receptions::date_time.desc(), receptions::id.desc()))
            .into_boxed();
        if let Some(start) = window.start {
            query = query.filter(receptions::date_time.ge(start));
        }
        if let Some(end) = window.end {
            query = query.filter(receptions::date_time.le(end));
        }

        let rows = query
            .load::<ReceptionRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let mut grouped: HashMap<Uuid, Vec<Reception>> = HashMap::new();
        for row in rows {
            let reception = row_to_reception(row)?;
            grouped.entry(reception.pvz_id).or_default().push(reception);
        }
        Ok(grouped)
    }
}

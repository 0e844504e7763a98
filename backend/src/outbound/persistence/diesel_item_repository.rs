//! PostgreSQL-backed `ItemRepository` implementation using Diesel ORM.
//!
//! Inserts lock the owning reception row (`SELECT ... FOR UPDATE`) and check
//! its status inside the same transaction, so an item can never land in a
//! reception that was closed concurrently. Deletes are restricted to items
//! whose reception is still open. Items sharing a timestamp are ordered by
//! the `seq` column the database assigns on insert.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{ItemRepository, ItemRepositoryError};
use crate::domain::{Item, ReceptionStatus};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::ItemRow;
use super::pool::{DbPool, PoolError};
use super::schema::{products, receptions};

/// Diesel-backed implementation of the item repository port.
#[derive(Clone)]
pub struct DieselItemRepository {
    pool: DbPool,
}

impl DieselItemRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ItemRepositoryError {
    map_basic_pool_error(error, |message| ItemRepositoryError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> ItemRepositoryError {
    map_basic_diesel_error(
        error,
        ItemRepositoryError::query,
        ItemRepositoryError::connection,
    )
}

fn row_to_item(row: ItemRow) -> Result<Item, ItemRepositoryError> {
    Item::try_from(row).map_err(ItemRepositoryError::query)
}

/// Outcome of the guarded insert transaction.
enum InsertOutcome {
    Inserted,
    ReceptionNotOpen,
}

#[async_trait]
impl ItemRepository for DieselItemRepository {
    async fn create(&self, item: &Item) -> Result<(), ItemRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = ItemRow::from(item);
        let reception_id = item.reception_id;

        let outcome = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let status: Option<String> = receptions::table
                        .find(reception_id)
                        .select(receptions::status)
                        .for_update()
                        .first(conn)
                        .await
                        .optional()?;
                    if status.as_deref() != Some(ReceptionStatus::InProgress.as_str()) {
                        return Ok(InsertOutcome::ReceptionNotOpen);
                    }
                    diesel::insert_into(products::table)
                        .values(&row)
                        .execute(conn)
                        .await?;
                    Ok(InsertOutcome::Inserted)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        match outcome {
            InsertOutcome::Inserted => Ok(()),
            InsertOutcome::ReceptionNotOpen => {
                Err(ItemRepositoryError::reception_not_open(reception_id))
            }
        }
    }

    async fn find_last(&self, reception_id: Uuid) -> Result<Item, ItemRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = products::table
            .filter(products::reception_id.eq(reception_id))
            .select(ItemRow::as_select())
            .order((products::date_time.desc(), products::seq.desc()))
            .first::<ItemRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .ok_or_else(|| ItemRepositoryError::empty(reception_id))?;

        row_to_item(row)
    }

    async fn delete(&self, id: Uuid) -> Result<(), ItemRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let open_receptions = receptions::table
            .filter(receptions::status.eq(ReceptionStatus::InProgress.as_str()))
            .select(receptions::id);
        let deleted = diesel::delete(
            products::table
                .filter(products::id.eq(id))
                .filter(products::reception_id.eq_any(open_receptions)),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        if deleted == 0 {
            return Err(ItemRepositoryError::not_found(id));
        }
        Ok(())
    }

    async fn list_by_receptions(
        &self,
        reception_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<Item>>, ItemRepositoryError> {
        if reception_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows = products::table
            .filter(products::reception_id.eq_any(reception_ids.to_vec()))
            .select(ItemRow::as_select())
            .order((products::date_time.asc(), products::seq.asc()))
            .load::<ItemRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let mut grouped: HashMap<Uuid, Vec<Item>> = HashMap::new();
        for row in rows {
            let item = row_to_item(row)?;
            grouped.entry(item.reception_id).or_default().push(item);
        }
        Ok(grouped)
    }
}

//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain entities parse the
//! stored enum text and fail with a message naming the offending column.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{pickup_points, products, receptions, users};
use crate::domain::{
    Account, City, Email, Item, ItemType, PickupPoint, Reception, ReceptionStatus, Role,
};

/// Row struct for the pickup_points table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = pickup_points)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PickupPointRow {
    pub id: Uuid,
    pub registration_date: DateTime<Utc>,
    pub city: String,
}

impl From<&PickupPoint> for PickupPointRow {
    fn from(point: &PickupPoint) -> Self {
        Self {
            id: point.id,
            registration_date: point.registered_at,
            city: point.city.as_str().to_owned(),
        }
    }
}

impl TryFrom<PickupPointRow> for PickupPoint {
    type Error = String;

    fn try_from(row: PickupPointRow) -> Result<Self, Self::Error> {
        let city: City = row
            .city
            .parse()
            .map_err(|err| format!("pickup_points.city: {err}"))?;
        Ok(Self {
            id: row.id,
            registered_at: row.registration_date,
            city,
        })
    }
}

/// Row struct for the receptions table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = receptions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ReceptionRow {
    pub id: Uuid,
    pub date_time: DateTime<Utc>,
    pub pvz_id: Uuid,
    pub status: String,
}

impl From<&Reception> for ReceptionRow {
    fn from(reception: &Reception) -> Self {
        Self {
            id: reception.id,
            date_time: reception.started_at,
            pvz_id: reception.pvz_id,
            status: reception.status.as_str().to_owned(),
        }
    }
}

impl TryFrom<ReceptionRow> for Reception {
    type Error = String;

    fn try_from(row: ReceptionRow) -> Result<Self, Self::Error> {
        let status: ReceptionStatus = row
            .status
            .parse()
            .map_err(|err| format!("receptions.status: {err}"))?;
        Ok(Self {
            id: row.id,
            pvz_id: row.pvz_id,
            started_at: row.date_time,
            status,
        })
    }
}

/// Row struct for the products table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ItemRow {
    pub id: Uuid,
    pub date_time: DateTime<Utc>,
    pub item_type: String,
    pub reception_id: Uuid,
}

impl From<&Item> for ItemRow {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id,
            date_time: item.created_at,
            item_type: item.item_type.as_str().to_owned(),
            reception_id: item.reception_id,
        }
    }
}

impl TryFrom<ItemRow> for Item {
    type Error = String;

    fn try_from(row: ItemRow) -> Result<Self, Self::Error> {
        let item_type: ItemType = row
            .item_type
            .parse()
            .map_err(|err| format!("products.type: {err}"))?;
        Ok(Self {
            id: row.id,
            reception_id: row.reception_id,
            created_at: row.date_time,
            item_type,
        })
    }
}

/// Row struct for the users table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AccountRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub role: String,
}

impl From<&Account> for AccountRow {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            email: account.email.as_str().to_owned(),
            password_hash: account.password_hash.clone(),
            role: account.role.as_str().to_owned(),
        }
    }
}

impl TryFrom<AccountRow> for Account {
    type Error = String;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|err| format!("users.email: {err}"))?;
        let role: Role = row
            .role
            .parse()
            .map_err(|err| format!("users.role: {err}"))?;
        Ok(Self {
            id: row.id,
            email,
            password_hash: row.password_hash,
            role,
        })
    }
}

//! Wire representations shared by the pickup point, reception and account
//! handlers.
//!
//! Timestamps are RFC 3339 in UTC. Enumerations reuse the domain types, whose
//! serde names are the canonical wire values.

use chrono::{DateTime, Utc};
use pagination::Page;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::AccountView;
use crate::domain::{
    City, Item, ItemType, PickupPoint, PickupPointDetails, Reception, ReceptionStatus,
    ReceptionWithItems, Role,
};

/// Registered pickup point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PickupPointResponse {
    pub id: Uuid,
    pub registration_date: DateTime<Utc>,
    pub city: City,
}

impl From<PickupPoint> for PickupPointResponse {
    fn from(value: PickupPoint) -> Self {
        Self {
            id: value.id,
            registration_date: value.registered_at,
            city: value.city,
        }
    }
}

/// Goods-receiving session of a pickup point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReceptionResponse {
    pub id: Uuid,
    pub date_time: DateTime<Utc>,
    pub pvz_id: Uuid,
    #[schema(value_type = String, example = "in_progress")]
    pub status: ReceptionStatus,
}

impl From<Reception> for ReceptionResponse {
    fn from(value: Reception) -> Self {
        Self {
            id: value.id,
            date_time: value.started_at,
            pvz_id: value.pvz_id,
            status: value.status,
        }
    }
}

/// Item scanned into a reception.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponse {
    pub id: Uuid,
    pub date_time: DateTime<Utc>,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub reception_id: Uuid,
}

impl From<Item> for ItemResponse {
    fn from(value: Item) -> Self {
        Self {
            id: value.id,
            date_time: value.created_at,
            item_type: value.item_type,
            reception_id: value.reception_id,
        }
    }
}

/// Reception plus the items received into it, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ReceptionWithItemsResponse {
    pub reception: ReceptionResponse,
    pub products: Vec<ItemResponse>,
}

impl From<ReceptionWithItems> for ReceptionWithItemsResponse {
    fn from(value: ReceptionWithItems) -> Self {
        Self {
            reception: value.reception.into(),
            products: value.items.into_iter().map(ItemResponse::from).collect(),
        }
    }
}

/// One entry of the pickup point listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PickupPointListItem {
    pub pvz: PickupPointResponse,
    pub receptions: Vec<ReceptionWithItemsResponse>,
}

impl From<PickupPointDetails> for PickupPointListItem {
    fn from(value: PickupPointDetails) -> Self {
        Self {
            pvz: value.pickup_point.into(),
            receptions: value
                .receptions
                .into_iter()
                .map(ReceptionWithItemsResponse::from)
                .collect(),
        }
    }
}

/// Page of the pickup point listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PickupPointPageResponse {
    pub items: Vec<PickupPointListItem>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

impl From<Page<PickupPointDetails>> for PickupPointPageResponse {
    fn from(value: Page<PickupPointDetails>) -> Self {
        let page = value.map(PickupPointListItem::from);
        Self {
            items: page.items,
            total: page.total,
            page: page.page,
            limit: page.limit,
        }
    }
}

/// Registered account. The password hash never leaves the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AccountResponse {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

impl From<AccountView> for AccountResponse {
    fn from(value: AccountView) -> Self {
        Self {
            id: value.id,
            email: value.email.to_string(),
            role: value.role,
        }
    }
}

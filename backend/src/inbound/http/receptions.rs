//! Reception and item HTTP handlers.
//!
//! ```text
//! POST /api/v1/receptions {"pvzId":"..."}
//! POST /api/v1/products {"type":"электроника","pvzId":"..."}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{Authenticated, STAFF};
use crate::inbound::http::dto::{ItemResponse, ReceptionResponse};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_item_type, parse_uuid, require};

const PVZ_ID: FieldName = FieldName::new("pvzId");
const ITEM_TYPE: FieldName = FieldName::new("type");

/// Request body for `POST /api/v1/receptions`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OpenReceptionRequest {
    pub pvz_id: Option<String>,
}

/// Request body for `POST /api/v1/products`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    #[serde(rename = "type")]
    #[schema(example = "электроника")]
    pub item_type: Option<String>,
    pub pvz_id: Option<String>,
}

/// Open a reception for a pickup point.
#[utoipa::path(
    post,
    path = "/api/v1/receptions",
    request_body = OpenReceptionRequest,
    responses(
        (status = 201, description = "Reception opened", body = ReceptionResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Unknown pickup point", body = Error),
        (status = 409, description = "A reception is already open", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["receptions"],
    operation_id = "openReception"
)]
#[post("/receptions")]
pub async fn open_reception(
    state: web::Data<HttpState>,
    auth: Authenticated,
    payload: web::Json<OpenReceptionRequest>,
) -> ApiResult<HttpResponse> {
    auth.require_role(STAFF)?;
    let pvz_id = parse_uuid(&require(payload.into_inner().pvz_id, PVZ_ID)?, PVZ_ID)?;
    let ctx = state.request_context();
    let reception = state.receptions.open_reception(&ctx, pvz_id).await?;
    Ok(HttpResponse::Created().json(ReceptionResponse::from(reception)))
}

/// Add an item to the open reception of a pickup point.
///
/// The item type is validated before any store call.
#[utoipa::path(
    post,
    path = "/api/v1/products",
    request_body = AddItemRequest,
    responses(
        (status = 201, description = "Item added", body = ItemResponse),
        (status = 400, description = "Invalid request or no open reception", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["items"],
    operation_id = "addProduct"
)]
#[post("/products")]
pub async fn add_product(
    state: web::Data<HttpState>,
    auth: Authenticated,
    payload: web::Json<AddItemRequest>,
) -> ApiResult<HttpResponse> {
    auth.require_role(STAFF)?;
    let AddItemRequest { item_type, pvz_id } = payload.into_inner();
    let item_type = parse_item_type(&require(item_type, ITEM_TYPE)?, ITEM_TYPE)?;
    let pvz_id = parse_uuid(&require(pvz_id, PVZ_ID)?, PVZ_ID)?;
    let ctx = state.request_context();
    let item = state.receptions.add_item(&ctx, pvz_id, item_type).await?;
    debug!(item_id = %item.id, reception_id = %item.reception_id, "item added");
    Ok(HttpResponse::Created().json(ItemResponse::from(item)))
}

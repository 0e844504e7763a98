//! Pickup point HTTP handlers.
//!
//! ```text
//! POST /api/v1/pvz {"city":"Москва"}
//! GET  /api/v1/pvz?page=1&limit=10&startDate=...&endDate=...
//! GET  /api/v1/pvz/all
//! POST /api/v1/pvz/{pvzId}/close_last_reception
//! POST /api/v1/pvz/{pvzId}/delete_last_product
//! ```

use actix_web::{HttpResponse, get, post, web};
use pagination::PageParams;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::ports::ListPickupPointsRequest;
use crate::domain::{Error, TimeWindow};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{ANY_ROLE, Authenticated, MODERATORS, STAFF};
use crate::inbound::http::dto::{PickupPointPageResponse, PickupPointResponse, ReceptionResponse};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, inverted_window_error, parse_city, parse_optional_int, parse_optional_timestamp,
    parse_uuid, require,
};

const CITY: FieldName = FieldName::new("city");
const PVZ_ID: FieldName = FieldName::new("pvzId");
const PAGE: FieldName = FieldName::new("page");
const LIMIT: FieldName = FieldName::new("limit");
const START_DATE: FieldName = FieldName::new("startDate");
const END_DATE: FieldName = FieldName::new("endDate");

/// Request body for `POST /api/v1/pvz`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePickupPointRequest {
    #[schema(example = "Москва")]
    pub city: Option<String>,
}

/// Query string for `GET /api/v1/pvz`.
///
/// `page` defaults to 1 and is raised to at least 1. `limit` defaults to 10
/// and is clamped into `1..=30`. The optional dates bound reception start
/// times inclusively.
#[derive(Debug, Default, Deserialize, Serialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListPickupPointsQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl TryFrom<ListPickupPointsQuery> for ListPickupPointsRequest {
    type Error = Error;

    fn try_from(query: ListPickupPointsQuery) -> Result<Self, Self::Error> {
        let params = PageParams::clamped(
            parse_optional_int(query.page.as_deref(), PAGE)?,
            parse_optional_int(query.limit.as_deref(), LIMIT)?,
        );
        let start = parse_optional_timestamp(query.start_date.as_deref(), START_DATE)?;
        let end = parse_optional_timestamp(query.end_date.as_deref(), END_DATE)?;
        if let (Some(start), Some(end)) = (start, end)
            && start > end
        {
            return Err(inverted_window_error(START_DATE, END_DATE));
        }
        Ok(Self {
            page_size: params.limit(),
            page: params.page(),
            window: TimeWindow::new(start, end),
        })
    }
}

fn pvz_id_from_path(path: web::Path<String>) -> Result<Uuid, Error> {
    parse_uuid(&path.into_inner(), PVZ_ID)
}

/// Register a pickup point.
#[utoipa::path(
    post,
    path = "/api/v1/pvz",
    request_body = CreatePickupPointRequest,
    responses(
        (status = 201, description = "Pickup point created", body = PickupPointResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["pickup points"],
    operation_id = "createPickupPoint"
)]
#[post("/pvz")]
pub async fn create_pickup_point(
    state: web::Data<HttpState>,
    auth: Authenticated,
    payload: web::Json<CreatePickupPointRequest>,
) -> ApiResult<HttpResponse> {
    auth.require_role(MODERATORS)?;
    let city = parse_city(&require(payload.into_inner().city, CITY)?, CITY)?;
    let ctx = state.request_context();
    let point = state.pickup_points.create_pickup_point(&ctx, city).await?;
    Ok(HttpResponse::Created().json(PickupPointResponse::from(point)))
}

/// List pickup points with their receptions and items.
#[utoipa::path(
    get,
    path = "/api/v1/pvz",
    params(ListPickupPointsQuery),
    responses(
        (status = 200, description = "Page of pickup points", body = PickupPointPageResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 500, description = "Internal server error", body = Error),
        (status = 504, description = "Deadline exceeded", body = Error)
    ),
    tags = ["pickup points"],
    operation_id = "listPickupPoints"
)]
#[get("/pvz")]
pub async fn list_pickup_points(
    state: web::Data<HttpState>,
    auth: Authenticated,
    query: web::Query<ListPickupPointsQuery>,
) -> ApiResult<web::Json<PickupPointPageResponse>> {
    auth.require_role(ANY_ROLE)?;
    let request = ListPickupPointsRequest::try_from(query.into_inner())?;
    let ctx = state.request_context();
    let page = state
        .pickup_points_query
        .list_pickup_points(&ctx, request)
        .await?;
    Ok(web::Json(PickupPointPageResponse::from(page)))
}

/// List every pickup point without nested data.
#[utoipa::path(
    get,
    path = "/api/v1/pvz/all",
    responses(
        (status = 200, description = "All pickup points", body = [PickupPointResponse]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["pickup points"],
    operation_id = "listAllPickupPoints"
)]
#[get("/pvz/all")]
pub async fn list_all_pickup_points(
    state: web::Data<HttpState>,
    auth: Authenticated,
) -> ApiResult<web::Json<Vec<PickupPointResponse>>> {
    auth.require_role(ANY_ROLE)?;
    let ctx = state.request_context();
    let points = state.pickup_points_query.list_all_pickup_points(&ctx).await?;
    Ok(web::Json(
        points.into_iter().map(PickupPointResponse::from).collect(),
    ))
}

/// Close the open reception of a pickup point.
#[utoipa::path(
    post,
    path = "/api/v1/pvz/{pvzId}/close_last_reception",
    params(("pvzId" = Uuid, Path, description = "Pickup point identifier")),
    responses(
        (status = 200, description = "Reception closed", body = ReceptionResponse),
        (status = 400, description = "No open reception", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["receptions"],
    operation_id = "closeLastReception"
)]
#[post("/pvz/{pvzId}/close_last_reception")]
pub async fn close_last_reception(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
) -> ApiResult<web::Json<ReceptionResponse>> {
    auth.require_role(STAFF)?;
    let pvz_id = pvz_id_from_path(path)?;
    let ctx = state.request_context();
    let reception = state.receptions.close_reception(&ctx, pvz_id).await?;
    Ok(web::Json(ReceptionResponse::from(reception)))
}

/// Remove the most recently added item from the open reception.
#[utoipa::path(
    post,
    path = "/api/v1/pvz/{pvzId}/delete_last_product",
    params(("pvzId" = Uuid, Path, description = "Pickup point identifier")),
    responses(
        (status = 200, description = "Item removed"),
        (status = 400, description = "No open reception or no items", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Item already removed", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["items"],
    operation_id = "deleteLastProduct"
)]
#[post("/pvz/{pvzId}/delete_last_product")]
pub async fn delete_last_product(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    auth.require_role(STAFF)?;
    let pvz_id = pvz_id_from_path(path)?;
    let ctx = state.request_context();
    state.receptions.remove_last_item(&ctx, pvz_id).await?;
    Ok(HttpResponse::Ok().finish())
}

#[cfg(test)]
#[path = "pickup_points_tests.rs"]
mod tests;

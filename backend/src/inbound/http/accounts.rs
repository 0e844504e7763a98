//! Account and token HTTP handlers.
//!
//! ```text
//! POST /api/v1/dummyLogin {"role":"employee"}
//! POST /api/v1/register {"email":"a@b.c","password":"secret-pass","role":"moderator"}
//! POST /api/v1/login {"email":"a@b.c","password":"secret-pass"}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{Error, LoginCredentials, Registration};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::AccountResponse;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, account_validation_error, parse_role, require,
};

const ROLE: FieldName = FieldName::new("role");
const EMAIL: FieldName = FieldName::new("email");
const PASSWORD: FieldName = FieldName::new("password");

/// Request body for `POST /api/v1/dummyLogin`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DummyLoginRequest {
    #[schema(example = "employee")]
    pub role: Option<String>,
}

/// Request body for `POST /api/v1/register`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    #[schema(example = "moderator")]
    pub role: Option<String>,
}

/// Request body for `POST /api/v1/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl TryFrom<RegisterRequest> for Registration {
    type Error = Error;

    fn try_from(value: RegisterRequest) -> Result<Self, Self::Error> {
        let email = require(value.email, EMAIL)?;
        let password = require(value.password, PASSWORD)?;
        let role = require(value.role, ROLE)?;
        Self::try_from_parts(&email, &password, &role)
            .map_err(|err| account_validation_error(err, ROLE))
    }
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = Error;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        let email = require(value.email, EMAIL)?;
        let password = require(value.password, PASSWORD)?;
        Self::try_from_parts(&email, &password).map_err(|err| account_validation_error(err, ROLE))
    }
}

/// Issue a token for a throwaway subject with the requested role.
#[utoipa::path(
    post,
    path = "/api/v1/dummyLogin",
    request_body = DummyLoginRequest,
    responses(
        (status = 200, description = "Bearer token", body = String),
        (status = 400, description = "Invalid request", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "dummyLogin",
    security([])
)]
#[post("/dummyLogin")]
pub async fn dummy_login(
    state: web::Data<HttpState>,
    payload: web::Json<DummyLoginRequest>,
) -> ApiResult<web::Json<String>> {
    let role = parse_role(&require(payload.into_inner().role, ROLE)?, ROLE)?;
    let ctx = state.request_context();
    let token = state.accounts.dummy_login(&ctx, role).await?;
    Ok(web::Json(token))
}

/// Register an account.
#[utoipa::path(
    post,
    path = "/api/v1/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AccountResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Email already registered", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration = Registration::try_from(payload.into_inner())?;
    let ctx = state.request_context();
    let account = state.accounts.register(&ctx, registration).await?;
    info!(account_id = %account.id, role = %account.role, "account registered");
    Ok(HttpResponse::Created().json(AccountResponse::from(account)))
}

/// Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Bearer token", body = String),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<String>> {
    let credentials = LoginCredentials::try_from(payload.into_inner())?;
    let ctx = state.request_context();
    let token = state.accounts.login(&ctx, credentials).await?;
    Ok(web::Json(token))
}

#[cfg(test)]
#[path = "accounts_tests.rs"]
mod tests;

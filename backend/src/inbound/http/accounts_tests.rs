//! Tests for the account handlers.

use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, test as actix_test};
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::MockAccountCommand;
use crate::domain::{ErrorCode, Role};
use crate::inbound::http::test_utils::{MemoryStack, TestPorts};

async fn post_json(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
    uri: &str,
    body: Value,
) -> actix_web::dev::ServiceResponse {
    actix_test::call_service(
        app,
        actix_test::TestRequest::post()
            .uri(uri)
            .set_json(body)
            .to_request(),
    )
    .await
}

#[rstest]
#[case(json!({"role": "employee"}), Role::Employee)]
#[case(json!({"role": "moderator"}), Role::Moderator)]
#[actix_web::test]
async fn dummy_login_issues_a_verifiable_token(#[case] body: Value, #[case] role: Role) {
    let stack = MemoryStack::new();
    let app = actix_test::init_service(stack.app()).await;

    let response = post_json(&app, "/api/v1/dummyLogin", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let token: String = actix_test::read_body_json(response).await;
    let principal = stack.state.tokens.verify(&token).expect("token verifies");
    assert_eq!(principal.role, role);
}

#[rstest]
#[case(json!({}), "missing_field")]
#[case(json!({"role": "admin"}), "invalid_role")]
#[actix_web::test]
async fn dummy_login_rejects_unknown_roles(#[case] body: Value, #[case] code: &str) {
    let mut accounts = MockAccountCommand::new();
    accounts.expect_dummy_login().never();
    let state = TestPorts::default().with_accounts(accounts).into_state();
    let app = actix_test::init_service(
        App::new()
            .app_data(state)
            .service(web::scope("/api/v1").service(dummy_login)),
    )
    .await;

    let response = post_json(&app, "/api/v1/dummyLogin", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: Error = actix_test::read_body_json(response).await;
    assert_eq!(error.code(), ErrorCode::Validation);
    assert_eq!(
        error
            .details()
            .and_then(|details| details.get("code"))
            .and_then(Value::as_str),
        Some(code)
    );
}

#[rstest]
#[case(json!({"email": "staff@example.com", "password": "short", "role": "employee"}), "weak_password")]
#[case(json!({"email": "staff.example.com", "password": "long-enough", "role": "employee"}), "invalid_email")]
#[case(json!({"email": "staff@example.com", "password": "long-enough", "role": "root"}), "invalid_role")]
#[case(json!({"email": "staff@example.com", "role": "employee"}), "missing_field")]
#[actix_web::test]
async fn registration_validates_before_the_service(#[case] body: Value, #[case] code: &str) {
    let mut accounts = MockAccountCommand::new();
    accounts.expect_register().never();
    let state = TestPorts::default().with_accounts(accounts).into_state();
    let app = actix_test::init_service(
        App::new()
            .app_data(state)
            .service(web::scope("/api/v1").service(register)),
    )
    .await;

    let response = post_json(&app, "/api/v1/register", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: Error = actix_test::read_body_json(response).await;
    assert_eq!(
        error
            .details()
            .and_then(|details| details.get("code"))
            .and_then(Value::as_str),
        Some(code)
    );
}

#[rstest]
#[actix_web::test]
async fn register_then_login_grants_the_registered_role() {
    let stack = MemoryStack::new();
    let app = actix_test::init_service(stack.app()).await;
    let credentials = json!({"email": "Mod@Example.com", "password": "correct horse"});

    let response = post_json(
        &app,
        "/api/v1/register",
        json!({"email": "Mod@Example.com", "password": "correct horse", "role": "moderator"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let account: AccountResponse = actix_test::read_body_json(response).await;
    assert_eq!(account.email, "mod@example.com");
    assert_eq!(account.role, Role::Moderator);

    let response = post_json(&app, "/api/v1/login", credentials).await;
    assert_eq!(response.status(), StatusCode::OK);
    let token: String = actix_test::read_body_json(response).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/pvz")
            .insert_header((AUTHORIZATION, format!("Bearer {token}")))
            .set_json(json!({"city": "Москва"}))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[rstest]
#[actix_web::test]
async fn duplicate_email_conflicts() {
    let stack = MemoryStack::new();
    let app = actix_test::init_service(stack.app()).await;
    let body = json!({"email": "staff@example.com", "password": "long-enough", "role": "employee"});

    let first = post_json(&app, "/api/v1/register", body.clone()).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = post_json(&app, "/api/v1/register", body).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let error: Error = actix_test::read_body_json(second).await;
    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[rstest]
#[case(json!({"email": "ghost@example.com", "password": "whatever"}))]
#[case(json!({"email": "staff@example.com", "password": "wrong password"}))]
#[actix_web::test]
async fn bad_credentials_are_unauthorised(#[case] credentials: Value) {
    let stack = MemoryStack::new();
    let app = actix_test::init_service(stack.app()).await;
    let registered = post_json(
        &app,
        "/api/v1/register",
        json!({"email": "staff@example.com", "password": "long-enough", "role": "employee"}),
    )
    .await;
    assert_eq!(registered.status(), StatusCode::CREATED);

    let response = post_json(&app, "/api/v1/login", credentials).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let error: Error = actix_test::read_body_json(response).await;
    assert_eq!(error.message(), "invalid credentials");
}

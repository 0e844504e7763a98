//! Tests for HTTP error mapping.

use super::*;
use crate::domain::Error;
use actix_web::ResponseError;
use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[fixture]
fn storage_failure_case(expected_trace_id: String) -> Error {
    Error::storage_failure("open reception: relation \"receptions\" does not exist")
        .with_trace_id(expected_trace_id)
        .with_details(json!({"sql": "select"}))
}

#[fixture]
fn validation_case(expected_trace_id: String) -> Error {
    Error::validation("bad")
        .with_trace_id(expected_trace_id)
        .with_details(json!({"field": "city"}))
}

#[rstest]
#[case(Error::validation("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("no auth"), StatusCode::UNAUTHORIZED)]
#[case(Error::forbidden("denied"), StatusCode::FORBIDDEN)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::conflict("taken"), StatusCode::CONFLICT)]
#[case(Error::conflict_in_progress("open"), StatusCode::CONFLICT)]
#[case(Error::no_open_reception("none"), StatusCode::BAD_REQUEST)]
#[case(Error::already_closed("closed"), StatusCode::BAD_REQUEST)]
#[case(Error::empty_reception("empty"), StatusCode::BAD_REQUEST)]
#[case(Error::timeout("slow"), StatusCode::GATEWAY_TIMEOUT)]
#[case(Error::storage_failure("db"), StatusCode::INTERNAL_SERVER_ERROR)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] err: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&err), status);
}

async fn assert_error_response(
    error: Error,
    expected_status: StatusCode,
    expected_trace_id: Option<&str>,
) -> Error {
    let response = ResponseError::error_response(&error);
    assert_eq!(response.status(), expected_status);

    let header = response.headers().get(TRACE_ID_HEADER);
    match expected_trace_id {
        Some(expected) => {
            let trace_id = header
                .expect("trace-id header is set by error_response")
                .to_str()
                .expect("trace-id not valid UTF-8");
            assert_eq!(trace_id, expected);
        }
        None => assert!(header.is_none(), "trace-id header should not be present"),
    }

    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");

    serde_json::from_slice(&bytes).expect("Error JSON deserialisation succeeds")
}

#[rstest]
#[actix_web::test]
async fn error_responses_include_trace_id_and_payloads(
    #[from(storage_failure_case)] storage_failure: Error,
    #[from(validation_case)] validation: Error,
    expected_trace_id: String,
) {
    let redacted = assert_error_response(
        storage_failure,
        StatusCode::INTERNAL_SERVER_ERROR,
        Some(expected_trace_id.as_str()),
    )
    .await;
    assert_eq!(redacted.code(), ErrorCode::StorageFailure);
    assert_eq!(redacted.message(), "Internal server error");
    assert!(redacted.details().is_none());

    let payload = assert_error_response(
        validation,
        StatusCode::BAD_REQUEST,
        Some(expected_trace_id.as_str()),
    )
    .await;
    assert_eq!(payload.code(), ErrorCode::Validation);
    assert_eq!(payload.message(), "bad");
    assert_eq!(payload.details(), Some(&json!({"field": "city"})));
}

#[rstest]
#[actix_web::test]
async fn error_without_trace_id_omits_trace_header() {
    let error = Error::validation("bad").with_details(json!({"field": "city"}));

    let payload = assert_error_response(error, StatusCode::BAD_REQUEST, None).await;
    assert_eq!(payload.code(), ErrorCode::Validation);
    assert_eq!(payload.trace_id(), None);
}

#[rstest]
#[actix_web::test]
async fn scoped_trace_id_fills_missing_identifier() {
    let trace_id: TraceId = TRACE_ID.parse().expect("valid trace id");
    let response = TraceId::scope(trace_id, async {
        ResponseError::error_response(&Error::unauthorized("missing bearer token"))
    })
    .await;

    assert_eq!(
        response
            .headers()
            .get(TRACE_ID_HEADER)
            .and_then(|value| value.to_str().ok()),
        Some(TRACE_ID)
    );
}

#[rstest]
#[case(ErrorCode::InternalError)]
#[case(ErrorCode::StorageFailure)]
fn internal_codes_are_redacted(#[case] code: ErrorCode) {
    let error = Error::new(code, "boom")
        .with_trace_id(TRACE_ID)
        .with_details(json!({"secret": true}));

    let redacted = redact_if_internal(error);

    assert_eq!(redacted.code(), code);
    assert_eq!(redacted.message(), "Internal server error");
    assert_eq!(redacted.trace_id(), Some(TRACE_ID));
    assert!(redacted.details().is_none());
}

#[test]
fn client_errors_keep_their_message() {
    let error = Error::empty_reception("remove last item: reception has no items");
    assert_eq!(redact_if_internal(error.clone()), error);
}

#[test]
fn from_actix_error_is_redacted_internal_error() {
    use actix_web::error;

    let actix_err = error::ErrorBadRequest("boom");
    let err: Error = actix_err.into();

    assert_eq!(err.code(), ErrorCode::InternalError);
    assert_eq!(err.message(), "Internal server error");
    assert_eq!(err.trace_id(), None);
    assert_eq!(err.details(), None);
}

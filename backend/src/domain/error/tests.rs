//! Tests for the domain error payload and its serialisation contract.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn storage_error() -> Error {
    Error::storage_failure("connection refused")
        .with_trace_id(TRACE_ID)
        .with_details(json!({"table": "receptions"}))
}

#[rstest]
#[case(Error::validation("x"), ErrorCode::Validation)]
#[case(Error::conflict_in_progress("x"), ErrorCode::ConflictInProgress)]
#[case(Error::no_open_reception("x"), ErrorCode::NoOpenReception)]
#[case(Error::already_closed("x"), ErrorCode::AlreadyClosed)]
#[case(Error::empty_reception("x"), ErrorCode::EmptyReception)]
#[case(Error::timeout("x"), ErrorCode::Timeout)]
fn constructors_set_code(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
fn in_operation_prefixes_message() {
    let error = Error::not_found("pickup point missing").in_operation("open reception");
    assert_eq!(error.message(), "open reception: pickup point missing");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
fn serialises_camel_case_with_snake_case_code(storage_error: Error) {
    let value = serde_json::to_value(&storage_error).expect("serialise error");
    assert_eq!(
        value,
        json!({
            "code": "storage_failure",
            "message": "connection refused",
            "traceId": TRACE_ID,
            "details": {"table": "receptions"}
        })
    );
}

#[rstest]
fn omits_absent_optional_fields() {
    let value = serde_json::to_value(Error::forbidden("nope")).expect("serialise error");
    assert_eq!(value, json!({"code": "forbidden", "message": "nope"}));
}

#[rstest]
#[case(ErrorCode::StorageFailure, true)]
#[case(ErrorCode::InternalError, true)]
#[case(ErrorCode::EmptyReception, false)]
#[case(ErrorCode::Unauthorized, false)]
fn internal_codes_are_flagged(#[case] code: ErrorCode, #[case] expected: bool) {
    assert_eq!(code.is_internal(), expected);
}

//! Shared validation helpers for inbound HTTP adapters.
//!
//! Request bodies and query strings arrive as loosely typed strings so a bad
//! value surfaces as a structured `validation` error naming the field, not
//! as a framework deserialisation failure.

use chrono::{DateTime, Utc};
use serde_json::json;
use uuid::Uuid;

use crate::domain::{
    AccountValidationError, City, Error, ItemType, Role, UnknownCityError, UnknownItemTypeError,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidTimestamp,
    InvalidCity,
    InvalidItemType,
    InvalidRole,
    InvalidEmail,
    WeakPassword,
    InvalidWindow,
    InvalidInteger,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidTimestamp => "invalid_timestamp",
            ErrorCode::InvalidCity => "invalid_city",
            ErrorCode::InvalidItemType => "invalid_item_type",
            ErrorCode::InvalidRole => "invalid_role",
            ErrorCode::InvalidEmail => "invalid_email",
            ErrorCode::WeakPassword => "weak_password",
            ErrorCode::InvalidWindow => "invalid_window",
            ErrorCode::InvalidInteger => "invalid_integer",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::validation(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::validation(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("missing required field: {field}"))
        .with_code(ErrorCode::MissingField)
}

pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must be a valid UUID"))
        .with_value(ErrorCode::InvalidUuid, value)
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value.trim()).map_err(|_| invalid_uuid_error(field, value))
}

pub(crate) fn invalid_timestamp_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must be an RFC 3339 timestamp"))
        .with_value(ErrorCode::InvalidTimestamp, value)
}

pub(crate) fn parse_timestamp(value: &str, field: FieldName) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|_| invalid_timestamp_error(field, value))
}

pub(crate) fn parse_optional_timestamp(
    value: Option<&str>,
    field: FieldName,
) -> Result<Option<DateTime<Utc>>, Error> {
    non_blank(value)
        .map(|raw| parse_timestamp(raw, field))
        .transpose()
}

/// Blank query values count as absent.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|raw| !raw.trim().is_empty())
}

pub(crate) fn parse_optional_int(
    value: Option<&str>,
    field: FieldName,
) -> Result<Option<i64>, Error> {
    non_blank(value)
        .map(|raw| {
            raw.trim().parse::<i64>().map_err(|_| {
                let name = field.as_str();
                ValidationError::new(name, format!("{name} must be an integer"))
                    .with_value(ErrorCode::InvalidInteger, raw)
            })
        })
        .transpose()
}

pub(crate) fn inverted_window_error(start: FieldName, end: FieldName) -> Error {
    let (start, end) = (start.as_str(), end.as_str());
    ValidationError::new(start, format!("{start} must not be after {end}"))
        .with_code(ErrorCode::InvalidWindow)
}

pub(crate) fn parse_city(value: &str, field: FieldName) -> Result<City, Error> {
    value.parse().map_err(|UnknownCityError(raw)| {
        let field = field.as_str();
        ValidationError::new(field, format!("city '{raw}' is not supported"))
            .with_value(ErrorCode::InvalidCity, raw)
    })
}

pub(crate) fn parse_item_type(value: &str, field: FieldName) -> Result<ItemType, Error> {
    value.parse().map_err(|UnknownItemTypeError(raw)| {
        let field = field.as_str();
        ValidationError::new(field, format!("item type '{raw}' is not supported"))
            .with_value(ErrorCode::InvalidItemType, raw)
    })
}

pub(crate) fn parse_role(value: &str, field: FieldName) -> Result<Role, Error> {
    value
        .parse()
        .map_err(|err: AccountValidationError| account_validation_error(err, field))
}

/// Map account validation failures onto the field that caused them.
///
/// `role_field` names the field for role failures; email and password
/// failures always name `email` and `password`.
pub(crate) fn account_validation_error(
    err: AccountValidationError,
    role_field: FieldName,
) -> Error {
    let message = err.to_string();
    match err {
        AccountValidationError::EmptyEmail => missing_field_error(FieldName::new("email")),
        AccountValidationError::MalformedEmail(raw) => ValidationError::new("email", message)
            .with_value(ErrorCode::InvalidEmail, raw),
        AccountValidationError::EmptyPassword => missing_field_error(FieldName::new("password")),
        AccountValidationError::WeakPassword => {
            ValidationError::new("password", message).with_code(ErrorCode::WeakPassword)
        }
        AccountValidationError::UnknownRole(raw) => {
            ValidationError::new(role_field.as_str(), message)
                .with_value(ErrorCode::InvalidRole, raw)
        }
    }
}

//! Domain-level error types.
//!
//! These errors are transport agnostic. Inbound adapters map them to HTTP
//! responses or any other protocol-specific envelope. Callers branch on
//! [`Error::code`], never on message text.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// A caller-supplied value fails a domain rule.
    Validation,
    /// Authentication failed or is missing.
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    Forbidden,
    /// The referenced entity does not exist.
    NotFound,
    /// A uniqueness rule outside the reception lifecycle was violated.
    Conflict,
    /// A reception is already open for the pickup point.
    ConflictInProgress,
    /// The pickup point has no open reception.
    NoOpenReception,
    /// There is no open reception left to close.
    AlreadyClosed,
    /// The open reception holds no items.
    EmptyReception,
    /// The caller's deadline elapsed before the operation finished.
    Timeout,
    /// The entity store returned an unexpected error.
    StorageFailure,
    /// An unexpected error occurred inside the service.
    InternalError,
}

impl ErrorCode {
    /// Whether the code describes a server-side fault whose message must not
    /// reach clients.
    #[must_use]
    pub fn is_internal(self) -> bool {
        matches!(self, Self::StorageFailure | Self::InternalError)
    }
}

/// Error payload shared by the domain and its adapters.
///
/// # Examples
/// ```
/// use pvz_backend::domain::{Error, ErrorCode};
///
/// let err = Error::not_found("pickup point not found");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Error {
    #[schema(example = "no_open_reception")]
    code: ErrorCode,
    #[schema(example = "pickup point has no open reception")]
    message: String,
    /// Correlation identifier for tracing this error across systems.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(alias = "trace_id")]
    trace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl Error {
    /// Create a new error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            trace_id: None,
            details: None,
        }
    }

    /// Stable machine-readable error code.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Correlation identifier, when one was attached.
    #[must_use]
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Supplementary error details for adapters.
    #[must_use]
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach a trace identifier to the error.
    #[must_use]
    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    /// Attach structured details to the error.
    ///
    /// # Examples
    /// ```
    /// use pvz_backend::domain::Error;
    /// use serde_json::json;
    ///
    /// let err = Error::validation("bad").with_details(json!({ "field": "city" }));
    /// assert!(err.details().is_some());
    /// ```
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Prefix the message with the name of the failing operation.
    #[must_use]
    pub fn in_operation(mut self, op: &str) -> Self {
        self.message = format!("{op}: {}", self.message);
        self
    }

    /// Convenience constructor for [`ErrorCode::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Validation, message)
    }

    /// Convenience constructor for [`ErrorCode::Unauthorized`].
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Convenience constructor for [`ErrorCode::Forbidden`].
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::Conflict`].
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    /// Convenience constructor for [`ErrorCode::ConflictInProgress`].
    pub fn conflict_in_progress(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConflictInProgress, message)
    }

    /// Convenience constructor for [`ErrorCode::NoOpenReception`].
    pub fn no_open_reception(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NoOpenReception, message)
    }

    /// Convenience constructor for [`ErrorCode::AlreadyClosed`].
    pub fn already_closed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AlreadyClosed, message)
    }

    /// Convenience constructor for [`ErrorCode::EmptyReception`].
    pub fn empty_reception(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::EmptyReception, message)
    }

    /// Convenience constructor for [`ErrorCode::Timeout`].
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Timeout, message)
    }

    /// Convenience constructor for [`ErrorCode::StorageFailure`].
    pub fn storage_failure(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StorageFailure, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests;

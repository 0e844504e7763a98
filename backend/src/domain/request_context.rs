//! Request-scoped context passed explicitly into every service call.
//!
//! Carries the trace identifier used for log and error correlation, and the
//! deadline after which outstanding store calls are abandoned.

use std::future::Future;
use std::time::Duration;

use tokio::time::{Instant, timeout_at};
use tracing::warn;

use super::{Error, TraceId};

/// Deadline applied when a caller does not choose one.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Trace identifier plus deadline for a single core operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestContext {
    trace_id: TraceId,
    deadline: Instant,
}

impl RequestContext {
    /// Build a context whose deadline is `timeout` from now.
    #[must_use]
    pub fn new(trace_id: TraceId, timeout: Duration) -> Self {
        Self {
            trace_id,
            deadline: Instant::now() + timeout,
        }
    }

    /// Build a context with an explicit deadline.
    #[must_use]
    pub fn with_deadline(trace_id: TraceId, deadline: Instant) -> Self {
        Self { trace_id, deadline }
    }

    /// Fresh trace identifier and the default deadline. Used by background
    /// callers and tests.
    #[must_use]
    pub fn detached() -> Self {
        Self::new(TraceId::generate(), DEFAULT_REQUEST_TIMEOUT)
    }

    /// Correlation identifier for this request.
    #[must_use]
    pub fn trace_id(&self) -> TraceId {
        self.trace_id
    }

    /// Instant after which store calls are abandoned.
    #[must_use]
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Drive `fut` until it completes or the deadline passes.
    ///
    /// The inner result is returned untouched so callers can classify
    /// port-specific failures. Expiry drops `fut`, cancelling the store call.
    ///
    /// # Errors
    /// Returns [`Error`] with [`ErrorCode::Timeout`](super::ErrorCode::Timeout)
    /// when the deadline elapses first.
    pub async fn bounded<F, T>(&self, op: &str, fut: F) -> Result<T, Error>
    where
        F: Future<Output = T>,
    {
        timeout_at(self.deadline, fut).await.map_err(|_| {
            warn!(op, trace_id = %self.trace_id, "deadline exceeded");
            Error::timeout("deadline exceeded").in_operation(op)
        })
    }

    /// Stamp the trace identifier onto an outgoing error.
    #[must_use]
    pub fn annotate(&self, error: Error) -> Error {
        error.with_trace_id(self.trace_id.to_string())
    }
}

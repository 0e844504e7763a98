//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::ports::{
    AccountCommand, PickupPointCommand, PickupPointQuery, ReceptionCommand, TokenService,
};
use crate::domain::{DEFAULT_REQUEST_TIMEOUT, RequestContext, TraceId};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub accounts: Arc<dyn AccountCommand>,
    pub pickup_points: Arc<dyn PickupPointCommand>,
    pub pickup_points_query: Arc<dyn PickupPointQuery>,
    pub receptions: Arc<dyn ReceptionCommand>,
    pub tokens: Arc<dyn TokenService>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountCommand>,
    pub pickup_points: Arc<dyn PickupPointCommand>,
    pub pickup_points_query: Arc<dyn PickupPointQuery>,
    pub receptions: Arc<dyn ReceptionCommand>,
    pub tokens: Arc<dyn TokenService>,
    request_timeout: Duration,
}

impl HttpState {
    /// Construct state from the port bundle and the per-request deadline.
    pub fn new(ports: HttpStatePorts, request_timeout: Duration) -> Self {
        let HttpStatePorts {
            accounts,
            pickup_points,
            pickup_points_query,
            receptions,
            tokens,
        } = ports;
        Self {
            accounts,
            pickup_points,
            pickup_points_query,
            receptions,
            tokens,
            request_timeout,
        }
    }

    /// Deadline granted to each core operation.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Build the context for one core call from the scoped trace identifier.
    ///
    /// Requests that bypass the `Trace` middleware get a fresh identifier.
    #[must_use]
    pub fn request_context(&self) -> RequestContext {
        let trace_id = TraceId::current().unwrap_or_else(TraceId::generate);
        RequestContext::new(trace_id, self.request_timeout)
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports, DEFAULT_REQUEST_TIMEOUT)
    }
}

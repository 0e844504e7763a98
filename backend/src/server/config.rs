//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::time::Duration;

use pvz_backend::domain::DEFAULT_REQUEST_TIMEOUT;
use pvz_backend::outbound::persistence::DbPool;
use zeroize::Zeroizing;

#[cfg(feature = "metrics")]
use super::metrics::MetricsBundle;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) jwt_secret: Zeroizing<Vec<u8>>,
    pub(crate) jwt_ttl: chrono::Duration,
    pub(crate) request_timeout: Duration,
    pub(crate) db_pool: Option<DbPool>,
    #[cfg(feature = "metrics")]
    pub(crate) metrics: Option<MetricsBundle>,
}

impl ServerConfig {
    /// Construct a configuration backed by the in-memory store.
    #[must_use]
    pub fn new(
        bind_addr: SocketAddr,
        jwt_secret: Zeroizing<Vec<u8>>,
        jwt_ttl: chrono::Duration,
    ) -> Self {
        Self {
            bind_addr,
            jwt_secret,
            jwt_ttl,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            db_pool: None,
            #[cfg(feature = "metrics")]
            metrics: None,
        }
    }

    /// Attach a database connection pool; the Diesel repositories replace
    /// the in-memory store.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Override the per-request deadline.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware and its registry.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Option<MetricsBundle>) -> Self {
        self.metrics = metrics;
        self
    }
}

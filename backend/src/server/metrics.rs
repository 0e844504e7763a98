//! Optional Prometheus wiring: the HTTP middleware, the `/metrics` endpoint
//! and the lifecycle counters share one registry.

use actix_service::{
    Service, ServiceExt as _, Transform,
    boxed::{self, BoxService},
};
use actix_web::body::BoxBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::middleware::Compat;
use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use futures_util::future::LocalBoxFuture;
use prometheus::Registry;
use std::fmt::Display;
use std::sync::Arc;
use tracing::warn;

const NAMESPACE: &str = "pvz";
const ENDPOINT: &str = "/metrics";

/// Request middleware plus the registry backing it.
#[derive(Clone)]
pub struct MetricsBundle {
    pub(crate) middleware: PrometheusMetrics,
    pub(crate) registry: Registry,
}

/// Build the middleware over a fresh registry.
///
/// # Errors
/// Returns the builder's error when the default HTTP collectors cannot be
/// registered.
pub fn build_metrics() -> Result<MetricsBundle, Box<dyn std::error::Error + Send + Sync>> {
    let registry = Registry::new();
    let middleware = PrometheusMetricsBuilder::new(NAMESPACE)
        .registry(registry.clone())
        .endpoint(ENDPOINT)
        .build()?;
    Ok(MetricsBundle {
        middleware,
        registry,
    })
}

/// Metrics are optional: a build failure is logged and the server runs
/// without them.
pub fn initialize_metrics<F, E>(build: F) -> Option<MetricsBundle>
where
    F: FnOnce() -> Result<MetricsBundle, E>,
    E: Display,
{
    match build() {
        Ok(bundle) => Some(bundle),
        Err(error) => {
            warn!(%error, "metrics disabled: Prometheus initialisation failed");
            None
        }
    }
}

#[derive(Clone)]
pub(crate) enum MetricsLayer {
    Enabled(Arc<PrometheusMetrics>),
    Disabled,
}

impl MetricsLayer {
    #[must_use]
    pub(crate) fn from_option(metrics: Option<&MetricsBundle>) -> Self {
        match metrics {
            Some(bundle) => Self::Enabled(Arc::new(bundle.middleware.clone())),
            None => Self::Disabled,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for MetricsLayer
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = BoxService<ServiceRequest, ServiceResponse<BoxBody>, actix_web::Error>;
    type Future = LocalBoxFuture<'static, Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        match self.clone() {
            MetricsLayer::Enabled(metrics) => {
                let fut = Compat::new((*metrics).clone()).new_transform(service);
                Box::pin(async move {
                    let svc = fut.await?;
                    Ok(boxed::service(svc))
                })
            }
            MetricsLayer::Disabled => Box::pin(async move {
                let svc = service.map(|res: ServiceResponse<B>| res.map_into_boxed_body());
                Ok(boxed::service(svc))
            }),
        }
    }
}

//! Builders wiring repositories, services and adapters into [`HttpState`].

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use pvz_backend::domain::ports::{
    AccountRepository, ItemRepository, LifecycleMetrics, NoOpLifecycleMetrics,
    PickupPointRepository, ReceptionRepository, TokenService,
};
use pvz_backend::domain::{AccountService, PickupPointService, ReceptionLifecycleService};
use pvz_backend::inbound::http::state::{HttpState, HttpStatePorts};
use pvz_backend::outbound::memory::InMemoryStore;
use pvz_backend::outbound::persistence::{
    DieselAccountRepository, DieselItemRepository, DieselPickupPointRepository,
    DieselReceptionRepository,
};
use pvz_backend::outbound::security::{Argon2PasswordHasher, JwtTokenService};
use tracing::info;

use super::ServerConfig;

/// Repositories backing the services; one store may fill every slot.
struct Repositories<P, R, I, A> {
    pickup_points: Arc<P>,
    receptions: Arc<R>,
    items: Arc<I>,
    accounts: Arc<A>,
}

/// Cross-cutting collaborators shared by every service.
struct Collaborators {
    metrics: Arc<dyn LifecycleMetrics>,
    tokens: Arc<dyn TokenService>,
    clock: Arc<dyn Clock>,
}

fn wire_services<P, R, I, A>(
    repos: Repositories<P, R, I, A>,
    collaborators: Collaborators,
) -> HttpStatePorts
where
    P: PickupPointRepository + 'static,
    R: ReceptionRepository + 'static,
    I: ItemRepository + 'static,
    A: AccountRepository + 'static,
{
    let Repositories {
        pickup_points,
        receptions,
        items,
        accounts,
    } = repos;
    let Collaborators {
        metrics,
        tokens,
        clock,
    } = collaborators;

    let lifecycle = ReceptionLifecycleService::new(
        pickup_points.clone(),
        receptions.clone(),
        items.clone(),
        metrics.clone(),
        clock.clone(),
    );
    let registry = Arc::new(PickupPointService::new(
        pickup_points,
        receptions,
        items,
        metrics,
        clock,
    ));
    let accounts = AccountService::new(
        accounts,
        Arc::new(Argon2PasswordHasher::new()),
        tokens.clone(),
    );

    HttpStatePorts {
        accounts: Arc::new(accounts),
        pickup_points: registry.clone(),
        pickup_points_query: registry,
        receptions: Arc::new(lifecycle),
        tokens,
    }
}

#[cfg(feature = "metrics")]
fn lifecycle_metrics(config: &ServerConfig) -> std::io::Result<Arc<dyn LifecycleMetrics>> {
    use pvz_backend::outbound::metrics::PrometheusLifecycleMetrics;

    match &config.metrics {
        Some(bundle) => {
            let metrics = PrometheusLifecycleMetrics::new(&bundle.registry).map_err(|e| {
                std::io::Error::other(format!("lifecycle metrics registration failed: {e}"))
            })?;
            Ok(Arc::new(metrics))
        }
        None => Ok(Arc::new(NoOpLifecycleMetrics)),
    }
}

#[cfg(not(feature = "metrics"))]
fn lifecycle_metrics(_config: &ServerConfig) -> std::io::Result<Arc<dyn LifecycleMetrics>> {
    Ok(Arc::new(NoOpLifecycleMetrics))
}

/// Build the shared HTTP state.
///
/// Diesel repositories are used when a pool is configured, otherwise a single
/// [`InMemoryStore`] serves every port.
///
/// # Errors
/// Returns [`std::io::Error`] if Prometheus metric registration fails.
pub(crate) fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let collaborators = Collaborators {
        metrics: lifecycle_metrics(config)?,
        tokens: Arc::new(JwtTokenService::new(
            &config.jwt_secret,
            config.jwt_ttl,
            clock.clone(),
        )),
        clock,
    };

    let ports = match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL entity store");
            wire_services(
                Repositories {
                    pickup_points: Arc::new(DieselPickupPointRepository::new(pool.clone())),
                    receptions: Arc::new(DieselReceptionRepository::new(pool.clone())),
                    items: Arc::new(DieselItemRepository::new(pool.clone())),
                    accounts: Arc::new(DieselAccountRepository::new(pool.clone())),
                },
                collaborators,
            )
        }
        None => {
            info!("no database configured; using in-memory entity store");
            let store = Arc::new(InMemoryStore::new());
            wire_services(
                Repositories {
                    pickup_points: store.clone(),
                    receptions: store.clone(),
                    items: store.clone(),
                    accounts: store,
                },
                collaborators,
            )
        }
    };

    Ok(web::Data::new(HttpState::new(ports, config.request_timeout)))
}

//! Backend entry-point: loads settings, prepares the entity store and serves
//! the REST API, health probes and OpenAPI docs.

mod server;

use std::io;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use pvz_backend::inbound::http::health::HealthState;
use pvz_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use pvz_backend::settings::AppSettings;
#[cfg(feature = "metrics")]
use server::{build_metrics, initialize_metrics};
use server::{ServerConfig, create_server};

async fn connect_store(database_url: &str, max_connections: u32) -> io::Result<DbPool> {
    run_pending_migrations(database_url)
        .await
        .map_err(|e| io::Error::other(format!("database migration failed: {e}")))?;
    DbPool::new(PoolConfig::new(database_url).with_max_size(max_connections))
        .await
        .map_err(|e| io::Error::other(format!("database pool failed: {e}")))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|e| io::Error::other(format!("failed to load settings: {e}")))?;
    let jwt_secret = settings.jwt_secret().map_err(io::Error::other)?;
    let jwt_ttl = settings.jwt_ttl().map_err(io::Error::other)?;

    let mut config = ServerConfig::new(settings.bind_addr(), jwt_secret, jwt_ttl)
        .with_request_timeout(settings.request_timeout());
    if let Some(url) = settings.database_url() {
        let pool = connect_store(url, settings.db_max_connections()).await?;
        config = config.with_db_pool(pool);
    }
    #[cfg(feature = "metrics")]
    let config = config.with_metrics(initialize_metrics(build_metrics));

    info!(bind_addr = %settings.bind_addr(), "starting PVZ backend");
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await
}

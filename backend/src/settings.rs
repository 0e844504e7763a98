//! Service configuration loaded via OrthoConfig.
//!
//! Every value may come from `PVZ_*` environment variables, a config file or
//! command-line flags. Unset values fall back to the defaults below.

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use tracing::warn;
use uuid::Uuid;
use zeroize::Zeroizing;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_JWT_TTL_MINUTES: i64 = 24 * 60;
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5_000;

/// Configuration errors surfaced at startup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// No signing secret was configured and ephemeral secrets are disallowed.
    #[error("PVZ_JWT_SECRET must be set outside development builds")]
    MissingJwtSecret,
    /// A numeric setting is outside its accepted range.
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: i64 },
}

/// Runtime settings for the PVZ service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PVZ")]
pub struct AppSettings {
    /// Socket address the HTTP listener binds to.
    pub bind_addr: Option<SocketAddr>,
    /// PostgreSQL URL. The in-memory store is used when absent.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// HMAC secret used to sign bearer tokens.
    pub jwt_secret: Option<String>,
    /// Token lifetime in minutes.
    pub jwt_ttl_minutes: Option<i64>,
    /// Deadline applied to each request's store work, in milliseconds.
    pub request_timeout_ms: Option<u64>,
}

impl AppSettings {
    /// Listener address, defaulting to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
            .unwrap_or_else(|| SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)))
    }

    /// Configured database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .filter(|max| *max > 0)
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    /// Token lifetime.
    ///
    /// # Errors
    /// Returns [`SettingsError::NonPositive`] for zero or negative values.
    pub fn jwt_ttl(&self) -> Result<chrono::Duration, SettingsError> {
        let minutes = self.jwt_ttl_minutes.unwrap_or(DEFAULT_JWT_TTL_MINUTES);
        if minutes <= 0 {
            return Err(SettingsError::NonPositive {
                field: "jwt_ttl_minutes",
                value: minutes,
            });
        }
        Ok(chrono::Duration::minutes(minutes))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(
            self.request_timeout_ms
                .filter(|ms| *ms > 0)
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS),
        )
    }

    /// Token signing secret.
    ///
    /// Debug builds fall back to an ephemeral secret so local runs need no
    /// setup; tokens then stop verifying after a restart.
    ///
    /// # Errors
    /// Returns [`SettingsError::MissingJwtSecret`] in release builds when no
    /// secret is configured.
    pub fn jwt_secret(&self) -> Result<Zeroizing<Vec<u8>>, SettingsError> {
        resolve_jwt_secret(self.jwt_secret.as_deref(), cfg!(debug_assertions))
    }
}

fn resolve_jwt_secret(
    configured: Option<&str>,
    allow_ephemeral: bool,
) -> Result<Zeroizing<Vec<u8>>, SettingsError> {
    match configured.filter(|secret| !secret.is_empty()) {
        Some(secret) => Ok(Zeroizing::new(secret.as_bytes().to_vec())),
        None if allow_ephemeral => {
            warn!("using ephemeral JWT secret (dev only)");
            let mut secret = Uuid::new_v4().as_bytes().to_vec();
            secret.extend_from_slice(Uuid::new_v4().as_bytes());
            Ok(Zeroizing::new(secret))
        }
        None => Err(SettingsError::MissingJwtSecret),
    }
}

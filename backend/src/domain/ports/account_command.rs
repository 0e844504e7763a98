//! Driving port for account registration and token issuing.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Email, Error, LoginCredentials, Registration, RequestContext, Role};

/// Public view of a stored account. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountView {
    pub id: Uuid,
    pub email: Email,
    pub role: Role,
}

/// Authentication use-cases exposed to inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Issue a token for a throwaway subject holding `role`.
    async fn dummy_login(&self, ctx: &RequestContext, role: Role) -> Result<String, Error>;

    /// Create an account. Fails with `Conflict` when the email is taken.
    async fn register(
        &self,
        ctx: &RequestContext,
        registration: Registration,
    ) -> Result<AccountView, Error>;

    /// Exchange credentials for a token. Fails with `Unauthorized` on an
    /// unknown email or wrong password.
    async fn login(&self, ctx: &RequestContext, credentials: LoginCredentials)
    -> Result<String, Error>;
}

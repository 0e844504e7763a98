//! Access-control port: bearer token issuing and verification.
//!
//! The core never sees raw credentials. Inbound adapters verify a bearer
//! token through this port and hand the resulting [`Principal`] to the role
//! check before calling a service.

use uuid::Uuid;

use super::define_port_error;
use crate::domain::Role;

define_port_error! {
    /// Errors raised by token adapters.
    pub enum TokenServiceError {
        /// The token is malformed, expired, or carries a bad signature.
        Invalid { message: String } => "invalid token: {message}",
        /// Signing a new token failed.
        Signing { message: String } => "token signing failed: {message}",
    }
}

/// Authenticated subject and role extracted from a verified token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub subject: Uuid,
    pub role: Role,
}

impl Principal {
    /// Whether this principal holds one of `allowed`.
    #[must_use]
    pub fn has_any_role(&self, allowed: &[Role]) -> bool {
        allowed.contains(&self.role)
    }
}

/// Port for issuing and verifying bearer tokens.
#[cfg_attr(test, mockall::automock)]
pub trait TokenService: Send + Sync {
    /// Issue a signed token for `principal`.
    fn issue(&self, principal: Principal) -> Result<String, TokenServiceError>;

    /// Verify `token` and return the principal it was issued for.
    fn verify(&self, token: &str) -> Result<Principal, TokenServiceError>;
}

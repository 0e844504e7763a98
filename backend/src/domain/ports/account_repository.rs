//! Driven port for account persistence used by the authentication flow.

use async_trait::async_trait;
use uuid::Uuid;

use super::define_port_error;
use crate::domain::{Account, Email};

define_port_error! {
    /// Errors raised by account persistence adapters.
    pub enum AccountRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "account repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "account repository query failed: {message}",
        /// An account with the same email already exists.
        Duplicate { email: String } => "account {email} already exists",
    }
}

/// Port for storing and reading accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Insert a new account, failing with `Duplicate` on an email clash.
    async fn create(&self, account: &Account) -> Result<(), AccountRepositoryError>;

    /// Look up an account by its normalised email.
    async fn find_by_email(&self, email: &Email)
    -> Result<Option<Account>, AccountRepositoryError>;

    /// Look up an account by id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, AccountRepositoryError>;
}

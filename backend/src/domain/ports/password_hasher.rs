//! Port for one-way password hashing.

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashing adapters.
    pub enum PasswordHasherError {
        /// Hashing failed or the stored hash could not be parsed.
        Hash { message: String } => "password hashing failed: {message}",
    }
}

/// Hash and verify account passwords.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Produce a self-describing hash for `password`.
    fn hash(&self, password: &str) -> Result<String, PasswordHasherError>;

    /// Check `password` against a stored hash. A mismatch is `Ok(false)`.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHasherError>;
}

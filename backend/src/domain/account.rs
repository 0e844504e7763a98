//! Accounts, roles, and the credential primitives used to authenticate them.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use zeroize::Zeroizing;

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Role granted to an authenticated subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Pickup point staff: runs receptions and scans items.
    Employee,
    /// Back-office operator: registers pickup points.
    Moderator,
}

impl Role {
    /// Stored and wire representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::Moderator => "moderator",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AccountValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "employee" => Ok(Self::Employee),
            "moderator" => Ok(Self::Moderator),
            other => Err(AccountValidationError::UnknownRole(other.to_owned())),
        }
    }
}

/// Validation failures for account and credential inputs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountValidationError {
    #[error("email must not be empty")]
    EmptyEmail,
    #[error("email '{0}' is not a valid address")]
    MalformedEmail(String),
    #[error("password must not be empty")]
    EmptyPassword,
    #[error("password must be at least {MIN_PASSWORD_LEN} characters")]
    WeakPassword,
    #[error("role '{0}' is not supported")]
    UnknownRole(String),
}

/// Normalised email address used as the unique account key.
///
/// ## Invariants
/// - Trimmed and lower-cased.
/// - Contains exactly one `@` with non-empty local and domain parts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    /// Validate and normalise a raw email address.
    ///
    /// # Errors
    /// Returns [`AccountValidationError`] when the address is blank or
    /// malformed.
    pub fn parse(raw: &str) -> Result<Self, AccountValidationError> {
        let normalised = raw.trim().to_lowercase();
        if normalised.is_empty() {
            return Err(AccountValidationError::EmptyEmail);
        }
        match normalised.split_once('@') {
            Some((local, domain))
                if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
            {
                Ok(Self(normalised))
            }
            _ => Err(AccountValidationError::MalformedEmail(raw.to_owned())),
        }
    }

    /// Borrow the normalised address.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stored account. The hash never leaves the persistence and hashing
/// adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: Uuid,
    pub email: Email,
    pub password_hash: String,
    pub role: Role,
}

/// Validated login credentials.
///
/// The password keeps caller-provided whitespace and is zeroed on drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: Email,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    ///
    /// # Errors
    /// Returns [`AccountValidationError`] when either field is blank or the
    /// email is malformed.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, AccountValidationError> {
        let email = Email::parse(email)?;
        if password.is_empty() {
            return Err(AccountValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email used for the account lookup.
    #[must_use]
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Password supplied by the caller.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    credentials: LoginCredentials,
    role: Role,
}

impl Registration {
    /// Construct a registration, enforcing the password policy.
    ///
    /// # Errors
    /// Returns [`AccountValidationError`] for malformed email, weak password,
    /// or unknown role.
    pub fn try_from_parts(
        email: &str,
        password: &str,
        role: &str,
    ) -> Result<Self, AccountValidationError> {
        let credentials = LoginCredentials::try_from_parts(email, password)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AccountValidationError::WeakPassword);
        }
        let role = role.parse()?;
        Ok(Self { credentials, role })
    }

    /// Credentials to hash and store.
    #[must_use]
    pub fn credentials(&self) -> &LoginCredentials {
        &self.credentials
    }

    /// Requested role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }
}

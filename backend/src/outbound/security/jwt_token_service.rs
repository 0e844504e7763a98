//! HS256 JSON Web Token adapter for the [`TokenService`] port.
//!
//! Claims are `{ user_id, role, exp, iat }`. Expiry is validated with no
//! leeway.

use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Role;
use crate::domain::ports::{Principal, TokenService, TokenServiceError};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    user_id: Uuid,
    role: Role,
    exp: i64,
    iat: i64,
}

/// Signs and verifies bearer tokens with a shared HMAC secret.
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl JwtTokenService {
    /// Build the service from the shared `secret` and the token lifetime.
    pub fn new(secret: &[u8], ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat"]);
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
            clock,
        }
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, principal: Principal) -> Result<String, TokenServiceError> {
        let issued_at = self.clock.utc();
        let claims = Claims {
            user_id: principal.subject,
            role: principal.role,
            exp: (issued_at + self.ttl).timestamp(),
            iat: issued_at.timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|err| TokenServiceError::signing(err.to_string()))
    }

    fn verify(&self, token: &str) -> Result<Principal, TokenServiceError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|err| TokenServiceError::invalid(err.to_string()))?;
        Ok(Principal {
            subject: data.claims.user_id,
            role: data.claims.role,
        })
    }
}

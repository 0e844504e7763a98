//! Bearer-token authentication for HTTP handlers.
//!
//! Keep the HTTP modules focused on request/response mapping by concentrating
//! token extraction, verification and role gating here. Handlers take an
//! [`Authenticated`] argument and call [`Authenticated::require_role`] before
//! touching a port.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::{Ready, ready};
use tracing::warn;

use crate::domain::ports::Principal;
use crate::domain::{Error, Role};
use crate::inbound::http::state::HttpState;

const BEARER_PREFIX: &str = "Bearer ";

/// Roles allowed to run reception lifecycle operations.
pub(crate) const STAFF: &[Role] = &[Role::Employee];
/// Roles allowed to register pickup points.
pub(crate) const MODERATORS: &[Role] = &[Role::Moderator];
/// Roles allowed to read pickup point listings.
pub(crate) const ANY_ROLE: &[Role] = &[Role::Employee, Role::Moderator];

/// Principal extracted from a verified `Authorization: Bearer` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Authenticated(Principal);

impl Authenticated {
    /// Verified principal.
    #[must_use]
    pub fn principal(&self) -> Principal {
        self.0
    }

    /// Return the principal when it holds one of `allowed`, otherwise
    /// `403 Forbidden`.
    pub fn require_role(&self, allowed: &[Role]) -> Result<Principal, Error> {
        require_role(self.0, allowed)
    }
}

/// Role membership check applied after authentication.
pub fn require_role(principal: Principal, allowed: &[Role]) -> Result<Principal, Error> {
    if principal.has_any_role(allowed) {
        Ok(principal)
    } else {
        Err(Error::forbidden(format!(
            "role {} may not perform this action",
            principal.role
        )))
    }
}

fn bearer_token(req: &HttpRequest) -> Result<&str, Error> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("missing bearer token"))?;
    let value = header
        .to_str()
        .map_err(|_| Error::unauthorized("authorization header is not valid ASCII"))?;
    value
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| Error::unauthorized("authorization header must carry a bearer token"))
}

fn authenticate(req: &HttpRequest) -> Result<Authenticated, Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("HTTP state is not configured"))?;
    let token = bearer_token(req)?;
    state.tokens.verify(token).map(Authenticated).map_err(|err| {
        warn!(error = %err, "bearer token rejected");
        Error::unauthorized("invalid or expired token")
    })
}

impl FromRequest for Authenticated {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{MockTokenService, TokenServiceError};
    use crate::inbound::http::test_utils::TestPorts;
    use actix_web::test::TestRequest;
    use rstest::rstest;
    use uuid::Uuid;

    fn employee() -> Principal {
        Principal {
            subject: Uuid::nil(),
            role: Role::Employee,
        }
    }

    fn accepting_tokens() -> MockTokenService {
        let mut tokens = MockTokenService::new();
        tokens
            .expect_verify()
            .withf(|token| token == "good-token")
            .returning(|_| Ok(employee()));
        tokens
            .expect_verify()
            .returning(|_| Err(TokenServiceError::invalid("bad signature")));
        tokens
    }

    fn extract(request: TestRequest) -> Result<Authenticated, Error> {
        let req = request
            .app_data(
                TestPorts::default()
                    .with_tokens(accepting_tokens())
                    .into_state(),
            )
            .to_http_request();
        authenticate(&req)
    }

    #[rstest]
    fn valid_bearer_yields_principal() {
        let auth = extract(
            TestRequest::default().insert_header((AUTHORIZATION, "Bearer good-token")),
        )
        .expect("authenticated");
        assert_eq!(auth.principal(), employee());
    }

    #[rstest]
    #[case(None)]
    #[case(Some("good-token"))]
    #[case(Some("Basic dXNlcjpwYXNz"))]
    #[case(Some("Bearer "))]
    #[case(Some("Bearer forged"))]
    fn missing_or_bad_credentials_are_unauthorised(#[case] header: Option<&str>) {
        let request = match header {
            Some(value) => TestRequest::default().insert_header((AUTHORIZATION, value)),
            None => TestRequest::default(),
        };
        let err = extract(request).expect_err("rejected");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    fn missing_state_is_internal() {
        let req = TestRequest::default()
            .insert_header((AUTHORIZATION, "Bearer good-token"))
            .to_http_request();
        let err = authenticate(&req).expect_err("no state");
        assert_eq!(err.code(), ErrorCode::InternalError);
    }

    #[rstest]
    #[case(STAFF, true)]
    #[case(ANY_ROLE, true)]
    #[case(MODERATORS, false)]
    fn role_gate(#[case] allowed: &[Role], #[case] permitted: bool) {
        let result = Authenticated(employee()).require_role(allowed);
        match result {
            Ok(principal) => {
                assert!(permitted);
                assert_eq!(principal, employee());
            }
            Err(err) => {
                assert!(!permitted);
                assert_eq!(err.code(), ErrorCode::Forbidden);
            }
        }
    }
}

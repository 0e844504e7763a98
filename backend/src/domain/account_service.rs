//! Account registration, login and token issuing.
//!
//! Password hashing is CPU bound, so both hashing and verification run on
//! the blocking pool rather than an async worker.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::domain::ports::{
    AccountCommand, AccountRepository, AccountRepositoryError, AccountView, PasswordHasher,
    PasswordHasherError, Principal, TokenService, TokenServiceError,
};
use crate::domain::{Account, Error, LoginCredentials, Registration, RequestContext, Role};

const DUMMY_LOGIN: &str = "dummy login";
const REGISTER: &str = "register";
const LOGIN: &str = "login";

const INVALID_CREDENTIALS: &str = "invalid credentials";

fn map_account_error(op: &str, err: AccountRepositoryError) -> Error {
    match err {
        AccountRepositoryError::Duplicate { .. } => Error::conflict(err.to_string()),
        AccountRepositoryError::Connection { .. } | AccountRepositoryError::Query { .. } => {
            error!(op, error = %err, "account store failure");
            Error::storage_failure(err.to_string())
        }
    }
    .in_operation(op)
}

fn map_hasher_error(op: &str, err: PasswordHasherError) -> Error {
    error!(op, error = %err, "password hashing failed");
    Error::internal(err.to_string()).in_operation(op)
}

fn map_token_error(op: &str, err: TokenServiceError) -> Error {
    error!(op, error = %err, "token issuing failed");
    Error::internal(err.to_string()).in_operation(op)
}

/// Authentication service implementing [`AccountCommand`].
#[derive(Clone)]
pub struct AccountService<A> {
    accounts: Arc<A>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenService>,
}

impl<A> AccountService<A>
where
    A: AccountRepository,
{
    /// Create the service over the account store, hasher and token issuer.
    pub fn new(
        accounts: Arc<A>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            accounts,
            hasher,
            tokens,
        }
    }

    fn issue(&self, op: &str, principal: Principal) -> Result<String, Error> {
        self.tokens
            .issue(principal)
            .map_err(|err| map_token_error(op, err))
    }

    async fn hash_password(&self, ctx: &RequestContext, password: &str) -> Result<String, Error> {
        let hasher = Arc::clone(&self.hasher);
        let password = Zeroizing::new(password.to_owned());
        ctx.bounded(
            REGISTER,
            tokio::task::spawn_blocking(move || hasher.hash(&password)),
        )
        .await?
        .map_err(|err| Error::internal(err.to_string()).in_operation(REGISTER))?
        .map_err(|err| map_hasher_error(REGISTER, err))
    }

    async fn verify_password(
        &self,
        ctx: &RequestContext,
        password: &str,
        hash: String,
    ) -> Result<bool, Error> {
        let hasher = Arc::clone(&self.hasher);
        let password = Zeroizing::new(password.to_owned());
        ctx.bounded(
            LOGIN,
            tokio::task::spawn_blocking(move || hasher.verify(&password, &hash)),
        )
        .await?
        .map_err(|err| Error::internal(err.to_string()).in_operation(LOGIN))?
        .map_err(|err| map_hasher_error(LOGIN, err))
    }

    async fn register_account(
        &self,
        ctx: &RequestContext,
        registration: Registration,
    ) -> Result<AccountView, Error> {
        let credentials = registration.credentials();
        let password_hash = self.hash_password(ctx, credentials.password()).await?;
        let account = Account {
            id: Uuid::new_v4(),
            email: credentials.email().clone(),
            password_hash,
            role: registration.role(),
        };

        ctx.bounded(REGISTER, self.accounts.create(&account))
            .await?
            .map_err(|err| map_account_error(REGISTER, err))?;

        info!(
            trace_id = %ctx.trace_id(),
            account_id = %account.id,
            role = %account.role,
            "account registered"
        );
        Ok(AccountView {
            id: account.id,
            email: account.email,
            role: account.role,
        })
    }

    async fn login_account(
        &self,
        ctx: &RequestContext,
        credentials: LoginCredentials,
    ) -> Result<String, Error> {
        let found = ctx
            .bounded(LOGIN, self.accounts.find_by_email(credentials.email()))
            .await?
            .map_err(|err| map_account_error(LOGIN, err))?;

        let Some(account) = found else {
            warn!(trace_id = %ctx.trace_id(), "login for unknown email");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        if !self
            .verify_password(ctx, credentials.password(), account.password_hash)
            .await?
        {
            warn!(
                trace_id = %ctx.trace_id(),
                account_id = %account.id,
                "login with wrong password"
            );
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        self.issue(
            LOGIN,
            Principal {
                subject: account.id,
                role: account.role,
            },
        )
    }
}

#[async_trait]
impl<A> AccountCommand for AccountService<A>
where
    A: AccountRepository,
{
    async fn dummy_login(&self, ctx: &RequestContext, role: Role) -> Result<String, Error> {
        self.issue(
            DUMMY_LOGIN,
            Principal {
                subject: Uuid::new_v4(),
                role,
            },
        )
        .map_err(|err| ctx.annotate(err))
    }

    async fn register(
        &self,
        ctx: &RequestContext,
        registration: Registration,
    ) -> Result<AccountView, Error> {
        self.register_account(ctx, registration)
            .await
            .map_err(|err| ctx.annotate(err))
    }

    async fn login(
        &self,
        ctx: &RequestContext,
        credentials: LoginCredentials,
    ) -> Result<String, Error> {
        self.login_account(ctx, credentials)
            .await
            .map_err(|err| ctx.annotate(err))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{MockAccountRepository, MockPasswordHasher, MockTokenService};
    use crate::domain::Email;
    use rstest::rstest;

    fn registration() -> Registration {
        Registration::try_from_parts("staff@example.com", "correct horse", "employee")
            .expect("valid registration")
    }

    fn credentials(password: &str) -> LoginCredentials {
        LoginCredentials::try_from_parts("staff@example.com", password).expect("valid credentials")
    }

    fn stored_account() -> Account {
        Account {
            id: Uuid::new_v4(),
            email: Email::parse("staff@example.com").expect("valid email"),
            password_hash: "hashed:correct horse".to_owned(),
            role: Role::Moderator,
        }
    }

    fn fake_hasher() -> MockPasswordHasher {
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .returning(|password| Ok(format!("hashed:{password}")));
        hasher
            .expect_verify()
            .returning(|password, hash| Ok(hash == format!("hashed:{password}")));
        hasher
    }

    fn echo_tokens() -> MockTokenService {
        let mut tokens = MockTokenService::new();
        tokens
            .expect_issue()
            .returning(|principal| Ok(format!("{}:{}", principal.role, principal.subject)));
        tokens
    }

    fn make_service(
        accounts: MockAccountRepository,
        hasher: MockPasswordHasher,
        tokens: MockTokenService,
    ) -> AccountService<MockAccountRepository> {
        AccountService::new(Arc::new(accounts), Arc::new(hasher), Arc::new(tokens))
    }

    #[rstest]
    #[case(Role::Employee)]
    #[case(Role::Moderator)]
    #[tokio::test]
    async fn dummy_login_issues_token_for_role(#[case] role: Role) {
        let service = make_service(MockAccountRepository::new(), fake_hasher(), echo_tokens());

        let token = service
            .dummy_login(&RequestContext::detached(), role)
            .await
            .expect("token issued");

        assert!(token.starts_with(&format!("{role}:")));
    }

    #[tokio::test]
    async fn dummy_login_maps_signing_failure_to_internal() {
        let mut tokens = MockTokenService::new();
        tokens
            .expect_issue()
            .returning(|_| Err(TokenServiceError::signing("key rejected")));
        let service = make_service(MockAccountRepository::new(), fake_hasher(), tokens);

        let err = service
            .dummy_login(&RequestContext::detached(), Role::Employee)
            .await
            .expect_err("signing fails");

        assert_eq!(err.code(), ErrorCode::InternalError);
    }

    #[tokio::test]
    async fn register_stores_hashed_password() {
        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_create()
            .withf(|account| {
                account.password_hash == "hashed:correct horse"
                    && account.email.as_str() == "staff@example.com"
                    && account.role == Role::Employee
            })
            .times(1)
            .returning(|_| Ok(()));
        let service = make_service(accounts, fake_hasher(), echo_tokens());

        let view = service
            .register(&RequestContext::detached(), registration())
            .await
            .expect("registered");

        assert_eq!(view.email.as_str(), "staff@example.com");
        assert_eq!(view.role, Role::Employee);
    }

    #[tokio::test]
    async fn register_maps_duplicate_to_conflict() {
        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_create()
            .returning(|account| Err(AccountRepositoryError::duplicate(account.email.as_str())));
        let service = make_service(accounts, fake_hasher(), echo_tokens());

        let err = service
            .register(&RequestContext::detached(), registration())
            .await
            .expect_err("duplicate email");

        assert_eq!(err.code(), ErrorCode::Conflict);
        assert!(err.message().starts_with("register: "));
    }

    #[tokio::test]
    async fn login_returns_token_for_valid_credentials() {
        let account = stored_account();
        let subject = account.id;
        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_find_by_email()
            .return_once(move |_| Ok(Some(account)));
        let service = make_service(accounts, fake_hasher(), echo_tokens());

        let token = service
            .login(&RequestContext::detached(), credentials("correct horse"))
            .await
            .expect("logged in");

        assert_eq!(token, format!("moderator:{subject}"));
    }

    #[rstest]
    #[case::unknown_email(false, "correct horse")]
    #[case::wrong_password(true, "battery staple")]
    #[tokio::test]
    async fn login_rejects_bad_credentials(#[case] exists: bool, #[case] password: &str) {
        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_find_by_email()
            .returning(move |_| Ok(exists.then(stored_account)));
        let mut tokens = MockTokenService::new();
        tokens.expect_issue().times(0);
        let service = make_service(accounts, fake_hasher(), tokens);

        let err = service
            .login(&RequestContext::detached(), credentials(password))
            .await
            .expect_err("rejected");

        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert!(err.trace_id().is_some());
    }

    #[tokio::test]
    async fn login_surfaces_store_failure() {
        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_find_by_email()
            .returning(|_| Err(AccountRepositoryError::connection("refused")));
        let service = make_service(accounts, fake_hasher(), echo_tokens());

        let err = service
            .login(&RequestContext::detached(), credentials("correct horse"))
            .await
            .expect_err("store down");

        assert_eq!(err.code(), ErrorCode::StorageFailure);
    }
}

//! Test helpers for inbound HTTP components.
//!
//! Two fixtures are offered:
//! - [`TestPorts`]: strict mocks for every port (any unexpected call panics)
//!   plus a real token service, for handler-level mapping tests;
//! - [`MemoryStack`]: the real services over an [`InMemoryStore`], for
//!   request flows that exercise the lifecycle end to end.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header::{AUTHORIZATION, HeaderName};
use actix_web::{App, web};
use chrono::{Duration, Utc};
use mockable::DefaultClock;
use uuid::Uuid;

use crate::Trace;
use crate::domain::ports::{
    AccountCommand, MockAccountCommand, MockPickupPointCommand, MockPickupPointQuery,
    MockReceptionCommand, NoOpLifecycleMetrics, PickupPointCommand, PickupPointQuery,
    PickupPointRepository, Principal, ReceptionCommand, TokenService,
};
use crate::domain::{
    AccountService, City, PickupPoint, PickupPointService, ReceptionLifecycleService, Role,
    store_precision,
};
use crate::inbound::http::configure_api;
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::InMemoryStore;
use crate::outbound::security::{Argon2PasswordHasher, JwtTokenService};

const TEST_SECRET: &[u8] = b"http-test-secret";

fn test_tokens() -> Arc<dyn TokenService> {
    Arc::new(JwtTokenService::new(
        TEST_SECRET,
        Duration::hours(1),
        Arc::new(DefaultClock),
    ))
}

/// `Authorization` header carrying a fresh token for `role`.
pub fn bearer(state: &HttpState, role: Role) -> (HeaderName, String) {
    let token = state
        .tokens
        .issue(Principal {
            subject: Uuid::new_v4(),
            role,
        })
        .expect("test token issued");
    (AUTHORIZATION, format!("Bearer {token}"))
}

/// Port bundle defaulting to strict mocks.
pub struct TestPorts {
    accounts: Arc<dyn AccountCommand>,
    pickup_points: Arc<dyn PickupPointCommand>,
    pickup_points_query: Arc<dyn PickupPointQuery>,
    receptions: Arc<dyn ReceptionCommand>,
    tokens: Arc<dyn TokenService>,
}

impl Default for TestPorts {
    fn default() -> Self {
        Self {
            accounts: Arc::new(MockAccountCommand::new()),
            pickup_points: Arc::new(MockPickupPointCommand::new()),
            pickup_points_query: Arc::new(MockPickupPointQuery::new()),
            receptions: Arc::new(MockReceptionCommand::new()),
            tokens: test_tokens(),
        }
    }
}

impl TestPorts {
    pub fn with_accounts(mut self, accounts: impl AccountCommand + 'static) -> Self {
        self.accounts = Arc::new(accounts);
        self
    }

    pub fn with_pickup_points(mut self, command: impl PickupPointCommand + 'static) -> Self {
        self.pickup_points = Arc::new(command);
        self
    }

    pub fn with_query(mut self, query: impl PickupPointQuery + 'static) -> Self {
        self.pickup_points_query = Arc::new(query);
        self
    }

    pub fn with_receptions(mut self, receptions: impl ReceptionCommand + 'static) -> Self {
        self.receptions = Arc::new(receptions);
        self
    }

    pub fn with_tokens(mut self, tokens: impl TokenService + 'static) -> Self {
        self.tokens = Arc::new(tokens);
        self
    }

    pub fn into_state(self) -> web::Data<HttpState> {
        web::Data::new(HttpState::from(HttpStatePorts {
            accounts: self.accounts,
            pickup_points: self.pickup_points,
            pickup_points_query: self.pickup_points_query,
            receptions: self.receptions,
            tokens: self.tokens,
        }))
    }
}

/// Real services wired over one shared in-memory store.
pub struct MemoryStack {
    pub store: InMemoryStore,
    pub state: web::Data<HttpState>,
}

impl MemoryStack {
    pub fn new() -> Self {
        let store = InMemoryStore::new();
        let shared = Arc::new(store.clone());
        let metrics = Arc::new(NoOpLifecycleMetrics);
        let clock = Arc::new(DefaultClock);
        let tokens = test_tokens();

        let receptions = ReceptionLifecycleService::new(
            shared.clone(),
            shared.clone(),
            shared.clone(),
            metrics.clone(),
            clock.clone(),
        );
        let pickup_points = Arc::new(PickupPointService::new(
            shared.clone(),
            shared.clone(),
            shared.clone(),
            metrics,
            clock,
        ));
        let accounts =
            AccountService::new(shared, Arc::new(Argon2PasswordHasher::new()), tokens.clone());

        let state = web::Data::new(HttpState::from(HttpStatePorts {
            accounts: Arc::new(accounts),
            pickup_points: pickup_points.clone(),
            pickup_points_query: pickup_points,
            receptions: Arc::new(receptions),
            tokens,
        }));
        Self { store, state }
    }

    /// Application serving the full API under `/api/v1`.
    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        App::new()
            .app_data(self.state.clone())
            .wrap(Trace)
            .service(web::scope("/api/v1").configure(configure_api))
    }

    /// Store a pickup point directly and return its id.
    pub async fn seed_pickup_point(&self) -> Uuid {
        let point = PickupPoint::register(City::Moscow, store_precision(Utc::now()));
        PickupPointRepository::create(&self.store, &point)
            .await
            .expect("pickup point seeded");
        point.id
    }
}

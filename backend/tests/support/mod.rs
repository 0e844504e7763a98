//! Shared helpers for backend integration tests.
//!
//! Integration tests compile as separate crates under `backend/tests/`; this
//! module wires the real services over any set of repositories and offers a
//! controllable clock so reception timestamps are deterministic.

#![allow(dead_code, reason = "each test crate uses a different subset")]

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use mockable::Clock;
use uuid::Uuid;

use pvz_backend::domain::ports::{
    ItemRepository, NoOpLifecycleMetrics, PickupPointCommand, PickupPointQuery,
    PickupPointRepository, ReceptionCommand, ReceptionRepository,
};
use pvz_backend::domain::{City, PickupPointService, ReceptionLifecycleService, RequestContext};

pub mod pg_embed;

/// Clock returning a settable instant.
pub struct SteppingClock {
    now: Mutex<DateTime<Utc>>,
}

impl SteppingClock {
    pub fn starting_at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, at: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(|err| err.into_inner()) = at;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|err| err.into_inner());
        *now += by;
    }
}

impl Clock for SteppingClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|err| err.into_inner())
    }
}

/// Fixed epoch for scenario timestamps.
pub fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0)
        .single()
        .expect("valid base timestamp")
        + Duration::minutes(minutes)
}

/// Real lifecycle and registry services sharing one clock.
pub struct Services {
    pub receptions: Arc<dyn ReceptionCommand>,
    pub pickup_points: Arc<dyn PickupPointCommand>,
    pub listing: Arc<dyn PickupPointQuery>,
    pub clock: Arc<SteppingClock>,
}

impl Services {
    pub fn over<P, R, I>(pickup_points: Arc<P>, receptions: Arc<R>, items: Arc<I>) -> Self
    where
        P: PickupPointRepository + 'static,
        R: ReceptionRepository + 'static,
        I: ItemRepository + 'static,
    {
        let clock = Arc::new(SteppingClock::starting_at(at(0)));
        let metrics = Arc::new(NoOpLifecycleMetrics);
        let lifecycle = ReceptionLifecycleService::new(
            pickup_points.clone(),
            receptions.clone(),
            items.clone(),
            metrics.clone(),
            clock.clone(),
        );
        let registry = Arc::new(PickupPointService::new(
            pickup_points,
            receptions,
            items,
            metrics,
            clock.clone(),
        ));
        Self {
            receptions: Arc::new(lifecycle),
            pickup_points: registry.clone(),
            listing: registry,
            clock,
        }
    }

    /// Register a pickup point at `minutes` past the base instant.
    pub async fn register_at(&self, city: City, minutes: i64) -> Uuid {
        self.clock.set(at(minutes));
        self.pickup_points
            .create_pickup_point(&RequestContext::detached(), city)
            .await
            .expect("pickup point registered")
            .id
    }
}

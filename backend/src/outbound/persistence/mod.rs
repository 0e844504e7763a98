//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories here implement the domain entity store ports on top of
//! `diesel-async` connections checked out from a `bb8` pool.
//!
//! - **Thin adapters**: repositories translate between Diesel rows and
//!   domain entities. Lifecycle rules live in the domain services; the only
//!   invariants enforced here are the ones the database guarantees (the
//!   partial unique index on open receptions, the unique account email, and
//!   the open-reception guard on item writes).
//! - **Internal models**: row structs (`models.rs`) and the schema
//!   (`schema.rs`) never leave this module.
//! - **Typed errors**: Diesel and pool failures map to each port's error
//!   enum through `diesel_basic_error_mapping`.
//!
//! ```ignore
//! use pvz_backend::outbound::persistence::{DbPool, DieselReceptionRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/pvz")).await?;
//! let receptions = DieselReceptionRepository::new(pool);
//! ```

mod diesel_account_repository;
mod diesel_basic_error_mapping;
mod diesel_item_repository;
mod diesel_pickup_point_repository;
mod diesel_reception_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_account_repository::DieselAccountRepository;
pub use diesel_item_repository::DieselItemRepository;
pub use diesel_pickup_point_repository::DieselPickupPointRepository;
pub use diesel_reception_repository::DieselReceptionRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};

//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, hashing, tokens, metrics) expose typed error
//! enums so adapters map their failures into predictable variants. Driving
//! ports (commands and queries) speak the domain [`Error`](crate::domain::Error).

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod account_repository;
mod item_repository;
mod lifecycle_metrics;
mod password_hasher;
mod pickup_point_query;
mod pickup_point_repository;
mod reception_command;
mod reception_repository;
mod token_service;

#[cfg(test)]
pub use account_command::MockAccountCommand;
pub use account_command::{AccountCommand, AccountView};
#[cfg(test)]
pub use account_repository::MockAccountRepository;
pub use account_repository::{AccountRepository, AccountRepositoryError};
#[cfg(test)]
pub use item_repository::MockItemRepository;
pub use item_repository::{ItemRepository, ItemRepositoryError};
#[cfg(test)]
pub use lifecycle_metrics::MockLifecycleMetrics;
pub use lifecycle_metrics::{LifecycleMetrics, LifecycleMetricsError, NoOpLifecycleMetrics};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use pickup_point_query::{MockPickupPointCommand, MockPickupPointQuery};
pub use pickup_point_query::{ListPickupPointsRequest, PickupPointCommand, PickupPointQuery};
#[cfg(test)]
pub use pickup_point_repository::MockPickupPointRepository;
pub use pickup_point_repository::{PickupPointRepository, PickupPointRepositoryError};
#[cfg(test)]
pub use reception_command::MockReceptionCommand;
pub use reception_command::ReceptionCommand;
#[cfg(test)]
pub use reception_repository::MockReceptionRepository;
pub use reception_repository::{ReceptionRepository, ReceptionRepositoryError};
#[cfg(test)]
pub use token_service::MockTokenService;
pub use token_service::{Principal, TokenService, TokenServiceError};

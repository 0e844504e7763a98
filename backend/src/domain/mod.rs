//! Domain primitives, services, and ports.
//!
//! Purpose: define the pickup point, reception, and item entities, the
//! lifecycle and aggregation services that operate on them, and the ports
//! those services consume. Nothing here depends on a transport or storage
//! technology.
//!
//! Public surface:
//! - Entities: [`PickupPoint`], [`Reception`], [`Item`], [`Account`].
//! - Services: [`ReceptionLifecycleService`], [`PickupPointService`],
//!   [`AccountService`].
//! - [`Error`] / [`ErrorCode`]: transport-agnostic failure taxonomy.
//! - [`RequestContext`]: trace id and deadline threaded through every call.

pub mod account;
pub mod account_service;
pub mod error;
pub mod item;
pub mod listing;
pub mod pickup_point;
pub mod pickup_point_service;
pub mod ports;
pub mod reception;
pub mod reception_service;
pub mod request_context;
pub mod trace_id;

pub use self::account::{
    Account, AccountValidationError, Email, LoginCredentials, MIN_PASSWORD_LEN, Registration, Role,
};
pub use self::account_service::AccountService;
pub use self::error::{Error, ErrorCode};
pub use self::item::{Item, ItemType, UnknownItemTypeError};
pub use self::listing::{PickupPointDetails, PickupPointIdPage, ReceptionWithItems, TimeWindow};
pub use self::pickup_point::{City, PickupPoint, UnknownCityError};
pub use self::pickup_point_service::PickupPointService;
pub use self::reception::{Reception, ReceptionStatus, UnknownReceptionStatusError};
pub use self::reception_service::ReceptionLifecycleService;
pub use self::request_context::{DEFAULT_REQUEST_TIMEOUT, RequestContext};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

use chrono::{DateTime, SubsecRound, Utc};

/// Truncate a timestamp to the microsecond precision of the entity store so
/// values survive a write/read round trip unchanged.
#[must_use]
pub fn store_precision(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant.trunc_subsecs(6)
}

//! Receptions: goods-receiving sessions owned by a pickup point.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Lifecycle state of a reception. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum ReceptionStatus {
    #[serde(rename = "in_progress")]
    InProgress,
    #[serde(rename = "close")]
    Closed,
}

impl ReceptionStatus {
    /// Stored and wire representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Closed => "close",
        }
    }
}

impl fmt::Display for ReceptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a stored status string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown reception status '{0}'")]
pub struct UnknownReceptionStatusError(pub String);

impl FromStr for ReceptionStatus {
    type Err = UnknownReceptionStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_progress" => Ok(Self::InProgress),
            "close" => Ok(Self::Closed),
            other => Err(UnknownReceptionStatusError(other.to_owned())),
        }
    }
}

/// A goods-receiving session.
///
/// At most one reception per pickup point is [`ReceptionStatus::InProgress`]
/// at any time; the entity store enforces this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reception {
    pub id: Uuid,
    pub pvz_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub status: ReceptionStatus,
}

impl Reception {
    /// Start a new open reception for `pvz_id`.
    #[must_use]
    pub fn open(pvz_id: Uuid, started_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            pvz_id,
            started_at,
            status: ReceptionStatus::InProgress,
        }
    }

    /// Whether items may still be added or removed.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status == ReceptionStatus::InProgress
    }

    /// Consume the reception and return it in the closed state.
    #[must_use]
    pub fn closed(self) -> Self {
        Self {
            status: ReceptionStatus::Closed,
            ..self
        }
    }
}

//! Read-model types returned by the pickup point aggregation.

use chrono::{DateTime, Utc};

use super::{Item, PickupPoint, Reception};

/// Optional inclusive window applied to reception start times.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl TimeWindow {
    /// Window with the given optional bounds.
    #[must_use]
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    /// Whether either bound is set.
    #[must_use]
    pub fn is_bounded(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }

    /// Whether `instant` falls inside the window. Unbounded sides always
    /// match.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start.is_none_or(|start| instant >= start) && self.end.is_none_or(|end| instant <= end)
    }
}

/// A reception with the items received into it, oldest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceptionWithItems {
    pub reception: Reception,
    pub items: Vec<Item>,
}

/// A pickup point with its receptions in the requested window, newest
/// first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickupPointDetails {
    pub pickup_point: PickupPoint,
    pub receptions: Vec<ReceptionWithItems>,
}

/// Ordered page of pickup point identifiers plus the total match count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PickupPointIdPage {
    pub ids: Vec<uuid::Uuid>,
    pub total: u64,
}

//! Items scanned into a reception.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Item categories accepted by the service.
///
/// The wire form is the Russian category name; English names are accepted
/// as aliases when parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum ItemType {
    #[serde(rename = "электроника", alias = "electronics")]
    Electronics,
    #[serde(rename = "одежда", alias = "clothing")]
    Clothing,
    #[serde(rename = "обувь", alias = "shoes")]
    Shoes,
}

impl ItemType {
    /// Every accepted item type.
    pub const ALL: [Self; 3] = [Self::Electronics, Self::Clothing, Self::Shoes];

    /// Canonical stored and wire representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Electronics => "электроника",
            Self::Clothing => "одежда",
            Self::Shoes => "обувь",
        }
    }

    fn english_alias(self) -> &'static str {
        match self {
            Self::Electronics => "electronics",
            Self::Clothing => "clothing",
            Self::Shoes => "shoes",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when an item type falls outside the allow-list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("item type '{0}' is not supported")]
pub struct UnknownItemTypeError(pub String);

impl FromStr for ItemType {
    type Err = UnknownItemTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| {
                kind.as_str() == trimmed || kind.english_alias().eq_ignore_ascii_case(trimmed)
            })
            .ok_or_else(|| UnknownItemTypeError(s.to_owned()))
    }
}

/// An item received into a reception. Ordered within its reception by
/// `created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: Uuid,
    pub reception_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub item_type: ItemType,
}

impl Item {
    /// Record a new item against `reception_id`.
    #[must_use]
    pub fn receive(reception_id: Uuid, item_type: ItemType, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            reception_id,
            created_at,
            item_type,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("одежда", ItemType::Clothing)]
    #[case("clothing", ItemType::Clothing)]
    #[case("Electronics", ItemType::Electronics)]
    #[case("обувь", ItemType::Shoes)]
    fn parses_canonical_names_and_aliases(#[case] raw: &str, #[case] expected: ItemType) {
        assert_eq!(raw.parse::<ItemType>(), Ok(expected));
    }

    #[rstest]
    fn rejects_unknown_types() {
        assert!("furniture".parse::<ItemType>().is_err());
    }
}

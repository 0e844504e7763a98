//! Pickup points and the cities they may be registered in.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Cities a pickup point may be opened in.
///
/// The wire form is the Russian city name; English names are accepted as
/// aliases when parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum City {
    #[serde(rename = "Москва", alias = "Moscow")]
    Moscow,
    #[serde(rename = "Санкт-Петербург", alias = "Saint Petersburg")]
    SaintPetersburg,
    #[serde(rename = "Казань", alias = "Kazan")]
    Kazan,
}

impl City {
    /// Every accepted city, in display order.
    pub const ALL: [Self; 3] = [Self::Moscow, Self::SaintPetersburg, Self::Kazan];

    /// Canonical stored and wire representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Moscow => "Москва",
            Self::SaintPetersburg => "Санкт-Петербург",
            Self::Kazan => "Казань",
        }
    }

    fn english_alias(self) -> &'static str {
        match self {
            Self::Moscow => "Moscow",
            Self::SaintPetersburg => "Saint Petersburg",
            Self::Kazan => "Kazan",
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a city falls outside the allow-list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("city '{0}' is not supported")]
pub struct UnknownCityError(pub String);

impl FromStr for City {
    type Err = UnknownCityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|city| {
                city.as_str() == trimmed || city.english_alias().eq_ignore_ascii_case(trimmed)
            })
            .ok_or_else(|| UnknownCityError(s.to_owned()))
    }
}

/// A registered pickup point. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickupPoint {
    pub id: Uuid,
    pub registered_at: DateTime<Utc>,
    pub city: City,
}

impl PickupPoint {
    /// Register a new pickup point with a fresh identifier.
    #[must_use]
    pub fn register(city: City, registered_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            registered_at,
            city,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Москва", City::Moscow)]
    #[case("Moscow", City::Moscow)]
    #[case(" moscow ", City::Moscow)]
    #[case("Санкт-Петербург", City::SaintPetersburg)]
    #[case("Saint Petersburg", City::SaintPetersburg)]
    #[case("Казань", City::Kazan)]
    fn parses_canonical_names_and_aliases(#[case] raw: &str, #[case] expected: City) {
        assert_eq!(raw.parse::<City>(), Ok(expected));
    }

    #[rstest]
    #[case("Novosibirsk")]
    #[case("")]
    fn rejects_cities_outside_allow_list(#[case] raw: &str) {
        assert_eq!(raw.parse::<City>(), Err(UnknownCityError(raw.to_owned())));
    }

    #[rstest]
    fn serialises_to_canonical_name() {
        let json = serde_json::to_value(City::Kazan).expect("serialise city");
        assert_eq!(json, serde_json::json!("Казань"));
    }
}

//! Itinerary item kind tags.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::fields::DetailsError;

/// Discriminant of an itinerary item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Flight,
    GroundTransportation,
    CarRental,
    Accommodation,
    Activity,
}

impl ItemKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Flight,
        Self::GroundTransportation,
        Self::CarRental,
        Self::Accommodation,
        Self::Activity,
    ];

    /// Canonical tag used on the wire and in storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Flight => "flight",
            Self::GroundTransportation => "ground_transportation",
            Self::CarRental => "car_rental",
            Self::Accommodation => "accommodation",
            Self::Activity => "activity",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemKind {
    type Err = DetailsError;

    /// Parse a tag. The legacy spelling `ground` is accepted for ground
    /// transportation.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "flight" => Ok(Self::Flight),
            "ground_transportation" | "ground" => Ok(Self::GroundTransportation),
            "car_rental" => Ok(Self::CarRental),
            "accommodation" => Ok(Self::Accommodation),
            "activity" => Ok(Self::Activity),
            other => Err(DetailsError::UnknownItemType {
                value: other.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("ground", ItemKind::GroundTransportation)]
    #[case(" car_rental ", ItemKind::CarRental)]
    fn accepts_aliases_and_padding(#[case] raw: &str, #[case] expected: ItemKind) {
        assert_eq!(raw.parse::<ItemKind>(), Ok(expected));
    }

    #[test]
    fn canonical_tags_parse_to_their_kind() {
        for kind in ItemKind::ALL {
            assert_eq!(kind.as_str().parse::<ItemKind>(), Ok(kind));
        }
    }

    #[rstest]
    #[case("cruise")]
    #[case("Flight")]
    #[case("")]
    fn rejects_unknown_tags(#[case] raw: &str) {
        assert!(matches!(
            raw.parse::<ItemKind>(),
            Err(DetailsError::UnknownItemType { .. })
        ));
    }
}

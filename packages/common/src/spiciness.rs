use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How spicy a menu item is.
///
/// Stored as its ordinal. When the `sea-orm` feature is enabled, this enum can
/// be used directly in SeaORM entities.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema,
)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "i32", db_type = "Integer")
)]
pub enum Spiciness {
    /// Spiciness does not apply to this item.
    #[default]
    #[serde(rename = "NA")]
    #[cfg_attr(feature = "sea-orm", sea_orm(num_value = 0))]
    Na,
    #[cfg_attr(feature = "sea-orm", sea_orm(num_value = 1))]
    NotSpicy,
    #[cfg_attr(feature = "sea-orm", sea_orm(num_value = 2))]
    Spicy,
    #[cfg_attr(feature = "sea-orm", sea_orm(num_value = 3))]
    VerySpicy,
}

impl Spiciness {
    /// All levels, in ordinal order.
    pub const ALL: &'static [Spiciness] = &[Self::Na, Self::NotSpicy, Self::Spicy, Self::VerySpicy];

    /// Returns the string representation used in forms and JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Na => "NA",
            Self::NotSpicy => "NotSpicy",
            Self::Spicy => "Spicy",
            Self::VerySpicy => "VerySpicy",
        }
    }

    /// Ordinal value of the level.
    pub fn ordinal(&self) -> i32 {
        match self {
            Self::Na => 0,
            Self::NotSpicy => 1,
            Self::Spicy => 2,
            Self::VerySpicy => 3,
        }
    }
}

impl fmt::Display for Spiciness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing an invalid spiciness value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSpicinessError {
    invalid: String,
}

impl fmt::Display for ParseSpicinessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid spiciness '{}'. Valid values: {}",
            self.invalid,
            Spiciness::ALL
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

impl std::error::Error for ParseSpicinessError {}

impl FromStr for Spiciness {
    type Err = ParseSpicinessError;

    /// Accepts the level name or its ordinal. An empty value is `NA`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "NA" | "0" => Ok(Self::Na),
            "NotSpicy" | "1" => Ok(Self::NotSpicy),
            "Spicy" | "2" => Ok(Self::Spicy),
            "VerySpicy" | "3" => Ok(Self::VerySpicy),
            _ => Err(ParseSpicinessError {
                invalid: s.to_string(),
            }),
        }
    }
}

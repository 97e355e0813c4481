use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Jeep categories offered for a departure
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleClass {
    #[serde(alias = "ESTANDAR")]
    Standard,
    #[serde(alias = "PRIVADO")]
    Private,
}

impl VehicleClass {
    pub const ALL: [VehicleClass; 2] = [VehicleClass::Standard, VehicleClass::Private];

    /// Seats in a jeep of this class when no override is configured
    pub fn default_capacity(&self) -> u32 {
        match self {
            VehicleClass::Standard => 6,
            VehicleClass::Private => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleClass::Standard => "STANDARD",
            VehicleClass::Private => "PRIVATE",
        }
    }
}

impl fmt::Display for VehicleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleClass {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "STANDARD" | "ESTANDAR" => Ok(VehicleClass::Standard),
            "PRIVATE" | "PRIVADO" => Ok(VehicleClass::Private),
            other => Err(CatalogError::UnknownVehicleClass(other.to_string())),
        }
    }
}

/// Route taken by the tour. Descriptive only.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TourVariant {
    #[serde(alias = "TRES_DIAS")]
    ThreeDays,
    #[serde(alias = "CLASICA")]
    Classic,
    #[serde(alias = "INVERSA")]
    Reverse,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TourInfo {
    pub name: &'static str,
    pub days: u32,
}

impl TourVariant {
    pub const ALL: [TourVariant; 3] = [
        TourVariant::ThreeDays,
        TourVariant::Classic,
        TourVariant::Reverse,
    ];

    pub fn info(&self) -> TourInfo {
        match self {
            TourVariant::ThreeDays => TourInfo { name: "Laguna Colorada", days: 3 },
            TourVariant::Classic => TourInfo { name: "Classic Route", days: 4 },
            TourVariant::Reverse => TourInfo { name: "Reverse Route", days: 4 },
        }
    }
}

/// Main diet declared by the person making a booking
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DietPreference {
    #[default]
    Normal,
    #[serde(alias = "VEGETARIANO")]
    Vegetarian,
    #[serde(alias = "VEGANO")]
    Vegan,
    #[serde(alias = "CELIACO")]
    Celiac,
}

impl DietPreference {
    pub const ALL: [DietPreference; 4] = [
        DietPreference::Normal,
        DietPreference::Vegetarian,
        DietPreference::Vegan,
        DietPreference::Celiac,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DietPreference::Normal => "Normal (omnivore)",
            DietPreference::Vegetarian => "Vegetarian",
            DietPreference::Vegan => "Vegan",
            DietPreference::Celiac => "Gluten free (celiac)",
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Unknown vehicle class: {0}")]
    UnknownVehicleClass(String),
}

pub mod vehicle;
pub mod pricing;
pub mod capacity;

pub use vehicle::{CatalogError, DietPreference, TourInfo, TourVariant, VehicleClass};
pub use pricing::{Price, PriceTable, PriceTier, PricingError};
pub use capacity::{CapacityError, CapacityPolicy, Occupancy};

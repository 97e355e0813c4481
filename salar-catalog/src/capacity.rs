use crate::vehicle::VehicleClass;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Anything that tracks seats taken against a fixed number of seats
pub trait Occupancy {
    fn capacity(&self) -> u32;
    fn occupants(&self) -> u32;
}

/// Seat limits per vehicle class
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CapacityPolicy {
    capacities: HashMap<VehicleClass, u32>,
}

impl CapacityPolicy {
    /// Build a policy from configured seat counts. Classes missing from the
    /// map fall back to their default capacity.
    pub fn new(overrides: HashMap<VehicleClass, u32>) -> Result<Self, CapacityError> {
        let mut capacities = HashMap::new();

        for class in VehicleClass::ALL {
            let seats = overrides
                .get(&class)
                .copied()
                .unwrap_or_else(|| class.default_capacity());

            if seats == 0 {
                return Err(CapacityError::ZeroCapacity(class));
            }
            capacities.insert(class, seats);
        }

        Ok(Self { capacities })
    }

    pub fn max_capacity(&self, class: VehicleClass) -> u32 {
        self.capacities
            .get(&class)
            .copied()
            .unwrap_or_else(|| class.default_capacity())
    }

    /// Seats still free. Never negative.
    pub fn remaining<T: Occupancy>(&self, trip: &T) -> u32 {
        trip.capacity().saturating_sub(trip.occupants())
    }

    /// Whether `additional` passengers fit, requiring at least one
    pub fn can_accept<T: Occupancy>(&self, trip: &T, additional: u32) -> bool {
        additional >= 1 && additional <= self.remaining(trip)
    }
}

impl Default for CapacityPolicy {
    fn default() -> Self {
        Self {
            capacities: VehicleClass::ALL
                .iter()
                .map(|class| (*class, class.default_capacity()))
                .collect(),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CapacityError {
    #[error("Capacity for {0} must be at least one seat")]
    ZeroCapacity(VehicleClass),
}
